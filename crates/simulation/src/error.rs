//! Error types for simulation setup and interaction.
//!
//! Everything here is fatal at startup (bad configuration, unusable dataset)
//! or a caller mistake at the input boundary (unknown node id). Nothing is
//! retried.

use blackhole_types::NodeId;
use std::path::PathBuf;
use thiserror::Error;

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("at least 2 nodes are required, got {count}")]
    TooFewNodes { count: usize },

    #[error("{name} must be within [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("world of {width}x{height} with margin {margin} leaves no room for nodes")]
    EmptyBounds { width: f64, height: f64, margin: f64 },

    #[error(
        "trust thresholds out of order: \
         confirmed_below {confirmed_below} > suspicious_below {suspicious_below}"
    )]
    TrustThresholdOrder {
        confirmed_below: f64,
        suspicious_below: f64,
    },

    #[error("packets travel at least {transit_speed} per tick but nodes reach {node_speed}")]
    TransitTooSlow { transit_speed: f64, node_speed: f64 },

    #[error("nodes reach {node_speed} per tick, outside arrival radius {arrival_radius}")]
    NodeOutrunsArrival {
        node_speed: f64,
        arrival_radius: f64,
    },
}

/// Failures loading the external node dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dataset {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("dataset has {available} rows, cannot sample {requested}")]
    InsufficientRows { available: usize, requested: usize },

    #[error("dataset contains node {0} more than once")]
    DuplicateId(NodeId),
}

/// Errors surfaced by the simulation runner.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("node {0} registered more than once")]
    DuplicateNode(NodeId),

    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("packet source and destination are both node {0}")]
    SelfAddressedPacket(NodeId),
}
