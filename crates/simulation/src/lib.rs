//! Deterministic black hole attack simulation.
//!
//! A fixed set of wireless nodes drifts inside a bounded field while packets
//! travel between random node pairs. Malicious nodes intercept part of the
//! traffic they originate; every intercepted packet that completes transit
//! counts against its source, and a pluggable policy turns those counts into
//! a classification. Given the same seed, a run produces identical results.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  SimulationRunner                       │
//! │                                                         │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     TrafficGenerator                               │ │
//! │  │     spawn decision, endpoints, interception        │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Movement: nodes (reflect), packets (transit)   │ │
//! │  │     arrivals apply delivery effects once           │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     ClassificationPolicy → detected set            │ │
//! │  └────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod classification;
mod config;
mod error;
mod movement;
mod registry;
mod report;
mod runner;
mod snapshot;
mod supply;
mod traffic;
mod transit;

pub use classification::{
    ClassificationPolicy, DEFAULT_DROP_RATIO_THRESHOLD, DEFAULT_SCORE_THRESHOLD,
};
pub use config::{
    DetectionConfig, NodesConfig, SimulationConfig, TopologyConfig, TrafficConfig,
    TransitConfig, WorldConfig,
};
pub use error::{ConfigError, DatasetError, SimulationError};
pub use movement::{advance_nodes, MovementRule};
pub use registry::NodeRegistry;
pub use report::{DetectionReport, NodeReport};
pub use runner::{SimulationRunner, SimulationStats, TickSummary};
pub use snapshot::{NodeDetail, NodeView, PacketView, SimulationSnapshot};
pub use supply::{
    dataset_nodes, load_dataset, procedural_nodes, sample_dataset_nodes, DatasetRecord,
    NodeSupply,
};
pub use traffic::{SpawnSchedule, TrafficGenerator, DEFAULT_INTERCEPT_PROBABILITY};
pub use transit::{TransitRule, TransitStep, DEFAULT_ARRIVAL_RADIUS, DEFAULT_MIN_STEP};
