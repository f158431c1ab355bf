//! Simulated network nodes.

use crate::{NodeId, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trust value every node starts with.
pub const INITIAL_TRUST: f64 = 1.0;

/// Energy every node starts with. Cosmetic: nothing consumes it.
pub const INITIAL_ENERGY: f64 = 100.0;

/// Threat classification of a node.
///
/// Derived from the node's metrics by the classification engine. Only the
/// engine and the manual malicious override ever write it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Classification {
    #[default]
    Normal,
    Suspicious,
    ConfirmedBlackHole,
}

impl Classification {
    pub fn is_confirmed(self) -> bool {
        matches!(self, Classification::ConfirmedBlackHole)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Classification::Normal => "Normal",
            Classification::Suspicious => "Suspicious",
            Classification::ConfirmedBlackHole => "Confirmed Black Hole",
        };
        f.write_str(name)
    }
}

/// Color-mapping key the presentation layer uses to draw a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeColor {
    /// Well-behaved node.
    Normal,
    /// Malicious-eligible node that has not been flagged yet.
    Malicious,
    /// Node in the suspicious trust band.
    Suspicious,
    /// Confirmed black hole.
    Detected,
}

impl NodeColor {
    /// Default RGB palette.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            NodeColor::Normal => (0, 255, 0),
            NodeColor::Malicious => (255, 165, 0),
            NodeColor::Suspicious => (255, 255, 0),
            NodeColor::Detected => (255, 0, 0),
        }
    }
}

/// Accumulated per-node counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMetrics {
    /// Reputation in `[0, 1]`; lowered on every intercepted arrival.
    pub trust: f64,
    /// Number of intercepted packets from this node that completed transit.
    pub suspicious_score: u32,
    /// Packets delivered to this node.
    pub packets_forwarded: u64,
    /// Packets this node was observed dropping.
    pub packets_dropped: u64,
    pub energy: f64,
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self {
            trust: INITIAL_TRUST,
            suspicious_score: 0,
            packets_forwarded: 0,
            packets_dropped: 0,
            energy: INITIAL_ENERGY,
        }
    }
}

impl NodeMetrics {
    /// Dropped over forwarded packets. The divisor is floored at 1.
    pub fn drop_ratio(&self) -> f64 {
        self.packets_dropped as f64 / self.packets_forwarded.max(1) as f64
    }

    /// Account for an intercepted packet of ours completing transit.
    pub fn record_interception(&mut self, trust_penalty: f64) {
        self.suspicious_score += 1;
        self.trust = (self.trust - trust_penalty).clamp(0.0, 1.0);
    }

    /// Account for a packet delivered to us.
    pub fn record_forwarded(&mut self) {
        self.packets_forwarded += 1;
    }

    /// Account for a packet we dropped.
    pub fn record_dropped(&mut self) {
        self.packets_dropped += 1;
    }
}

/// A simulated ad-hoc network node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Ground truth: whether this node intercepts traffic it originates.
    pub is_malicious: bool,
    pub classification: Classification,
    pub metrics: NodeMetrics,
    /// Nearest neighbors, computed once when the network is created.
    pub neighbors: Vec<NodeId>,
    /// Free-form type label from an external dataset.
    pub type_hint: Option<String>,
}

impl Node {
    pub fn new(id: NodeId, position: Vec2, velocity: Vec2, is_malicious: bool) -> Self {
        Self {
            id,
            position,
            velocity,
            is_malicious,
            classification: Classification::Normal,
            metrics: NodeMetrics::default(),
            neighbors: Vec::new(),
            type_hint: None,
        }
    }

    pub fn with_type_hint(mut self, hint: impl Into<String>) -> Self {
        self.type_hint = Some(hint.into());
        self
    }

    pub fn with_trust(mut self, trust: f64) -> Self {
        self.metrics.trust = trust.clamp(0.0, 1.0);
        self
    }

    pub fn is_confirmed(&self) -> bool {
        self.classification.is_confirmed()
    }

    /// Human-readable type shown in the detail panel.
    pub fn label(&self) -> &'static str {
        match self.classification {
            Classification::ConfirmedBlackHole => "Confirmed Black Hole",
            Classification::Suspicious => "Suspicious",
            Classification::Normal if self.is_malicious => "Potential Black Hole",
            Classification::Normal => "Normal",
        }
    }

    pub fn color(&self) -> NodeColor {
        match self.classification {
            Classification::ConfirmedBlackHole => NodeColor::Detected,
            Classification::Suspicious => NodeColor::Suspicious,
            Classification::Normal if self.is_malicious => NodeColor::Malicious,
            Classification::Normal => NodeColor::Normal,
        }
    }

    /// Manual override: flip maliciousness and reset the classification.
    ///
    /// Metrics are kept; the color key follows the new flag immediately.
    pub fn toggle_malicious(&mut self) {
        self.is_malicious = !self.is_malicious;
        self.classification = Classification::Normal;
    }

    /// Whether `point` lies within `radius` of the node center.
    pub fn contains_point(&self, point: Vec2, radius: f64) -> bool {
        self.position.distance_to(point) <= radius
    }
}
