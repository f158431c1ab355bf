//! Threat classification from accumulated node metrics.
//!
//! Two policies exist:
//!
//! - [`ClassificationPolicy::CounterThreshold`] (default): malicious-eligible
//!   nodes are confirmed once their suspicious score or drop ratio crosses a
//!   threshold. Confirmation is sticky.
//! - [`ClassificationPolicy::TrustThreshold`]: every node is banded by its
//!   trust value. Bands are recomputed each tick and may recover.
//!
//! Both are pure functions of a single node's state; there are no cross-node
//! effects.

use crate::NodeRegistry;
use blackhole_types::{Classification, Node, NodeId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Suspicious score a node must exceed to be confirmed.
pub const DEFAULT_SCORE_THRESHOLD: u32 = 10;

/// Drop ratio a node must exceed to be confirmed.
pub const DEFAULT_DROP_RATIO_THRESHOLD: f64 = 0.5;

/// Pluggable rule mapping a node's metrics to a [`Classification`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassificationPolicy {
    CounterThreshold {
        score_threshold: u32,
        drop_ratio_threshold: f64,
    },
    TrustThreshold {
        confirmed_below: f64,
        suspicious_below: f64,
    },
}

impl Default for ClassificationPolicy {
    fn default() -> Self {
        Self::counter()
    }
}

impl ClassificationPolicy {
    /// Counter/ratio policy with the default thresholds.
    pub fn counter() -> Self {
        ClassificationPolicy::CounterThreshold {
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            drop_ratio_threshold: DEFAULT_DROP_RATIO_THRESHOLD,
        }
    }

    /// Trust-band policy with the default thresholds.
    pub fn trust() -> Self {
        ClassificationPolicy::TrustThreshold {
            confirmed_below: 0.2,
            suspicious_below: 0.4,
        }
    }

    /// Classification `node` should have under this policy.
    pub fn classify(&self, node: &Node) -> Classification {
        match *self {
            ClassificationPolicy::CounterThreshold {
                score_threshold,
                drop_ratio_threshold,
            } => {
                if !node.is_malicious {
                    return node.classification;
                }
                if node.classification.is_confirmed() {
                    return Classification::ConfirmedBlackHole;
                }
                let metrics = &node.metrics;
                if metrics.suspicious_score > score_threshold
                    || metrics.drop_ratio() > drop_ratio_threshold
                {
                    Classification::ConfirmedBlackHole
                } else {
                    node.classification
                }
            }
            ClassificationPolicy::TrustThreshold {
                confirmed_below,
                suspicious_below,
            } => {
                let trust = node.metrics.trust;
                if trust < confirmed_below {
                    Classification::ConfirmedBlackHole
                } else if trust < suspicious_below {
                    Classification::Suspicious
                } else {
                    Classification::Normal
                }
            }
        }
    }

    /// Recompute every node's classification.
    ///
    /// Returns the ids that became confirmed during this pass, in registry
    /// order.
    pub fn reclassify(&self, registry: &mut NodeRegistry) -> Vec<NodeId> {
        let mut newly_confirmed = Vec::new();

        for node in registry.iter_mut() {
            let next = self.classify(node);
            if next == node.classification {
                continue;
            }

            debug!(
                node = %node.id,
                from = %node.classification,
                to = %next,
                "Classification changed"
            );
            if next.is_confirmed() {
                newly_confirmed.push(node.id);
            }
            node.classification = next;
        }

        newly_confirmed
    }
}
