//! Node movement: bounded walk with billiard-ball reflection.

use crate::NodeRegistry;
use blackhole_types::{Bounds, Node};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// How nodes move each tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MovementRule {
    /// Move by the node's own velocity vector.
    #[default]
    Velocity,
    /// Move by a fresh per-axis uniform delta in `[-max_step, max_step]`.
    Jitter { max_step: f64 },
    /// Nodes stay where they were placed.
    Stationary,
}

/// Advance every node by one tick.
///
/// A coordinate that ends up outside `bounds` gets its velocity component
/// pointed back inward. Positions are never clamped, so a node can overshoot
/// a boundary by at most one step before returning.
pub fn advance_nodes(
    registry: &mut NodeRegistry,
    bounds: &Bounds,
    rule: MovementRule,
    rng: &mut ChaCha8Rng,
) {
    match rule {
        MovementRule::Stationary => {}
        MovementRule::Velocity => {
            for node in registry.iter_mut() {
                node.position += node.velocity;
                reflect(node, bounds);
            }
        }
        MovementRule::Jitter { max_step } => {
            for node in registry.iter_mut() {
                node.velocity.x = rng.gen_range(-max_step..=max_step);
                node.velocity.y = rng.gen_range(-max_step..=max_step);
                // A node already outside must step back in.
                reflect(node, bounds);
                node.position += node.velocity;
            }
        }
    }
}

fn reflect(node: &mut Node, bounds: &Bounds) {
    if node.position.x < bounds.min.x {
        node.velocity.x = node.velocity.x.abs();
    } else if node.position.x > bounds.max.x {
        node.velocity.x = -node.velocity.x.abs();
    }

    if node.position.y < bounds.min.y {
        node.velocity.y = node.velocity.y.abs();
    } else if node.position.y > bounds.max.y {
        node.velocity.y = -node.velocity.y.abs();
    }
}
