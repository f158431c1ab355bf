//! Test helpers for the black hole simulation.
//!
//! Provides deterministic node layouts so tests can reason about exact
//! distances and transit times instead of sampled positions.
//!
//! # Example
//!
//! ```rust
//! use blackhole_test_helpers::TestNetwork;
//! use blackhole_types::NodeId;
//!
//! // 10 nodes, 100 units apart on a horizontal line; the first 2 malicious
//! let network = TestNetwork::line(10, 100.0).with_malicious(2);
//! assert_eq!(network.size(), 10);
//! assert!(network.node(NodeId(1)).is_malicious);
//! assert!(!network.node(NodeId(2)).is_malicious);
//! ```

pub mod fixtures;

use blackhole_types::{Node, NodeId, Vec2};

/// Top-left node position of every layout, inside the default field margin.
pub const ORIGIN: Vec2 = Vec2 { x: 100.0, y: 100.0 };

/// A deterministic set of stationary nodes with ids `0..size`.
#[derive(Debug, Clone)]
pub struct TestNetwork {
    nodes: Vec<Node>,
}

impl TestNetwork {
    /// Nodes on a horizontal line starting at [`ORIGIN`], `spacing` apart.
    pub fn line(size: u32, spacing: f64) -> Self {
        let nodes = (0..size)
            .map(|i| {
                let position = Vec2::new(ORIGIN.x + i as f64 * spacing, ORIGIN.y);
                Node::new(NodeId(i), position, Vec2::ZERO, false)
            })
            .collect();
        Self { nodes }
    }

    /// Nodes on a grid, filled row by row with `columns` nodes per row.
    ///
    /// # Panics
    ///
    /// Panics if `columns` is zero.
    pub fn grid(size: u32, columns: u32, spacing: f64) -> Self {
        assert!(columns > 0, "grid needs at least one column");
        let nodes = (0..size)
            .map(|i| {
                let position = Vec2::new(
                    ORIGIN.x + (i % columns) as f64 * spacing,
                    ORIGIN.y + (i / columns) as f64 * spacing,
                );
                Node::new(NodeId(i), position, Vec2::ZERO, false)
            })
            .collect();
        Self { nodes }
    }

    /// Mark the first `count` nodes malicious.
    pub fn with_malicious(mut self, count: usize) -> Self {
        for (i, node) in self.nodes.iter_mut().enumerate() {
            node.is_malicious = i < count;
        }
        self
    }

    /// Give every node the same velocity.
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        for node in &mut self.nodes {
            node.velocity = velocity;
        }
        self
    }

    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// # Panics
    ///
    /// Panics if `id` is not part of the layout.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    /// # Panics
    ///
    /// Panics if `id` is not part of the layout.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    /// Distance between two nodes of the layout.
    pub fn distance(&self, a: NodeId, b: NodeId) -> f64 {
        self.node(a).position.distance_to(self.node(b).position)
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}
