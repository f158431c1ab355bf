//! Node registry: the fixed node set of a run.

use crate::SimulationError;
use blackhole_types::{Node, NodeId, Packet, Vec2};
use std::collections::HashMap;
use tracing::trace;

/// The fixed set of simulated nodes.
///
/// Nodes are created once when the network is built and never removed. The
/// registry keeps insertion order (which is also the order every per-tick
/// pass visits nodes in) plus an id index for lookups.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
}

impl NodeRegistry {
    /// Build a registry, rejecting duplicate ids.
    pub fn from_nodes(nodes: Vec<Node>) -> Result<Self, SimulationError> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id, i).is_some() {
                return Err(SimulationError::DuplicateNode(node.id));
            }
        }
        Ok(Self { nodes, index })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        match self.index.get(&id) {
            Some(&i) => Some(&mut self.nodes[i]),
            None => None,
        }
    }

    /// Node at a position in registration order.
    pub fn get_by_index(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut()
    }

    /// All ids in registration order.
    pub fn ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    /// Precomputed neighbors of a node, nearest first.
    pub fn neighbors(&self, id: NodeId) -> Option<&[NodeId]> {
        self.get(id).map(|n| n.neighbors.as_slice())
    }

    /// Compute every node's neighbor list from current positions.
    ///
    /// Neighbors are the other nodes strictly closer than `radius`, sorted by
    /// ascending distance (ties by ascending id) and truncated to
    /// `max_neighbors`. Lists are not refreshed as nodes move.
    pub fn compute_neighbors(&mut self, radius: f64, max_neighbors: usize) {
        let positions: Vec<(NodeId, Vec2)> =
            self.nodes.iter().map(|n| (n.id, n.position)).collect();

        for node in &mut self.nodes {
            let mut candidates: Vec<(f64, NodeId)> = positions
                .iter()
                .filter(|(id, _)| *id != node.id)
                .map(|(id, pos)| (node.position.distance_to(*pos), *id))
                .filter(|(distance, _)| *distance < radius)
                .collect();

            candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
            candidates.truncate(max_neighbors);

            node.neighbors = candidates.into_iter().map(|(_, id)| id).collect();
            trace!(node = %node.id, neighbors = node.neighbors.len(), "Computed neighbors");
        }
    }

    /// First node (in registration order) whose center is within `radius` of
    /// `point`.
    pub fn hit_test(&self, point: Vec2, radius: f64) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|n| n.contains_point(point, radius))
            .map(|n| n.id)
    }

    /// Apply the effects of a packet completing transit.
    ///
    /// An intercepted packet counts against its source (suspicious score up,
    /// trust down by `trust_penalty`); any other packet counts as forwarded to
    /// its destination.
    pub fn apply_delivery(
        &mut self,
        packet: &Packet,
        trust_penalty: f64,
    ) -> Result<(), SimulationError> {
        if packet.intercepted {
            let source = self
                .get_mut(packet.source)
                .ok_or(SimulationError::UnknownNode(packet.source))?;
            source.metrics.record_interception(trust_penalty);
        } else {
            let destination = self
                .get_mut(packet.destination)
                .ok_or(SimulationError::UnknownNode(packet.destination))?;
            destination.metrics.record_forwarded();
        }
        Ok(())
    }
}
