//! Read-only views handed to the presentation layer.

use blackhole_types::{
    Classification, Node, NodeColor, NodeId, NodeMetrics, Packet, PacketColor, PacketId, Vec2,
};
use serde::Serialize;

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSnapshot {
    pub tick: u64,
    pub paused: bool,
    pub selected: Option<NodeId>,
    pub detected_count: usize,
    pub nodes: Vec<NodeView>,
    pub packets: Vec<PacketView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub id: NodeId,
    pub position: Vec2,
    pub classification: Classification,
    pub color: NodeColor,
    pub label: &'static str,
    pub metrics: NodeMetrics,
    pub neighbors: Vec<NodeId>,
}

impl From<&Node> for NodeView {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id,
            position: node.position,
            classification: node.classification,
            color: node.color(),
            label: node.label(),
            metrics: node.metrics.clone(),
            neighbors: node.neighbors.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PacketView {
    pub id: PacketId,
    pub position: Vec2,
    pub color: PacketColor,
}

impl From<&Packet> for PacketView {
    fn from(packet: &Packet) -> Self {
        Self {
            id: packet.id,
            position: packet.position,
            color: packet.color(),
        }
    }
}

/// Contents of the inspector panel for the selected node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDetail {
    pub id: NodeId,
    pub label: &'static str,
    pub position: Vec2,
    pub is_malicious: bool,
    pub type_hint: Option<String>,
    pub trust: f64,
    pub suspicious_score: u32,
    pub packets_forwarded: u64,
    pub packets_dropped: u64,
    pub energy: f64,
    pub neighbor_count: usize,
}

impl From<&Node> for NodeDetail {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id,
            label: node.label(),
            position: node.position,
            is_malicious: node.is_malicious,
            type_hint: node.type_hint.clone(),
            trust: node.metrics.trust,
            suspicious_score: node.metrics.suspicious_score,
            packets_forwarded: node.metrics.packets_forwarded,
            packets_dropped: node.metrics.packets_dropped,
            energy: node.metrics.energy,
            neighbor_count: node.neighbors.len(),
        }
    }
}

impl NodeDetail {
    /// Panel lines in display order.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Node ID: {}", self.id),
            format!("Type: {}", self.label),
            format!("Position: ({:.0}, {:.0})", self.position.x, self.position.y),
            format!("Trust: {:.2}", self.trust),
            format!("Suspicious Score: {}", self.suspicious_score),
            format!("Packets Forwarded: {}", self.packets_forwarded),
            format!("Packets Dropped: {}", self.packets_dropped),
            format!("Energy: {:.0}", self.energy),
            format!("Connections: {}", self.neighbor_count),
        ];
        if let Some(hint) = &self.type_hint {
            lines.push(format!("Dataset Type: {hint}"));
        }
        lines
    }
}
