//! In-flight packets.

use crate::{NodeId, PacketId, Vec2};
use serde::{Deserialize, Serialize};

/// Color-mapping key the presentation layer uses to draw a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PacketColor {
    Normal,
    Intercepted,
}

impl PacketColor {
    /// Default RGB palette.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            PacketColor::Normal => (255, 255, 255),
            PacketColor::Intercepted => (255, 0, 0),
        }
    }
}

/// A packet travelling from `source` to `destination`.
///
/// Packets only reference nodes by id; nodes outlive every packet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    pub id: PacketId,
    pub source: NodeId,
    pub destination: NodeId,
    pub position: Vec2,
    /// Accumulated fraction of travel. Cosmetic.
    pub progress: f64,
    /// Decided once at spawn time.
    pub intercepted: bool,
    /// Tick the packet was spawned on.
    pub spawned_at: u64,
}

impl Packet {
    pub fn new(
        id: PacketId,
        source: NodeId,
        destination: NodeId,
        position: Vec2,
        intercepted: bool,
        spawned_at: u64,
    ) -> Self {
        Self {
            id,
            source,
            destination,
            position,
            progress: 0.0,
            intercepted,
            spawned_at,
        }
    }

    pub fn color(&self) -> PacketColor {
        if self.intercepted {
            PacketColor::Intercepted
        } else {
            PacketColor::Normal
        }
    }
}
