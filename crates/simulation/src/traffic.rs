//! Traffic generation: spawning packets between random node pairs.

use crate::NodeRegistry;
use blackhole_types::{NodeId, Packet, PacketId};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

/// Probability that a malicious source intercepts a packet it spawns.
pub const DEFAULT_INTERCEPT_PROBABILITY: f64 = 0.5;

/// When new packets are spawned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnSchedule {
    /// One uniform draw per tick; spawn when it falls below `probability`.
    Probabilistic { probability: f64 },
    /// Spawn on every `every_ticks`-th tick.
    Interval { every_ticks: u64 },
}

impl Default for SpawnSchedule {
    fn default() -> Self {
        SpawnSchedule::Probabilistic { probability: 0.1 }
    }
}

/// Spawns packets and decides interception at spawn time.
#[derive(Debug, Clone)]
pub struct TrafficGenerator {
    schedule: SpawnSchedule,
    intercept_probability: f64,
    /// Topology variant: never address a packet to a direct neighbor.
    exclude_neighbors: bool,
    next_id: PacketId,
}

impl TrafficGenerator {
    pub fn new(
        schedule: SpawnSchedule,
        intercept_probability: f64,
        exclude_neighbors: bool,
    ) -> Self {
        Self {
            schedule,
            intercept_probability,
            exclude_neighbors,
            next_id: PacketId(0),
        }
    }

    /// Number of packet ids handed out so far.
    pub fn packets_created(&self) -> u64 {
        self.next_id.0
    }

    /// Reserve the next packet id.
    pub fn allocate_id(&mut self) -> PacketId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }

    /// Run the spawn decision for `tick` (1-based) and build a packet if it
    /// succeeds.
    pub fn generate(
        &mut self,
        registry: &NodeRegistry,
        tick: u64,
        rng: &mut ChaCha8Rng,
    ) -> Option<Packet> {
        if !self.should_spawn(tick, rng) {
            return None;
        }
        self.spawn(registry, tick, rng)
    }

    fn should_spawn(&self, tick: u64, rng: &mut ChaCha8Rng) -> bool {
        match self.schedule {
            SpawnSchedule::Probabilistic { probability } => rng.gen::<f64>() < probability,
            SpawnSchedule::Interval { every_ticks } => every_ticks > 0 && tick % every_ticks == 0,
        }
    }

    /// Build a packet between a uniformly chosen source and destination.
    ///
    /// Returns `None` only when fewer than two nodes exist.
    pub fn spawn(
        &mut self,
        registry: &NodeRegistry,
        tick: u64,
        rng: &mut ChaCha8Rng,
    ) -> Option<Packet> {
        if registry.len() < 2 {
            return None;
        }

        let source = registry.get_by_index(rng.gen_range(0..registry.len()))?;
        let destination = self.pick_destination(registry, source.id, &source.neighbors, rng)?;

        let intercepted = source.is_malicious && rng.gen_bool(self.intercept_probability);
        let id = self.allocate_id();

        trace!(
            packet = %id,
            source = %source.id,
            destination = %destination,
            intercepted,
            "Spawned packet"
        );

        Some(Packet::new(
            id,
            source.id,
            destination,
            source.position,
            intercepted,
            tick,
        ))
    }

    fn pick_destination(
        &self,
        registry: &NodeRegistry,
        source: NodeId,
        neighbors: &[NodeId],
        rng: &mut ChaCha8Rng,
    ) -> Option<NodeId> {
        let mut candidates: Vec<NodeId> = registry
            .iter()
            .map(|n| n.id)
            .filter(|&id| id != source)
            .filter(|id| !self.exclude_neighbors || !neighbors.contains(id))
            .collect();

        if candidates.is_empty() {
            // Every other node is a neighbor; fall back to any non-source node.
            warn!(source = %source, "No non-neighbor destination available");
            candidates = registry
                .iter()
                .map(|n| n.id)
                .filter(|&id| id != source)
                .collect();
        }

        candidates.choose(rng).copied()
    }
}
