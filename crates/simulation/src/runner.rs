//! Deterministic simulation runner.
//!
//! The runner owns the whole simulation context: node registry, packet pool,
//! traffic generator, the seeded RNG and the interactive state (pause flag,
//! selection, detected set). Every tick runs the same pipeline in the same
//! order, so a seed fully determines a run.

use crate::classification::ClassificationPolicy;
use crate::config::SimulationConfig;
use crate::movement::{advance_nodes, MovementRule};
use crate::snapshot::{NodeDetail, NodeView, PacketView, SimulationSnapshot};
use crate::supply::{dataset_nodes, procedural_nodes, NodeSupply};
use crate::traffic::TrafficGenerator;
use crate::transit::TransitStep;
use crate::{ConfigError, NodeRegistry, SimulationError};
use blackhole_types::{InputEvent, Node, NodeId, Packet, PacketId};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Statistics collected during simulation.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SimulationStats {
    /// Ticks advanced (paused frames excluded).
    pub ticks: u64,
    /// Frames requested while paused.
    pub frames_paused: u64,
    /// Packets added to the pool, spawned or injected.
    pub packets_spawned: u64,
    /// Packets marked intercepted at spawn.
    pub packets_intercepted: u64,
    /// Non-intercepted packets that reached their destination.
    pub packets_delivered: u64,
    /// Intercepted packets that completed transit and hit their source.
    pub interceptions_observed: u64,
    /// Detection events (a node entering the detected set).
    pub detections: u64,
    /// Largest pool size seen at the end of a tick.
    pub max_in_flight: usize,
}

impl SimulationStats {
    /// Packets that completed transit.
    pub fn packets_arrived(&self) -> u64 {
        self.packets_delivered + self.interceptions_observed
    }

    /// Fraction of spawned packets that were intercepted.
    pub fn interception_rate(&self) -> f64 {
        if self.packets_spawned == 0 {
            0.0
        } else {
            self.packets_intercepted as f64 / self.packets_spawned as f64
        }
    }
}

/// What happened during one call to [`SimulationRunner::step`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TickSummary {
    pub spawned: Option<PacketId>,
    pub arrived: Vec<PacketId>,
    pub newly_detected: Vec<NodeId>,
}

/// Deterministic simulation runner.
///
/// Given the same configuration and seed, produces identical results every
/// run.
pub struct SimulationRunner {
    config: SimulationConfig,

    /// Fixed node set, in registration order.
    registry: NodeRegistry,

    /// In-flight packets, in spawn order.
    packets: Vec<Packet>,

    traffic: TrafficGenerator,

    /// Single RNG shared by supply, traffic and movement.
    rng: ChaCha8Rng,

    seed: u64,

    /// Ticks advanced so far.
    tick: u64,

    paused: bool,

    /// Cleared by [`InputEvent::Quit`].
    running: bool,

    selected: Option<NodeId>,

    /// Confirmed nodes and the tick they were detected at.
    detected: BTreeMap<NodeId, u64>,

    stats: SimulationStats,
}

impl SimulationRunner {
    /// Build the network described by `config`.
    pub fn new(config: SimulationConfig, seed: u64) -> Result<Self, SimulationError> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let nodes = match &config.nodes.supply {
            NodeSupply::Procedural => procedural_nodes(&config, &mut rng),
            NodeSupply::Dataset { path, population } => {
                dataset_nodes(path, *population, &config, &mut rng)?
            }
        };

        Self::build(config, nodes, rng, seed)
    }

    /// Build a runner over an explicit node set.
    ///
    /// The configured supply and node count are ignored.
    pub fn with_nodes(
        config: SimulationConfig,
        nodes: Vec<Node>,
        seed: u64,
    ) -> Result<Self, SimulationError> {
        if nodes.len() < 2 {
            return Err(ConfigError::TooFewNodes { count: nodes.len() }.into());
        }
        config.validate_parameters()?;
        if config.movement == MovementRule::Velocity {
            let fastest = nodes
                .iter()
                .map(|n| n.velocity.length())
                .fold(0.0, f64::max);
            config.check_node_speed(fastest)?;
        }

        Self::build(config, nodes, ChaCha8Rng::seed_from_u64(seed), seed)
    }

    fn build(
        config: SimulationConfig,
        nodes: Vec<Node>,
        rng: ChaCha8Rng,
        seed: u64,
    ) -> Result<Self, SimulationError> {
        let mut registry = NodeRegistry::from_nodes(nodes)?;
        if config.topology.enabled {
            registry.compute_neighbors(config.topology.radius, config.topology.max_neighbors);
        }

        let traffic = TrafficGenerator::new(
            config.traffic.schedule,
            config.traffic.intercept_probability,
            config.topology.enabled,
        );

        info!(
            seed,
            nodes = registry.len(),
            malicious = registry.iter().filter(|n| n.is_malicious).count(),
            topology = config.topology.enabled,
            "Simulation created"
        );

        let mut runner = Self {
            config,
            registry,
            packets: Vec::new(),
            traffic,
            rng,
            seed,
            tick: 0,
            paused: false,
            running: true,
            selected: None,
            detected: BTreeMap::new(),
            stats: SimulationStats::default(),
        };

        // Dataset trust values can already fall in a detection band.
        let newly_detected = runner.policy().reclassify(&mut runner.registry);
        runner.record_detections(&newly_detected);

        Ok(runner)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Ticks advanced so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            info!(paused, tick = self.tick, "Pause toggled");
        }
        self.paused = paused;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.registry.get(id)
    }

    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// Confirmed nodes with the tick each was detected at.
    pub fn detected(&self) -> &BTreeMap<NodeId, u64> {
        &self.detected
    }

    pub fn is_detected(&self, id: NodeId) -> bool {
        self.detected.contains_key(&id)
    }

    fn policy(&self) -> ClassificationPolicy {
        self.config.detection.policy
    }

    /// Advance the simulation by one tick.
    ///
    /// While paused this only counts the frame; node and packet state stay
    /// frozen.
    pub fn step(&mut self) -> TickSummary {
        if self.paused {
            self.stats.frames_paused += 1;
            return TickSummary::default();
        }

        self.tick += 1;
        self.stats.ticks += 1;
        let mut summary = TickSummary::default();

        // 1. Traffic
        if let Some(packet) = self
            .traffic
            .generate(&self.registry, self.tick, &mut self.rng)
        {
            summary.spawned = Some(packet.id);
            self.admit(packet);
        }

        // 2. Nodes
        let bounds = self.config.bounds();
        advance_nodes(
            &mut self.registry,
            &bounds,
            self.config.movement,
            &mut self.rng,
        );

        // 3. Packets
        summary.arrived = self.advance_packets();

        // 4. Classification
        let newly_detected = self.policy().reclassify(&mut self.registry);
        self.record_detections(&newly_detected);
        summary.newly_detected = newly_detected;

        self.stats.max_in_flight = self.stats.max_in_flight.max(self.packets.len());
        summary
    }

    /// Run up to `ticks` ticks, stopping early once the runner is stopped.
    ///
    /// Returns the number of steps taken.
    pub fn run_ticks(&mut self, ticks: u64) -> u64 {
        let mut taken = 0;
        while taken < ticks && self.running {
            self.step();
            taken += 1;
        }
        taken
    }

    fn admit(&mut self, packet: Packet) {
        self.stats.packets_spawned += 1;
        if packet.intercepted {
            self.stats.packets_intercepted += 1;
        }
        self.packets.push(packet);
    }

    fn advance_packets(&mut self) -> Vec<PacketId> {
        let rule = self.config.transit.rule;
        let arrival_radius = self.config.transit.arrival_radius;
        let trust_penalty = self.config.detection.trust_penalty;
        let registry = &mut self.registry;
        let stats = &mut self.stats;
        let mut arrived = Vec::new();

        self.packets.retain_mut(|packet| {
            let Some(destination) = registry.get(packet.destination).map(|n| n.position) else {
                warn!(
                    packet = %packet.id,
                    destination = %packet.destination,
                    "Destination vanished; dropping packet"
                );
                return false;
            };

            match rule.advance(packet, destination, arrival_radius) {
                TransitStep::Moving { .. } => true,
                TransitStep::Arrived => {
                    if let Err(e) = registry.apply_delivery(packet, trust_penalty) {
                        warn!(packet = %packet.id, error = %e, "Failed to apply delivery");
                    } else if packet.intercepted {
                        stats.interceptions_observed += 1;
                    } else {
                        stats.packets_delivered += 1;
                    }
                    arrived.push(packet.id);
                    false
                }
            }
        });

        arrived
    }

    fn record_detections(&mut self, newly_detected: &[NodeId]) {
        for &id in newly_detected {
            if self.detected.insert(id, self.tick).is_none() {
                self.stats.detections += 1;
                info!(node = %id, tick = self.tick, "Black hole detected");
            }
        }

        // Reversible policies may clear a confirmation.
        let registry = &self.registry;
        self.detected.retain(|id, _| {
            let confirmed = registry.get(*id).is_some_and(|n| n.is_confirmed());
            if !confirmed {
                debug!(node = %id, "Node left the detected set");
            }
            confirmed
        });
    }

    /// Queue a packet between two existing nodes, bypassing the spawn
    /// schedule.
    pub fn inject_packet(
        &mut self,
        source: NodeId,
        destination: NodeId,
        intercepted: bool,
    ) -> Result<PacketId, SimulationError> {
        if source == destination {
            return Err(SimulationError::SelfAddressedPacket(source));
        }
        let position = self
            .registry
            .get(source)
            .ok_or(SimulationError::UnknownNode(source))?
            .position;
        if !self.registry.contains(destination) {
            return Err(SimulationError::UnknownNode(destination));
        }

        let id = self.traffic.allocate_id();
        self.admit(Packet::new(
            id,
            source,
            destination,
            position,
            intercepted,
            self.tick,
        ));
        debug!(
            packet = %id,
            source = %source,
            destination = %destination,
            intercepted,
            "Injected packet"
        );
        Ok(id)
    }

    /// Toggle the selection of `id`.
    ///
    /// Selecting the selected node clears the selection; selecting another
    /// node replaces it.
    pub fn select(&mut self, id: NodeId) -> Result<Option<NodeId>, SimulationError> {
        if !self.registry.contains(id) {
            return Err(SimulationError::UnknownNode(id));
        }
        self.selected = if self.selected == Some(id) {
            None
        } else {
            Some(id)
        };
        debug!(selected = ?self.selected, "Selection changed");
        Ok(self.selected)
    }

    /// Manual override: flip maliciousness, reset the classification and
    /// drop the node from the detected set. Metrics are kept.
    pub fn toggle_malicious(&mut self, id: NodeId) -> Result<bool, SimulationError> {
        let node = self
            .registry
            .get_mut(id)
            .ok_or(SimulationError::UnknownNode(id))?;
        node.toggle_malicious();
        let is_malicious = node.is_malicious;

        self.detected.remove(&id);
        info!(node = %id, is_malicious, "Maliciousness toggled");
        Ok(is_malicious)
    }

    /// Apply one input event from the presentation layer.
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Quit => {
                info!(tick = self.tick, "Quit requested");
                self.stop();
            }
            InputEvent::TogglePause => self.set_paused(!self.paused),
            InputEvent::Click { .. } | InputEvent::SecondaryClick { .. } => {
                let Some(point) = event.pointer() else {
                    return;
                };
                let Some(id) = self.registry.hit_test(point, self.config.nodes.hit_radius) else {
                    return;
                };
                // The hit-tested id always exists.
                let result = match event {
                    InputEvent::Click { .. } => self.select(id).map(|_| ()),
                    _ => self.toggle_malicious(id).map(|_| ()),
                };
                if let Err(e) = result {
                    warn!(node = %id, error = %e, "Failed to apply input");
                }
            }
        }
    }

    /// Detail panel for the selected node.
    pub fn selected_detail(&self) -> Option<NodeDetail> {
        self.selected
            .and_then(|id| self.registry.get(id))
            .map(NodeDetail::from)
    }

    /// Read-only view of the current state for rendering.
    pub fn snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot {
            tick: self.tick,
            paused: self.paused,
            selected: self.selected,
            detected_count: self.detected.len(),
            nodes: self.registry.iter().map(NodeView::from).collect(),
            packets: self.packets.iter().map(PacketView::from).collect(),
        }
    }
}
