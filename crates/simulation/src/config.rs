//! Simulation configuration.
//!
//! Every section has defaults matching the reference scenario (50 nodes on a
//! 1400x900 field, 20% malicious, 10% spawn chance per tick), so a TOML file
//! only needs to name what it changes:
//!
//! ```toml
//! [nodes]
//! count = 10
//! malicious_ratio = 0.2
//!
//! [detection.policy]
//! kind = "trust_threshold"
//! confirmed_below = 0.2
//! suspicious_below = 0.4
//! ```

use crate::classification::ClassificationPolicy;
use crate::movement::MovementRule;
use crate::supply::NodeSupply;
use crate::traffic::{SpawnSchedule, DEFAULT_INTERCEPT_PROBABILITY};
use crate::transit::{TransitRule, DEFAULT_ARRIVAL_RADIUS};
use crate::ConfigError;
use blackhole_types::Bounds;
use serde::{Deserialize, Serialize};
use std::f64::consts::SQRT_2;
use std::path::PathBuf;

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub world: WorldConfig,
    pub nodes: NodesConfig,
    pub topology: TopologyConfig,
    pub movement: MovementRule,
    pub transit: TransitConfig,
    pub traffic: TrafficConfig,
    pub detection: DetectionConfig,
}

/// Field dimensions and pacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    /// Distance from the field edge that node placement and movement respect.
    pub margin: f64,
    /// Target updates per second for real-time drivers.
    pub tick_rate: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1400.0,
            height: 900.0,
            margin: 50.0,
            tick_rate: 60,
        }
    }
}

/// Node population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodesConfig {
    /// Node count for procedural supply.
    pub count: usize,
    /// Fraction of procedural nodes that are malicious.
    pub malicious_ratio: f64,
    /// Click radius around a node center.
    pub hit_radius: f64,
    /// Per-axis bound of the initial velocity.
    pub max_initial_speed: f64,
    pub supply: NodeSupply,
}

impl Default for NodesConfig {
    fn default() -> Self {
        Self {
            count: 50,
            malicious_ratio: 0.2,
            hit_radius: 15.0,
            max_initial_speed: 1.0,
            supply: NodeSupply::Procedural,
        }
    }
}

/// Neighbor topology, computed once at network creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    pub enabled: bool,
    pub radius: f64,
    pub max_neighbors: usize,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            radius: 200.0,
            max_neighbors: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitConfig {
    pub rule: TransitRule,
    pub arrival_radius: f64,
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self {
            rule: TransitRule::default(),
            arrival_radius: DEFAULT_ARRIVAL_RADIUS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficConfig {
    pub schedule: SpawnSchedule,
    /// Chance that a malicious source intercepts a packet it spawns.
    pub intercept_probability: f64,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            schedule: SpawnSchedule::default(),
            intercept_probability: DEFAULT_INTERCEPT_PROBABILITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub policy: ClassificationPolicy,
    /// Trust lost per intercepted arrival.
    pub trust_penalty: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            policy: ClassificationPolicy::default(),
            trust_penalty: 0.01,
        }
    }
}

impl SimulationConfig {
    /// Default configuration with `count` procedural nodes.
    pub fn new(count: usize) -> Self {
        Self::default().with_nodes(count)
    }

    pub fn with_nodes(mut self, count: usize) -> Self {
        self.nodes.count = count;
        self
    }

    pub fn with_malicious_ratio(mut self, ratio: f64) -> Self {
        self.nodes.malicious_ratio = ratio;
        self
    }

    pub fn with_dataset(mut self, path: impl Into<PathBuf>, population: usize) -> Self {
        self.nodes.supply = NodeSupply::Dataset {
            path: path.into(),
            population,
        };
        self
    }

    pub fn with_topology(mut self, enabled: bool) -> Self {
        self.topology.enabled = enabled;
        self
    }

    pub fn with_movement(mut self, rule: MovementRule) -> Self {
        self.movement = rule;
        self
    }

    pub fn with_transit(mut self, rule: TransitRule) -> Self {
        self.transit.rule = rule;
        self
    }

    pub fn with_schedule(mut self, schedule: SpawnSchedule) -> Self {
        self.traffic.schedule = schedule;
        self
    }

    pub fn with_intercept_probability(mut self, probability: f64) -> Self {
        self.traffic.intercept_probability = probability;
        self
    }

    pub fn with_policy(mut self, policy: ClassificationPolicy) -> Self {
        self.detection.policy = policy;
        self
    }

    /// Rectangle nodes are placed in and reflect off.
    pub fn bounds(&self) -> Bounds {
        Bounds::inset(self.world.width, self.world.height, self.world.margin)
    }

    /// Number of nodes the configured supply produces.
    pub fn node_count(&self) -> usize {
        match &self.nodes.supply {
            NodeSupply::Procedural => self.nodes.count,
            NodeSupply::Dataset { population, .. } => *population,
        }
    }

    /// Number of procedural nodes marked malicious.
    pub fn malicious_count(&self) -> usize {
        (self.nodes.count as f64 * self.nodes.malicious_ratio).floor() as usize
    }

    /// Upper bound on how far a node moves in one tick under the configured
    /// movement rule.
    pub fn max_node_speed(&self) -> f64 {
        match self.movement {
            MovementRule::Velocity => self.nodes.max_initial_speed * SQRT_2,
            MovementRule::Jitter { max_step } => max_step * SQRT_2,
            MovementRule::Stationary => 0.0,
        }
    }

    /// Reject node speeds packets cannot keep up with.
    ///
    /// Every tick a packet closes at least `transit speed - node speed` on
    /// its destination, and once it lands on it the destination must stay
    /// inside the arrival radius after its next move.
    pub fn check_node_speed(&self, node_speed: f64) -> Result<(), ConfigError> {
        let transit_speed = self.transit.rule.min_speed();
        if transit_speed <= node_speed {
            return Err(ConfigError::TransitTooSlow {
                transit_speed,
                node_speed,
            });
        }
        if node_speed > self.transit.arrival_radius {
            return Err(ConfigError::NodeOutrunsArrival {
                node_speed,
                arrival_radius: self.transit.arrival_radius,
            });
        }
        Ok(())
    }

    /// Reject configurations the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let count = self.node_count();
        if count < 2 {
            return Err(ConfigError::TooFewNodes { count });
        }
        self.validate_parameters()
    }

    /// Validate everything except the node count, for callers that supply
    /// their own node set.
    pub fn validate_parameters(&self) -> Result<(), ConfigError> {
        if !self.bounds().is_valid() {
            return Err(ConfigError::EmptyBounds {
                width: self.world.width,
                height: self.world.height,
                margin: self.world.margin,
            });
        }

        check_probability("nodes.malicious_ratio", self.nodes.malicious_ratio)?;
        check_probability(
            "traffic.intercept_probability",
            self.traffic.intercept_probability,
        )?;
        check_positive("nodes.hit_radius", self.nodes.hit_radius)?;
        check_positive("transit.arrival_radius", self.transit.arrival_radius)?;
        check_positive("world.tick_rate", self.world.tick_rate as f64)?;

        if self.nodes.max_initial_speed < 0.0 {
            return Err(ConfigError::NonPositive {
                name: "nodes.max_initial_speed",
                value: self.nodes.max_initial_speed,
            });
        }

        match self.traffic.schedule {
            SpawnSchedule::Probabilistic { probability } => {
                check_probability("traffic.schedule.probability", probability)?
            }
            SpawnSchedule::Interval { every_ticks } => {
                check_positive("traffic.schedule.every_ticks", every_ticks as f64)?
            }
        }

        match self.transit.rule {
            TransitRule::ConstantSpeed { speed } => check_positive("transit.rule.speed", speed)?,
            TransitRule::FixedFraction { fraction, min_step } => {
                check_positive("transit.rule.fraction", fraction)?;
                check_probability("transit.rule.fraction", fraction)?;
                check_positive("transit.rule.min_step", min_step)?;
            }
        }

        if let MovementRule::Jitter { max_step } = self.movement {
            check_positive("movement.max_step", max_step)?;
        }
        self.check_node_speed(self.max_node_speed())?;

        if let ClassificationPolicy::TrustThreshold {
            confirmed_below,
            suspicious_below,
        } = self.detection.policy
        {
            if confirmed_below > suspicious_below {
                return Err(ConfigError::TrustThresholdOrder {
                    confirmed_below,
                    suspicious_below,
                });
            }
        }

        check_probability("detection.trust_penalty", self.detection.trust_penalty)?;

        Ok(())
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { name, value })
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.node_count(), 50);
        assert_eq!(config.malicious_count(), 10);
    }

    #[test]
    fn test_too_few_nodes() {
        let config = SimulationConfig::new(1);
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooFewNodes { count: 1 })
        );

        let config = SimulationConfig::new(50).with_dataset("nodes.csv", 1);
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooFewNodes { count: 1 })
        );
    }

    #[test]
    fn test_invalid_probabilities() {
        let config = SimulationConfig::default().with_malicious_ratio(1.5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProbability {
                name: "nodes.malicious_ratio",
                ..
            })
        ));

        let config = SimulationConfig::default()
            .with_schedule(SpawnSchedule::Probabilistic { probability: -0.1 });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProbability { .. })
        ));
    }

    #[test]
    fn test_invalid_transit_and_schedule() {
        let config =
            SimulationConfig::default().with_transit(TransitRule::ConstantSpeed { speed: 0.0 });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { .. })
        ));

        let config =
            SimulationConfig::default().with_schedule(SpawnSchedule::Interval { every_ticks: 0 });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { .. })
        ));
    }

    #[test]
    fn test_transit_must_outpace_nodes() {
        // Default velocities reach 1.41 per tick.
        let config = SimulationConfig::default()
            .with_transit(TransitRule::ConstantSpeed { speed: 1.4 });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TransitTooSlow { transit_speed, .. }) if transit_speed == 1.4
        ));

        let config = SimulationConfig::default().with_transit(TransitRule::FixedFraction {
            fraction: 0.02,
            min_step: 1.0,
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TransitTooSlow { .. })
        ));

        // Jitter of 2.5 per axis reaches 3.54, past the default floor of 3.
        let config = SimulationConfig::default()
            .with_transit(TransitRule::fixed_fraction(0.02))
            .with_movement(MovementRule::Jitter { max_step: 2.5 });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TransitTooSlow { .. })
        ));

        let config = SimulationConfig::default().with_transit(TransitRule::fixed_fraction(0.02));
        assert!(config.validate().is_ok());
        assert!((config.max_node_speed() - SQRT_2).abs() < 1e-12);

        let config = SimulationConfig::default()
            .with_movement(MovementRule::Stationary)
            .with_transit(TransitRule::ConstantSpeed { speed: 0.5 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nodes_must_stay_within_arrival_radius() {
        let config = SimulationConfig::default()
            .with_transit(TransitRule::ConstantSpeed { speed: 20.0 })
            .with_movement(MovementRule::Jitter { max_step: 4.0 });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NodeOutrunsArrival { .. })
        ));
    }

    #[test]
    fn test_trust_threshold_order() {
        let config = SimulationConfig::default().with_policy(ClassificationPolicy::TrustThreshold {
            confirmed_below: 0.5,
            suspicious_below: 0.4,
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TrustThresholdOrder { .. })
        ));
    }

    #[test]
    fn test_empty_bounds() {
        let mut config = SimulationConfig::default();
        config.world.width = 80.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyBounds { .. })
        ));
    }

    #[test]
    fn test_partial_toml() {
        let config: SimulationConfig = toml::from_str(
            r#"
            [nodes]
            count = 10

            [transit.rule]
            kind = "fixed_fraction"
            fraction = 0.02

            [detection.policy]
            kind = "trust_threshold"
            confirmed_below = 0.2
            suspicious_below = 0.4

            [movement]
            kind = "jitter"
            max_step = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(config.nodes.count, 10);
        assert_eq!(config.nodes.malicious_ratio, 0.2);
        assert_eq!(config.transit.rule, TransitRule::fixed_fraction(0.02));
        assert_eq!(config.detection.policy, ClassificationPolicy::trust());
        assert_eq!(config.movement, MovementRule::Jitter { max_step: 2.0 });
        assert_eq!(config.world, WorldConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_dataset_supply_toml() {
        let config: SimulationConfig = toml::from_str(
            r#"
            [nodes.supply]
            kind = "dataset"
            path = "data/nodes.csv"
            population = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.node_count(), 30);
        assert_eq!(
            config.nodes.supply,
            NodeSupply::Dataset {
                path: PathBuf::from("data/nodes.csv"),
                population: 30
            }
        );
    }
}
