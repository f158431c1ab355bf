//! Configuration file loading and command-line overrides.

use anyhow::{Context, Result};
use blackhole_simulation::{ClassificationPolicy, NodeSupply, SimulationConfig, TransitRule};
use clap::ValueEnum;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Classification policy selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyKind {
    /// Suspicious score / drop ratio thresholds (sticky)
    Counter,
    /// Trust bands (reversible)
    Trust,
}

/// Transit rule selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransitKind {
    /// Fixed distance per tick
    Speed,
    /// Fixed fraction of the remaining distance per tick
    Fraction,
}

/// Load a configuration file, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    let Some(path) = path else {
        return Ok(SimulationConfig::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    debug!(path = %path.display(), "Loaded config file");
    Ok(config)
}

/// Values given on the command line, applied on top of the loaded file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub nodes: Option<usize>,
    pub malicious_ratio: Option<f64>,
    pub dataset: Option<PathBuf>,
    /// Rows sampled from `dataset`; defaults to the node count.
    pub population: Option<usize>,
    pub policy: Option<PolicyKind>,
    pub transit: Option<TransitKind>,
    pub topology: Option<bool>,
}

impl ConfigOverrides {
    /// Apply CLI overrides to the configuration.
    pub fn apply(&self, config: &mut SimulationConfig) {
        if let Some(nodes) = self.nodes {
            config.nodes.count = nodes;
        }

        if let Some(ratio) = self.malicious_ratio {
            config.nodes.malicious_ratio = ratio;
        }

        if let Some(ref path) = self.dataset {
            let population = self.population.unwrap_or(config.nodes.count);
            config.nodes.supply = NodeSupply::Dataset {
                path: path.clone(),
                population,
            };
        } else if let (Some(population), NodeSupply::Dataset { population: current, .. }) =
            (self.population, &mut config.nodes.supply)
        {
            *current = population;
        }

        if let Some(policy) = self.policy {
            config.detection.policy = match policy {
                PolicyKind::Counter => ClassificationPolicy::counter(),
                PolicyKind::Trust => ClassificationPolicy::trust(),
            };
        }

        if let Some(transit) = self.transit {
            config.transit.rule = match transit {
                TransitKind::Speed => TransitRule::default(),
                TransitKind::Fraction => TransitRule::fixed_fraction(0.02),
            };
        }

        if let Some(enabled) = self.topology {
            config.topology.enabled = enabled;
        }
    }
}
