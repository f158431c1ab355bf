//! Black Hole Simulator
//!
//! Headless driver built on top of `blackhole-simulation`. It owns everything
//! around the core loop that a presentation layer would otherwise provide:
//!
//! - **Configuration**: optional TOML file plus command-line overrides
//! - **Pacing**: best-effort frame pacing for real-time runs
//!
//! # Example
//!
//! ```ignore
//! use blackhole_simulator::{load_config, ConfigOverrides, FramePacer};
//! use blackhole_simulation::SimulationRunner;
//!
//! let mut config = load_config(Some(&path))?;
//! ConfigOverrides { nodes: Some(20), ..Default::default() }.apply(&mut config);
//!
//! let mut runner = SimulationRunner::new(config, 42)?;
//! let mut pacer = FramePacer::new(runner.config().world.tick_rate);
//! while runner.is_running() && runner.tick() < 600 {
//!     runner.step();
//!     pacer.wait();
//! }
//! ```

mod overrides;
mod pacer;

pub use overrides::{load_config, ConfigOverrides, PolicyKind, TransitKind};
pub use pacer::FramePacer;
