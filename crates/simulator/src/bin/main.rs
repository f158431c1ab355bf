//! Black Hole Simulator CLI
//!
//! Run the black hole attack simulation headless and print the detection
//! report.
//!
//! # Example
//!
//! ```bash
//! # Reproducible run of the reference scenario
//! blackhole-sim --seed 42 --ticks 5000
//!
//! # 30 nodes sampled from a dataset, trust-band policy, paced at 60 Hz
//! blackhole-sim --dataset data/nodes.csv --population 30 --policy trust --realtime
//!
//! # Final snapshot as JSON
//! blackhole-sim --seed 7 --ticks 600 --json > snapshot.json
//! ```

use anyhow::{Context, Result};
use blackhole_simulation::{DetectionReport, SimulationRunner};
use blackhole_simulator::{load_config, ConfigOverrides, FramePacer, PolicyKind, TransitKind};
use blackhole_types::{InputEvent, NodeId};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Black Hole Simulator
///
/// Runs the black hole attack simulation. Single-threaded, reproducible
/// when the same seed is used.
#[derive(Parser, Debug)]
#[command(name = "blackhole-sim")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed for reproducible results. When omitted, a random seed is used.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of procedurally placed nodes
    #[arg(short = 'n', long)]
    nodes: Option<usize>,

    /// Fraction of procedural nodes that are malicious (0.0-1.0)
    #[arg(long)]
    malicious_ratio: Option<f64>,

    /// Number of frames to run
    #[arg(short = 't', long, default_value = "3600")]
    ticks: u64,

    /// CSV dataset with Node_ID and Node_Type columns
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Rows sampled from the dataset. Defaults to the node count.
    #[arg(long)]
    population: Option<usize>,

    /// Classification policy
    #[arg(long, value_enum)]
    policy: Option<PolicyKind>,

    /// Packet transit rule
    #[arg(long, value_enum)]
    transit: Option<TransitKind>,

    /// Enable or disable the neighbor topology
    #[arg(long)]
    topology: Option<bool>,

    /// Pace frames at the configured tick rate instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Pause once this tick is reached; remaining frames are counted as paused
    #[arg(long)]
    pause_at: Option<u64>,

    /// Select a node and print its detail panel at the end
    #[arg(long)]
    select: Option<u32>,

    /// Print the final snapshot as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Rows in the suspicious node table
    #[arg(long, default_value = "10")]
    top: usize,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn,blackhole_simulator=info,blackhole_simulation=info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let mut config = load_config(args.config.as_deref())?;
    ConfigOverrides {
        nodes: args.nodes,
        malicious_ratio: args.malicious_ratio,
        dataset: args.dataset.clone(),
        population: args.population,
        policy: args.policy,
        transit: args.transit,
        topology: args.topology,
    }
    .apply(&mut config);

    let seed = args.seed.unwrap_or_else(rand::random);

    info!(
        seed,
        nodes = config.node_count(),
        ticks = args.ticks,
        realtime = args.realtime,
        policy = ?config.detection.policy,
        "Starting simulation"
    );

    let mut runner =
        SimulationRunner::new(config, seed).context("Failed to create simulation")?;

    if let Some(id) = args.select {
        runner
            .select(NodeId(id))
            .with_context(|| format!("Cannot select node {id}"))?;
    }

    let mut pacer = args
        .realtime
        .then(|| FramePacer::new(runner.config().world.tick_rate));
    if let Some(pacer) = &pacer {
        debug!(frame = ?pacer.frame_duration(), "Pacing frames");
    }

    for _ in 0..args.ticks {
        if !runner.is_running() {
            break;
        }
        if args.pause_at == Some(runner.tick()) && !runner.is_paused() {
            runner.handle_input(InputEvent::TogglePause);
        }
        runner.step();
        if let Some(pacer) = pacer.as_mut() {
            pacer.wait();
        }
    }

    if let Some(pacer) = &pacer {
        if pacer.overruns() > 0 {
            warn!(
                overruns = pacer.overruns(),
                frames = pacer.frames(),
                "Frames missed their deadline"
            );
        }
    }

    let stats = runner.stats();
    info!(
        ticks = stats.ticks,
        frames_paused = stats.frames_paused,
        spawned = stats.packets_spawned,
        detections = stats.detections,
        max_in_flight = stats.max_in_flight,
        "Simulation finished"
    );

    if args.json {
        let snapshot = serde_json::to_string_pretty(&runner.snapshot())
            .context("Failed to serialize snapshot")?;
        println!("{snapshot}");
        return Ok(());
    }

    let report = DetectionReport::from_runner(&runner);
    report.print_summary();
    if args.top > 0 {
        report.print_node_details(args.top);
    }

    if let Some(detail) = runner.selected_detail() {
        println!("\n=== Selected Node ===");
        for line in detail.lines() {
            println!("{line}");
        }
    }

    Ok(())
}
