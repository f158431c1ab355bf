//! End-of-run detection report.
//!
//! Compares the classifier's verdicts against ground-truth eligibility and
//! summarizes traffic counters.
//!
//! ```ignore
//! runner.run_ticks(5_000);
//! let report = DetectionReport::from_runner(&runner);
//! report.print_summary();
//! report.print_node_details(10);
//! ```

use crate::SimulationRunner;
use blackhole_types::{Classification, NodeId};
use serde::Serialize;
use std::cmp::Reverse;

/// Per-node row of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeReport {
    pub id: NodeId,
    pub label: &'static str,
    pub is_malicious: bool,
    pub classification: Classification,
    pub trust: f64,
    pub suspicious_score: u32,
    pub packets_forwarded: u64,
    pub packets_dropped: u64,
    /// Tick the node entered the detected set, if it is in it.
    pub detected_at: Option<u64>,
}

/// Summary of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionReport {
    pub seed: u64,
    pub ticks: u64,
    pub paused: bool,
    pub running: bool,
    pub total_nodes: usize,
    pub malicious_nodes: usize,
    pub detected_nodes: usize,
    pub active_packets: usize,
    /// Largest packet pool seen at the end of a tick.
    pub max_in_flight: usize,
    pub packets_spawned: u64,
    pub packets_intercepted: u64,
    /// Intercepted share of spawned packets.
    pub interception_rate: f64,
    pub packets_delivered: u64,
    pub interceptions_observed: u64,
    /// Confirmed and eligible.
    pub true_positives: usize,
    /// Confirmed but not eligible.
    pub false_positives: usize,
    /// Eligible but not confirmed.
    pub missed: usize,
    /// Mean ticks from run start to detection over detected nodes.
    pub mean_ticks_to_detection: Option<f64>,
    /// Sorted by descending suspicious score, then ascending id.
    pub nodes: Vec<NodeReport>,
}

impl DetectionReport {
    pub fn from_runner(runner: &SimulationRunner) -> Self {
        let detected = runner.detected();
        let stats = runner.stats();

        let mut nodes: Vec<NodeReport> = runner
            .registry()
            .iter()
            .map(|node| NodeReport {
                id: node.id,
                label: node.label(),
                is_malicious: node.is_malicious,
                classification: node.classification,
                trust: node.metrics.trust,
                suspicious_score: node.metrics.suspicious_score,
                packets_forwarded: node.metrics.packets_forwarded,
                packets_dropped: node.metrics.packets_dropped,
                detected_at: detected.get(&node.id).copied(),
            })
            .collect();
        nodes.sort_by_key(|n| (Reverse(n.suspicious_score), n.id));

        let confirmed = |n: &&NodeReport| n.classification.is_confirmed();
        let true_positives = nodes.iter().filter(confirmed).filter(|n| n.is_malicious).count();
        let false_positives = nodes.iter().filter(confirmed).filter(|n| !n.is_malicious).count();
        let malicious_nodes = nodes.iter().filter(|n| n.is_malicious).count();

        let mean_ticks_to_detection = if detected.is_empty() {
            None
        } else {
            let total: u64 = detected.values().sum();
            Some(total as f64 / detected.len() as f64)
        };

        Self {
            seed: runner.seed(),
            ticks: runner.tick(),
            paused: runner.is_paused(),
            running: runner.is_running(),
            total_nodes: nodes.len(),
            malicious_nodes,
            detected_nodes: detected.len(),
            active_packets: runner.packets().len(),
            max_in_flight: stats.max_in_flight,
            packets_spawned: stats.packets_spawned,
            packets_intercepted: stats.packets_intercepted,
            interception_rate: stats.interception_rate(),
            packets_delivered: stats.packets_delivered,
            interceptions_observed: stats.interceptions_observed,
            true_positives,
            false_positives,
            missed: malicious_nodes - true_positives,
            mean_ticks_to_detection,
            nodes,
        }
    }

    /// Fraction of eligible nodes that were confirmed.
    pub fn detection_rate(&self) -> f64 {
        if self.malicious_nodes == 0 {
            0.0
        } else {
            self.true_positives as f64 / self.malicious_nodes as f64
        }
    }

    /// Print a summary of the detection report.
    pub fn print_summary(&self) {
        let status = match (self.running, self.paused) {
            (false, _) => "Stopped",
            (true, true) => "Paused",
            (true, false) => "Running",
        };

        println!();
        println!("================== BLACK HOLE DETECTION ======================");
        println!("Seed:                   {}", self.seed);
        println!("Ticks:                  {}", self.ticks);
        println!("Status:                 {}", status);
        println!("Total Nodes:            {}", self.total_nodes);
        println!("Malicious Nodes:        {}", self.malicious_nodes);
        println!("Detected Black Holes:   {}", self.detected_nodes);
        println!("Active Packets:         {}", self.active_packets);
        println!("Peak Packets In Flight: {}", self.max_in_flight);
        println!();

        println!("========================= TRAFFIC ============================");
        println!("Packets Spawned:        {}", self.packets_spawned);
        println!(
            "Packets Intercepted:    {} ({:.1}%)",
            self.packets_intercepted,
            self.interception_rate * 100.0
        );
        println!("Packets Delivered:      {}", self.packets_delivered);
        println!("Interceptions Observed: {}", self.interceptions_observed);
        println!();

        println!("======================== ACCURACY ============================");
        println!("True Positives:         {}", self.true_positives);
        println!("False Positives:        {}", self.false_positives);
        println!("Missed:                 {}", self.missed);
        println!(
            "Detection Rate:         {:.1}%",
            self.detection_rate() * 100.0
        );
        match self.mean_ticks_to_detection {
            Some(mean) => println!("Mean Ticks to Detect:   {:.1}", mean),
            None => println!("Mean Ticks to Detect:   n/a"),
        }
        println!("==============================================================");
    }

    /// Print the `top_n` nodes with the highest suspicious score.
    pub fn print_node_details(&self, top_n: usize) {
        println!();
        println!("==================== TOP SUSPICIOUS NODES =====================");
        println!(
            "{:<8} {:<22} {:>6} {:>7} {:>10} {:>8} {:>9}",
            "Node", "Type", "Score", "Trust", "Forwarded", "Dropped", "Detected"
        );
        println!("{}", "-".repeat(76));

        for node in self.nodes.iter().take(top_n) {
            let detected = node
                .detected_at
                .map(|tick| tick.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:<8} {:<22} {:>6} {:>7.2} {:>10} {:>8} {:>9}",
                node.id.to_string(),
                node.label,
                node.suspicious_score,
                node.trust,
                node.packets_forwarded,
                node.packets_dropped,
                detected
            );
        }
    }
}
