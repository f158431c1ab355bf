//! End-to-end scenarios on hand-built networks.

use blackhole_simulation::{
    ClassificationPolicy, MovementRule, SimulationConfig, SimulationRunner, SpawnSchedule,
};
use blackhole_test_helpers::{fixtures, TestNetwork};
use blackhole_types::{Classification, InputEvent, NodeColor, NodeId, PacketColor};
use std::collections::HashSet;
use tracing_test::traced_test;

/// Stationary nodes, topology off, no automatic traffic.
fn quiet_config() -> SimulationConfig {
    SimulationConfig::default()
        .with_topology(false)
        .with_movement(MovementRule::Stationary)
        .with_schedule(SpawnSchedule::Probabilistic { probability: 0.0 })
}

fn drain(runner: &mut SimulationRunner) {
    for _ in 0..10_000 {
        if runner.packets().is_empty() {
            return;
        }
        runner.step();
    }
    panic!("packets never arrived");
}

#[traced_test]
#[test]
fn test_fifteen_intercepted_arrivals_confirm_source() {
    let network = TestNetwork::line(10, 100.0).with_malicious(2);
    let mut runner =
        SimulationRunner::with_nodes(quiet_config(), network.into_nodes(), 42).unwrap();

    for i in 0..15 {
        let destination = NodeId(2 + i % 8);
        runner.inject_packet(NodeId(0), destination, true).unwrap();
    }
    drain(&mut runner);

    let node = runner.node(NodeId(0)).unwrap();
    assert_eq!(node.metrics.suspicious_score, 15);
    assert_eq!(node.classification, Classification::ConfirmedBlackHole);
    assert_eq!(node.color(), NodeColor::Detected);
    assert_eq!(node.label(), "Confirmed Black Hole");

    // The other eligible node saw nothing and stays a potential black hole.
    let other = runner.node(NodeId(1)).unwrap();
    assert_eq!(other.classification, Classification::Normal);
    assert_eq!(other.label(), "Potential Black Hole");

    assert_eq!(runner.detected().len(), 1);
}

#[test]
fn test_drop_ratio_confirms_with_zero_score() {
    let mut network = TestNetwork::line(3, 100.0).with_malicious(1);
    {
        let metrics = &mut network.node_mut(NodeId(0)).metrics;
        metrics.packets_forwarded = 1;
        metrics.packets_dropped = 1;
    }
    let mut runner = SimulationRunner::with_nodes(quiet_config(), network.into_nodes(), 0).unwrap();
    runner.step();

    let node = runner.node(NodeId(0)).unwrap();
    assert_eq!(node.metrics.suspicious_score, 0);
    assert!(node.is_confirmed());
    assert!(runner.is_detected(NodeId(0)));
}

#[test]
fn test_fixture_nodes_classify() {
    let nodes = vec![fixtures::scored_node(0, 11), fixtures::dropping_node(1, 0, 0)];
    let runner = SimulationRunner::with_nodes(quiet_config(), nodes, 0).unwrap();

    // Build-time classification already ran.
    assert!(runner.is_detected(NodeId(0)));
    assert!(!runner.is_detected(NodeId(1)));
}

#[test]
fn test_trust_policy_bands() {
    let mut config = quiet_config().with_policy(ClassificationPolicy::trust());
    config.detection.trust_penalty = 0.1;
    let network = TestNetwork::line(3, 100.0).with_malicious(1);
    let mut runner = SimulationRunner::with_nodes(config, network.into_nodes(), 0).unwrap();

    for _ in 0..7 {
        runner.inject_packet(NodeId(0), NodeId(1), true).unwrap();
    }
    drain(&mut runner);
    assert_eq!(
        runner.node(NodeId(0)).unwrap().classification,
        Classification::Suspicious
    );
    assert_eq!(runner.node(NodeId(0)).unwrap().color(), NodeColor::Suspicious);
    assert!(!runner.is_detected(NodeId(0)));

    for _ in 0..2 {
        runner.inject_packet(NodeId(0), NodeId(2), true).unwrap();
    }
    drain(&mut runner);
    assert!(runner.is_detected(NodeId(0)));
}

#[test]
fn test_packet_distance_decreases_until_arrival() {
    let network = TestNetwork::line(2, 500.0);
    let mut runner = SimulationRunner::with_nodes(quiet_config(), network.into_nodes(), 0).unwrap();
    let id = runner.inject_packet(NodeId(0), NodeId(1), false).unwrap();
    let destination = runner.node(NodeId(1)).unwrap().position;

    let mut last = f64::INFINITY;
    let mut ticks = 0;
    loop {
        let summary = runner.step();
        ticks += 1;
        if summary.arrived.contains(&id) {
            break;
        }
        let packet = &runner.packets()[0];
        let distance = packet.position.distance_to(destination);
        assert!(distance < last, "distance must shrink every tick");
        last = distance;
        assert!(ticks <= 126, "constant-speed transit is bounded");
    }

    assert!(runner.packets().is_empty());
    assert_eq!(runner.node(NodeId(1)).unwrap().metrics.packets_forwarded, 1);
}

#[traced_test]
#[test]
fn test_default_run_invariants() {
    let mut runner = SimulationRunner::new(SimulationConfig::default(), 2024).unwrap();
    let mut arrived = HashSet::new();

    for _ in 0..3_000 {
        let summary = runner.step();
        for id in summary.arrived {
            assert!(arrived.insert(id), "packet {id} removed twice");
        }
        for packet in runner.packets() {
            assert_ne!(packet.source, packet.destination);
            assert!(!arrived.contains(&packet.id));
            if packet.intercepted {
                assert_eq!(packet.color(), PacketColor::Intercepted);
            }
        }
    }

    let stats = runner.stats();
    assert_eq!(
        stats.packets_spawned,
        arrived.len() as u64 + runner.packets().len() as u64
    );
    assert_eq!(stats.packets_arrived(), arrived.len() as u64);

    // Only eligible nodes ever intercept under the default policy.
    for node in runner.registry().iter() {
        if !node.is_malicious {
            assert_eq!(node.metrics.suspicious_score, 0);
            assert!(!node.is_confirmed());
        }
    }
}

#[test]
fn test_toggle_changes_eligibility_immediately() {
    let mut config = quiet_config()
        .with_schedule(SpawnSchedule::Interval { every_ticks: 1 })
        .with_intercept_probability(1.0);
    config.transit.arrival_radius = 1_000.0;
    let network = TestNetwork::line(2, 100.0);
    let mut runner = SimulationRunner::with_nodes(config, network.into_nodes(), 5).unwrap();

    for _ in 0..50 {
        runner.step();
    }
    assert_eq!(runner.stats().packets_intercepted, 0);

    // Node 0 sits at (100, 100).
    runner.handle_input(InputEvent::SecondaryClick { x: 100.0, y: 100.0 });
    let node = runner.node(NodeId(0)).unwrap();
    assert!(node.is_malicious);
    assert_eq!(node.color(), NodeColor::Malicious);

    runner.run_ticks(50);
    let from_zero = runner.node(NodeId(0)).unwrap().metrics.suspicious_score;
    assert!(from_zero > 0, "toggled node intercepts its own traffic");
    assert_eq!(
        runner.stats().packets_intercepted,
        runner.stats().interceptions_observed
    );

    // Toggling back stops interception.
    runner.handle_input(InputEvent::SecondaryClick { x: 100.0, y: 100.0 });
    let before = runner.stats().packets_intercepted;
    runner.run_ticks(50);
    assert_eq!(runner.stats().packets_intercepted, before);
}

#[test]
fn test_select_and_detail_panel() {
    let network = TestNetwork::line(3, 100.0).with_malicious(1);
    let mut runner = SimulationRunner::with_nodes(quiet_config(), network.into_nodes(), 0).unwrap();

    runner.handle_input(InputEvent::Click { x: 100.0, y: 100.0 });
    let detail = runner.selected_detail().unwrap();
    assert_eq!(detail.id, NodeId(0));
    assert_eq!(detail.label, "Potential Black Hole");
    assert_eq!(detail.lines()[0], "Node ID: 0");

    runner.handle_input(InputEvent::Click { x: 100.0, y: 100.0 });
    assert!(runner.selected_detail().is_none());
}
