//! Multiple Pedestrians
//!
//! This example tracks several pedestrians at once, one machine each, sharing
//! a single configuration loaded from JSON in centimetre units.
//!
//! Key concepts:
//! - Loading and validating a configuration
//! - One independent machine per entity
//! - Injecting a custom rule set alongside the standard one
//!
//! Run with: RUST_LOG=fam=debug cargo run --example multi_pedestrian

use pedestrian_fam::{
    FamConfig, FeatureRecord, FiniteAutomationMachine, RuleBuilder, RuleSet, StateLabel, Thresholds,
    Tracker,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"{
    "thresholds": { "distance_scale": 100.0, "walk_stay_threshold": 0.3 },
    "window_capacity": 4
}"#;

fn in_cm(speed: f64, dx: f64, dy: f64) -> FeatureRecord {
    FeatureRecord {
        user_speed: speed,
        closest_station: 1,
        gazing_station: 2,
        distance_to_closest_station: (dx * dx + dy * dy).sqrt(),
        distance_to_closest_station_x: dx,
        distance_to_closest_station_y: dy,
        distance_from_start_station_x: 4000.0,
        distance_from_start_station_y: 4000.0,
        distance_from_end_station_x: 4000.0,
        distance_from_end_station_y: 4000.0,
        ..FeatureRecord::default()
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fam=info")),
        )
        .init();

    println!("=== Multiple Pedestrians ===\n");

    let config = match FamConfig::from_json_str(CONFIG) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("invalid configuration: {}", e);
            return;
        }
    };
    println!(
        "Loaded config: scale {} units/m, window {}",
        config.thresholds.distance_scale, config.window_capacity
    );

    // Standard rules plus one site-specific shortcut: anyone standing on the
    // road while looking at the AGV is treated as waiting for it.
    let mut rules = RuleSet::standard();
    let shortcut = RuleBuilder::new()
        .named("approaching_sidewalk.freezes_on_road")
        .from(StateLabel::ApproachingSidewalk)
        .to(StateLabel::Waiting)
        .when(|r: &FeatureRecord, t: &Thresholds| {
            r.on_road && r.looking_at_agv && r.user_speed.abs() < t.walk(1.0)
        })
        .confidence(0.9)
        .build();
    match shortcut {
        Ok(rule) => rules.push(rule),
        Err(e) => eprintln!("skipping custom rule: {}", e),
    }

    let prototype = match FiniteAutomationMachine::builder()
        .config(config)
        .rules(Arc::new(rules))
        .build()
    {
        Ok(machine) => machine,
        Err(e) => {
            eprintln!("could not build machine: {}", e);
            return;
        }
    };
    let mut tracker: Tracker<&str> = Tracker::new(prototype);

    let frames = [
        ("alice", in_cm(0.05, 80.0, 60.0)),
        ("bob", in_cm(0.9, 2500.0, 2500.0)),
        (
            "carol",
            FeatureRecord {
                user_speed_y: 0.6,
                ..in_cm(0.6, 900.0, 150.0)
            },
        ),
        ("alice", in_cm(0.05, 80.0, 60.0)),
        (
            "bob",
            FeatureRecord {
                user_speed_y: 0.9,
                on_road: true,
                facing_to_road: true,
                ..in_cm(0.9, 2500.0, 2500.0)
            },
        ),
        (
            "carol",
            FeatureRecord {
                on_road: true,
                looking_at_agv: true,
                ..in_cm(0.1, 900.0, 150.0)
            },
        ),
    ];

    for (who, record) in &frames {
        let label = tracker.update(who, record);
        println!("  {:<6} -> {}", who, label);
    }

    println!("\nTracking {} pedestrians:", tracker.len());
    let mut labels: Vec<_> = tracker.labels().collect();
    labels.sort_by_key(|(who, _)| **who);
    for (who, label) in labels {
        if let Some(machine) = tracker.get(who) {
            println!(
                "  {:<6} {:<24} ticks={} confidence={:.2}",
                who,
                label.name(),
                machine.ticks(),
                machine.last_confidence()
            );
        }
    }

    if let Some(machine) = tracker.remove(&"bob") {
        println!("\nbob left the scene in state {}", machine.state());
    }
}
