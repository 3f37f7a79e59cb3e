//! Replay Trace
//!
//! This example replays a short synthetic pedestrian trace through a single
//! machine and scores it against the ground-truth labels it carries.
//!
//! Key concepts:
//! - Cold start and recovery out of Error
//! - Hysteresis demotion when the hypothesis stops fitting
//! - Skipping malformed and out-of-order records at the boundary
//! - Checkpointing the machine mid-stream
//!
//! Run with: RUST_LOG=fam=debug cargo run --example replay_trace

use pedestrian_fam::{
    replay, FeatureRecord, FiniteAutomationMachine, MachineCheckpoint, RuleSet, StateLabel,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn base(timestamp_id: i64) -> FeatureRecord {
    FeatureRecord {
        timestamp_id,
        closest_station: 1,
        gazing_station: 2,
        distance_to_closest_station: 40.0,
        distance_to_closest_station_x: 40.0,
        distance_to_closest_station_y: 40.0,
        distance_from_start_station_x: 40.0,
        distance_from_start_station_y: 40.0,
        distance_from_end_station_x: 40.0,
        distance_from_end_station_y: 40.0,
        ..FeatureRecord::default()
    }
}

fn trace() -> Vec<FeatureRecord> {
    let mut records = Vec::new();
    let mut t = 0;
    let mut next = || {
        t += 1;
        t
    };

    // Idling beside the start station.
    for _ in 0..3 {
        records.push(FeatureRecord {
            user_speed: 0.05,
            distance_to_closest_station: 1.0,
            distance_to_closest_station_x: 1.0,
            distance_to_closest_station_y: 0.8,
            state: Some(StateLabel::AtStation),
            ..base(next())
        });
    }

    // The AGV approaches; the pedestrian holds at the kerb.
    for _ in 0..2 {
        records.push(FeatureRecord {
            user_speed: 0.1,
            intent_to_cross: true,
            possible_interaction: true,
            looking_at_agv: true,
            distance_to_closest_station: 1.5,
            distance_to_closest_station_x: 1.2,
            distance_to_closest_station_y: 1.0,
            state: Some(StateLabel::Waiting),
            ..base(next())
        });
    }

    // A dropped sensor frame.
    records.push(FeatureRecord {
        user_speed: f64::NAN,
        ..base(next())
    });

    // Crossing the road.
    for _ in 0..4 {
        records.push(FeatureRecord {
            user_speed: 1.1,
            user_speed_y: 1.05,
            on_road: true,
            facing_to_road: true,
            state: Some(StateLabel::Crossing),
            ..base(next())
        });
    }

    // A late frame from the log writer.
    records.push(base(2));

    // Reaching the far sidewalk and heading along it.
    for _ in 0..3 {
        records.push(FeatureRecord {
            user_speed: 1.2,
            user_speed_x: 1.15,
            user_speed_y: 0.1,
            on_sidewalks: true,
            facing_along_sidewalk: true,
            distance_from_end_station_x: 12.0,
            distance_from_end_station_y: 1.0,
            state: Some(StateLabel::MovingAlongSidewalk),
            ..base(next())
        });
    }

    // Tracking glitch: nothing fits for a while.
    for _ in 0..3 {
        records.push(FeatureRecord {
            user_speed: 2.5,
            ..base(next())
        });
    }

    records
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fam=info")),
        )
        .init();

    println!("=== Replay Trace ===\n");

    let records = trace();
    let mut machine = FiniteAutomationMachine::cold_start();
    let summary = replay(&mut machine, &records);

    println!("Emitted labels:");
    for (tick, label) in summary.labels.iter().enumerate() {
        println!("  {:>2}: {}", tick, label);
    }

    println!("\nAccepted ticks:       {}", summary.ticks);
    println!("Skipped (non-finite): {}", summary.skipped_invalid);
    println!("Skipped (late):       {}", summary.skipped_out_of_order);
    println!("Entries into Error:   {}", summary.error_entries);

    println!("\nDwell per state:");
    for (label, ticks) in &summary.dwell {
        println!("  {:<24} {}", label.name(), ticks);
    }

    match summary.agreement.ratio() {
        Some(ratio) => println!(
            "\nAgreement with ground truth: {}/{} ({:.0}%)",
            summary.agreement.matched,
            summary.agreement.labeled,
            ratio * 100.0
        ),
        None => println!("\nTrace carried no ground-truth labels"),
    }

    println!("\nFinal state: {}", machine.state());

    // Checkpoint and resume
    let checkpoint = machine.checkpoint();
    let json = match checkpoint.to_json() {
        Ok(json) => json,
        Err(e) => {
            eprintln!("checkpoint failed: {}", e);
            return;
        }
    };
    println!("\nCheckpoint ({} bytes of JSON) taken at tick {}", json.len(), checkpoint.ticks);

    let resumed = MachineCheckpoint::from_json(&json)
        .and_then(|cp| FiniteAutomationMachine::restore(cp, Arc::new(RuleSet::standard())));
    match resumed {
        Ok(resumed) => println!(
            "Resumed machine {} in state {} with window {:?}",
            resumed.id(),
            resumed.state(),
            resumed.window().to_vec()
        ),
        Err(e) => eprintln!("restore failed: {}", e),
    }
}
