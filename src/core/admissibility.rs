//! Per-state admissibility predicates.
//!
//! Each predicate answers "is this record consistent with currently being in
//! this state?". The same function drives both the per-tick hysteresis check
//! and candidate enumeration during recovery from `Error`.

use crate::core::record::FeatureRecord;
use crate::core::state::{PedestrianState, StateLabel};
use crate::core::thresholds::Thresholds;

/// Dispatch to the predicate for `label`. `Error` is always admissible.
pub fn admissible(label: StateLabel, record: &FeatureRecord, t: &Thresholds) -> bool {
    match label {
        StateLabel::AtStation => at_station(record, t),
        StateLabel::Waiting => waiting(record, t),
        StateLabel::Crossing => crossing(record, t),
        StateLabel::ApproachingSidewalk => approaching_sidewalk(record, t),
        StateLabel::MovingAlongSidewalk => moving_along_sidewalk(record, t),
        StateLabel::ApproachingStation => approaching_station(record, t),
        StateLabel::Error => true,
    }
}

/// Non-error labels whose predicates hold, in cold-start priority order.
pub fn admissible_labels<'a>(
    record: &'a FeatureRecord,
    t: &'a Thresholds,
) -> impl Iterator<Item = StateLabel> + 'a {
    StateLabel::PRIORITY
        .into_iter()
        .filter(move |label| admissible(*label, record, t))
}

impl PedestrianState {
    /// Whether `record` is consistent with this state.
    pub fn check(&self, record: &FeatureRecord, thresholds: &Thresholds) -> bool {
        admissible(self.label(), record, thresholds)
    }
}

/// Slow, close to a station on both axes, and off the road.
pub fn at_station(r: &FeatureRecord, t: &Thresholds) -> bool {
    let stationary = r.user_speed.abs() <= t.walk(2.0);
    let near_station = r.distance_to_closest_station_x < t.distance(2.0 * t.close_to_station_x)
        && r.distance_to_closest_station_y < t.distance(2.0 * t.close_to_station_y);

    stationary && near_station && !r.on_road
}

/// Standing still while an AGV encounter is plausible.
pub fn waiting(r: &FeatureRecord, t: &Thresholds) -> bool {
    let stationary = r.user_speed.abs() <= t.walk(1.0);
    let engaged = r.possible_interaction || r.looking_at_agv || r.on_road;

    stationary && engaged
}

/// Moving across the road while attending to the road or the AGV.
pub fn crossing(r: &FeatureRecord, t: &Thresholds) -> bool {
    let moving = r.user_speed_y.abs() > t.walk(1.0);
    let attentive = r.facing_to_road || r.looking_at_agv;

    moving && r.on_road && attentive
}

/// Leaving the station towards the sidewalk.
pub fn approaching_sidewalk(r: &FeatureRecord, t: &Thresholds) -> bool {
    let near_station =
        r.distance_to_closest_station_y.abs() <= t.distance(2.0 * t.close_to_station_y);
    let moving = r.user_speed_y > t.walk(0.3);

    near_station && moving && !r.on_road
}

/// Walking along X within a sidewalk band of either trip station.
pub fn moving_along_sidewalk(r: &FeatureRecord, t: &Thresholds) -> bool {
    let moving = r.user_speed_x > t.walk(0.8);
    let band = t.distance(t.station_length + t.margin_near_sidewalks);
    let within_sidewalk =
        r.distance_from_start_station_y < band || r.distance_from_end_station_y < band;

    moving && within_sidewalk
}

/// Off the road, near the destination station, and still moving.
pub fn approaching_station(r: &FeatureRecord, t: &Thresholds) -> bool {
    let near_station = r.distance_from_end_station_x < t.distance(2.0 * t.station_length)
        && r.distance_from_end_station_y < t.distance(1.5 * t.close_to_station);

    !r.on_road && near_station && r.user_speed > t.walk(0.2)
}
