//! The standard pedestrian transition table.
//!
//! Guard order within a state is significant: the first guard that holds
//! decides the successor.

use super::RuleSet;
use crate::builder::RuleBuilder;
use crate::core::{FeatureRecord, Guard, StateLabel, Thresholds};
use tracing::error;

type GuardFn = fn(&FeatureRecord, &Thresholds) -> bool;

const TABLE: [(&str, StateLabel, StateLabel, GuardFn); 16] = [
    // At Station
    (
        "at_station.sets_off",
        StateLabel::AtStation,
        StateLabel::ApproachingSidewalk,
        at_station_sets_off,
    ),
    ("at_station.holds_for_agv", StateLabel::AtStation, StateLabel::Waiting, holds_for_agv),
    // Wait
    ("waiting.steps_onto_road", StateLabel::Waiting, StateLabel::Crossing, waiting_steps_onto_road),
    (
        "waiting.returns_to_sidewalk",
        StateLabel::Waiting,
        StateLabel::ApproachingSidewalk,
        waiting_returns_to_sidewalk,
    ),
    (
        "waiting.walks_along_sidewalk",
        StateLabel::Waiting,
        StateLabel::MovingAlongSidewalk,
        waiting_walks_along_sidewalk,
    ),
    // Cross
    (
        "crossing.reaches_sidewalk",
        StateLabel::Crossing,
        StateLabel::MovingAlongSidewalk,
        crossing_reaches_sidewalk,
    ),
    (
        "crossing.heads_for_gazed_station",
        StateLabel::Crossing,
        StateLabel::ApproachingStation,
        crossing_heads_for_gazed_station,
    ),
    ("crossing.yields_to_agv", StateLabel::Crossing, StateLabel::Waiting, crossing_yields_to_agv),
    (
        "crossing.stops_at_station",
        StateLabel::Crossing,
        StateLabel::AtStation,
        crossing_stops_at_station,
    ),
    // Approach Sidewalk
    (
        "approaching_sidewalk.enters_road",
        StateLabel::ApproachingSidewalk,
        StateLabel::Crossing,
        approaching_sidewalk_enters_road,
    ),
    (
        "approaching_sidewalk.holds_for_agv",
        StateLabel::ApproachingSidewalk,
        StateLabel::Waiting,
        holds_for_agv_while_walking,
    ),
    (
        "approaching_sidewalk.turns_along_sidewalk",
        StateLabel::ApproachingSidewalk,
        StateLabel::MovingAlongSidewalk,
        approaching_sidewalk_turns_along,
    ),
    // Move Along Sidewalk
    (
        "moving_along_sidewalk.turns_to_cross",
        StateLabel::MovingAlongSidewalk,
        StateLabel::Crossing,
        moving_along_turns_to_cross,
    ),
    (
        "moving_along_sidewalk.holds_for_agv",
        StateLabel::MovingAlongSidewalk,
        StateLabel::Waiting,
        holds_for_agv_while_walking,
    ),
    (
        "moving_along_sidewalk.nears_station",
        StateLabel::MovingAlongSidewalk,
        StateLabel::ApproachingStation,
        moving_along_nears_station,
    ),
    // Approach Target Station
    (
        "approaching_station.arrives",
        StateLabel::ApproachingStation,
        StateLabel::AtStation,
        approaching_station_arrives,
    ),
];

pub(super) fn table() -> RuleSet {
    let mut rules = RuleSet::empty();
    for (name, from, to, guard) in TABLE {
        let built = RuleBuilder::new()
            .named(name)
            .from(from)
            .to(to)
            .guard(Guard::new(guard))
            .build();
        match built {
            Ok(rule) => rules.push(rule),
            Err(e) => {
                error!(target: "fam.rules", rule = name, error = %e, "standard rule rejected")
            }
        }
    }
    rules
}

fn speed(r: &FeatureRecord) -> f64 {
    r.user_speed.abs()
}

fn at_station_sets_off(r: &FeatureRecord, t: &Thresholds) -> bool {
    speed(r) > t.walk(1.0) && (r.on_sidewalks || r.facing_along_sidewalk)
}

fn holds_for_agv(r: &FeatureRecord, t: &Thresholds) -> bool {
    speed(r) <= t.walk(1.0) && r.intent_to_cross && r.possible_interaction
}

// Same cue as `holds_for_agv`, but with a strict speed bound.
fn holds_for_agv_while_walking(r: &FeatureRecord, t: &Thresholds) -> bool {
    speed(r) < t.walk(1.0) && r.intent_to_cross && r.possible_interaction
}

fn waiting_steps_onto_road(r: &FeatureRecord, t: &Thresholds) -> bool {
    speed(r) > t.walk(0.8) && r.on_road && r.facing_to_road
}

fn waiting_returns_to_sidewalk(r: &FeatureRecord, t: &Thresholds) -> bool {
    speed(r) > t.walk(1.0) && r.on_sidewalks
}

fn waiting_walks_along_sidewalk(r: &FeatureRecord, t: &Thresholds) -> bool {
    r.user_speed_x.abs() > t.walk(0.8) && (r.on_sidewalks || r.facing_along_sidewalk)
}

fn crossing_reaches_sidewalk(r: &FeatureRecord, t: &Thresholds) -> bool {
    let along = r.user_speed_x.abs() > 1.5 * r.user_speed_y.abs()
        || (r.facing_along_sidewalk && r.user_speed_x.abs() > t.walk(0.5));

    r.on_sidewalks && along
}

fn crossing_heads_for_gazed_station(r: &FeatureRecord, t: &Thresholds) -> bool {
    speed(r) > t.walk(1.0) && r.closest_station == r.gazing_station && !r.on_road
}

fn crossing_yields_to_agv(r: &FeatureRecord, t: &Thresholds) -> bool {
    speed(r) < t.walk(1.0) && r.possible_interaction && r.looking_at_agv && r.on_road
}

fn crossing_stops_at_station(r: &FeatureRecord, t: &Thresholds) -> bool {
    speed(r) < t.walk(1.0)
        && !r.facing_to_road
        && r.distance_to_closest_station <= t.distance(t.close_to_station)
}

fn approaching_sidewalk_enters_road(r: &FeatureRecord, t: &Thresholds) -> bool {
    r.user_speed_y.abs() > t.walk(0.5) && r.facing_to_road && r.on_road
}

fn approaching_sidewalk_turns_along(r: &FeatureRecord, t: &Thresholds) -> bool {
    let near_station = r.distance_to_closest_station_x < t.distance(t.close_to_station_x)
        && r.distance_to_closest_station_y < t.distance(t.close_to_station_y);
    let along = r.user_speed_x.abs() > 1.5 * r.user_speed_y.abs()
        || (r.facing_along_sidewalk && r.user_speed_x.abs() > t.walk(1.0));

    along && (!near_station || r.facing_along_sidewalk)
}

fn moving_along_turns_to_cross(r: &FeatureRecord, t: &Thresholds) -> bool {
    let lateral = r.user_speed_y.abs() > 1.5 * r.user_speed_x.abs()
        || (r.user_speed_y.abs() > t.walk(1.0) && r.facing_to_road);

    lateral && (r.intent_to_cross || r.on_road)
}

fn moving_along_nears_station(r: &FeatureRecord, t: &Thresholds) -> bool {
    (speed(r) < t.walk(1.0) || r.looking_at_closest_station)
        && !r.facing_to_road
        && r.distance_to_closest_station <= t.distance(2.0 * t.close_to_station)
}

fn approaching_station_arrives(r: &FeatureRecord, t: &Thresholds) -> bool {
    speed(r) < t.walk(1.0)
        && !r.facing_to_road
        && r.distance_to_closest_station <= t.distance(3.0 * t.close_to_station)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::TransitionRule;

    fn far() -> FeatureRecord {
        FeatureRecord {
            closest_station: 1,
            gazing_station: 2,
            distance_to_closest_station: 50.0,
            distance_to_closest_station_x: 50.0,
            distance_to_closest_station_y: 50.0,
            ..FeatureRecord::default()
        }
    }

    fn next(from: StateLabel, record: &FeatureRecord) -> StateLabel {
        table().evaluate(from, record, &Thresholds::default()).0
    }

    #[test]
    fn table_has_every_rule_in_order() {
        let rules = table();
        assert_eq!(rules.len(), TABLE.len());
        for (name, from, to, _) in TABLE {
            let built = rules
                .rules_for(from)
                .iter()
                .find(|rule| rule.name() == name)
                .unwrap_or_else(|| panic!("{} missing from the built table", name));
            assert_eq!(built.target(), to);
            assert_eq!(built.confidence(), 1.0);
        }

        let crossing: Vec<_> = rules
            .rules_for(StateLabel::Crossing)
            .iter()
            .map(TransitionRule::target)
            .collect();
        assert_eq!(
            crossing,
            vec![
                StateLabel::MovingAlongSidewalk,
                StateLabel::ApproachingStation,
                StateLabel::Waiting,
                StateLabel::AtStation,
            ]
        );
        assert!(rules
            .rules_for(StateLabel::AtStation)
            .iter()
            .all(|rule| rule.confidence() == 1.0));
    }

    #[test]
    fn at_station_rules() {
        let leaving = FeatureRecord {
            user_speed: 0.5,
            on_sidewalks: true,
            ..far()
        };
        assert_eq!(next(StateLabel::AtStation, &leaving), StateLabel::ApproachingSidewalk);

        let yielding = FeatureRecord {
            user_speed: 0.3,
            intent_to_cross: true,
            possible_interaction: true,
            ..far()
        };
        assert_eq!(next(StateLabel::AtStation, &yielding), StateLabel::Waiting);

        let idle = FeatureRecord {
            user_speed: 0.1,
            ..far()
        };
        assert_eq!(next(StateLabel::AtStation, &idle), StateLabel::AtStation);
    }

    #[test]
    fn waiting_prefers_crossing_over_sidewalk() {
        let record = FeatureRecord {
            user_speed: 0.5,
            user_speed_x: 0.5,
            on_road: true,
            facing_to_road: true,
            on_sidewalks: true,
            ..far()
        };
        assert_eq!(next(StateLabel::Waiting, &record), StateLabel::Crossing);

        let off_road = FeatureRecord {
            on_road: false,
            ..record.clone()
        };
        assert_eq!(next(StateLabel::Waiting, &off_road), StateLabel::ApproachingSidewalk);

        let slow_drift = FeatureRecord {
            user_speed: 0.28,
            user_speed_x: 0.28,
            on_road: false,
            facing_along_sidewalk: true,
            on_sidewalks: false,
            ..far()
        };
        assert_eq!(next(StateLabel::Waiting, &slow_drift), StateLabel::MovingAlongSidewalk);
    }

    #[test]
    fn crossing_rules_in_order() {
        let onto_sidewalk = FeatureRecord {
            on_sidewalks: true,
            user_speed: 1.0,
            user_speed_x: 1.0,
            user_speed_y: 0.2,
            ..far()
        };
        assert_eq!(next(StateLabel::Crossing, &onto_sidewalk), StateLabel::MovingAlongSidewalk);

        let gazing = FeatureRecord {
            user_speed: 1.0,
            gazing_station: 1,
            ..far()
        };
        assert_eq!(next(StateLabel::Crossing, &gazing), StateLabel::ApproachingStation);

        let yielding = FeatureRecord {
            user_speed: 0.1,
            possible_interaction: true,
            looking_at_agv: true,
            on_road: true,
            ..far()
        };
        assert_eq!(next(StateLabel::Crossing, &yielding), StateLabel::Waiting);

        let arrived = FeatureRecord {
            user_speed: 0.1,
            distance_to_closest_station: 2.5,
            ..far()
        };
        assert_eq!(next(StateLabel::Crossing, &arrived), StateLabel::AtStation);

        let mid_road = FeatureRecord {
            user_speed: 1.0,
            user_speed_y: 1.0,
            on_road: true,
            facing_to_road: true,
            ..far()
        };
        assert_eq!(next(StateLabel::Crossing, &mid_road), StateLabel::Crossing);
    }

    #[test]
    fn approaching_sidewalk_turns_only_away_from_station() {
        let near_station = FeatureRecord {
            user_speed_x: 1.0,
            user_speed_y: 0.1,
            distance_to_closest_station_x: 1.0,
            distance_to_closest_station_y: 1.0,
            ..far()
        };
        assert_eq!(
            next(StateLabel::ApproachingSidewalk, &near_station),
            StateLabel::ApproachingSidewalk
        );

        let facing_along = FeatureRecord {
            facing_along_sidewalk: true,
            ..near_station.clone()
        };
        assert_eq!(
            next(StateLabel::ApproachingSidewalk, &facing_along),
            StateLabel::MovingAlongSidewalk
        );

        let away = FeatureRecord {
            distance_to_closest_station_x: 3.0,
            ..near_station
        };
        assert_eq!(next(StateLabel::ApproachingSidewalk, &away), StateLabel::MovingAlongSidewalk);
    }

    #[test]
    fn moving_along_sidewalk_rules() {
        let turning = FeatureRecord {
            user_speed_y: 0.9,
            user_speed_x: 0.1,
            intent_to_cross: true,
            ..far()
        };
        assert_eq!(next(StateLabel::MovingAlongSidewalk, &turning), StateLabel::Crossing);

        let lateral_without_intent = FeatureRecord {
            intent_to_cross: false,
            ..turning
        };
        assert_eq!(
            next(StateLabel::MovingAlongSidewalk, &lateral_without_intent),
            StateLabel::MovingAlongSidewalk
        );

        let looking = FeatureRecord {
            user_speed: 1.2,
            user_speed_x: 1.2,
            looking_at_closest_station: true,
            distance_to_closest_station: 5.9,
            ..far()
        };
        assert_eq!(
            next(StateLabel::MovingAlongSidewalk, &looking),
            StateLabel::ApproachingStation
        );
    }

    #[test]
    fn approaching_station_arrives_within_three_radii() {
        let record = FeatureRecord {
            user_speed: 0.1,
            distance_to_closest_station: 8.9,
            ..far()
        };
        assert_eq!(next(StateLabel::ApproachingStation, &record), StateLabel::AtStation);

        let facing_road = FeatureRecord {
            facing_to_road: true,
            ..record
        };
        assert_eq!(
            next(StateLabel::ApproachingStation, &facing_road),
            StateLabel::ApproachingStation
        );
    }
}
