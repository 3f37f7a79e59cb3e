//! Re-grounding the machine after it has abandoned a hypothesis.
//!
//! While in `Error` the machine enumerates every admissible state. At cold
//! start (no prior hypothesis) the first admissible state in priority order
//! wins outright. Otherwise candidates are ranked by the likelihood of moving
//! to them from the state that was abandoned, and the winning likelihood is
//! reported as the confidence.

use crate::core::{
    admissible, admissible_labels, FeatureRecord, LikelihoodTable, StateLabel, Thresholds,
};
use tracing::trace;

/// Candidate successor of `Error { previous }` and its confidence.
///
/// Returns `(StateLabel::Error, 1.0)` when no state is admissible. Ties in
/// likelihood go to the candidate earlier in [`StateLabel::COLUMNS`].
pub fn recover(
    previous: StateLabel,
    record: &FeatureRecord,
    thresholds: &Thresholds,
    table: &LikelihoodTable,
) -> (StateLabel, f64) {
    if previous.is_error() {
        let candidate = admissible_labels(record, thresholds)
            .next()
            .unwrap_or(StateLabel::Error);
        trace!(target: "fam.recovery", %candidate, "cold start");
        return (candidate, 1.0);
    }

    let mut best: Option<(StateLabel, f64)> = None;
    for candidate in StateLabel::COLUMNS {
        if !admissible(candidate, record, thresholds) {
            continue;
        }
        let score = table.likelihood(previous, candidate).unwrap_or_default();
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((candidate, score)),
        }
    }

    match best {
        Some((candidate, likelihood)) => {
            trace!(target: "fam.recovery", %previous, %candidate, likelihood, "ranked recovery");
            (candidate, likelihood)
        }
        None => (StateLabel::Error, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn far() -> FeatureRecord {
        FeatureRecord {
            closest_station: 1,
            gazing_station: 2,
            distance_to_closest_station: 50.0,
            distance_to_closest_station_x: 50.0,
            distance_to_closest_station_y: 50.0,
            distance_from_start_station_x: 50.0,
            distance_from_start_station_y: 50.0,
            distance_from_end_station_x: 50.0,
            distance_from_end_station_y: 50.0,
            ..FeatureRecord::default()
        }
    }

    /// Stationary near a station while looking at the AGV: admissible for
    /// both At Station and Wait.
    fn at_station_and_waiting() -> FeatureRecord {
        FeatureRecord {
            user_speed: 0.1,
            looking_at_agv: true,
            distance_to_closest_station_x: 1.0,
            distance_to_closest_station_y: 1.0,
            ..far()
        }
    }

    #[test]
    fn cold_start_takes_first_admissible_in_priority_order() {
        let t = Thresholds::default();
        let table = LikelihoodTable::uniform(0.0);

        let (label, confidence) =
            recover(StateLabel::Error, &at_station_and_waiting(), &t, &table);
        assert_eq!(label, StateLabel::AtStation);
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn nothing_admissible_stays_in_error() {
        let t = Thresholds::default();
        let table = LikelihoodTable::default();
        let moving_far_away = FeatureRecord {
            user_speed: 2.0,
            ..far()
        };

        assert_eq!(
            recover(StateLabel::Error, &moving_far_away, &t, &table),
            (StateLabel::Error, 1.0)
        );
        assert_eq!(
            recover(StateLabel::Crossing, &moving_far_away, &t, &table),
            (StateLabel::Error, 1.0)
        );
    }

    #[test]
    fn ranked_recovery_prefers_higher_likelihood() {
        let t = Thresholds::default();
        let record = at_station_and_waiting();

        let prefers_waiting = LikelihoodTable::default();
        assert_eq!(
            recover(StateLabel::Waiting, &record, &t, &prefers_waiting),
            (StateLabel::Waiting, 0.805907)
        );

        let prefers_station = LikelihoodTable::default().with_entry(
            StateLabel::Waiting,
            StateLabel::AtStation,
            0.9,
        );
        assert_eq!(
            recover(StateLabel::Waiting, &record, &t, &prefers_station),
            (StateLabel::AtStation, 0.9)
        );
    }

    #[test]
    fn ranked_recovery_reads_the_abandoned_state_row() {
        let t = Thresholds::default();
        let table = LikelihoodTable::default();
        let record = at_station_and_waiting();

        assert_eq!(
            recover(StateLabel::ApproachingStation, &record, &t, &table),
            (StateLabel::AtStation, 0.252874)
        );
        assert_eq!(
            recover(StateLabel::AtStation, &record, &t, &table),
            (StateLabel::AtStation, 0.950089)
        );
    }

    #[test]
    fn ties_follow_column_order() {
        let t = Thresholds::default();
        let table = LikelihoodTable::uniform(0.5);
        let record = FeatureRecord {
            user_speed: 1.0,
            user_speed_x: 1.0,
            distance_from_end_station_x: 1.0,
            distance_from_end_station_y: 1.0,
            ..far()
        };

        // Move Along Sidewalk wins at cold start, Approach Target Station on a tie.
        assert_eq!(
            recover(StateLabel::Error, &record, &t, &table),
            (StateLabel::MovingAlongSidewalk, 1.0)
        );
        assert_eq!(
            recover(StateLabel::Crossing, &record, &t, &table),
            (StateLabel::ApproachingStation, 0.5)
        );
    }

    #[test]
    fn zero_likelihood_candidate_still_wins_when_alone() {
        let t = Thresholds::default();
        let table = LikelihoodTable::uniform(0.0);
        let record = FeatureRecord {
            distance_to_closest_station_x: 1.0,
            distance_to_closest_station_y: 1.0,
            user_speed: 0.5,
            ..far()
        };

        assert_eq!(
            recover(StateLabel::Crossing, &record, &t, &table),
            (StateLabel::AtStation, 0.0)
        );
    }
}
