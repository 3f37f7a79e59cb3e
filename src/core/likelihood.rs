//! Previous-state-conditioned likelihood table used during recovery.

use crate::core::state::StateLabel;
use serde::{Deserialize, Serialize};

/// Fixed 6×6 table of transition likelihoods.
///
/// Rows and columns are both indexed by [`StateLabel::column`]: the row is the
/// state abandoned on the way into `Error`, the column the candidate being
/// scored. Rows are relative scores, not distributions, and need not sum to 1.
/// `Error` has neither a row nor a column.
///
/// # Example
///
/// ```rust
/// use pedestrian_fam::core::{LikelihoodTable, StateLabel};
///
/// let table = LikelihoodTable::default();
/// let stay = table.likelihood(StateLabel::Crossing, StateLabel::Crossing).unwrap();
/// assert!(stay > 0.8);
/// assert_eq!(table.likelihood(StateLabel::Error, StateLabel::Crossing), None);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LikelihoodTable {
    rows: [[f64; 6]; 6],
}

impl Default for LikelihoodTable {
    /// Likelihoods estimated offline from annotated pedestrian traces.
    fn default() -> Self {
        Self {
            rows: [
                // At Station
                [0.950089, 0.022282, 0.023619, 0.000000, 0.003565, 0.000446],
                // Wait
                [0.018987, 0.805907, 0.126582, 0.040084, 0.000000, 0.008439],
                // Approach Sidewalk
                [0.000000, 0.087452, 0.562738, 0.262357, 0.000000, 0.087452],
                // Cross
                [0.000000, 0.015152, 0.000000, 0.850168, 0.131313, 0.003367],
                // Approach Target Station
                [0.252874, 0.000000, 0.000000, 0.000000, 0.000000, 0.004598],
                // Move Along Sidewalk
                [0.0000, 0.0075, 0.0050, 0.0025, 0.0650, 0.9200],
            ],
        }
    }
}

impl LikelihoodTable {
    /// Build a table from rows in [`StateLabel::COLUMNS`] order.
    pub fn new(rows: [[f64; 6]; 6]) -> Self {
        Self { rows }
    }

    /// Table with every entry set to `value`.
    pub fn uniform(value: f64) -> Self {
        Self {
            rows: [[value; 6]; 6],
        }
    }

    /// Likelihood of `candidate` given the abandoned state `previous`.
    pub fn likelihood(&self, previous: StateLabel, candidate: StateLabel) -> Option<f64> {
        let row = previous.column()?;
        let column = candidate.column()?;
        Some(self.rows[row][column])
    }

    /// Row for `previous`, in column order.
    pub fn row(&self, previous: StateLabel) -> Option<&[f64; 6]> {
        previous.column().map(|row| &self.rows[row])
    }

    pub fn rows(&self) -> &[[f64; 6]; 6] {
        &self.rows
    }

    /// Replace a single entry. Entries involving `Error` are ignored.
    pub fn with_entry(mut self, previous: StateLabel, candidate: StateLabel, value: f64) -> Self {
        if let (Some(row), Some(column)) = (previous.column(), candidate.column()) {
            self.rows[row][column] = value;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_row_previous_column_candidate() {
        let table = LikelihoodTable::default();
        assert_eq!(
            table.likelihood(StateLabel::Waiting, StateLabel::AtStation),
            Some(0.018987)
        );
        assert_eq!(
            table.likelihood(StateLabel::AtStation, StateLabel::Waiting),
            Some(0.022282)
        );
        assert_eq!(
            table.likelihood(StateLabel::ApproachingStation, StateLabel::AtStation),
            Some(0.252874)
        );
        assert_eq!(
            table.likelihood(StateLabel::AtStation, StateLabel::ApproachingStation),
            Some(0.003565)
        );
        assert_eq!(
            table.likelihood(StateLabel::Crossing, StateLabel::ApproachingStation),
            Some(0.131313)
        );
        assert_eq!(
            table.likelihood(StateLabel::MovingAlongSidewalk, StateLabel::MovingAlongSidewalk),
            Some(0.92)
        );
    }

    #[test]
    fn diagonal_dominates_every_row_except_approach_target_station() {
        let table = LikelihoodTable::default();
        for previous in StateLabel::COLUMNS {
            let Some(row) = table.row(previous) else {
                panic!("missing row for {}", previous);
            };
            let stay = table.likelihood(previous, previous).unwrap();
            let best = row.iter().cloned().fold(f64::MIN, f64::max);
            if previous == StateLabel::ApproachingStation {
                assert_eq!(best, 0.252874);
            } else {
                assert_eq!(best, stay);
            }
        }
    }

    #[test]
    fn error_has_no_row_or_column() {
        let table = LikelihoodTable::default();
        assert!(table.row(StateLabel::Error).is_none());
        assert!(table
            .likelihood(StateLabel::AtStation, StateLabel::Error)
            .is_none());
    }

    #[test]
    fn with_entry_overrides_one_cell() {
        let table = LikelihoodTable::uniform(0.1).with_entry(
            StateLabel::Crossing,
            StateLabel::Waiting,
            0.9,
        );
        assert_eq!(table.likelihood(StateLabel::Crossing, StateLabel::Waiting), Some(0.9));
        assert_eq!(table.likelihood(StateLabel::Waiting, StateLabel::Crossing), Some(0.1));

        let unchanged = table.clone().with_entry(StateLabel::Error, StateLabel::Waiting, 0.5);
        assert_eq!(unchanged, table);
    }

    #[test]
    fn rows_need_not_sum_to_one() {
        let table = LikelihoodTable::default();
        let sum: f64 = table.row(StateLabel::ApproachingStation).unwrap().iter().sum();
        assert!(sum < 0.5);
    }
}
