//! Running a machine over a recorded trace.
//!
//! Replay is the ingestion boundary for offline traces: records with
//! non-finite fields or regressing timestamps are skipped before they reach
//! the machine. When records carry ground-truth labels, the emitted labels
//! are scored against them.

use crate::core::{FeatureRecord, RecordError, StateLabel};
use crate::machine::FiniteAutomationMachine;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Agreement between emitted labels and ground truth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Agreement {
    /// Ticks whose emitted label equals the ground-truth label.
    pub matched: usize,
    /// Ticks that carried a ground-truth label.
    pub labeled: usize,
}

impl Agreement {
    /// Fraction of labeled ticks that matched, or `None` without labels.
    pub fn ratio(&self) -> Option<f64> {
        (self.labeled > 0).then(|| self.matched as f64 / self.labeled as f64)
    }
}

/// Outcome of replaying a trace.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReplaySummary {
    /// Label emitted for every accepted record, in order.
    pub labels: Vec<StateLabel>,
    /// Records accepted and fed to the machine.
    pub ticks: usize,
    pub skipped_invalid: usize,
    pub skipped_out_of_order: usize,
    /// Number of demotions into `Error`.
    pub error_entries: usize,
    /// Ticks spent in each state.
    pub dwell: BTreeMap<StateLabel, usize>,
    pub agreement: Agreement,
}

/// Feed `records` to `machine` in order.
pub fn replay<'a, I>(machine: &mut FiniteAutomationMachine, records: I) -> ReplaySummary
where
    I: IntoIterator<Item = &'a FeatureRecord>,
{
    let mut summary = ReplaySummary::default();
    let mut last_timestamp: Option<i64> = None;

    for record in records {
        if let Err(errors) = record.check_finite() {
            warn!(
                target: "fam.replay",
                timestamp = record.timestamp_id,
                violations = errors.len(),
                first = ?errors.first(),
                "skipping record with non-finite fields"
            );
            summary.skipped_invalid += 1;
            continue;
        }

        if let Some(previous) = last_timestamp {
            if record.timestamp_id < previous {
                let err = RecordError::TimestampRegressed {
                    previous,
                    current: record.timestamp_id,
                };
                warn!(target: "fam.replay", error = %err, "skipping out-of-order record");
                summary.skipped_out_of_order += 1;
                continue;
            }
        }
        last_timestamp = Some(record.timestamp_id);

        let tick = machine.step(record);
        let label = tick.state.label();

        summary.ticks += 1;
        summary.labels.push(label);
        *summary.dwell.entry(label).or_default() += 1;
        if tick.demoted {
            summary.error_entries += 1;
        }
        if let Some(truth) = record.state {
            summary.agreement.labeled += 1;
            if truth == label {
                summary.agreement.matched += 1;
            }
        }
    }

    debug!(
        target: "fam.replay",
        ticks = summary.ticks,
        skipped_invalid = summary.skipped_invalid,
        skipped_out_of_order = summary.skipped_out_of_order,
        error_entries = summary.error_entries,
        "replay finished"
    );
    summary
}
