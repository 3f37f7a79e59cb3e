//! Errors raised while snapshotting or resuming a classifier.

use crate::config::ConfigError;
use thiserror::Error;

/// Failure to save or resume a [`MachineCheckpoint`](super::MachineCheckpoint).
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("could not encode classifier snapshot as {format}: {message}")]
    Encode {
        format: &'static str,
        message: String,
    },

    /// Input that does not describe a classifier snapshot.
    #[error("could not decode classifier snapshot from {format}: {message}")]
    Decode {
        format: &'static str,
        message: String,
    },

    /// Snapshot written in a format this release cannot read.
    #[error("snapshot format version {found} is not supported (expected {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Hysteresis slots disagree with the configured window capacity.
    #[error("snapshot window holds {found} slots but capacity is {capacity}")]
    WindowMismatch { found: usize, capacity: usize },

    #[error("snapshot confidence {0} lies outside [0, 1]")]
    ConfidenceOutOfRange(f64),

    /// Thresholds or likelihoods carried by the snapshot are unusable.
    #[error("snapshot carries an invalid configuration")]
    InvalidConfig(#[source] ConfigError),
}
