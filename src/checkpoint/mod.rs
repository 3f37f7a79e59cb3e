//! Checkpoint and resume functionality for classifier machines.
//!
//! A checkpoint captures only what a machine needs to continue a stream: the
//! live state (including the abandoned label while in `Error`), the hysteresis
//! window, and the configuration in force. Rule sets hold closures and are not
//! serialized; they are re-supplied on restore.

use crate::config::FamConfig;
use crate::core::{HysteresisWindow, PedestrianState};
use crate::machine::FiniteAutomationMachine;
use crate::rules::RuleSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::Arc;
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Snapshot format written by this release.
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of one machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineCheckpoint {
    pub version: u32,

    /// Identifier of this snapshot, distinct from the machine's.
    pub id: String,

    /// Wall-clock time the snapshot was taken.
    pub timestamp: DateTime<Utc>,

    pub machine_id: Uuid,

    pub state: PedestrianState,

    /// Hysteresis window, newest slot first
    pub window: Vec<bool>,

    pub last_confidence: f64,

    pub ticks: u64,

    pub config: FamConfig,
}

impl MachineCheckpoint {
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self).map_err(|e| CheckpointError::Encode {
            format: "json",
            message: e.to_string(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json).map_err(|e| CheckpointError::Decode {
            format: "json",
            message: e.to_string(),
        })?;
        checkpoint.validate()?;
        Ok(checkpoint)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::Encode {
            format: "bincode",
            message: e.to_string(),
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes).map_err(|e| CheckpointError::Decode {
            format: "bincode",
            message: e.to_string(),
        })?;
        checkpoint.validate()?;
        Ok(checkpoint)
    }

    /// Check version, window shape and configuration.
    pub fn validate(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        if self.window.len() != self.config.window_capacity {
            return Err(CheckpointError::WindowMismatch {
                found: self.window.len(),
                capacity: self.config.window_capacity,
            });
        }
        if !(0.0..=1.0).contains(&self.last_confidence) {
            return Err(CheckpointError::ConfidenceOutOfRange(self.last_confidence));
        }
        self.config.check().map_err(CheckpointError::InvalidConfig)
    }
}

impl FiniteAutomationMachine {
    /// Snapshot the live state and window.
    pub fn checkpoint(&self) -> MachineCheckpoint {
        MachineCheckpoint {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            machine_id: self.id(),
            state: self.state(),
            window: self.window().to_vec(),
            last_confidence: self.last_confidence(),
            ticks: self.ticks(),
            config: self.config().clone(),
        }
    }

    /// Rebuild a machine from `checkpoint`, evaluating `rules`.
    pub fn restore(
        checkpoint: MachineCheckpoint,
        rules: Arc<RuleSet>,
    ) -> Result<Self, CheckpointError> {
        checkpoint.validate()?;

        let capacity = NonZeroUsize::new(checkpoint.config.window_capacity).ok_or(
            CheckpointError::WindowMismatch {
                found: checkpoint.window.len(),
                capacity: 0,
            },
        )?;
        let window = HysteresisWindow::from_slots(capacity, &checkpoint.window).ok_or(
            CheckpointError::WindowMismatch {
                found: checkpoint.window.len(),
                capacity: capacity.get(),
            },
        )?;

        Ok(Self::from_parts(
            checkpoint.machine_id,
            checkpoint.state,
            window,
            Arc::new(checkpoint.config),
            rules,
            checkpoint.last_confidence,
            checkpoint.ticks,
        ))
    }
}
