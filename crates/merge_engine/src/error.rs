//! Merge engine error types

use thiserror::Error;

use crate::precision::MAX_SENSITIVITY;

/// Merge engine errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    /// Sensitivity outside `[0, MAX_SENSITIVITY]`; aborts the run
    #[error("invalid merge sensitivity {value}: must be between 0 and {max}", max = MAX_SENSITIVITY)]
    InvalidSensitivity { value: i64 },
}
