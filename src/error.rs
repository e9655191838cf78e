//! Error types shared across the crate.
//!
//! Simulation code itself is infallible; errors only arise when building a
//! session from bad tuning data or when talking to storage/remote services.

use std::io;

/// Rejected tuning parameters.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TuningError {
    #[error("Gap of {gap} with margin {margin} does not fit a field of height {height}")]
    GapDoesNotFit { gap: f32, margin: f32, height: f32 },

    #[error("Player box does not fit inside the gap ({player} >= {gap})")]
    PlayerLargerThanGap { player: f32, gap: f32 },

    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("{name} must be a finite number, got {value}")]
    NotFinite { name: &'static str, value: f32 },

    #[error("{name} must be a probability in [0, 1], got {value}")]
    NotProbability { name: &'static str, value: f32 },

    #[error("Invalid tuning JSON: {0}")]
    Parse(String),
}

/// Failures from local storage or the remote score service.
///
/// None of these ever affect simulation state; callers log and drop them.
#[derive(thiserror::Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Request rejected: {0}")]
    Rejected(String),
}
