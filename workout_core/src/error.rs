//! Error types for the workout_core library.

use crate::WorkoutId;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for workout_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// No workout with this id is loaded
    #[error("No workout found with ID: {0}")]
    NotFound(WorkoutId),

    /// Workout type selector is not in the catalog
    #[error("Invalid workout type: {0}")]
    InvalidWorkoutType(i32),

    /// A field value cannot be stored
    #[error("Invalid {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    /// Every identifier the generator can produce is taken
    #[error("No unused workout IDs remain")]
    IdSpaceExhausted,

    /// A stored record could not be parsed
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
