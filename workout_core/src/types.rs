//! Core domain types for the workout log.
//!
//! This module defines:
//! - The persisted `Workout` record
//! - `NewWorkout`, the input to create
//! - `WorkoutUpdate`, the partial input to update

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Identifier of a stored workout
pub type WorkoutId = u32;

/// Integer sentinel meaning "keep the current value" in update prompts
pub const KEEP_INT: i32 = -1;

// ============================================================================
// Workout Record
// ============================================================================

/// One recorded exercise session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workout {
    pub id: WorkoutId,
    /// Free-form, expected `YYYY-MM-DD`
    pub date: String,
    /// Catalog type name copied at creation time
    #[serde(rename = "type")]
    pub workout_type: String,
    /// Minutes
    pub duration: i32,
    pub successful_reps: i32,
    pub sets: i32,
    pub reps_per_set: i32,
}

impl Workout {
    /// Reps implied by the planned sets, independent of `successful_reps`
    pub fn total_reps_planned(&self) -> i32 {
        self.sets.saturating_mul(self.reps_per_set)
    }
}

impl std::fmt::Display for Workout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ID: {}, Date: {}, Type: {}, Duration: {} mins, Successful Reps: {}, Sets: {}, Reps per Set: {}",
            self.id,
            self.date,
            self.workout_type,
            self.duration,
            self.successful_reps,
            self.sets,
            self.reps_per_set
        )
    }
}

/// Reject text that would break the one-field-per-line file layout
pub fn check_single_line(field: &'static str, value: &str) -> Result<()> {
    if value.contains(['\n', '\r']) {
        return Err(Error::InvalidField {
            field,
            reason: format!("{:?} contains a line break", value),
        });
    }
    Ok(())
}

// ============================================================================
// Store Inputs
// ============================================================================

/// Caller-provided fields for a new workout
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewWorkout {
    pub date: String,
    /// Catalog selector (1-10 for the built-in catalog)
    pub type_id: i32,
    pub sets: i32,
    pub reps_per_set: i32,
    pub duration: i32,
}

/// Field replacements for an existing workout; `None` keeps the current value
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkoutUpdate {
    pub date: Option<String>,
    pub duration: Option<i32>,
    pub successful_reps: Option<i32>,
    pub sets: Option<i32>,
    pub reps_per_set: Option<i32>,
}

impl WorkoutUpdate {
    /// Build an update from terminal-style inputs where an empty date or
    /// `-1` for an integer means "keep"
    pub fn from_sentinels(
        date: &str,
        duration: i32,
        successful_reps: i32,
        sets: i32,
        reps_per_set: i32,
    ) -> Self {
        let keep_int = |v: i32| if v == KEEP_INT { None } else { Some(v) };
        Self {
            date: if date.is_empty() {
                None
            } else {
                Some(date.to_string())
            },
            duration: keep_int(duration),
            successful_reps: keep_int(successful_reps),
            sets: keep_int(sets),
            reps_per_set: keep_int(reps_per_set),
        }
    }

    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply every requested replacement to `workout`
    pub fn apply_to(&self, workout: &mut Workout) {
        if let Some(ref date) = self.date {
            workout.date = date.clone();
        }
        if let Some(duration) = self.duration {
            workout.duration = duration;
        }
        if let Some(reps) = self.successful_reps {
            workout.successful_reps = reps;
        }
        if let Some(sets) = self.sets {
            workout.sets = sets;
        }
        if let Some(reps_per_set) = self.reps_per_set {
            workout.reps_per_set = reps_per_set;
        }
    }
}
