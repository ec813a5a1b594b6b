//! Identifier generation for new workouts.

use crate::{Error, Result, Workout, WorkoutId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// Smallest id handed out by the built-in generators
pub const MIN_ID: WorkoutId = 1000;

/// Largest id the random generator draws
pub const MAX_RANDOM_ID: WorkoutId = 9999;

/// Produces ids that are unused in the given index
pub trait IdGenerator {
    fn next_id(&mut self, existing: &HashMap<WorkoutId, Workout>) -> Result<WorkoutId>;
}

/// Draws 4-digit ids at random, retrying on collision
pub struct RandomIdGenerator {
    rng: StdRng,
}

impl RandomIdGenerator {
    /// Generator seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for tests
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for RandomIdGenerator {
    fn next_id(&mut self, existing: &HashMap<WorkoutId, Workout>) -> Result<WorkoutId> {
        let capacity = (MAX_RANDOM_ID - MIN_ID + 1) as usize;
        let taken = existing
            .keys()
            .filter(|id| (MIN_ID..=MAX_RANDOM_ID).contains(*id))
            .count();
        if taken >= capacity {
            return Err(Error::IdSpaceExhausted);
        }

        loop {
            let candidate = self.rng.gen_range(MIN_ID..=MAX_RANDOM_ID);
            if !existing.contains_key(&candidate) {
                tracing::debug!("Generated workout id {}", candidate);
                return Ok(candidate);
            }
        }
    }
}

/// Hands out one past the highest id in use
#[derive(Default)]
pub struct SequentialIdGenerator;

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self, existing: &HashMap<WorkoutId, Workout>) -> Result<WorkoutId> {
        let highest = existing.keys().copied().max().unwrap_or(0);
        highest
            .max(MIN_ID - 1)
            .checked_add(1)
            .ok_or(Error::IdSpaceExhausted)
    }
}
