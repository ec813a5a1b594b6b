//! Built-in catalog of workout types and example home exercises.
//!
//! The table is fixed at compile time and handed to the store as a
//! read-only value.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Cached built-in catalog - built once and reused across all operations
static BUILTIN_CATALOG: Lazy<Catalog> = Lazy::new(build_builtin_catalog);

/// A workout category with its example exercises
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkoutType {
    pub id: i32,
    pub name: String,
    pub exercises: Vec<String>,
}

/// Read-only lookup table of workout types, ordered by id
#[derive(Clone, Debug)]
pub struct Catalog {
    types: Vec<WorkoutType>,
}

impl Catalog {
    /// Build a catalog from explicit entries (sorted by id)
    pub fn new(mut types: Vec<WorkoutType>) -> Self {
        types.sort_by_key(|t| t.id);
        Self { types }
    }

    /// Get a reference to the cached built-in catalog
    pub fn builtin() -> &'static Catalog {
        &BUILTIN_CATALOG
    }

    /// Look up a workout type by its selector
    pub fn get(&self, type_id: i32) -> Option<&WorkoutType> {
        self.types.iter().find(|t| t.id == type_id)
    }

    /// Iterate workout types in id order
    pub fn iter(&self) -> impl Iterator<Item = &WorkoutType> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Look up an example exercise by 1-based position within a type
    pub fn exercise(&self, type_id: i32, index: i32) -> Option<&str> {
        let workout_type = self.get(type_id)?;
        let pos = usize::try_from(index).ok()?.checked_sub(1)?;
        workout_type.exercises.get(pos).map(String::as_str)
    }

    /// Validate the catalog structure
    ///
    /// Returns a list of validation errors, or empty vec if valid
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for workout_type in &self.types {
            if !seen.insert(workout_type.id) {
                errors.push(format!("Duplicate workout type id {}", workout_type.id));
            }
            if workout_type.name.trim().is_empty() {
                errors.push(format!("Workout type {} has an empty name", workout_type.id));
            }
            if workout_type.exercises.is_empty() {
                errors.push(format!(
                    "Workout type '{}' has no exercises",
                    workout_type.name
                ));
            }
        }

        errors
    }
}

fn entry(id: i32, name: &str, exercises: [&str; 3]) -> WorkoutType {
    WorkoutType {
        id,
        name: name.into(),
        exercises: exercises.iter().map(|e| e.to_string()).collect(),
    }
}

fn build_builtin_catalog() -> Catalog {
    Catalog::new(vec![
        entry(1, "Cardio", ["Jumping Jacks", "High Knees", "Burpees"]),
        entry(
            2,
            "Strength Training",
            ["Push-Ups", "Bodyweight Squats", "Lunges"],
        ),
        entry(
            3,
            "Flexibility",
            ["Forward Bend", "Cat-Cow Stretch", "Seated Hamstring Stretch"],
        ),
        entry(
            4,
            "Balance",
            ["Single-Leg Stand", "Heel-to-Toe Walk", "Tree Pose"],
        ),
        entry(5, "Core", ["Plank", "Russian Twists", "Bicycle Crunches"]),
        entry(
            6,
            "Functional Training",
            [
                "Kettlebell Swings (with a dumbbell)",
                "Bodyweight Deadlifts",
                "Wall Sit",
            ],
        ),
        entry(
            7,
            "Sports-Specific Training",
            [
                "Agility Ladder Drills (using tape)",
                "Shadow Boxing",
                "Dribbling Drills (using a ball)",
            ],
        ),
        entry(
            8,
            "Circuit Training",
            ["Burpees", "Mountain Climbers", "Jump Squats"],
        ),
        entry(
            9,
            "Interval Training",
            [
                "Sprints in place",
                "Tabata Squats",
                "Battle Ropes (using a towel)",
            ],
        ),
        entry(
            10,
            "Mind-Body Workouts",
            ["Yoga Flow", "Meditation", "Tai Chi"],
        ),
    ])
}
