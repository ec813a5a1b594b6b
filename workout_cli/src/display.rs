//! Boxed terminal rendering for menus and workout listings.

use std::io::{self, Write};
use workout_core::{Catalog, Workout, WorkoutType};

const MENU_WIDTH: usize = 45;

fn boxed_title(out: &mut impl Write, title: &str, width: usize) -> io::Result<()> {
    let rule = format!("+{}+", "-".repeat(width));
    writeln!(out, "{}", rule)?;
    writeln!(out, "|{:^width$}|", title, width = width)?;
    writeln!(out, "{}", rule)
}

pub fn menu(out: &mut impl Write) -> io::Result<()> {
    boxed_title(out, "Home Workout Tracker", MENU_WIDTH)?;
    for item in [
        "1. Add Workout",
        "2. Display All Workouts",
        "3. Search Workout by ID",
        "4. Update a Workout",
        "5. Delete a Workout",
        "6. Exit",
    ] {
        writeln!(out, "| {:<width$}|", item, width = MENU_WIDTH - 1)?;
    }
    writeln!(out, "+{}+", "-".repeat(MENU_WIDTH))
}

pub fn workout_types(out: &mut impl Write, catalog: &Catalog) -> io::Result<()> {
    boxed_title(out, "Workout Options", 27)?;
    for workout_type in catalog.iter() {
        writeln!(out, "{}. {}", workout_type.id, workout_type.name)?;
    }
    writeln!(out, "+{}+", "-".repeat(27))
}

pub fn exercises(out: &mut impl Write, workout_type: &WorkoutType) -> io::Result<()> {
    boxed_title(out, &format!("Exercises for {}", workout_type.name), 40)?;
    for (i, exercise) in workout_type.exercises.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, exercise)?;
    }
    writeln!(out, "+{}+", "-".repeat(40))
}

pub fn all_workouts<'a>(
    out: &mut impl Write,
    workouts: impl IntoIterator<Item = &'a Workout>,
) -> io::Result<()> {
    boxed_title(out, "All Workouts", 30)?;
    let mut any = false;
    for workout in workouts {
        writeln!(out, "{}", workout)?;
        any = true;
    }
    if !any {
        writeln!(out, "No workouts recorded yet.")?;
    }
    writeln!(out, "+{}+", "-".repeat(30))
}

pub fn found(out: &mut impl Write, workout: &Workout) -> io::Result<()> {
    boxed_title(out, "Workout Found", 27)?;
    writeln!(out, "{}", workout)?;
    writeln!(out, "Planned reps: {}", workout.total_reps_planned())?;
    writeln!(out, "+{}+", "-".repeat(27))
}
