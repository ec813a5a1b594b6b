//! Interactive menu session.
//!
//! Reads choices until the user exits or input ends. Store errors are
//! printed and the session carries on.

use crate::display;
use crate::prompt::{is_end_of_input, Prompter};
use std::io::{BufRead, Write};
use workout_core::{
    Catalog, Error, NewWorkout, Result, WorkoutId, WorkoutStore, WorkoutUpdate,
};

enum MenuChoice {
    Add,
    DisplayAll,
    Search,
    Update,
    Delete,
    Exit,
}

impl MenuChoice {
    fn from_number(n: i32) -> Option<Self> {
        match n {
            1 => Some(MenuChoice::Add),
            2 => Some(MenuChoice::DisplayAll),
            3 => Some(MenuChoice::Search),
            4 => Some(MenuChoice::Update),
            5 => Some(MenuChoice::Delete),
            6 => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

pub fn run<R: BufRead, W: Write>(
    store: &mut WorkoutStore,
    catalog: &Catalog,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    match session(store, catalog, prompter) {
        Err(e) if is_end_of_input(&e) => {
            tracing::debug!("Input closed, leaving menu");
            writeln!(prompter.out())?;
            Ok(())
        }
        other => other,
    }
}

fn session<R: BufRead, W: Write>(
    store: &mut WorkoutStore,
    catalog: &Catalog,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    loop {
        display::menu(prompter.out())?;
        let choice = prompter.int("\n>> ")?;

        let outcome = match MenuChoice::from_number(choice) {
            Some(MenuChoice::Add) => add(store, catalog, prompter),
            Some(MenuChoice::DisplayAll) => {
                display::all_workouts(prompter.out(), store.list()).map_err(Error::from)
            }
            Some(MenuChoice::Search) => search(store, prompter),
            Some(MenuChoice::Update) => update(store, prompter),
            Some(MenuChoice::Delete) => delete(store, prompter),
            Some(MenuChoice::Exit) => {
                writeln!(prompter.out(), "Exiting the program. Have a great day!")?;
                return Ok(());
            }
            None => {
                writeln!(prompter.out(), "Invalid input. Please try again.")?;
                Ok(())
            }
        };

        match outcome {
            Err(e) if is_end_of_input(&e) => return Err(e),
            Err(e) => report(prompter.out(), &e)?,
            Ok(()) => {}
        }
        writeln!(prompter.out())?;
    }
}

/// Print a failed operation without ending the session
fn report(out: &mut impl Write, err: &Error) -> Result<()> {
    match err {
        Error::NotFound(_) | Error::InvalidWorkoutType(_) | Error::InvalidField { .. } => {
            writeln!(out, "{}", err)?
        }
        _ => writeln!(out, "Error: {}", err)?,
    }
    Ok(())
}

fn add<R: BufRead, W: Write>(
    store: &mut WorkoutStore,
    catalog: &Catalog,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    let mut date = prompter.text("Enter workout date (YYYY-MM-DD, enter for today): ")?;
    if date.is_empty() {
        date = crate::today();
    }

    display::workout_types(prompter.out(), catalog)?;
    let type_id = prompter.int(&format!("Choose workout type (1-{}): ", catalog.len()))?;
    let Some(workout_type) = catalog.get(type_id) else {
        writeln!(prompter.out(), "Invalid workout type chosen. Please try again.")?;
        return Ok(());
    };

    display::exercises(prompter.out(), workout_type)?;
    let exercise = prompter.int(&format!(
        "Choose an exercise (1-{}): ",
        workout_type.exercises.len()
    ))?;
    if let Some(name) = catalog.exercise(type_id, exercise) {
        writeln!(prompter.out(), "You chose: {}", name)?;
    }

    let sets = prompter.int("Enter number of sets: ")?;
    let reps_per_set = prompter.int("Enter number of reps per set: ")?;
    let duration = prompter.int("Enter workout duration (in minutes): ")?;

    let created = store.create(
        catalog,
        NewWorkout {
            date,
            type_id,
            sets,
            reps_per_set,
            duration,
        },
    )?;
    writeln!(prompter.out(), "Workout added with ID: {}", created.id)?;
    Ok(())
}

fn search<R: BufRead, W: Write>(store: &WorkoutStore, prompter: &mut Prompter<R, W>) -> Result<()> {
    let Some(id) = read_id(prompter, "Enter workout ID to search: ")? else {
        return Ok(());
    };
    let workout = store.search(id)?;
    display::found(prompter.out(), workout)?;
    Ok(())
}

fn update<R: BufRead, W: Write>(
    store: &mut WorkoutStore,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    let Some(id) = read_id(prompter, "Enter the ID of the workout to update: ")? else {
        return Ok(());
    };
    let current = store.search(id)?;
    writeln!(prompter.out(), "Updating workout: {}", current)?;

    let date = prompter.text("Enter new date (YYYY-MM-DD) or press enter to keep the same: ")?;
    let duration =
        prompter.int("Enter new duration (in minutes) or enter -1 to keep the same: ")?;
    let successful_reps =
        prompter.int("Enter new successful reps or enter -1 to keep the same: ")?;
    let sets = prompter.int("Enter new number of sets or enter -1 to keep the same: ")?;
    let reps_per_set =
        prompter.int("Enter new number of reps per set or enter -1 to keep the same: ")?;

    let updated = store.update(
        id,
        WorkoutUpdate::from_sentinels(&date, duration, successful_reps, sets, reps_per_set),
    )?;
    writeln!(prompter.out(), "Updated: {}", updated)?;
    Ok(())
}

fn delete<R: BufRead, W: Write>(
    store: &mut WorkoutStore,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    let Some(id) = read_id(prompter, "Enter the ID of the workout to delete: ")? else {
        return Ok(());
    };
    store.delete(id)?;
    writeln!(prompter.out(), "Workout with ID {} has been deleted.", id)?;
    Ok(())
}

/// Integer prompt for an id
///
/// A negative answer can never match a workout; it gets the same not-found
/// message as an unknown id and yields `None`.
fn read_id<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    prompt: &str,
) -> Result<Option<WorkoutId>> {
    let raw = prompter.int(prompt)?;
    match WorkoutId::try_from(raw) {
        Ok(id) => Ok(Some(id)),
        Err(_) => {
            writeln!(prompter.out(), "No workout found with ID: {}", raw)?;
            Ok(None)
        }
    }
}
