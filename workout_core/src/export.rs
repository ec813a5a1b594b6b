//! CSV export of the workout list.

use crate::{Result, Workout, WorkoutId};
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    id: WorkoutId,
    date: &'a str,
    #[serde(rename = "type")]
    workout_type: &'a str,
    duration: i32,
    successful_reps: i32,
    sets: i32,
    reps_per_set: i32,
}

impl<'a> From<&'a Workout> for CsvRow<'a> {
    fn from(w: &'a Workout) -> Self {
        CsvRow {
            id: w.id,
            date: &w.date,
            workout_type: &w.workout_type,
            duration: w.duration,
            successful_reps: w.successful_reps,
            sets: w.sets,
            reps_per_set: w.reps_per_set,
        }
    }
}

/// Write `workouts` to a CSV file with a header row, replacing any existing file
///
/// Returns the number of rows written.
pub fn export_csv<'a>(
    workouts: impl IntoIterator<Item = &'a Workout>,
    path: &Path,
) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(path)?;

    let mut count = 0;
    for workout in workouts {
        writer.serialize(CsvRow::from(workout))?;
        count += 1;
    }

    // Headers are only emitted alongside the first row
    if count == 0 {
        writer.write_record([
            "id",
            "date",
            "type",
            "duration",
            "successful_reps",
            "sets",
            "reps_per_set",
        ])?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} workouts to {:?}", count, path);
    Ok(count)
}
