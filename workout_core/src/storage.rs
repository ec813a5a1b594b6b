//! Workout file persistence.
//!
//! The whole record list is rewritten on every save: serialized into a temp
//! file next to the destination, fsynced, then renamed over it. Loading
//! skips malformed records and reports them instead of failing.

use crate::types::check_single_line;
use crate::{Error, Result, StorageFormat, Workout};
use fs2::FileExt;
use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Keys of the text format, in write order
const TEXT_KEYS: [&str; 7] = [
    "id",
    "date",
    "type",
    "duration",
    "successful_reps",
    "sets",
    "reps_per_set",
];

/// Result of decoding a workout file
#[derive(Debug, Default)]
pub struct Decoded {
    pub workouts: Vec<Workout>,
    /// One `Error::Parse` per skipped record
    pub problems: Vec<Error>,
}

/// Converts between a record list and file contents
pub trait WorkoutCodec {
    fn encode(&self, workouts: &[Workout]) -> Result<String>;
    fn decode(&self, contents: &str) -> Decoded;
}

impl StorageFormat {
    pub fn codec(self) -> Box<dyn WorkoutCodec> {
        match self {
            StorageFormat::Text => Box::new(TextFormat),
            StorageFormat::Jsonl => Box::new(JsonlFormat),
        }
    }
}

// ============================================================================
// Text Format
// ============================================================================

/// Seven `key: value` lines per record followed by a blank line
pub struct TextFormat;

type TextFields<'a> = [Option<&'a str>; 7];

impl TextFormat {
    fn parse_block(lines: &[(usize, &str)]) -> Result<Workout> {
        let first_line = lines.first().map(|(n, _)| *n).unwrap_or(0);
        let mut fields: TextFields = [None; 7];

        for &(line_num, line) in lines {
            let (key, rest) = line.split_once(':').ok_or_else(|| Error::Parse {
                line: line_num,
                message: format!("expected `key: value`, got {:?}", line),
            })?;
            let slot = TEXT_KEYS
                .iter()
                .position(|k| *k == key.trim())
                .ok_or_else(|| Error::Parse {
                    line: line_num,
                    message: format!("unknown field {:?}", key.trim()),
                })?;
            if fields[slot].is_some() {
                return Err(Error::Parse {
                    line: line_num,
                    message: format!("duplicate field {:?}", TEXT_KEYS[slot]),
                });
            }
            fields[slot] = Some(rest.strip_prefix(' ').unwrap_or(rest));
        }

        Ok(Workout {
            id: parse_field(&fields, 0, first_line)?,
            date: text_field(&fields, 1, first_line)?.to_string(),
            workout_type: text_field(&fields, 2, first_line)?.to_string(),
            duration: parse_field(&fields, 3, first_line)?,
            successful_reps: parse_field(&fields, 4, first_line)?,
            sets: parse_field(&fields, 5, first_line)?,
            reps_per_set: parse_field(&fields, 6, first_line)?,
        })
    }
}

fn text_field<'a>(fields: &TextFields<'a>, slot: usize, line: usize) -> Result<&'a str> {
    fields[slot].ok_or_else(|| Error::Parse {
        line,
        message: format!("record is missing field {:?}", TEXT_KEYS[slot]),
    })
}

fn parse_field<T>(fields: &TextFields<'_>, slot: usize, line: usize) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = text_field(fields, slot, line)?;
    raw.trim().parse().map_err(|e: T::Err| Error::Parse {
        line,
        message: format!("field {:?} = {:?}: {}", TEXT_KEYS[slot], raw, e),
    })
}

fn flush_block(block: &mut Vec<(usize, &str)>, decoded: &mut Decoded) {
    if block.is_empty() {
        return;
    }
    match TextFormat::parse_block(block) {
        Ok(workout) => decoded.workouts.push(workout),
        Err(e) => decoded.problems.push(e),
    }
    block.clear();
}

impl WorkoutCodec for TextFormat {
    fn encode(&self, workouts: &[Workout]) -> Result<String> {
        let mut out = String::new();
        for w in workouts {
            check_single_line("date", &w.date)?;
            check_single_line("type", &w.workout_type)?;
            out.push_str(&format!(
                "id: {}\ndate: {}\ntype: {}\nduration: {}\nsuccessful_reps: {}\nsets: {}\nreps_per_set: {}\n\n",
                w.id, w.date, w.workout_type, w.duration, w.successful_reps, w.sets, w.reps_per_set
            ));
        }
        Ok(out)
    }

    fn decode(&self, contents: &str) -> Decoded {
        let mut decoded = Decoded::default();
        let mut block: Vec<(usize, &str)> = Vec::new();

        for (idx, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                flush_block(&mut block, &mut decoded);
            } else {
                block.push((idx + 1, line));
            }
        }
        flush_block(&mut block, &mut decoded);

        decoded
    }
}

// ============================================================================
// JSONL Format
// ============================================================================

/// One JSON object per line
pub struct JsonlFormat;

impl WorkoutCodec for JsonlFormat {
    fn encode(&self, workouts: &[Workout]) -> Result<String> {
        let mut out = String::new();
        for workout in workouts {
            out.push_str(&serde_json::to_string(workout)?);
            out.push('\n');
        }
        Ok(out)
    }

    fn decode(&self, contents: &str) -> Decoded {
        let mut decoded = Decoded::default();
        for (idx, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Workout>(line) {
                Ok(workout) => decoded.workouts.push(workout),
                Err(e) => decoded.problems.push(Error::Parse {
                    line: idx + 1,
                    message: e.to_string(),
                }),
            }
        }
        decoded
    }
}

// ============================================================================
// Workout File
// ============================================================================

/// The durable workout file
#[derive(Clone, Debug)]
pub struct WorkoutFile {
    path: PathBuf,
    format: StorageFormat,
}

impl WorkoutFile {
    pub fn new(path: impl Into<PathBuf>, format: StorageFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the copy written by `backup`
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".bak");
        self.path.with_file_name(name)
    }

    /// Copy the current file to `backup_path`, replacing an older backup
    pub fn backup(&self) -> Result<PathBuf> {
        let backup = self.backup_path();
        std::fs::copy(&self.path, &backup)?;
        tracing::info!("Backed up {:?} to {:?}", self.path, backup);
        Ok(backup)
    }

    /// Load all readable workouts; returns an empty list if the file is absent
    pub fn load(&self) -> Result<Vec<Workout>> {
        Ok(self.load_with_problems()?.workouts)
    }

    /// Load workouts and keep the list of records that were skipped
    pub fn load_with_problems(&self) -> Result<Decoded> {
        if !self.path.exists() {
            tracing::info!("No workout file at {:?}, starting empty", self.path);
            return Ok(Decoded::default());
        }

        let file = File::open(&self.path)?;
        // Acquire shared lock for reading
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        let mut decoded = self.format.codec().decode(&contents);

        let mut seen = HashSet::new();
        let mut problems = Vec::new();
        decoded.workouts.retain(|w| {
            if seen.insert(w.id) {
                true
            } else {
                problems.push(Error::Other(format!("duplicate workout id {}", w.id)));
                false
            }
        });
        decoded.problems.extend(problems);

        for problem in &decoded.problems {
            tracing::warn!("Skipped record in {:?}: {}", self.path, problem);
        }
        tracing::debug!(
            "Loaded {} workouts from {:?}",
            decoded.workouts.len(),
            self.path
        );
        Ok(decoded)
    }

    /// Replace the file contents with `workouts`
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file in the same directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, workouts: &[Workout]) -> Result<()> {
        let contents = self.format.codec().encode(workouts)?;

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;

        // Serialize concurrent writers on the temp file
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} workouts to {:?}", workouts.len(), self.path);
        Ok(())
    }
}
