//! In-memory workout store with write-through persistence.
//!
//! Each record is owned once, in `records`; `order` holds ids in insertion
//! order so the list view is always derived from the same entries the id
//! lookups see. Every mutation rewrites the backing file.

use crate::ids::IdGenerator;
use crate::storage::WorkoutFile;
use crate::types::check_single_line;
use crate::{Catalog, Error, NewWorkout, Result, Workout, WorkoutId, WorkoutUpdate};
use std::collections::HashMap;

pub struct WorkoutStore {
    records: HashMap<WorkoutId, Workout>,
    order: Vec<WorkoutId>,
    file: Option<WorkoutFile>,
    ids: Box<dyn IdGenerator>,
    skipped_on_load: usize,
    /// Set after a lossy load until the original file has been copied aside
    backup_pending: bool,
}

impl WorkoutStore {
    /// Load every workout from `file` and persist future changes to it
    pub fn open(file: WorkoutFile, ids: Box<dyn IdGenerator>) -> Result<Self> {
        let decoded = file.load_with_problems()?;
        let mut store = Self::in_memory(ids);
        store.skipped_on_load = decoded.problems.len();
        store.backup_pending = store.skipped_on_load > 0;
        for workout in decoded.workouts {
            store.insert(workout);
        }
        store.file = Some(file);
        tracing::info!("Opened workout store with {} records", store.len());
        Ok(store)
    }

    /// Store with no backing file; mutations are never persisted
    pub fn in_memory(ids: Box<dyn IdGenerator>) -> Self {
        Self {
            records: HashMap::new(),
            order: Vec::new(),
            file: None,
            ids,
            skipped_on_load: 0,
            backup_pending: false,
        }
    }

    /// Number of malformed records dropped when the file was opened
    pub fn skipped_on_load(&self) -> usize {
        self.skipped_on_load
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All workouts in insertion order
    pub fn list(&self) -> impl Iterator<Item = &Workout> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    pub fn get(&self, id: WorkoutId) -> Option<&Workout> {
        self.records.get(&id)
    }

    /// Like `get`, but reports a missing id as `Error::NotFound`
    pub fn search(&self, id: WorkoutId) -> Result<&Workout> {
        self.get(id).ok_or(Error::NotFound(id))
    }

    /// Add a workout of the catalog type `input.type_id`
    ///
    /// `successful_reps` starts as `sets * reps_per_set`. An unknown type
    /// selector or a date with a line break leaves the store untouched.
    pub fn create(&mut self, catalog: &Catalog, input: NewWorkout) -> Result<&Workout> {
        check_single_line("date", &input.date)?;
        let workout_type = catalog
            .get(input.type_id)
            .ok_or(Error::InvalidWorkoutType(input.type_id))?;
        let id = self.ids.next_id(&self.records)?;

        let workout = Workout {
            id,
            date: input.date,
            workout_type: workout_type.name.clone(),
            duration: input.duration,
            successful_reps: input.sets.saturating_mul(input.reps_per_set),
            sets: input.sets,
            reps_per_set: input.reps_per_set,
        };
        self.insert(workout);
        tracing::info!("Created workout {}", id);

        self.persist()?;
        self.search(id)
    }

    /// Replace the fields set in `update`; persists even if nothing changed
    pub fn update(&mut self, id: WorkoutId, update: WorkoutUpdate) -> Result<&Workout> {
        if let Some(ref date) = update.date {
            check_single_line("date", date)?;
        }
        let workout = self.records.get_mut(&id).ok_or(Error::NotFound(id))?;
        update.apply_to(workout);
        tracing::info!("Updated workout {}", id);

        self.persist()?;
        self.search(id)
    }

    /// Remove a workout and return it
    pub fn delete(&mut self, id: WorkoutId) -> Result<Workout> {
        let removed = self.records.remove(&id).ok_or(Error::NotFound(id))?;
        self.order.retain(|existing| *existing != id);
        tracing::info!("Deleted workout {}", id);

        self.persist()?;
        Ok(removed)
    }

    fn insert(&mut self, workout: Workout) {
        self.order.push(workout.id);
        self.records.insert(workout.id, workout);
    }

    /// Rewrite the backing file with the current records
    ///
    /// The first save after a lossy load copies the file to its `.bak`
    /// path so skipped records survive. On failure the in-memory change is
    /// kept and the error is returned.
    pub fn persist(&mut self) -> Result<()> {
        let Some(ref file) = self.file else {
            return Ok(());
        };
        if self.backup_pending {
            if file.path().exists() {
                file.backup()?;
            }
            self.backup_pending = false;
        }
        let snapshot: Vec<Workout> = self.list().cloned().collect();
        file.save(&snapshot).map_err(|e| {
            tracing::error!("Could not save workouts to {:?}: {}", file.path(), e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{RandomIdGenerator, SequentialIdGenerator};
    use crate::StorageFormat;
    use std::collections::HashSet;

    fn strength(date: &str) -> NewWorkout {
        NewWorkout {
            date: date.into(),
            type_id: 2,
            sets: 3,
            reps_per_set: 10,
            duration: 30,
        }
    }

    fn open(path: &std::path::Path) -> WorkoutStore {
        WorkoutStore::open(
            WorkoutFile::new(path, StorageFormat::Text),
            Box::new(RandomIdGenerator::with_seed(42)),
        )
        .unwrap()
    }

    #[test]
    fn test_create_persist_reload() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("workouts.txt");

        let mut store = open(&path);
        let created = store
            .create(Catalog::builtin(), strength("2024-01-01"))
            .unwrap()
            .clone();

        assert_eq!(created.successful_reps, 30);
        assert_eq!(created.workout_type, "Strength Training");
        assert!((1000..=9999).contains(&created.id));

        let reloaded = open(&path);
        assert_eq!(reloaded.search(created.id).unwrap(), &created);
    }

    #[test]
    fn test_invalid_type_leaves_store_untouched() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("workouts.txt");
        let mut store = open(&path);

        let input = NewWorkout {
            type_id: 11,
            ..strength("2024-01-01")
        };
        assert!(matches!(
            store.create(Catalog::builtin(), input),
            Err(Error::InvalidWorkoutType(11))
        ));
        assert!(store.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_ids_unique_after_many_creates() {
        let mut store = WorkoutStore::in_memory(Box::new(RandomIdGenerator::with_seed(3)));
        for day in 0..500 {
            store
                .create(Catalog::builtin(), strength(&format!("day-{}", day)))
                .unwrap();
        }
        let ids: HashSet<WorkoutId> = store.list().map(|w| w.id).collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn test_update_sentinels() {
        let mut store = WorkoutStore::in_memory(Box::new(SequentialIdGenerator));
        let id = store
            .create(Catalog::builtin(), strength("2024-01-01"))
            .unwrap()
            .id;

        let kept = store
            .update(id, WorkoutUpdate::from_sentinels("", -1, -1, -1, -1))
            .unwrap()
            .clone();
        assert_eq!(kept.date, "2024-01-01");
        assert_eq!(kept.successful_reps, 30);

        let changed = store
            .update(id, WorkoutUpdate::from_sentinels("2024-01-05", 40, 27, -1, 9))
            .unwrap();
        assert_eq!(changed.date, "2024-01-05");
        assert_eq!(changed.duration, 40);
        assert_eq!(changed.successful_reps, 27);
        assert_eq!(changed.sets, 3);
        assert_eq!(changed.reps_per_set, 9);
    }

    #[test]
    fn test_list_reflects_updates() {
        let mut store = WorkoutStore::in_memory(Box::new(SequentialIdGenerator));
        let first = store
            .create(Catalog::builtin(), strength("first"))
            .unwrap()
            .id;
        store
            .create(Catalog::builtin(), strength("second"))
            .unwrap();

        store
            .update(
                first,
                WorkoutUpdate {
                    date: Some("edited".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        let dates: Vec<&str> = store.list().map(|w| w.date.as_str()).collect();
        assert_eq!(dates, vec!["edited", "second"]);
    }

    #[test]
    fn test_update_is_persisted() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("workouts.txt");
        let mut store = open(&path);
        let id = store
            .create(Catalog::builtin(), strength("2024-01-01"))
            .unwrap()
            .id;

        store
            .update(
                id,
                WorkoutUpdate {
                    successful_reps: Some(12),
                    ..Default::default()
                },
            )
            .unwrap();

        let reloaded = open(&path);
        let listed: Vec<&Workout> = reloaded.list().collect();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].successful_reps, 12);
    }

    #[test]
    fn test_delete_removes_everywhere() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("workouts.txt");
        let mut store = open(&path);
        let keep = store.create(Catalog::builtin(), strength("a")).unwrap().id;
        let gone = store.create(Catalog::builtin(), strength("b")).unwrap().id;

        let removed = store.delete(gone).unwrap();
        assert_eq!(removed.id, gone);
        assert!(matches!(store.search(gone), Err(Error::NotFound(_))));
        assert!(store.list().all(|w| w.id != gone));
        assert_eq!(store.len(), 1);

        let reloaded = open(&path);
        assert!(reloaded.get(gone).is_none());
        assert!(reloaded.get(keep).is_some());
    }

    #[test]
    fn test_not_found_on_empty_store() {
        let mut store = WorkoutStore::in_memory(Box::new(SequentialIdGenerator));

        assert!(matches!(store.search(9999), Err(Error::NotFound(9999))));
        assert!(matches!(
            store.update(9999, WorkoutUpdate::default()),
            Err(Error::NotFound(9999))
        ));
        assert!(matches!(store.delete(9999), Err(Error::NotFound(9999))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_open_counts_skipped_records() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("workouts.txt");
        std::fs::write(
            &path,
            "id: 1234\ndate: 2024-01-01\ntype: Core\nduration: 10\nsuccessful_reps: 5\nsets: 1\nreps_per_set: 5\n\nid: oops\n\n",
        )
        .unwrap();

        let store = open(&path);
        assert_eq!(store.len(), 1);
        assert_eq!(store.skipped_on_load(), 1);
    }

    #[test]
    fn test_line_break_in_date_rejected_before_insert() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("workouts.txt");
        let mut store = open(&path);

        for bad in ["2024\r01", "2024\n01"] {
            assert!(matches!(
                store.create(Catalog::builtin(), strength(bad)),
                Err(Error::InvalidField { field: "date", .. })
            ));
        }
        assert!(store.is_empty());
        assert!(!path.exists());

        // Later saves are unaffected
        let id = store
            .create(Catalog::builtin(), strength("2024-01-02"))
            .unwrap()
            .id;
        assert_eq!(open(&path).search(id).unwrap().date, "2024-01-02");
    }

    #[test]
    fn test_line_break_in_updated_date_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("workouts.txt");
        let mut store = open(&path);
        let id = store
            .create(Catalog::builtin(), strength("2024-01-01"))
            .unwrap()
            .id;

        let bad = WorkoutUpdate {
            date: Some("2024\r01".into()),
            duration: Some(99),
            ..Default::default()
        };
        assert!(matches!(
            store.update(id, bad),
            Err(Error::InvalidField { .. })
        ));
        assert_eq!(store.search(id).unwrap().date, "2024-01-01");
        assert_eq!(store.search(id).unwrap().duration, 30);

        store
            .update(
                id,
                WorkoutUpdate {
                    duration: Some(45),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(open(&path).search(id).unwrap().duration, 45);
    }

    #[test]
    fn test_lossy_load_backs_up_before_first_save() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("workouts.txt");
        let backup = temp_dir.path().join("workouts.txt.bak");
        let original = "id: broken\n\nid: 1234\ndate: 2024-01-01\ntype: Core\nduration: 10\nsuccessful_reps: 5\nsets: 1\nreps_per_set: 5\n\n";
        std::fs::write(&path, original).unwrap();

        let mut store = open(&path);
        assert!(!backup.exists());

        store
            .update(
                1234,
                WorkoutUpdate {
                    duration: Some(12),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), original);
        assert!(!std::fs::read_to_string(&path).unwrap().contains("broken"));

        // Only the first save after the load writes the backup
        std::fs::remove_file(&backup).unwrap();
        store.delete(1234).unwrap();
        assert!(!backup.exists());
    }

    #[test]
    fn test_clean_load_writes_no_backup() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("workouts.txt");
        let mut store = open(&path);
        store.create(Catalog::builtin(), strength("a")).unwrap();

        let mut store = open(&path);
        store.create(Catalog::builtin(), strength("b")).unwrap();
        assert!(!temp_dir.path().join("workouts.txt.bak").exists());
    }

    #[test]
    fn test_failed_save_keeps_memory_state() {
        let temp_dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the rename fail
        let path = temp_dir.path().join("workouts.txt");
        std::fs::create_dir_all(path.join("occupied")).unwrap();

        let mut store = WorkoutStore::in_memory(Box::new(SequentialIdGenerator));
        store.file = Some(WorkoutFile::new(&path, StorageFormat::Text));

        let result = store.create(Catalog::builtin(), strength("2024-01-01"));
        assert!(matches!(result, Err(Error::Io(_))));
        assert_eq!(store.len(), 1);
        assert!(store.get(1000).is_some());
    }
}
