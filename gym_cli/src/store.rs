//! File-backed store for the CLI.
//!
//! Catalog and programs live in the JSON state snapshot; finalized
//! workouts are appended to the WAL and later rolled up to CSV. All
//! mutations are buffered in memory until `save()` commits them.

use chrono::{DateTime, Utc};
use gym_core::wal::WorkoutSink;
use gym_core::{
    build_default_exercises, load_recent_workouts, Error, Exercise, GymState, JsonlSink, Program,
    Result, Store, Workout, WorkoutSummary,
};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub struct FileStore {
    state_path: PathBuf,
    wal_path: PathBuf,
    csv_path: PathBuf,
    state: GymState,
    pending_workouts: Vec<Workout>,
}

impl FileStore {
    /// Open the store rooted at `data_dir`, creating the layout if
    /// needed and loading the current state snapshot.
    pub fn open(data_dir: &Path) -> Result<Self> {
        let wal_dir = data_dir.join("wal");
        std::fs::create_dir_all(&wal_dir)?;

        let state_path = wal_dir.join("state.json");
        let state = GymState::load(&state_path)?;

        Ok(Self {
            state_path,
            wal_path: wal_dir.join("workouts.wal"),
            csv_path: data_dir.join("workouts.csv"),
            state,
            pending_workouts: Vec::new(),
        })
    }

    pub fn wal_path(&self) -> &Path {
        &self.wal_path
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    /// Seed the starter catalog on first run. Returns how many
    /// exercises were added (zero when the catalog already has any).
    pub fn seed_catalog_if_empty(&mut self, now: DateTime<Utc>) -> Result<usize> {
        if !self.state.exercises.is_empty() {
            return Ok(0);
        }
        let seeded = build_default_exercises(now);
        let count = seeded.len();
        self.state.exercises = seeded;
        self.state.save(&self.state_path)?;
        tracing::info!("Seeded {} starter exercises", count);
        Ok(count)
    }
}

impl Store for FileStore {
    fn insert_exercise(&mut self, exercise: Exercise) -> Result<()> {
        self.state.exercises.push(exercise);
        Ok(())
    }

    fn update_exercise(&mut self, exercise: Exercise) -> Result<()> {
        let slot = self
            .state
            .exercises
            .iter_mut()
            .find(|e| e.id == exercise.id)
            .ok_or_else(|| Error::NotFound(format!("exercise {}", exercise.id)))?;
        *slot = exercise;
        Ok(())
    }

    fn delete_exercise(&mut self, id: Uuid) -> Result<()> {
        let before = self.state.exercises.len();
        self.state.exercises.retain(|e| e.id != id);
        if self.state.exercises.len() == before {
            return Err(Error::NotFound(format!("exercise {id}")));
        }
        Ok(())
    }

    fn exercises(&self) -> Result<Vec<Exercise>> {
        let mut exercises = self.state.exercises.clone();
        exercises.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(exercises)
    }

    fn insert_program(&mut self, program: Program) -> Result<()> {
        self.state.programs.push(program);
        Ok(())
    }

    fn update_program(&mut self, program: Program) -> Result<()> {
        let slot = self
            .state
            .programs
            .iter_mut()
            .find(|p| p.id == program.id)
            .ok_or_else(|| Error::NotFound(format!("program {}", program.id)))?;
        *slot = program;
        Ok(())
    }

    fn delete_program(&mut self, id: Uuid) -> Result<()> {
        let before = self.state.programs.len();
        self.state.programs.retain(|p| p.id != id);
        if self.state.programs.len() == before {
            return Err(Error::NotFound(format!("program {id}")));
        }
        Ok(())
    }

    fn programs(&self) -> Result<Vec<Program>> {
        Ok(self.state.programs.clone())
    }

    fn active_program(&self) -> Result<Option<Program>> {
        Ok(self.state.programs.iter().find(|p| p.is_active).cloned())
    }

    fn insert_workout(&mut self, workout: Workout) -> Result<()> {
        self.pending_workouts.push(workout);
        Ok(())
    }

    fn workouts_since(
        &self,
        cutoff: DateTime<Utc>,
        completed_only: bool,
    ) -> Result<Vec<WorkoutSummary>> {
        let now = Utc::now();
        let days = (now - cutoff).num_days().max(0) + 1;

        let mut summaries = load_recent_workouts(&self.wal_path, &self.csv_path, days, now)?;
        summaries.retain(|w| w.date >= cutoff && (!completed_only || w.completed));

        // Pending workouts not yet committed to the WAL
        for workout in &self.pending_workouts {
            if workout.date >= cutoff && (!completed_only || workout.completed) {
                summaries.push(workout.summary());
            }
        }

        summaries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(summaries)
    }

    fn save(&mut self) -> Result<()> {
        let mut sink = JsonlSink::new(&self.wal_path);
        for workout in self.pending_workouts.drain(..) {
            sink.append(&workout)
                .map_err(|e| Error::Persistence(format!("workout log append failed: {e}")))?;
        }

        self.state
            .save(&self.state_path)
            .map_err(|e| Error::Persistence(format!("state snapshot save failed: {e}")))
    }
}
