//! Object store boundary contract.
//!
//! The core never performs I/O itself; hosts hand it data pulled from a
//! [`Store`] and push finalized aggregates back through it. `save()`
//! commits pending mutations and surfaces persistence failures
//! unchanged — the core does not retry and does not roll back in-memory
//! state.

use crate::{Error, Exercise, Program, Result, Workout, WorkoutSummary};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Query and mutation contract every backing store satisfies
pub trait Store {
    fn insert_exercise(&mut self, exercise: Exercise) -> Result<()>;
    fn update_exercise(&mut self, exercise: Exercise) -> Result<()>;
    /// Deleting an exercise drops its owned performance records with it
    fn delete_exercise(&mut self, id: Uuid) -> Result<()>;
    /// All exercises, sorted by name
    fn exercises(&self) -> Result<Vec<Exercise>>;

    fn insert_program(&mut self, program: Program) -> Result<()>;
    fn update_program(&mut self, program: Program) -> Result<()>;
    fn delete_program(&mut self, id: Uuid) -> Result<()>;
    fn programs(&self) -> Result<Vec<Program>>;
    fn active_program(&self) -> Result<Option<Program>>;

    fn insert_workout(&mut self, workout: Workout) -> Result<()>;
    /// Workout summaries since the cutoff, optionally completed-only,
    /// newest first. Summaries rather than full workouts: archived
    /// history keeps only per-workout aggregates.
    fn workouts_since(&self, cutoff: DateTime<Utc>, completed_only: bool)
        -> Result<Vec<WorkoutSummary>>;

    /// Commit pending mutations
    fn save(&mut self) -> Result<()>;
}

/// Vec-backed store for tests and in-process caching
#[derive(Debug, Default)]
pub struct MemoryStore {
    exercises: Vec<Exercise>,
    programs: Vec<Program>,
    workouts: Vec<Workout>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn insert_exercise(&mut self, exercise: Exercise) -> Result<()> {
        self.exercises.push(exercise);
        Ok(())
    }

    fn update_exercise(&mut self, exercise: Exercise) -> Result<()> {
        let slot = self
            .exercises
            .iter_mut()
            .find(|e| e.id == exercise.id)
            .ok_or_else(|| Error::NotFound(format!("exercise {}", exercise.id)))?;
        *slot = exercise;
        Ok(())
    }

    fn delete_exercise(&mut self, id: Uuid) -> Result<()> {
        let before = self.exercises.len();
        self.exercises.retain(|e| e.id != id);
        if self.exercises.len() == before {
            return Err(Error::NotFound(format!("exercise {id}")));
        }
        Ok(())
    }

    fn exercises(&self) -> Result<Vec<Exercise>> {
        let mut exercises = self.exercises.clone();
        exercises.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(exercises)
    }

    fn insert_program(&mut self, program: Program) -> Result<()> {
        self.programs.push(program);
        Ok(())
    }

    fn update_program(&mut self, program: Program) -> Result<()> {
        let slot = self
            .programs
            .iter_mut()
            .find(|p| p.id == program.id)
            .ok_or_else(|| Error::NotFound(format!("program {}", program.id)))?;
        *slot = program;
        Ok(())
    }

    fn delete_program(&mut self, id: Uuid) -> Result<()> {
        let before = self.programs.len();
        self.programs.retain(|p| p.id != id);
        if self.programs.len() == before {
            return Err(Error::NotFound(format!("program {id}")));
        }
        Ok(())
    }

    fn programs(&self) -> Result<Vec<Program>> {
        Ok(self.programs.clone())
    }

    fn active_program(&self) -> Result<Option<Program>> {
        Ok(self.programs.iter().find(|p| p.is_active).cloned())
    }

    fn insert_workout(&mut self, workout: Workout) -> Result<()> {
        self.workouts.push(workout);
        Ok(())
    }

    fn workouts_since(
        &self,
        cutoff: DateTime<Utc>,
        completed_only: bool,
    ) -> Result<Vec<WorkoutSummary>> {
        let mut summaries: Vec<WorkoutSummary> = self
            .workouts
            .iter()
            .filter(|w| w.date >= cutoff && (!completed_only || w.completed))
            .map(WorkoutSummary::from)
            .collect();
        summaries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(summaries)
    }

    fn save(&mut self) -> Result<()> {
        Ok(())
    }
}
