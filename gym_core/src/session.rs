//! Workout session state machine.
//!
//! Owns the lifecycle of the single active workout: start, exercise and
//! set mutation, completion, cancellation. On completion it derives a
//! performance record per exercise with completed work and advances the
//! active program's rotation. All mutations go through `&mut self`, so
//! one logical caller drives the session at a time.

use crate::{
    performance, Category, Clock, Error, Event, EventSink, Exercise, Program, Result, Workout,
    WorkoutExercise,
};
use std::sync::Arc;
use uuid::Uuid;

/// Tunables injected by the host
#[derive(Clone, Copy, Debug)]
pub struct SessionConfig {
    /// Sets seeded onto every exercise when a workout starts
    pub default_sets_per_exercise: usize,
    /// Rest interval the host conventionally starts after a completed set
    pub default_rest_seconds: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_sets_per_exercise: 4,
            default_rest_seconds: crate::RestDuration::Ninety.seconds(),
        }
    }
}

/// Observable lifecycle state; the terminal completed/cancelled states
/// collapse straight back to `Idle`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
}

/// The session state machine
pub struct WorkoutSession {
    workout: Option<Workout>,
    selected_exercise: usize,
    config: SessionConfig,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn EventSink>,
}

impl WorkoutSession {
    pub fn new(config: SessionConfig, clock: Arc<dyn Clock>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            workout: None,
            selected_exercise: 0,
            config,
            clock,
            sink,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.workout.is_some() {
            SessionState::Active
        } else {
            SessionState::Idle
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == SessionState::Active
    }

    pub fn workout(&self) -> Option<&Workout> {
        self.workout.as_ref()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn active_workout(&mut self) -> Result<&mut Workout> {
        self.workout
            .as_mut()
            .ok_or_else(|| Error::InvalidState("no active workout".into()))
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Start a workout of the given category, seeding one exercise slot
    /// (with the default set count) per matching catalog exercise.
    ///
    /// Each slot is stamped with the exercise's most recent performance;
    /// first-time exercises carry no stamp.
    pub fn start_workout(&mut self, category: Category, available: &[Exercise]) -> Result<()> {
        if self.workout.is_some() {
            return Err(Error::InvalidState("a workout is already active".into()));
        }

        let now = self.clock.now();
        let mut workout = Workout::new(category, now);

        for exercise in available.iter().filter(|e| e.category == category) {
            let last = exercise.last_performance();
            let slot = workout.add_exercise(
                exercise.id,
                last.map(|r| r.max_weight),
                last.map(|r| r.max_reps),
            );
            slot.add_sets(self.config.default_sets_per_exercise, false);
        }

        tracing::info!(
            category = category.label(),
            exercises = workout.exercise_count(),
            "Started workout"
        );

        self.workout = Some(workout);
        self.selected_exercise = 0;
        Ok(())
    }

    /// Finalize the active workout.
    ///
    /// Every exercise slot with at least one completed set yields one
    /// performance record, appended to the matching catalog exercise.
    /// The active program, if passed in, advances one rotation step.
    /// Returns the finalized workout for the host to persist.
    pub fn complete_workout(
        &mut self,
        exercises: &mut [Exercise],
        active_program: Option<&mut Program>,
    ) -> Result<Workout> {
        let mut workout = self
            .workout
            .take()
            .ok_or_else(|| Error::InvalidState("no active workout to complete".into()))?;

        let now = self.clock.now();
        workout.end_time = Some(now);
        workout.completed = true;

        let mut recorded = 0;
        for slot in &workout.exercises {
            let Some(record) = performance::derive_record(slot, now) else {
                continue;
            };
            match exercises.iter_mut().find(|e| e.id == slot.exercise_id) {
                Some(exercise) => {
                    exercise.performance_records.push(record);
                    recorded += 1;
                }
                None => {
                    // Exercise was deleted from the catalog mid-session
                    tracing::warn!(exercise_id = %slot.exercise_id, "No catalog exercise for record");
                }
            }
        }

        if let Some(program) = active_program {
            program.advance();
            tracing::debug!(program = %program.name, index = program.current_index, "Advanced program");
        }

        tracing::info!(
            workout_id = %workout.id,
            records = recorded,
            sets = workout.total_sets(),
            "Completed workout"
        );

        self.selected_exercise = 0;
        self.sink.emit(&Event::WorkoutCompleted);
        Ok(workout)
    }

    /// Discard the active workout and everything in it.
    ///
    /// No performance record is derived and no program advances.
    pub fn cancel_workout(&mut self) -> Result<()> {
        let workout = self
            .workout
            .take()
            .ok_or_else(|| Error::InvalidState("no active workout to cancel".into()))?;

        tracing::info!(workout_id = %workout.id, "Cancelled workout");
        self.selected_exercise = 0;
        self.sink.emit(&Event::Warning);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Exercise mutation
    // ------------------------------------------------------------------

    /// Append an exercise slot to the active workout, seeded like the
    /// slots created at start
    pub fn add_exercise(&mut self, exercise: &Exercise) -> Result<Uuid> {
        let default_sets = self.config.default_sets_per_exercise;
        let last = exercise.last_performance();
        let (last_weight, last_reps) = (last.map(|r| r.max_weight), last.map(|r| r.max_reps));
        let exercise_id = exercise.id;

        let workout = self.active_workout()?;
        let slot = workout.add_exercise(exercise_id, last_weight, last_reps);
        slot.add_sets(default_sets, false);
        Ok(slot.id)
    }

    /// Remove an exercise slot; the selection is clamped back into bounds
    pub fn remove_exercise(&mut self, workout_exercise_id: Uuid) -> Result<()> {
        let workout = self.active_workout()?;
        let before = workout.exercises.len();
        workout.exercises.retain(|e| e.id != workout_exercise_id);
        if workout.exercises.len() == before {
            return Err(Error::NotFound(format!(
                "workout exercise {workout_exercise_id}"
            )));
        }

        let count = workout.exercises.len();
        if self.selected_exercise >= count {
            self.selected_exercise = count.saturating_sub(1);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Set mutation
    // ------------------------------------------------------------------

    /// Append a set to an exercise slot, numbered after the existing ones
    pub fn add_set(&mut self, workout_exercise_id: Uuid, warmup: bool) -> Result<Uuid> {
        let slot = self.slot_mut(workout_exercise_id)?;
        Ok(slot.add_set(warmup).id)
    }

    /// Remove a set; the remaining sets renumber densely from 1
    pub fn remove_set(&mut self, workout_exercise_id: Uuid, set_id: Uuid) -> Result<()> {
        let slot = self.slot_mut(workout_exercise_id)?;
        if !slot.remove_set(set_id) {
            return Err(Error::NotFound(format!("set {set_id}")));
        }
        Ok(())
    }

    /// Complete a set with the given weight and reps
    pub fn complete_set(&mut self, set_id: Uuid, weight: f64, reps: i32) -> Result<()> {
        if weight < 0.0 {
            return Err(Error::Validation(format!("negative weight {weight}")));
        }
        if reps < 0 {
            return Err(Error::Validation(format!("negative reps {reps}")));
        }

        let now = self.clock.now();
        let set = self.set_mut(set_id)?;
        set.complete(weight, reps, now);

        self.sink.emit(&Event::SetCompleted);
        Ok(())
    }

    /// Flip a set back to incomplete; entered values stay for re-editing
    pub fn uncomplete_set(&mut self, set_id: Uuid) -> Result<()> {
        self.set_mut(set_id)?.uncomplete();
        Ok(())
    }

    /// Toggle a set's completion.
    ///
    /// Re-completing reuses the values retained from the last entry and
    /// is a no-op when either value is missing. Returns whether the set
    /// ends up completed.
    pub fn toggle_set(&mut self, set_id: Uuid) -> Result<bool> {
        let now = self.clock.now();
        let set = self.set_mut(set_id)?;

        if set.completed {
            set.uncomplete();
            return Ok(false);
        }
        let (Some(weight), Some(reps)) = (set.weight, set.reps) else {
            return Ok(false);
        };
        set.complete(weight, reps, now);
        self.sink.emit(&Event::SetCompleted);
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn selected_index(&self) -> usize {
        self.selected_exercise
    }

    pub fn current_exercise(&self) -> Option<&WorkoutExercise> {
        self.workout.as_ref()?.exercises.get(self.selected_exercise)
    }

    pub fn select_exercise(&mut self, index: usize) -> Result<()> {
        let workout = self.active_workout()?;
        if index >= workout.exercises.len() {
            return Err(Error::NotFound(format!("exercise index {index}")));
        }
        self.selected_exercise = index;
        self.sink.emit(&Event::SelectionChanged);
        Ok(())
    }

    pub fn next_exercise(&mut self) {
        let Some(workout) = self.workout.as_ref() else {
            return;
        };
        if self.selected_exercise + 1 < workout.exercises.len() {
            self.selected_exercise += 1;
            self.sink.emit(&Event::SelectionChanged);
        }
    }

    pub fn previous_exercise(&mut self) {
        if self.workout.is_some() && self.selected_exercise > 0 {
            self.selected_exercise -= 1;
            self.sink.emit(&Event::SelectionChanged);
        }
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    /// Completed sets over total sets across the whole workout, 0 when
    /// no sets exist
    pub fn progress(&self) -> f64 {
        let Some(workout) = self.workout.as_ref() else {
            return 0.0;
        };
        let total: usize = workout.exercises.iter().map(|e| e.total_set_count()).sum();
        if total == 0 {
            return 0.0;
        }
        let completed: usize = workout
            .exercises
            .iter()
            .map(|e| e.completed_set_count())
            .sum();
        completed as f64 / total as f64
    }

    /// Elapsed minutes of the active workout
    pub fn duration_minutes(&self) -> Option<i64> {
        let workout = self.workout.as_ref()?;
        Some(workout.duration_minutes(self.clock.now()))
    }

    // ------------------------------------------------------------------
    // Lookup helpers
    // ------------------------------------------------------------------

    fn slot_mut(&mut self, workout_exercise_id: Uuid) -> Result<&mut WorkoutExercise> {
        self.active_workout()?
            .exercises
            .iter_mut()
            .find(|e| e.id == workout_exercise_id)
            .ok_or_else(|| Error::NotFound(format!("workout exercise {workout_exercise_id}")))
    }

    fn set_mut(&mut self, set_id: Uuid) -> Result<&mut crate::ExerciseSet> {
        self.active_workout()?
            .exercises
            .iter_mut()
            .flat_map(|e| e.sets.iter_mut())
            .find(|s| s.id == set_id)
            .ok_or_else(|| Error::NotFound(format!("set {set_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ManualClock, MemorySink, MuscleGroup};
    use chrono::Utc;

    struct Fixture {
        session: WorkoutSession,
        clock: Arc<ManualClock>,
        sink: Arc<MemorySink>,
        exercises: Vec<Exercise>,
    }

    fn fixture() -> Fixture {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let sink = Arc::new(MemorySink::new());
        let session = WorkoutSession::new(
            SessionConfig::default(),
            Arc::clone(&clock) as Arc<dyn Clock>,
            Arc::clone(&sink) as Arc<dyn EventSink>,
        );
        let now = clock.now();
        let exercises = vec![
            Exercise::new("Bench press", Category::Push, MuscleGroup::Chest, now),
            Exercise::new("Overhead press", Category::Push, MuscleGroup::Shoulders, now),
            Exercise::new("Deadlift", Category::Pull, MuscleGroup::Back, now),
        ];
        Fixture {
            session,
            clock,
            sink,
            exercises,
        }
    }

    #[test]
    fn test_start_seeds_matching_exercises_with_default_sets() {
        let mut f = fixture();
        f.session.start_workout(Category::Push, &f.exercises).unwrap();

        let workout = f.session.workout().unwrap();
        assert_eq!(workout.exercise_count(), 2);
        for slot in &workout.exercises {
            assert_eq!(slot.total_set_count(), 4);
            assert_eq!(slot.last_weight, None); // first-time exercises
        }
        assert_eq!(f.session.state(), SessionState::Active);
    }

    #[test]
    fn test_start_stamps_last_performance() {
        let mut f = fixture();
        f.exercises[0]
            .performance_records
            .push(crate::PerformanceRecord::new(f.clock.now(), 80.0, 10, 2400.0, 3));

        f.session.start_workout(Category::Push, &f.exercises).unwrap();

        let slot = &f.session.workout().unwrap().exercises[0];
        assert_eq!(slot.last_weight, Some(80.0));
        assert_eq!(slot.last_reps, Some(10));
    }

    #[test]
    fn test_start_twice_is_invalid() {
        let mut f = fixture();
        f.session.start_workout(Category::Push, &f.exercises).unwrap();

        let result = f.session.start_workout(Category::Pull, &f.exercises);
        assert!(matches!(result, Err(Error::InvalidState(_))));
    }

    #[test]
    fn test_complete_and_cancel_require_active_workout() {
        let mut f = fixture();
        assert!(matches!(
            f.session.complete_workout(&mut f.exercises, None),
            Err(Error::InvalidState(_))
        ));
        assert!(matches!(f.session.cancel_workout(), Err(Error::InvalidState(_))));
    }

    #[test]
    fn test_complete_set_validates_input() {
        let mut f = fixture();
        f.session.start_workout(Category::Push, &f.exercises).unwrap();
        let set_id = f.session.workout().unwrap().exercises[0].sets[0].id;

        assert!(matches!(
            f.session.complete_set(set_id, -5.0, 10),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            f.session.complete_set(set_id, 60.0, -1),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            f.session.complete_set(Uuid::new_v4(), 60.0, 10),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_complete_set_emits_event_and_stamps_time() {
        let mut f = fixture();
        f.session.start_workout(Category::Push, &f.exercises).unwrap();
        let set_id = f.session.workout().unwrap().exercises[0].sets[0].id;

        f.session.complete_set(set_id, 60.0, 10).unwrap();

        let set = &f.session.workout().unwrap().exercises[0].sets[0];
        assert!(set.completed);
        assert_eq!(set.completed_at, Some(f.clock.now()));
        assert_eq!(f.sink.count(&Event::SetCompleted), 1);
    }

    #[test]
    fn test_toggle_set_reuses_retained_values() {
        let mut f = fixture();
        f.session.start_workout(Category::Push, &f.exercises).unwrap();
        let set_id = f.session.workout().unwrap().exercises[0].sets[0].id;

        f.session.complete_set(set_id, 70.0, 8).unwrap();
        assert!(!f.session.toggle_set(set_id).unwrap());

        // Values survive the uncomplete, so toggling again re-completes
        assert!(f.session.toggle_set(set_id).unwrap());
        let set = &f.session.workout().unwrap().exercises[0].sets[0];
        assert_eq!(set.weight, Some(70.0));
        assert_eq!(set.reps, Some(8));
    }

    #[test]
    fn test_toggle_without_values_is_noop() {
        let mut f = fixture();
        f.session.start_workout(Category::Push, &f.exercises).unwrap();
        let set_id = f.session.workout().unwrap().exercises[0].sets[0].id;

        assert!(!f.session.toggle_set(set_id).unwrap());
        assert!(!f.session.workout().unwrap().exercises[0].sets[0].completed);
    }

    #[test]
    fn test_add_and_remove_set_keeps_numbers_dense() {
        let mut f = fixture();
        f.session.start_workout(Category::Push, &f.exercises).unwrap();
        let slot_id = f.session.workout().unwrap().exercises[0].id;

        f.session.add_set(slot_id, true).unwrap();
        let second = f.session.workout().unwrap().exercises[0].sets[1].id;
        f.session.remove_set(slot_id, second).unwrap();

        let numbers: Vec<u32> = f.session.workout().unwrap().exercises[0]
            .sets
            .iter()
            .map(|s| s.set_number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_remove_exercise_clamps_selection() {
        let mut f = fixture();
        f.session.start_workout(Category::Push, &f.exercises).unwrap();
        f.session.select_exercise(1).unwrap();

        let last = f.session.workout().unwrap().exercises[1].id;
        f.session.remove_exercise(last).unwrap();

        assert_eq!(f.session.selected_index(), 0);
    }

    #[test]
    fn test_progress_over_all_sets() {
        let mut f = fixture();
        f.session.start_workout(Category::Push, &f.exercises).unwrap();
        assert_eq!(f.session.progress(), 0.0);

        let set_id = f.session.workout().unwrap().exercises[0].sets[0].id;
        f.session.complete_set(set_id, 60.0, 10).unwrap();

        // 1 of 8 sets across two seeded exercises
        assert_eq!(f.session.progress(), 0.125);
    }

    #[test]
    fn test_complete_workout_derives_records_and_advances_program() {
        let mut f = fixture();
        f.session.start_workout(Category::Push, &f.exercises).unwrap();

        let slot_a = f.session.workout().unwrap().exercises[0].clone();
        f.session.complete_set(slot_a.sets[0].id, 80.0, 10).unwrap();
        f.session.complete_set(slot_a.sets[1].id, 82.5, 8).unwrap();
        f.session.complete_set(slot_a.sets[2].id, 80.0, 10).unwrap();

        let mut program = Program::new(
            "PPL",
            vec![Category::Push, Category::Pull, Category::Legs],
            true,
            f.clock.now(),
        );

        let workout = f
            .session
            .complete_workout(&mut f.exercises, Some(&mut program))
            .unwrap();

        assert!(workout.completed);
        assert_eq!(workout.end_time, Some(f.clock.now()));
        assert_eq!(f.session.state(), SessionState::Idle);

        // Exercise A gains exactly one record with the aggregated values
        let record = &f.exercises[0].performance_records[0];
        assert_eq!(record.max_weight, 82.5);
        assert_eq!(record.max_reps, 8);
        assert_eq!(record.total_volume, 2260.0);
        assert_eq!(record.total_sets, 3);

        // Exercise B had no completed sets: no record
        assert!(f.exercises[1].performance_records.is_empty());

        assert_eq!(program.current_index, 1);
        assert_eq!(program.next_session(), Some(Category::Pull));
        assert_eq!(f.sink.count(&Event::WorkoutCompleted), 1);
    }

    #[test]
    fn test_cancel_discards_everything() {
        let mut f = fixture();
        f.session.start_workout(Category::Push, &f.exercises).unwrap();

        let set_id = f.session.workout().unwrap().exercises[0].sets[0].id;
        f.session.complete_set(set_id, 80.0, 10).unwrap();
        let set_id = f.session.workout().unwrap().exercises[0].sets[1].id;
        f.session.complete_set(set_id, 80.0, 10).unwrap();

        f.session.cancel_workout().unwrap();

        assert_eq!(f.session.state(), SessionState::Idle);
        assert!(f.exercises.iter().all(|e| e.performance_records.is_empty()));
        assert_eq!(f.sink.count(&Event::Warning), 1);
    }

    #[test]
    fn test_duration_tracks_clock() {
        let mut f = fixture();
        f.session.start_workout(Category::Push, &f.exercises).unwrap();

        f.clock.advance(chrono::Duration::minutes(35));
        assert_eq!(f.session.duration_minutes(), Some(35));
    }
}
