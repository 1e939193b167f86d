//! Core domain types for the GymTrack system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Session categories and muscle groups
//! - Exercises and their performance history
//! - Training programs and their rotation cursor
//! - Workouts, workout exercises and sets

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Enumerations
// ============================================================================

/// Training focus of a session or exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Push,
    Pull,
    Legs,
    Jjb,
    Mobility,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Push,
        Category::Pull,
        Category::Legs,
        Category::Jjb,
        Category::Mobility,
    ];

    /// Parse a category from CLI input (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "push" => Some(Category::Push),
            "pull" => Some(Category::Pull),
            "legs" => Some(Category::Legs),
            "jjb" => Some(Category::Jjb),
            "mobility" => Some(Category::Mobility),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Push => "Push",
            Category::Pull => "Pull",
            Category::Legs => "Legs",
            Category::Jjb => "JJB",
            Category::Mobility => "Mobility",
        }
    }
}

/// Muscle group targeted by an exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Biceps,
    Triceps,
    Quadriceps,
    Hamstrings,
    Glutes,
    Calves,
    Core,
    FullBody,
}

impl MuscleGroup {
    /// Muscle groups conventionally trained under a given category
    pub fn for_category(category: Category) -> &'static [MuscleGroup] {
        match category {
            Category::Push => &[MuscleGroup::Chest, MuscleGroup::Shoulders, MuscleGroup::Triceps],
            Category::Pull => &[MuscleGroup::Back, MuscleGroup::Biceps],
            Category::Legs => &[
                MuscleGroup::Quadriceps,
                MuscleGroup::Hamstrings,
                MuscleGroup::Glutes,
                MuscleGroup::Calves,
            ],
            Category::Jjb | Category::Mobility => &[MuscleGroup::FullBody, MuscleGroup::Core],
        }
    }

    /// Parse a muscle group from CLI input (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "chest" => Some(MuscleGroup::Chest),
            "back" => Some(MuscleGroup::Back),
            "shoulders" => Some(MuscleGroup::Shoulders),
            "biceps" => Some(MuscleGroup::Biceps),
            "triceps" => Some(MuscleGroup::Triceps),
            "quadriceps" | "quads" => Some(MuscleGroup::Quadriceps),
            "hamstrings" => Some(MuscleGroup::Hamstrings),
            "glutes" => Some(MuscleGroup::Glutes),
            "calves" => Some(MuscleGroup::Calves),
            "core" => Some(MuscleGroup::Core),
            "full_body" | "fullbody" | "full-body" => Some(MuscleGroup::FullBody),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Back => "Back",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::Biceps => "Biceps",
            MuscleGroup::Triceps => "Triceps",
            MuscleGroup::Quadriceps => "Quadriceps",
            MuscleGroup::Hamstrings => "Hamstrings",
            MuscleGroup::Glutes => "Glutes",
            MuscleGroup::Calves => "Calves",
            MuscleGroup::Core => "Core",
            MuscleGroup::FullBody => "Full body",
        }
    }
}

/// Preset rest intervals between sets
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RestDuration {
    Thirty,
    Sixty,
    Ninety,
    TwoMinutes,
    ThreeMinutes,
}

impl RestDuration {
    pub fn seconds(&self) -> u32 {
        match self {
            RestDuration::Thirty => 30,
            RestDuration::Sixty => 60,
            RestDuration::Ninety => 90,
            RestDuration::TwoMinutes => 120,
            RestDuration::ThreeMinutes => 180,
        }
    }
}

// ============================================================================
// Exercise and performance history
// ============================================================================

/// A catalogued exercise with its append-only performance history
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
    pub muscle_group: MuscleGroup,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Exclusively owned; one record per completed workout, never edited
    pub performance_records: Vec<PerformanceRecord>,
}

impl Exercise {
    pub fn new(
        name: impl Into<String>,
        category: Category,
        muscle_group: MuscleGroup,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category,
            muscle_group,
            notes: None,
            created_at,
            performance_records: Vec::new(),
        }
    }

    /// Most recent performance record, if any
    pub fn last_performance(&self) -> Option<&PerformanceRecord> {
        self.performance_records.iter().max_by_key(|r| r.date)
    }

    /// Total volume lifted across all recorded workouts
    pub fn total_volume_all_time(&self) -> f64 {
        self.performance_records.iter().map(|r| r.total_volume).sum()
    }
}

/// Aggregated performance for one exercise in one completed workout
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    /// Heaviest weight across completed sets
    pub max_weight: f64,
    /// Best reps at that heaviest weight (not the global max reps)
    pub max_reps: i32,
    /// Sum of weight x reps over completed sets
    pub total_volume: f64,
    /// Number of completed sets
    pub total_sets: usize,
}

impl PerformanceRecord {
    pub fn new(
        date: DateTime<Utc>,
        max_weight: f64,
        max_reps: i32,
        total_volume: f64,
        total_sets: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            max_weight,
            max_reps,
            total_volume,
            total_sets,
        }
    }

    pub fn average_volume_per_set(&self) -> f64 {
        if self.total_sets == 0 {
            return 0.0;
        }
        self.total_volume / self.total_sets as f64
    }
}

// ============================================================================
// Program
// ============================================================================

/// A training program cycling through an ordered rotation of categories
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Program {
    pub id: Uuid,
    pub name: String,
    pub rotation: Vec<Category>,
    pub current_index: usize,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Program {
    pub fn new(
        name: impl Into<String>,
        rotation: Vec<Category>,
        is_active: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            rotation,
            current_index: 0,
            is_active,
            created_at,
        }
    }

    /// Next session in the rotation, `None` for an empty rotation
    pub fn next_session(&self) -> Option<Category> {
        if self.rotation.is_empty() {
            return None;
        }
        Some(self.rotation[self.current_index % self.rotation.len()])
    }

    /// Advance the cursor to the following session (cyclic, no-op when empty)
    pub fn advance(&mut self) {
        if self.rotation.is_empty() {
            return;
        }
        self.current_index = (self.current_index + 1) % self.rotation.len();
    }

    /// Session at an arbitrary cursor position (cyclic)
    pub fn session_at(&self, index: usize) -> Option<Category> {
        if self.rotation.is_empty() {
            return None;
        }
        Some(self.rotation[index % self.rotation.len()])
    }

    pub fn reset_index(&mut self) {
        self.current_index = 0;
    }

    pub fn total_sessions(&self) -> usize {
        self.rotation.len()
    }
}

// ============================================================================
// Workout aggregate
// ============================================================================

/// A single training session and its exercises
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Workout {
    pub id: Uuid,
    pub category: Category,
    pub date: DateTime<Utc>,
    pub start_time: DateTime<Utc>,
    /// Set exactly when the workout is finalized (completed or cancelled)
    pub end_time: Option<DateTime<Utc>>,
    pub completed: bool,
    pub notes: Option<String>,
    /// Exclusively owned, ordered by `order`
    pub exercises: Vec<WorkoutExercise>,
}

impl Workout {
    pub fn new(category: Category, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            category,
            date: now,
            start_time: now,
            end_time: None,
            completed: false,
            notes: None,
            exercises: Vec::new(),
        }
    }

    /// Elapsed minutes from start to end, or to `now` while still active
    pub fn duration_minutes(&self, now: DateTime<Utc>) -> i64 {
        let end = self.end_time.unwrap_or(now);
        (end - self.start_time).num_seconds() / 60
    }

    /// Total volume over completed sets of all exercises
    pub fn total_volume(&self) -> f64 {
        self.exercises.iter().map(|e| e.total_volume()).sum()
    }

    /// Number of completed sets across all exercises
    pub fn total_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.completed_set_count()).sum()
    }

    pub fn exercise_count(&self) -> usize {
        self.exercises.len()
    }

    /// Append an exercise reference, stamped with its last-known performance
    pub fn add_exercise(
        &mut self,
        exercise_id: Uuid,
        last_weight: Option<f64>,
        last_reps: Option<i32>,
    ) -> &mut WorkoutExercise {
        let order = self.exercises.len();
        self.exercises
            .push(WorkoutExercise::new(order, exercise_id, last_weight, last_reps));
        self.exercises.last_mut().unwrap()
    }

    /// Collapse to the summary view used by history, stats and suggestion
    pub fn summary(&self) -> WorkoutSummary {
        WorkoutSummary {
            id: self.id,
            category: self.category,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            completed: self.completed,
            total_volume: self.total_volume(),
            total_sets: self.total_sets(),
            exercise_count: self.exercise_count(),
        }
    }
}

/// Summary view of a workout: what the history window retains once
/// per-set detail has been archived away
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutSummary {
    pub id: Uuid,
    pub category: Category,
    pub date: DateTime<Utc>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub completed: bool,
    pub total_volume: f64,
    pub total_sets: usize,
    pub exercise_count: usize,
}

impl From<&Workout> for WorkoutSummary {
    fn from(workout: &Workout) -> Self {
        workout.summary()
    }
}

/// One exercise slot within a workout, referencing a catalogued exercise
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub id: Uuid,
    pub order: usize,
    /// Reference, not ownership; the exercise lives in the catalog
    pub exercise_id: Uuid,
    /// Snapshot of the last performance at creation time, never auto-updated
    pub last_weight: Option<f64>,
    pub last_reps: Option<i32>,
    pub notes: Option<String>,
    /// Exclusively owned, kept in ascending set-number order
    pub sets: Vec<ExerciseSet>,
}

impl WorkoutExercise {
    pub fn new(
        order: usize,
        exercise_id: Uuid,
        last_weight: Option<f64>,
        last_reps: Option<i32>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            order,
            exercise_id,
            last_weight,
            last_reps,
            notes: None,
            sets: Vec::new(),
        }
    }

    /// Append a new set numbered `count + 1`
    pub fn add_set(&mut self, warmup: bool) -> &mut ExerciseSet {
        let number = self.sets.len() as u32 + 1;
        self.sets.push(ExerciseSet::new(number, warmup));
        self.sets.last_mut().unwrap()
    }

    pub fn add_sets(&mut self, count: usize, warmup: bool) {
        for _ in 0..count {
            self.add_set(warmup);
        }
    }

    /// Remove a set and renumber the remainder densely from 1.
    ///
    /// Returns false if no set carries the given id.
    pub fn remove_set(&mut self, set_id: Uuid) -> bool {
        let before = self.sets.len();
        self.sets.retain(|s| s.id != set_id);
        if self.sets.len() == before {
            return false;
        }
        for (index, set) in self.sets.iter_mut().enumerate() {
            set.set_number = index as u32 + 1;
        }
        true
    }

    pub fn completed_set_count(&self) -> usize {
        self.sets.iter().filter(|s| s.completed).count()
    }

    pub fn total_set_count(&self) -> usize {
        self.sets.len()
    }

    /// Volume over completed sets of this exercise
    pub fn total_volume(&self) -> f64 {
        self.sets.iter().filter(|s| s.completed).map(|s| s.volume()).sum()
    }

    /// Heaviest weight among completed sets
    pub fn max_weight_used(&self) -> Option<f64> {
        self.sets
            .iter()
            .filter(|s| s.completed)
            .filter_map(|s| s.weight)
            .fold(None, |acc, w| Some(acc.map_or(w, |m: f64| m.max(w))))
    }

    /// Best reps among completed sets performed at the heaviest weight
    pub fn max_reps_at_max_weight(&self) -> Option<i32> {
        let max_weight = self.max_weight_used()?;
        self.sets
            .iter()
            .filter(|s| s.completed && s.weight == Some(max_weight))
            .filter_map(|s| s.reps)
            .max()
    }

    pub fn is_fully_completed(&self) -> bool {
        !self.sets.is_empty() && self.sets.iter().all(|s| s.completed)
    }
}

/// A single set of weight x reps
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseSet {
    pub id: Uuid,
    /// 1-based, dense within the owning exercise
    pub set_number: u32,
    pub weight: Option<f64>,
    pub reps: Option<i32>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub warmup: bool,
}

impl ExerciseSet {
    pub fn new(set_number: u32, warmup: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            set_number,
            weight: None,
            reps: None,
            completed: false,
            completed_at: None,
            warmup,
        }
    }

    /// Weight x reps, 0 while either is missing
    pub fn volume(&self) -> f64 {
        match (self.weight, self.reps) {
            (Some(w), Some(r)) => w * f64::from(r),
            _ => 0.0,
        }
    }

    /// Mark the set done with the given values
    pub fn complete(&mut self, weight: f64, reps: i32, now: DateTime<Utc>) {
        self.weight = Some(weight);
        self.reps = Some(reps);
        self.completed = true;
        self.completed_at = Some(now);
    }

    /// Flip the set back to incomplete, keeping the entered values for re-editing
    pub fn uncomplete(&mut self) {
        self.completed = false;
        self.completed_at = None;
    }

    /// Update values without touching the completion state
    pub fn update(&mut self, weight: Option<f64>, reps: Option<i32>) {
        self.weight = weight;
        self.reps = reps;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn test_set_numbers_stay_dense_after_removal() {
        let mut we = WorkoutExercise::new(0, Uuid::new_v4(), None, None);
        we.add_sets(4, false);
        let second = we.sets[1].id;

        assert!(we.remove_set(second));

        let numbers: Vec<u32> = we.sets.iter().map(|s| s.set_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);

        we.add_set(true);
        assert_eq!(we.sets.last().unwrap().set_number, 4);
    }

    #[test]
    fn test_remove_unknown_set_is_noop() {
        let mut we = WorkoutExercise::new(0, Uuid::new_v4(), None, None);
        we.add_sets(2, false);

        assert!(!we.remove_set(Uuid::new_v4()));
        assert_eq!(we.total_set_count(), 2);
    }

    #[test]
    fn test_set_volume() {
        let mut set = ExerciseSet::new(1, false);
        assert_eq!(set.volume(), 0.0);

        set.complete(82.5, 8, now());
        assert_eq!(set.volume(), 660.0);
    }

    #[test]
    fn test_uncomplete_keeps_entered_values() {
        let mut set = ExerciseSet::new(1, false);
        set.complete(80.0, 10, now());

        set.uncomplete();

        assert!(!set.completed);
        assert!(set.completed_at.is_none());
        assert_eq!(set.weight, Some(80.0));
        assert_eq!(set.reps, Some(10));
    }

    #[test]
    fn test_max_reps_at_max_weight_not_global_max() {
        let mut we = WorkoutExercise::new(0, Uuid::new_v4(), None, None);
        we.add_sets(3, false);
        we.sets[0].complete(80.0, 12, now());
        we.sets[1].complete(82.5, 8, now());
        we.sets[2].complete(82.5, 6, now());

        assert_eq!(we.max_weight_used(), Some(82.5));
        assert_eq!(we.max_reps_at_max_weight(), Some(8));
    }

    #[test]
    fn test_program_advance_is_cyclic() {
        let mut program = Program::new(
            "PPL",
            vec![Category::Push, Category::Pull, Category::Legs],
            true,
            now(),
        );
        program.current_index = 1;

        for _ in 0..program.total_sessions() {
            program.advance();
        }
        assert_eq!(program.current_index, 1);
    }

    #[test]
    fn test_empty_rotation_has_no_next_session() {
        let mut program = Program::new("empty", vec![], false, now());
        assert_eq!(program.next_session(), None);

        program.advance();
        assert_eq!(program.current_index, 0);
    }

    #[test]
    fn test_workout_duration_uses_now_while_active() {
        let start = now();
        let mut workout = Workout::new(Category::Push, start);

        let later = start + chrono::Duration::minutes(42);
        assert_eq!(workout.duration_minutes(later), 42);

        workout.end_time = Some(start + chrono::Duration::minutes(50));
        workout.completed = true;
        assert_eq!(workout.duration_minutes(later + chrono::Duration::hours(3)), 50);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(Category::parse("PUSH"), Some(Category::Push));
        assert_eq!(Category::parse("mobility"), Some(Category::Mobility));
        assert_eq!(Category::parse("cardio"), None);
    }
}
