//! Performance aggregation over completed sets.
//!
//! Derives an append-only [`PerformanceRecord`] from an exercise's
//! completed work in a session, and answers progression questions
//! (personal best, progression percentage, did-this-improve) from the
//! historical records.

use crate::{Exercise, PerformanceRecord, WorkoutExercise};
use chrono::{DateTime, Utc};

/// Aggregate the completed sets of a workout exercise into a record.
///
/// Returns `None` when no set is completed; an exercise with no
/// completed work produces no history entry.
pub fn derive_record(
    workout_exercise: &WorkoutExercise,
    now: DateTime<Utc>,
) -> Option<PerformanceRecord> {
    let completed: Vec<_> = workout_exercise.sets.iter().filter(|s| s.completed).collect();
    if completed.is_empty() {
        return None;
    }

    let max_weight = completed
        .iter()
        .filter_map(|s| s.weight)
        .fold(0.0_f64, f64::max);

    // Best reps at the heaviest weight used, not the global max reps
    let max_reps = completed
        .iter()
        .filter(|s| s.weight == Some(max_weight))
        .filter_map(|s| s.reps)
        .max()
        .unwrap_or(0);

    let total_volume: f64 = completed.iter().map(|s| s.volume()).sum();

    Some(PerformanceRecord::new(
        now,
        max_weight,
        max_reps,
        total_volume,
        completed.len(),
    ))
}

/// Heaviest weight ever recorded for the exercise
pub fn personal_best(exercise: &Exercise) -> Option<f64> {
    exercise
        .performance_records
        .iter()
        .map(|r| r.max_weight)
        .fold(None, |acc, w| Some(acc.map_or(w, |m: f64| m.max(w))))
}

/// Percent change in max weight from the earliest record to the latest.
///
/// Needs at least two records ordered by date; `None` when the earliest
/// record's weight is 0 (division guard).
pub fn progression_percent(exercise: &Exercise) -> Option<f64> {
    let mut records: Vec<_> = exercise.performance_records.iter().collect();
    if records.len() < 2 {
        return None;
    }
    records.sort_by_key(|r| r.date);

    let first = records.first()?;
    let last = records.last()?;
    if first.max_weight <= 0.0 {
        return None;
    }

    Some((last.max_weight - first.max_weight) / first.max_weight * 100.0)
}

/// Whether the given weight x reps beats the last recorded best-set volume.
///
/// A first attempt always counts as progress.
pub fn has_progressed(exercise: &Exercise, current_weight: f64, current_reps: i32) -> bool {
    let Some(last) = exercise.last_performance() else {
        return true;
    };

    let current_volume = current_weight * f64::from(current_reps);
    let last_volume = last.max_weight * f64::from(last.max_reps);
    current_volume > last_volume
}
