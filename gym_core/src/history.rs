//! Workout history loading over a recent-day window.
//!
//! Merges the workout WAL (full aggregates, summarized) with the CSV
//! archive (summary rows) to hand the stats and suggestion engines a
//! deduplicated, newest-first window.

use crate::{Category, Result, WorkoutSummary};
use chrono::{DateTime, Duration, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use uuid::Uuid;

/// CSV row format for reading archived workouts
#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    category: Category,
    date: String,
    start_time: String,
    end_time: Option<String>,
    completed: bool,
    total_volume: f64,
    total_sets: usize,
    exercise_count: usize,
}

impl TryFrom<CsvRow> for WorkoutSummary {
    type Error = crate::Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| crate::Error::Other(format!("Invalid UUID: {}", e)))?;

        let date = DateTime::parse_from_rfc3339(&row.date)
            .map_err(|e| crate::Error::Other(format!("Invalid date: {}", e)))?
            .with_timezone(&Utc);

        let start_time = DateTime::parse_from_rfc3339(&row.start_time)
            .map_err(|e| crate::Error::Other(format!("Invalid date: {}", e)))?
            .with_timezone(&Utc);

        let end_time = row
            .end_time
            .as_ref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(WorkoutSummary {
            id,
            category: row.category,
            date,
            start_time,
            end_time,
            completed: row.completed,
            total_volume: row.total_volume,
            total_sets: row.total_sets,
            exercise_count: row.exercise_count,
        })
    }
}

/// Load workouts from the last N days from both WAL and CSV.
///
/// Returns summaries sorted by date (newest first), deduplicating
/// workouts that appear in both WAL and CSV.
pub fn load_recent_workouts(
    wal_path: &Path,
    csv_path: &Path,
    days: i64,
    now: DateTime<Utc>,
) -> Result<Vec<WorkoutSummary>> {
    let cutoff = now - Duration::days(days);
    let mut workouts = Vec::new();
    let mut seen_ids = HashSet::new();

    // Load from WAL first (most recent)
    if wal_path.exists() {
        for workout in crate::wal::read_workouts(wal_path)? {
            if workout.date >= cutoff {
                seen_ids.insert(workout.id);
                workouts.push(workout.summary());
            }
        }
        tracing::debug!("Loaded {} workouts from WAL", workouts.len());
    }

    // Load from CSV (archived)
    if csv_path.exists() {
        let mut csv_count = 0;
        for summary in load_summaries_from_csv(csv_path)? {
            if summary.date >= cutoff && !seen_ids.contains(&summary.id) {
                seen_ids.insert(summary.id);
                workouts.push(summary);
                csv_count += 1;
            }
        }
        tracing::debug!("Loaded {} workouts from CSV", csv_count);
    }

    workouts.sort_by(|a, b| b.date.cmp(&a.date));

    tracing::info!("Loaded {} total workouts from last {} days", workouts.len(), days);

    Ok(workouts)
}

fn load_summaries_from_csv(path: &Path) -> Result<Vec<WorkoutSummary>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut summaries = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        match result {
            Ok(row) => match WorkoutSummary::try_from(row) {
                Ok(summary) => summaries.push(summary),
                Err(e) => {
                    tracing::warn!("Failed to parse CSV row: {}", e);
                }
            },
            Err(e) => {
                tracing::warn!("Failed to deserialize CSV row: {}", e);
            }
        }
    }

    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wal::WorkoutSink;
    use crate::Workout;

    fn workout_days_ago(category: Category, days_ago: i64) -> Workout {
        let date = Utc::now() - Duration::days(days_ago);
        let mut workout = Workout::new(category, date);
        let slot = workout.add_exercise(Uuid::new_v4(), None, None);
        slot.add_sets(2, false);
        slot.sets[0].complete(60.0, 10, date);
        workout.completed = true;
        workout.end_time = Some(date);
        workout
    }

    #[test]
    fn test_window_filters_old_workouts() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("workouts.wal");
        let csv_path = temp_dir.path().join("workouts.csv");

        let mut sink = crate::wal::JsonlSink::new(&wal_path);
        sink.append(&workout_days_ago(Category::Push, 1)).unwrap();
        sink.append(&workout_days_ago(Category::Pull, 3)).unwrap();
        sink.append(&workout_days_ago(Category::Legs, 40)).unwrap(); // too old

        let workouts = load_recent_workouts(&wal_path, &csv_path, 30, Utc::now()).unwrap();
        assert_eq!(workouts.len(), 2);
    }

    #[test]
    fn test_deduplication_across_wal_and_csv() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("workouts.wal");
        let csv_path = temp_dir.path().join("workouts.csv");

        let workout = workout_days_ago(Category::Push, 1);
        let workout_id = workout.id;
        let mut sink = crate::wal::JsonlSink::new(&wal_path);
        sink.append(&workout).unwrap();

        // Roll up to CSV, then write the same workout to a fresh WAL
        crate::csv_rollup::wal_to_csv_and_archive(&wal_path, &csv_path).unwrap();
        let mut sink = crate::wal::JsonlSink::new(&wal_path);
        sink.append(&workout).unwrap();

        let workouts = load_recent_workouts(&wal_path, &csv_path, 30, Utc::now()).unwrap();

        let count = workouts.iter().filter(|w| w.id == workout_id).count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_csv_summaries_keep_totals() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("workouts.wal");
        let csv_path = temp_dir.path().join("workouts.csv");

        let mut sink = crate::wal::JsonlSink::new(&wal_path);
        sink.append(&workout_days_ago(Category::Push, 2)).unwrap();
        crate::csv_rollup::wal_to_csv_and_archive(&wal_path, &csv_path).unwrap();

        let workouts = load_recent_workouts(&wal_path, &csv_path, 30, Utc::now()).unwrap();

        assert_eq!(workouts.len(), 1);
        assert_eq!(workouts[0].total_volume, 600.0);
        assert_eq!(workouts[0].total_sets, 1);
        assert!(workouts[0].completed);
    }

    #[test]
    fn test_workouts_sorted_newest_first() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("workouts.wal");
        let csv_path = temp_dir.path().join("workouts.csv");

        let mut sink = crate::wal::JsonlSink::new(&wal_path);
        sink.append(&workout_days_ago(Category::Pull, 5)).unwrap();
        sink.append(&workout_days_ago(Category::Push, 1)).unwrap();

        let workouts = load_recent_workouts(&wal_path, &csv_path, 30, Utc::now()).unwrap();

        assert_eq!(workouts[0].category, Category::Push);
        assert_eq!(workouts[1].category, Category::Pull);
    }
}
