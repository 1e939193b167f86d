//! CSV rollup for archiving logged workouts.
//!
//! Converts the workout WAL into append-only CSV summary rows. The CSV
//! keeps what statistics and session suggestion need (category, date,
//! completion, totals); per-set detail lives only in the WAL.

use crate::{Category, Result, Workout};
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
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

impl From<&Workout> for CsvRow {
    fn from(workout: &Workout) -> Self {
        CsvRow {
            id: workout.id.to_string(),
            category: workout.category,
            date: workout.date.to_rfc3339(),
            start_time: workout.start_time.to_rfc3339(),
            end_time: workout.end_time.map(|t| t.to_rfc3339()),
            completed: workout.completed,
            total_volume: workout.total_volume(),
            total_sets: workout.total_sets(),
            exercise_count: workout.exercise_count(),
        }
    }
}

/// Roll up WAL workouts into CSV and archive the WAL atomically
///
/// This function:
/// 1. Reads all workouts from the WAL
/// 2. Appends summary rows to the CSV file (creates with headers if needed)
/// 3. Syncs the CSV to disk
/// 4. Renames the WAL to .processed
/// 5. Returns the number of workouts processed
///
/// # Safety
/// - CSV is fsynced before the WAL is renamed
/// - The WAL is renamed (not deleted) to allow manual recovery if needed
pub fn wal_to_csv_and_archive(wal_path: &Path, csv_path: &Path) -> Result<usize> {
    let workouts = crate::wal::read_workouts(wal_path)?;

    if workouts.is_empty() {
        tracing::info!("No workouts in WAL to roll up");
        return Ok(0);
    }

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    for workout in &workouts {
        writer.serialize(CsvRow::from(workout))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Wrote {} workouts to CSV", workouts.len());

    let processed_path = wal_path.with_extension("wal.processed");
    std::fs::rename(wal_path, &processed_path)?;

    tracing::info!("Archived WAL to {:?}", processed_path);

    Ok(workouts.len())
}

/// Remove all .wal.processed files in the given directory
pub fn cleanup_processed_wals(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if let Some(extension) = path.extension() {
            if extension == "processed" {
                std::fs::remove_file(&path)?;
                tracing::debug!("Removed processed WAL: {:?}", path);
                count += 1;
            }
        }
    }

    if count > 0 {
        tracing::info!("Cleaned up {} processed WAL files", count);
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wal::WorkoutSink;
    use chrono::Utc;
    use std::fs::File;

    fn completed_workout(category: Category) -> Workout {
        let now = Utc::now();
        let mut workout = Workout::new(category, now);
        let slot = workout.add_exercise(uuid::Uuid::new_v4(), None, None);
        slot.add_sets(3, false);
        slot.sets[0].complete(100.0, 5, now);
        workout.completed = true;
        workout.end_time = Some(now);
        workout
    }

    #[test]
    fn test_wal_to_csv_creates_and_archives() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("workouts.wal");
        let csv_path = temp_dir.path().join("workouts.csv");

        let mut sink = crate::wal::JsonlSink::new(&wal_path);
        for category in [Category::Push, Category::Pull, Category::Legs] {
            sink.append(&completed_workout(category)).unwrap();
        }

        let count = wal_to_csv_and_archive(&wal_path, &csv_path).unwrap();
        assert_eq!(count, 3);

        assert!(csv_path.exists());
        assert!(!wal_path.exists());
        assert!(wal_path.with_extension("wal.processed").exists());
    }

    #[test]
    fn test_wal_to_csv_appends_across_rollups() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("workouts.wal");
        let csv_path = temp_dir.path().join("workouts.csv");

        let mut sink = crate::wal::JsonlSink::new(&wal_path);
        sink.append(&completed_workout(Category::Push)).unwrap();
        assert_eq!(wal_to_csv_and_archive(&wal_path, &csv_path).unwrap(), 1);

        let mut sink = crate::wal::JsonlSink::new(&wal_path);
        sink.append(&completed_workout(Category::Pull)).unwrap();
        assert_eq!(wal_to_csv_and_archive(&wal_path, &csv_path).unwrap(), 1);

        let reader = csv::Reader::from_path(&csv_path).unwrap();
        assert_eq!(reader.into_records().count(), 2);
    }

    #[test]
    fn test_empty_wal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("empty.wal");
        let csv_path = temp_dir.path().join("workouts.csv");

        File::create(&wal_path).unwrap();

        assert_eq!(wal_to_csv_and_archive(&wal_path, &csv_path).unwrap(), 0);
    }

    #[test]
    fn test_cleanup_processed_wals() {
        let temp_dir = tempfile::tempdir().unwrap();

        File::create(temp_dir.path().join("w1.wal.processed")).unwrap();
        File::create(temp_dir.path().join("w2.wal.processed")).unwrap();
        File::create(temp_dir.path().join("keep.wal")).unwrap();

        assert_eq!(cleanup_processed_wals(temp_dir.path()).unwrap(), 2);
        assert!(temp_dir.path().join("keep.wal").exists());
    }
}
