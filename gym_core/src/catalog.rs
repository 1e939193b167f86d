//! Starter exercise catalog.
//!
//! Seeds a fresh data directory with a basic set of exercises per
//! category so the first `gymtrack start` has something to work with.

use crate::{Category, Exercise, MuscleGroup};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

/// Seed table: name, category, muscle group
static STARTER_EXERCISES: Lazy<Vec<(&'static str, Category, MuscleGroup)>> = Lazy::new(|| {
    vec![
        // Push
        ("Bench press", Category::Push, MuscleGroup::Chest),
        ("Overhead press", Category::Push, MuscleGroup::Shoulders),
        ("Incline dumbbell press", Category::Push, MuscleGroup::Chest),
        ("Triceps dips", Category::Push, MuscleGroup::Triceps),
        // Pull
        ("Deadlift", Category::Pull, MuscleGroup::Back),
        ("Barbell row", Category::Pull, MuscleGroup::Back),
        ("Pull-up", Category::Pull, MuscleGroup::Back),
        ("Biceps curl", Category::Pull, MuscleGroup::Biceps),
        // Legs
        ("Back squat", Category::Legs, MuscleGroup::Quadriceps),
        ("Romanian deadlift", Category::Legs, MuscleGroup::Hamstrings),
        ("Hip thrust", Category::Legs, MuscleGroup::Glutes),
        ("Standing calf raise", Category::Legs, MuscleGroup::Calves),
        // JJB
        ("Sprawl drill", Category::Jjb, MuscleGroup::FullBody),
        ("Bridge escape", Category::Jjb, MuscleGroup::Core),
        // Mobility
        ("Hip opener", Category::Mobility, MuscleGroup::FullBody),
        ("Thoracic rotation", Category::Mobility, MuscleGroup::Core),
    ]
});

/// Build the starter exercises with no performance history
pub fn build_default_exercises(now: DateTime<Utc>) -> Vec<Exercise> {
    STARTER_EXERCISES
        .iter()
        .map(|(name, category, muscle_group)| Exercise::new(*name, *category, *muscle_group, now))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_is_seeded() {
        let exercises = build_default_exercises(Utc::now());
        for category in Category::ALL {
            assert!(
                exercises.iter().any(|e| e.category == category),
                "no starter exercise for {:?}",
                category
            );
        }
    }

    #[test]
    fn test_muscle_groups_match_their_category() {
        for exercise in build_default_exercises(Utc::now()) {
            assert!(
                MuscleGroup::for_category(exercise.category).contains(&exercise.muscle_group),
                "{} has muscle group outside its category",
                exercise.name
            );
        }
    }

    #[test]
    fn test_names_are_unique() {
        let exercises = build_default_exercises(Utc::now());
        let mut names: Vec<&str> = exercises.iter().map(|e| e.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), exercises.len());
    }
}
