//! Weekly session statistics and training streaks.
//!
//! All functions operate over a caller-supplied window of workout
//! summaries and an explicit "now"; nothing here queries the store or
//! the wall clock.

use crate::WorkoutSummary;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use std::collections::HashSet;

/// Monday 00:00 UTC of the week containing `now`
pub fn start_of_week(now: DateTime<Utc>) -> DateTime<Utc> {
    let date = now.date_naive();
    let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    monday.and_hms_opt(0, 0, 0).unwrap().and_utc()
}

fn this_week<'a>(
    workouts: &'a [WorkoutSummary],
    now: DateTime<Utc>,
) -> impl Iterator<Item = &'a WorkoutSummary> {
    let cutoff = start_of_week(now);
    workouts.iter().filter(move |w| w.completed && w.date >= cutoff)
}

/// Completed workouts since the start of the current week
pub fn workouts_this_week(workouts: &[WorkoutSummary], now: DateTime<Utc>) -> usize {
    this_week(workouts, now).count()
}

/// Total volume lifted since the start of the current week
pub fn volume_this_week(workouts: &[WorkoutSummary], now: DateTime<Utc>) -> f64 {
    this_week(workouts, now).map(|w| w.total_volume).sum()
}

/// Completed sets since the start of the current week
pub fn sets_this_week(workouts: &[WorkoutSummary], now: DateTime<Utc>) -> usize {
    this_week(workouts, now).map(|w| w.total_sets).sum()
}

/// Count consecutive calendar days with at least one completed workout,
/// walking backward from `today`.
///
/// A day without a workout for `today` itself does not zero the streak;
/// the walk simply starts from yesterday. The first fully empty day
/// before that stops the count.
pub fn current_streak(workouts: &[WorkoutSummary], today: NaiveDate) -> u32 {
    let trained_days: HashSet<NaiveDate> = workouts
        .iter()
        .filter(|w| w.completed)
        .map(|w| w.date.date_naive())
        .collect();

    if trained_days.is_empty() {
        return 0;
    }

    let mut day = today;
    if !trained_days.contains(&day) {
        day -= Duration::days(1);
    }

    let mut streak = 0;
    while trained_days.contains(&day) {
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, Workout};
    use chrono::Weekday;

    fn completed_on(date: DateTime<Utc>) -> WorkoutSummary {
        let mut workout = Workout::new(Category::Push, date);
        workout.completed = true;
        workout.end_time = Some(date);
        workout.summary()
    }

    fn wednesday_noon() -> DateTime<Utc> {
        // 2024-01-17 was a Wednesday
        let date = NaiveDate::from_ymd_opt(2024, 1, 17).unwrap();
        assert_eq!(date.weekday(), Weekday::Wed);
        date.and_hms_opt(12, 0, 0).unwrap().and_utc()
    }

    #[test]
    fn test_start_of_week_is_monday_midnight() {
        let monday = start_of_week(wednesday_noon());
        assert_eq!(monday.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(monday.time(), chrono::NaiveTime::MIN);
    }

    #[test]
    fn test_weekly_stats_exclude_last_week_and_incomplete() {
        let now = wednesday_noon();

        let incomplete = Workout::new(Category::Pull, now - Duration::hours(2)).summary();

        let mut this_week = Workout::new(Category::Push, now - Duration::days(1));
        let slot = this_week.add_exercise(uuid::Uuid::new_v4(), None, None);
        slot.add_sets(2, false);
        slot.sets[0].complete(100.0, 5, now);
        slot.sets[1].complete(100.0, 5, now);
        this_week.completed = true;
        this_week.end_time = Some(this_week.date);
        let this_week = this_week.summary();

        let last_week = completed_on(now - Duration::days(7));

        let workouts = vec![incomplete, this_week, last_week];

        assert_eq!(workouts_this_week(&workouts, now), 1);
        assert_eq!(volume_this_week(&workouts, now), 1000.0);
        assert_eq!(sets_this_week(&workouts, now), 2);
    }

    #[test]
    fn test_streak_empty_history() {
        assert_eq!(current_streak(&[], Utc::now().date_naive()), 0);
    }

    #[test]
    fn test_streak_counts_consecutive_days() {
        let now = wednesday_noon();
        let workouts = vec![
            completed_on(now),
            completed_on(now - Duration::days(1)),
            completed_on(now - Duration::days(2)),
        ];

        assert_eq!(current_streak(&workouts, now.date_naive()), 3);
    }

    #[test]
    fn test_streak_survives_a_missing_today() {
        let now = wednesday_noon();
        let workouts = vec![
            completed_on(now - Duration::days(1)),
            completed_on(now - Duration::days(2)),
        ];

        assert_eq!(current_streak(&workouts, now.date_naive()), 2);
    }

    #[test]
    fn test_streak_breaks_on_gap() {
        let now = wednesday_noon();
        let workouts = vec![
            completed_on(now),
            // Gap at day -1
            completed_on(now - Duration::days(2)),
            completed_on(now - Duration::days(3)),
        ];

        assert_eq!(current_streak(&workouts, now.date_naive()), 1);
    }

    #[test]
    fn test_streak_ignores_incomplete_workouts() {
        let now = wednesday_noon();
        let cancelled = Workout::new(Category::Legs, now).summary();

        assert_eq!(current_streak(&[cancelled], now.date_naive()), 0);
    }
}
