//! Program rotation and next-session suggestion.
//!
//! An active program dictates the next session via its rotation cursor.
//! Without one, suggestion falls back to a fixed Push -> Pull -> Legs
//! rotation keyed off the most recent completed workout.

use crate::{Category, Error, Program, Result, WorkoutSummary};
use uuid::Uuid;

/// Fallback rotation used when no program is active
pub const DEFAULT_ROTATION: [Category; 3] = [Category::Push, Category::Pull, Category::Legs];

/// Suggest the next session category.
///
/// `recent_workouts` must be sorted newest first, the order the store
/// and history loader return them in.
pub fn suggest_next_session(
    active_program: Option<&Program>,
    recent_workouts: &[WorkoutSummary],
) -> Option<Category> {
    if let Some(program) = active_program {
        tracing::debug!(program = %program.name, "Suggesting from active program");
        return program.next_session();
    }
    suggest_from_history(recent_workouts)
}

fn suggest_from_history(recent_workouts: &[WorkoutSummary]) -> Option<Category> {
    let Some(last) = recent_workouts.iter().find(|w| w.completed) else {
        // No history at all: start the default rotation from the top
        return Some(DEFAULT_ROTATION[0]);
    };

    match DEFAULT_ROTATION.iter().position(|c| *c == last.category) {
        Some(index) => Some(DEFAULT_ROTATION[(index + 1) % DEFAULT_ROTATION.len()]),
        // Last session was outside the fixed rotation (JJB, mobility)
        None => Some(DEFAULT_ROTATION[0]),
    }
}

/// Activate one program and deactivate every other.
///
/// Returns `NotFound` when no program carries the given id; in that case
/// no program's flag is touched.
pub fn activate_program(programs: &mut [Program], id: Uuid) -> Result<()> {
    if !programs.iter().any(|p| p.id == id) {
        return Err(Error::NotFound(format!("program {id}")));
    }
    for program in programs.iter_mut() {
        program.is_active = program.id == id;
    }
    tracing::info!(%id, "Activated program");
    Ok(())
}

/// Validate program input before creation or update
pub fn validate_program(name: &str, rotation: &[Category]) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation("program name is empty".into()));
    }
    if rotation.is_empty() {
        return Err(Error::Validation("program rotation is empty".into()));
    }
    Ok(())
}
