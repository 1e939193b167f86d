#![forbid(unsafe_code)]

//! Core domain model and business logic for the GymTrack system.
//!
//! This crate provides:
//! - Domain types (exercises, programs, workouts, sets, performance records)
//! - The workout session state machine
//! - Performance aggregation and progression analysis
//! - Program rotation and next-session suggestion
//! - Weekly statistics and streaks
//! - The rest timer
//! - Persistence primitives (WAL, state snapshot, CSV rollup, history window)

pub mod types;
pub mod error;
pub mod clock;
pub mod events;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod performance;
pub mod rotation;
pub mod stats;
pub mod session;
pub mod timer;
pub mod store;
pub mod wal;
pub mod state;
pub mod csv_rollup;
pub mod history;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use clock::{Clock, ManualClock, SystemClock};
pub use events::{Event, EventSink, MemorySink, NullSink};
pub use catalog::build_default_exercises;
pub use config::Config;
pub use rotation::{activate_program, suggest_next_session, validate_program, DEFAULT_ROTATION};
pub use session::{SessionConfig, SessionState, WorkoutSession};
pub use timer::{RestTimer, TimerState};
pub use store::{MemoryStore, Store};
pub use state::GymState;
pub use wal::{JsonlSink, WorkoutSink};
pub use history::load_recent_workouts;
