//! Rest interval countdown between sets.
//!
//! The timer is a plain state machine; the host schedules `tick()` once
//! per second (the CLI does it from a thread, tests call it directly).
//! It owns no relationship to sets or workouts — a completed set merely
//! starts it by convention.

use crate::{Event, EventSink};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerState {
    Stopped,
    Running,
    Paused,
    Expired,
}

/// Countdown timer with pause/resume/extend/reset semantics
pub struct RestTimer {
    state: TimerState,
    total_seconds: u32,
    remaining_seconds: u32,
    sink: Arc<dyn EventSink>,
}

impl RestTimer {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            state: TimerState::Stopped,
            total_seconds: 0,
            remaining_seconds: 0,
            sink,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    /// Fraction of the interval already elapsed, 0 when nothing started
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        1.0 - f64::from(self.remaining_seconds) / f64::from(self.total_seconds)
    }

    /// Begin a fresh countdown over the given duration
    pub fn start(&mut self, duration_seconds: u32) {
        self.total_seconds = duration_seconds;
        self.remaining_seconds = duration_seconds;
        self.state = TimerState::Running;
        tracing::debug!(seconds = duration_seconds, "Rest timer started");
    }

    /// Halt the countdown without losing the remaining time
    pub fn pause(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Paused;
        }
    }

    /// Continue a paused countdown; no-op once the time is gone
    pub fn resume(&mut self) {
        if self.state == TimerState::Paused && self.remaining_seconds > 0 {
            self.state = TimerState::Running;
        }
    }

    /// Extend both remaining and total time; valid whenever not stopped
    pub fn add_time(&mut self, seconds: u32) {
        if self.state == TimerState::Stopped {
            return;
        }
        self.remaining_seconds += seconds;
        self.total_seconds += seconds;
        // Adding time to an expired timer puts it back to work
        if self.state == TimerState::Expired {
            self.state = TimerState::Running;
        }
    }

    /// Restore the full interval and restart the countdown
    pub fn reset(&mut self) {
        if self.state == TimerState::Stopped {
            return;
        }
        self.remaining_seconds = self.total_seconds;
        self.state = TimerState::Running;
    }

    /// Cancel the countdown from any state; idempotent
    pub fn stop(&mut self) {
        self.state = TimerState::Stopped;
        self.remaining_seconds = 0;
        self.total_seconds = 0;
    }

    /// One second elapsed. Emits a tick; reaching zero transitions to
    /// `Expired` and emits the expiry notification exactly once.
    pub fn tick(&mut self) {
        if self.state != TimerState::Running || self.remaining_seconds == 0 {
            return;
        }

        self.remaining_seconds -= 1;
        self.sink.emit(&Event::TimerTick {
            remaining: self.remaining_seconds,
        });

        if self.remaining_seconds == 0 {
            self.state = TimerState::Expired;
            self.sink.emit(&Event::TimerExpired);
            tracing::debug!("Rest timer expired");
        }
    }
}
