//! Fire-and-forget notification events.
//!
//! The session state machine and the rest timer emit discrete events
//! through an [`EventSink`]; how a host renders them (haptics, sound,
//! terminal output) is out of scope for the core.

use std::sync::Mutex;

/// Discrete event kinds emitted by the core
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    SetCompleted,
    TimerTick { remaining: u32 },
    TimerExpired,
    WorkoutCompleted,
    SelectionChanged,
    Error,
    Warning,
}

/// Fire-and-forget channel for events; implementations must not block
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &Event);
}

/// Sink that drops every event
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &Event) {}
}

/// Sink that records events in order, for assertions in tests
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Event>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, event: &Event) -> usize {
        self.events.lock().unwrap().iter().filter(|e| *e == event).count()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &Event) {
        self.events.lock().unwrap().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.emit(&Event::SetCompleted);
        sink.emit(&Event::TimerTick { remaining: 89 });

        assert_eq!(
            sink.events(),
            vec![Event::SetCompleted, Event::TimerTick { remaining: 89 }]
        );
    }
}
