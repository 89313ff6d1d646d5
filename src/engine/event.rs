//! Event handles and lifecycle states

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Lifecycle of a queued event
///
/// Transitions are one-way: `Created -> Scheduled -> Executed | Cancelled`.
/// An executed or cancelled event is discarded and never scheduled again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum EventState {
    Created,
    Scheduled,
    Executed,
    Cancelled,
}

impl EventState {
    /// Returns true once the event can no longer fire
    pub fn is_finished(&self) -> bool {
        matches!(self, EventState::Executed | EventState::Cancelled)
    }
}

/// Handle to an event stored in an [`EventQueue`](super::EventQueue)
///
/// The generation distinguishes successive events that reuse the same slot,
/// so a handle kept after its event finished can never touch a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "event#{}.{}", index, generation)]
pub struct EventId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished_states() {
        assert!(!EventState::Created.is_finished());
        assert!(!EventState::Scheduled.is_finished());
        assert!(EventState::Executed.is_finished());
        assert!(EventState::Cancelled.is_finished());
    }

    #[test]
    fn test_handles_differ_by_generation() {
        let a = EventId {
            index: 2,
            generation: 0,
        };
        let b = EventId {
            index: 2,
            generation: 1,
        };
        assert_ne!(a, b);
        assert_eq!(b.to_string(), "event#2.1");
    }
}
