//! Discrete-event engine: a monotonic clock driven by a time-ordered queue

pub mod event;
pub mod queue;

pub use event::{EventId, EventState};
pub use queue::EventQueue;
