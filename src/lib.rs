//! Rotation Sim - discrete-event combat rotation simulator

pub mod core;
pub mod engine;
pub mod rotation;

pub use crate::core::{Result, SimConfig, SimError, Tick};
pub use crate::rotation::{Sim, SimReport};
