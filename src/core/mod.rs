pub mod config;
pub mod error;
pub mod types;

pub use config::{BuffConfig, RotationKind, SimConfig, SpellConfig};
pub use error::{Result, SimError};
pub use types::{BuffId, CooldownId, Damage, SpellId, Tick};
