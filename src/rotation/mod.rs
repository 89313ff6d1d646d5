//! Combat rotation simulator
//!
//! Spells, buffs and cooldowns wired to the event engine, plus the cast loop
//! that drives them.

pub mod buff;
pub mod context;
pub mod cooldown;
pub mod loadout;
pub mod log;
pub mod policy;
pub mod report;
pub mod sim;
pub mod spell;
pub mod stats;

pub use buff::Buff;
pub use context::{SimContext, SimEvent};
pub use cooldown::Cooldown;
pub use loadout::{Loadout, SpellSlot};
pub use log::CombatLog;
pub use policy::{FixedRotation, PriorityRotation, Rotation};
pub use report::{SimReport, SourceReport};
pub use sim::{CastPhase, Sim};
pub use spell::{BasicSpell, ChargedSpell, Spell};
pub use stats::DamageMeter;
