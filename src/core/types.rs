//! Core type definitions used throughout the codebase

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Simulation tick (one tick is modelled as one millisecond)
pub type Tick = u64;

/// Damage amount dealt by a single spell execution
pub type Damage = u64;

/// Global cooldown applied by spells that don't override it
pub const DEFAULT_GLOBAL_COOLDOWN: Tick = 1500;

/// Delay before the cast loop retries when nothing could be cast
pub const DEFAULT_READY_BACKOFF: Tick = 100;

/// Index of a spell inside a loadout
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize,
)]
#[display(fmt = "spell#{}", _0)]
pub struct SpellId(pub usize);

/// Index of a buff inside a loadout
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize,
)]
#[display(fmt = "buff#{}", _0)]
pub struct BuffId(pub usize);

/// Index of a cooldown inside a loadout
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize,
)]
#[display(fmt = "cooldown#{}", _0)]
pub struct CooldownId(pub usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(SpellId(3).to_string(), "spell#3");
        assert_eq!(BuffId(0).to_string(), "buff#0");
        assert_eq!(CooldownId::from(7).to_string(), "cooldown#7");
    }

    #[test]
    fn test_ids_order_by_index() {
        assert!(SpellId(1) < SpellId(2));
        assert_eq!(BuffId(4), BuffId::from(4));
    }
}
