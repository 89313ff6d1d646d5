//! Shared simulation context
//!
//! Everything a component may touch while an event runs lives here, owned by
//! exactly one `Sim`: the event queue (and with it the clock), damage
//! statistics, the combat log and the RNG.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::types::{BuffId, Tick};
use crate::engine::EventQueue;
use crate::rotation::log::CombatLog;
use crate::rotation::stats::DamageMeter;

/// Work carried by events on the simulation queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    /// The cast loop may start a new cast
    BeginCast,
    /// The spell being cast lands
    FinishCast,
    /// A buff runs out
    BuffExpired(BuffId),
}

#[derive(Debug)]
pub struct SimContext {
    pub events: EventQueue<SimEvent>,
    pub stats: DamageMeter,
    pub log: CombatLog,
    pub rng: ChaCha8Rng,
}

impl SimContext {
    pub fn new(log: CombatLog, seed: u64) -> Self {
        Self {
            events: EventQueue::new(),
            stats: DamageMeter::new(),
            log,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn now(&self) -> Tick {
        self.events.now()
    }

    /// Write a combat log line stamped with the current time
    pub fn message(&mut self, text: impl AsRef<str>) {
        let now = self.events.now();
        self.log.message(now, text);
    }
}
