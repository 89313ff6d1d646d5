//! Spells: castable actions with cast time, global cooldown and damage
//!
//! `Spell` is the capability the cast loop needs. Variants only override the
//! hooks they care about; cast progress itself lives in the `Sim`.

use std::fmt::Debug;

use rand::Rng;

use crate::core::config::SpellConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{Damage, Tick, DEFAULT_GLOBAL_COOLDOWN};
use crate::rotation::context::SimContext;

pub trait Spell: Debug {
    fn name(&self) -> &str;

    /// Whether the spell can be cast right now
    fn ready(&self, _ctx: &SimContext) -> bool {
        true
    }

    fn cast_time(&self) -> Tick;

    /// Damage of one hit; may draw from the context RNG
    fn damage(&self, ctx: &mut SimContext) -> Damage;

    fn global_cooldown(&self) -> Tick {
        DEFAULT_GLOBAL_COOLDOWN
    }

    /// Land the spell: compute damage and record it
    fn execute(&mut self, ctx: &mut SimContext) -> Result<Damage> {
        let damage = self.damage(ctx);
        ctx.stats.add(self.name(), damage);
        ctx.message(format!("{} executes, hitting the enemy for {} damage", self.name(), damage));
        Ok(damage)
    }

    /// Restore per-run state (charges, resources)
    fn reset(&mut self) {}
}

/// Build the spell variant described by a config entry
pub fn from_config(config: &SpellConfig) -> Box<dyn Spell> {
    let basic = BasicSpell::new(config.name.clone(), config.cast_time, config.damage)
        .with_variance(config.variance)
        .with_global_cooldown(config.global_cooldown);

    match config.charges {
        Some(charges) => Box::new(ChargedSpell::new(basic, charges)),
        None => Box::new(basic),
    }
}

/// Spell with a fixed cast time and (optionally varying) damage
#[derive(Debug, Clone)]
pub struct BasicSpell {
    name: String,
    cast_time: Tick,
    damage: Damage,
    variance: Damage,
    global_cooldown: Tick,
}

impl BasicSpell {
    pub fn new(name: impl Into<String>, cast_time: Tick, damage: Damage) -> Self {
        Self {
            name: name.into(),
            cast_time,
            damage,
            variance: 0,
            global_cooldown: DEFAULT_GLOBAL_COOLDOWN,
        }
    }

    /// 1.5s cast for 100 damage
    pub fn test_spell() -> Self {
        Self::new("Test Spell", 1500, 100)
    }

    pub fn with_variance(mut self, variance: Damage) -> Self {
        self.variance = variance;
        self
    }

    pub fn with_global_cooldown(mut self, global_cooldown: Tick) -> Self {
        self.global_cooldown = global_cooldown;
        self
    }
}

impl Spell for BasicSpell {
    fn name(&self) -> &str {
        &self.name
    }

    fn cast_time(&self) -> Tick {
        self.cast_time
    }

    fn damage(&self, ctx: &mut SimContext) -> Damage {
        if self.variance == 0 {
            return self.damage;
        }
        let low = self.damage.saturating_sub(self.variance);
        let high = self.damage.saturating_add(self.variance);
        ctx.rng.gen_range(low..=high)
    }

    fn global_cooldown(&self) -> Tick {
        self.global_cooldown
    }
}

/// Spell limited to a number of casts per run
#[derive(Debug, Clone)]
pub struct ChargedSpell {
    inner: BasicSpell,
    max_charges: u32,
    charges: u32,
}

impl ChargedSpell {
    pub fn new(inner: BasicSpell, max_charges: u32) -> Self {
        Self {
            inner,
            max_charges,
            charges: max_charges,
        }
    }

    pub fn charges(&self) -> u32 {
        self.charges
    }
}

impl Spell for ChargedSpell {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn ready(&self, _ctx: &SimContext) -> bool {
        self.charges > 0
    }

    fn cast_time(&self) -> Tick {
        self.inner.cast_time()
    }

    fn damage(&self, ctx: &mut SimContext) -> Damage {
        self.inner.damage(ctx)
    }

    fn global_cooldown(&self) -> Tick {
        self.inner.global_cooldown()
    }

    fn execute(&mut self, ctx: &mut SimContext) -> Result<Damage> {
        if self.charges == 0 {
            return Err(SimError::InvalidState(format!(
                "'{}' executed with no charges left",
                self.name()
            )));
        }
        self.charges -= 1;
        self.inner.execute(ctx)
    }

    fn reset(&mut self) {
        self.charges = self.max_charges;
    }
}
