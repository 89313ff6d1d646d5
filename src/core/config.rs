//! Simulation configuration with documented defaults
//!
//! A `SimConfig` describes one run: how long to simulate, how the RNG is
//! seeded, and the loadout (spells and buffs) the rotation may use. It can be
//! built in code or loaded from a TOML file.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::{Damage, Tick, DEFAULT_GLOBAL_COOLDOWN, DEFAULT_READY_BACKOFF};

/// Which selection policy drives the cast loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationKind {
    /// Always try the first spell in the loadout
    #[default]
    Fixed,
    /// Cast the first spell (in loadout order) that is ready
    Priority,
}

/// Configuration for a single run of the simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of ticks to simulate
    ///
    /// Ticks are modelled as milliseconds, so 100_000 is 100 seconds of combat.
    pub duration: Tick,

    /// Seed for the simulation RNG
    ///
    /// Only spells with a damage variance draw from the RNG, so runs with
    /// fixed damage are identical regardless of the seed.
    pub seed: u64,

    /// Whether combat log lines are emitted
    pub log: bool,

    /// Delay before retrying when the rotation finds nothing to cast
    pub ready_backoff: Tick,

    /// Spell selection policy
    pub rotation: RotationKind,

    /// Spells available to the rotation, in priority order
    pub spells: Vec<SpellConfig>,

    /// Buffs that spells may apply
    pub buffs: Vec<BuffConfig>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            duration: 100_000,
            seed: 12345,
            log: false,
            ready_backoff: DEFAULT_READY_BACKOFF,
            rotation: RotationKind::Fixed,
            spells: vec![SpellConfig::new("Test Spell", 1500, 100)],
            buffs: Vec::new(),
        }
    }
}

/// One spell in the loadout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellConfig {
    pub name: String,
    pub cast_time: Tick,
    pub damage: Damage,

    /// Damage rolls uniformly in `damage - variance ..= damage + variance`
    #[serde(default)]
    pub variance: Damage,

    #[serde(default = "default_global_cooldown")]
    pub global_cooldown: Tick,

    /// Limited number of casts per run (restored on reset)
    #[serde(default)]
    pub charges: Option<u32>,

    /// Spell-specific cooldown started when the cast begins
    #[serde(default)]
    pub cooldown: Option<Tick>,

    /// Name of a buff applied when the spell lands
    #[serde(default)]
    pub applies_buff: Option<String>,
}

fn default_global_cooldown() -> Tick {
    DEFAULT_GLOBAL_COOLDOWN
}

impl SpellConfig {
    /// Plain spell with the default global cooldown and no extras
    pub fn new(name: impl Into<String>, cast_time: Tick, damage: Damage) -> Self {
        Self {
            name: name.into(),
            cast_time,
            damage,
            variance: 0,
            global_cooldown: DEFAULT_GLOBAL_COOLDOWN,
            charges: None,
            cooldown: None,
            applies_buff: None,
        }
    }
}

/// One buff in the loadout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuffConfig {
    pub name: String,
    pub max_stack: u32,
    pub duration: Tick,
}

impl SimConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse a config from a TOML string and validate it
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.spells.is_empty() {
            return Err(invalid("at least one spell is required"));
        }

        if self.ready_backoff == 0 {
            return Err(invalid("ready_backoff must be positive"));
        }

        let mut spell_names = HashSet::new();
        for spell in &self.spells {
            if !spell_names.insert(spell.name.as_str()) {
                return Err(invalid(format!("duplicate spell '{}'", spell.name)));
            }
            if spell.charges == Some(0) {
                return Err(invalid(format!("spell '{}' has zero charges", spell.name)));
            }
            if spell.cast_time == 0 && spell.global_cooldown == 0 {
                return Err(invalid(format!(
                    "spell '{}' needs a cast time or a global cooldown",
                    spell.name
                )));
            }
        }

        let mut buff_names = HashSet::new();
        for buff in &self.buffs {
            if !buff_names.insert(buff.name.as_str()) {
                return Err(invalid(format!("duplicate buff '{}'", buff.name)));
            }
            if buff.max_stack == 0 {
                return Err(invalid(format!("buff '{}' has max_stack 0", buff.name)));
            }
            if buff.duration == 0 {
                return Err(invalid(format!("buff '{}' has zero duration", buff.name)));
            }
        }

        // Buff references must resolve
        for spell in &self.spells {
            if let Some(buff) = &spell.applies_buff {
                if !buff_names.contains(buff.as_str()) {
                    return Err(SimError::UnknownBuff(buff.clone()));
                }
            }
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> SimError {
    SimError::InvalidConfig(message.into())
}
