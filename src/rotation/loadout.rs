//! The spells, buffs and cooldowns a simulation owns

use crate::core::config::SimConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{BuffId, CooldownId, SpellId, Tick};
use crate::rotation::buff::Buff;
use crate::rotation::context::SimContext;
use crate::rotation::cooldown::Cooldown;
use crate::rotation::spell::{self, Spell};

/// A spell plus the cooldown gating it and the buff it applies
#[derive(Debug)]
pub struct SpellSlot {
    pub spell: Box<dyn Spell>,
    /// Must be ready to cast; starts when the cast begins
    pub cooldown: Option<CooldownId>,
    /// Applied after the spell lands
    pub buff: Option<BuffId>,
}

#[derive(Debug, Default)]
pub struct Loadout {
    spells: Vec<SpellSlot>,
    buffs: Vec<Buff>,
    cooldowns: Vec<Cooldown>,
}

impl Loadout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the loadout described by a config
    pub fn from_config(config: &SimConfig) -> Result<Self> {
        let mut loadout = Self::new();

        for buff in &config.buffs {
            loadout.add_buff(buff.name.clone(), buff.max_stack, buff.duration);
        }

        for entry in &config.spells {
            let id = loadout.add_spell(spell::from_config(entry));

            if let Some(duration) = entry.cooldown {
                let cooldown = loadout.add_cooldown(entry.name.clone(), duration);
                loadout.link_cooldown(id, cooldown)?;
            }

            if let Some(name) = &entry.applies_buff {
                let buff = loadout
                    .buff_by_name(name)
                    .ok_or_else(|| SimError::UnknownBuff(name.clone()))?;
                loadout.link_buff(id, buff)?;
            }
        }

        Ok(loadout)
    }

    pub fn add_spell(&mut self, spell: Box<dyn Spell>) -> SpellId {
        self.spells.push(SpellSlot {
            spell,
            cooldown: None,
            buff: None,
        });
        SpellId(self.spells.len() - 1)
    }

    pub fn add_buff(&mut self, name: impl Into<String>, max_stack: u32, duration: Tick) -> BuffId {
        let id = BuffId(self.buffs.len());
        self.buffs.push(Buff::new(id, name, max_stack, duration));
        id
    }

    pub fn add_cooldown(&mut self, name: impl Into<String>, duration: Tick) -> CooldownId {
        self.cooldowns.push(Cooldown::new(name, duration));
        CooldownId(self.cooldowns.len() - 1)
    }

    pub fn link_cooldown(&mut self, spell: SpellId, cooldown: CooldownId) -> Result<()> {
        if cooldown.0 >= self.cooldowns.len() {
            return Err(SimError::InvalidConfig(format!("no such {cooldown}")));
        }
        self.slot_mut(spell)?.cooldown = Some(cooldown);
        Ok(())
    }

    pub fn link_buff(&mut self, spell: SpellId, buff: BuffId) -> Result<()> {
        if buff.0 >= self.buffs.len() {
            return Err(SimError::InvalidConfig(format!("no such {buff}")));
        }
        self.slot_mut(spell)?.buff = Some(buff);
        Ok(())
    }

    pub fn slot(&self, id: SpellId) -> Option<&SpellSlot> {
        self.spells.get(id.0)
    }

    fn slot_mut(&mut self, id: SpellId) -> Result<&mut SpellSlot> {
        self.spells
            .get_mut(id.0)
            .ok_or_else(|| SimError::InvalidConfig(format!("no such {id}")))
    }

    pub fn spell(&self, id: SpellId) -> Option<&dyn Spell> {
        self.slot(id).map(|slot| slot.spell.as_ref())
    }

    pub fn spell_mut(&mut self, id: SpellId) -> Option<&mut (dyn Spell + 'static)> {
        self.spells.get_mut(id.0).map(|slot| slot.spell.as_mut())
    }

    pub fn spell_ids(&self) -> impl Iterator<Item = SpellId> {
        (0..self.spells.len()).map(SpellId)
    }

    pub fn spell_count(&self) -> usize {
        self.spells.len()
    }

    pub fn buff(&self, id: BuffId) -> Option<&Buff> {
        self.buffs.get(id.0)
    }

    pub fn buff_mut(&mut self, id: BuffId) -> Option<&mut Buff> {
        self.buffs.get_mut(id.0)
    }

    pub fn buff_by_name(&self, name: &str) -> Option<BuffId> {
        self.buffs.iter().find(|b| b.name() == name).map(Buff::id)
    }

    pub fn buffs(&self) -> &[Buff] {
        &self.buffs
    }

    pub fn cooldown(&self, id: CooldownId) -> Option<&Cooldown> {
        self.cooldowns.get(id.0)
    }

    pub fn cooldown_mut(&mut self, id: CooldownId) -> Option<&mut Cooldown> {
        self.cooldowns.get_mut(id.0)
    }

    pub fn cooldowns(&self) -> &[Cooldown] {
        &self.cooldowns
    }

    /// Spell reports ready and its cooldown (if any) has recovered
    pub fn is_castable(&self, id: SpellId, ctx: &SimContext) -> bool {
        let Some(slot) = self.slot(id) else {
            return false;
        };
        let cooldown_ready = slot
            .cooldown
            .and_then(|cd| self.cooldown(cd))
            .map_or(true, |cd| cd.ready(ctx.now()));
        cooldown_ready && slot.spell.ready(ctx)
    }

    /// Reset every spell, buff and cooldown
    ///
    /// Buffs are cleared without touching the queue, so the owning queue must
    /// be reset first.
    pub fn reset(&mut self) {
        for slot in &mut self.spells {
            slot.spell.reset();
        }
        for buff in &mut self.buffs {
            buff.reset();
        }
        for cooldown in &mut self.cooldowns {
            cooldown.reset();
        }
    }
}
