//! Spell selection policies

use std::fmt::Debug;

use crate::core::config::RotationKind;
use crate::core::types::SpellId;
use crate::rotation::context::SimContext;
use crate::rotation::loadout::Loadout;

/// Picks the next spell whenever the cast loop becomes ready
///
/// Returning a spell that isn't castable (or `None`) makes the loop back off
/// and ask again later.
pub trait Rotation: Debug {
    fn choose(&mut self, loadout: &Loadout, ctx: &SimContext) -> Option<SpellId>;

    fn reset(&mut self) {}
}

/// Build the policy named by a config
pub fn from_kind(kind: RotationKind) -> Box<dyn Rotation> {
    match kind {
        RotationKind::Fixed => Box::new(FixedRotation::new(SpellId(0))),
        RotationKind::Priority => Box::new(PriorityRotation),
    }
}

/// Always tries the same spell
#[derive(Debug, Clone, Copy)]
pub struct FixedRotation {
    spell: SpellId,
}

impl FixedRotation {
    pub fn new(spell: SpellId) -> Self {
        Self { spell }
    }
}

impl Rotation for FixedRotation {
    fn choose(&mut self, _loadout: &Loadout, _ctx: &SimContext) -> Option<SpellId> {
        Some(self.spell)
    }
}

/// First castable spell in loadout order
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityRotation;

impl Rotation for PriorityRotation {
    fn choose(&mut self, loadout: &Loadout, ctx: &SimContext) -> Option<SpellId> {
        loadout.spell_ids().find(|&id| loadout.is_castable(id, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::log::CombatLog;
    use crate::rotation::spell::{BasicSpell, ChargedSpell};

    #[test]
    fn test_fixed_ignores_readiness() {
        let ctx = SimContext::new(CombatLog::new(false), 0);
        let mut loadout = Loadout::new();
        loadout.add_spell(Box::new(ChargedSpell::new(BasicSpell::test_spell(), 1)));
        let mut rotation = FixedRotation::new(SpellId(0));

        assert_eq!(rotation.choose(&loadout, &ctx), Some(SpellId(0)));
    }

    #[test]
    fn test_priority_skips_unready_spells() {
        let mut ctx = SimContext::new(CombatLog::new(false), 0);
        let mut loadout = Loadout::new();
        let burst = loadout.add_spell(Box::new(BasicSpell::new("Burst", 0, 500)));
        let filler = loadout.add_spell(Box::new(BasicSpell::test_spell()));
        let cooldown = loadout.add_cooldown("Burst", 10_000);
        loadout.link_cooldown(burst, cooldown).unwrap();

        let mut rotation = PriorityRotation;
        assert_eq!(rotation.choose(&loadout, &ctx), Some(burst));

        loadout.cooldown_mut(cooldown).unwrap().start(&mut ctx).unwrap();
        assert_eq!(rotation.choose(&loadout, &ctx), Some(filler));
    }

    #[test]
    fn test_priority_with_nothing_ready() {
        let ctx = SimContext::new(CombatLog::new(false), 0);
        let loadout = Loadout::new();
        assert_eq!(PriorityRotation.choose(&loadout, &ctx), None);
    }
}
