//! Cast loop
//!
//! The loop is a small state machine driven entirely by queue events:
//!
//! * `BeginCast` fires: ask the rotation for a spell. If it is castable,
//!   schedule `FinishCast` after its cast time and note when the global
//!   cooldown ends; otherwise try again after a short backoff.
//! * `FinishCast` fires: the spell lands, then `BeginCast` is scheduled for
//!   when the global cooldown allows the next cast.
//!
//! Buff expirations ride on the same queue and are routed back to their buff.

use tracing::debug;

use crate::core::config::SimConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{SpellId, Tick, DEFAULT_READY_BACKOFF};
use crate::engine::EventId;
use crate::rotation::context::{SimContext, SimEvent};
use crate::rotation::loadout::Loadout;
use crate::rotation::log::CombatLog;
use crate::rotation::policy::{self, Rotation};
use crate::rotation::report::SimReport;

/// Where the cast loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CastPhase {
    /// Nothing pending
    #[default]
    Idle,
    /// Waiting for the next `BeginCast`
    AwaitingReady,
    /// A spell is being cast
    Casting,
}

#[derive(Debug, Clone, Default)]
struct CastState {
    ready_event: Option<EventId>,
    cast_event: Option<EventId>,
    casting: Option<SpellId>,
    gcd_ready: Tick,
}

#[derive(Debug)]
pub struct Sim {
    ctx: SimContext,
    loadout: Loadout,
    rotation: Box<dyn Rotation>,
    state: CastState,
    ready_backoff: Tick,
    casts: u64,
}

impl Sim {
    /// Build a simulation from a validated config
    pub fn new(config: &SimConfig) -> Result<Self> {
        config.validate()?;
        let loadout = Loadout::from_config(config)?;
        let mut sim = Self::with_loadout(
            loadout,
            policy::from_kind(config.rotation),
            CombatLog::new(config.log),
            config.seed,
        );
        sim.ready_backoff = config.ready_backoff;
        Ok(sim)
    }

    pub fn with_loadout(
        loadout: Loadout,
        rotation: Box<dyn Rotation>,
        log: CombatLog,
        seed: u64,
    ) -> Self {
        Self {
            ctx: SimContext::new(log, seed),
            loadout,
            rotation,
            state: CastState::default(),
            ready_backoff: DEFAULT_READY_BACKOFF,
            casts: 0,
        }
    }

    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.ctx.log.set_enabled(enabled);
        self
    }

    pub fn set_rotation(&mut self, rotation: Box<dyn Rotation>) {
        self.rotation = rotation;
    }

    /// Delay before retrying when no spell is castable; must be positive
    pub fn set_ready_backoff(&mut self, backoff: Tick) -> Result<()> {
        if backoff == 0 {
            return Err(SimError::InvalidConfig("ready backoff must be positive".into()));
        }
        self.ready_backoff = backoff;
        Ok(())
    }

    pub fn now(&self) -> Tick {
        self.ctx.now()
    }

    pub fn context(&self) -> &SimContext {
        &self.ctx
    }

    pub fn loadout(&self) -> &Loadout {
        &self.loadout
    }

    pub fn loadout_mut(&mut self) -> &mut Loadout {
        &mut self.loadout
    }

    /// Spells landed since the last reset
    pub fn casts(&self) -> u64 {
        self.casts
    }

    /// Spell currently being cast
    pub fn casting(&self) -> Option<SpellId> {
        self.state.casting
    }

    /// Earliest time the global cooldown allows another cast
    pub fn gcd_ready(&self) -> Tick {
        self.state.gcd_ready
    }

    pub fn phase(&self) -> CastPhase {
        if self.state.cast_event.is_some() {
            CastPhase::Casting
        } else if self.state.ready_event.is_some() {
            CastPhase::AwaitingReady
        } else {
            CastPhase::Idle
        }
    }

    /// Clear the queue, statistics, loadout and cast loop
    pub fn reset(&mut self) {
        // Queue first: buffs reset without cancelling their expirations
        self.ctx.events.reset();
        self.ctx.stats.reset();
        self.loadout.reset();
        self.rotation.reset();
        self.state = CastState::default();
        self.casts = 0;
    }

    /// Enter the cast loop
    pub fn start(&mut self) -> Result<()> {
        if self.phase() != CastPhase::Idle {
            return Err(SimError::InvalidState(format!(
                "cast loop already running ({:?})",
                self.phase()
            )));
        }
        self.schedule_ready(0)
    }

    /// Run every event due strictly before `end`
    pub fn advance(&mut self, end: Tick) -> Result<usize> {
        let mut fired = 0;
        while let Some((_, event)) = self.ctx.events.pop_due(end) {
            self.dispatch(event)?;
            fired += 1;
        }
        Ok(fired)
    }

    /// Reset, run the cast loop for `duration` ticks and report the result
    pub fn run(&mut self, duration: Tick) -> Result<SimReport> {
        self.reset();
        self.start()?;
        let fired = self.advance(duration)?;

        let report = SimReport::from_stats(&self.ctx.stats, duration, self.casts);
        debug!(events = fired, casts = self.casts, dps = report.dps, "run complete");
        Ok(report)
    }

    fn dispatch(&mut self, event: SimEvent) -> Result<()> {
        match event {
            SimEvent::BeginCast => self.begin_cast(),
            SimEvent::FinishCast => self.finish_cast(),
            SimEvent::BuffExpired(id) => {
                if let Some(buff) = self.loadout.buff_mut(id) {
                    buff.on_expiration(&mut self.ctx);
                }
                Ok(())
            }
        }
    }

    fn begin_cast(&mut self) -> Result<()> {
        self.state.ready_event = None;

        let choice = self
            .rotation
            .choose(&self.loadout, &self.ctx)
            .filter(|&id| self.loadout.is_castable(id, &self.ctx));

        match choice {
            Some(id) => {
                self.schedule_cast(id)?;
                let name = self.spell_name(id);
                self.ctx.message(format!("Casting {name}"));
            }
            None => {
                self.schedule_ready(self.ready_backoff)?;
                self.ctx.message("No spell available, waiting");
            }
        }
        Ok(())
    }

    fn finish_cast(&mut self) -> Result<()> {
        self.state.cast_event = None;

        if let Some(id) = self.state.casting.take() {
            let slot = self.loadout.slot(id).ok_or_else(|| missing_spell(id))?;
            let buff = slot.buff;

            self.loadout
                .spell_mut(id)
                .ok_or_else(|| missing_spell(id))?
                .execute(&mut self.ctx)?;
            self.casts += 1;

            if let Some(buff) = buff.and_then(|b| self.loadout.buff_mut(b)) {
                buff.apply(&mut self.ctx)?;
            }
        }

        self.schedule_ready(0)
    }

    fn schedule_ready(&mut self, delay: Tick) -> Result<()> {
        let now = self.ctx.now();
        let ready = now.saturating_add(delay).max(self.state.gcd_ready) - now;
        self.state.ready_event = Some(self.ctx.events.push(ready, SimEvent::BeginCast)?);
        Ok(())
    }

    fn schedule_cast(&mut self, id: SpellId) -> Result<()> {
        let slot = self.loadout.slot(id).ok_or_else(|| missing_spell(id))?;
        let cast_time = slot.spell.cast_time();
        let global_cooldown = slot.spell.global_cooldown();
        let cooldown = slot.cooldown;

        // Nothing would ever move the clock forward
        if cast_time == 0 && global_cooldown == 0 {
            return Err(SimError::InvalidState(format!(
                "{} has neither a cast time nor a global cooldown",
                slot.spell.name()
            )));
        }

        if let Some(cooldown) = cooldown.and_then(|cd| self.loadout.cooldown_mut(cd)) {
            cooldown.start(&mut self.ctx)?;
        }

        self.state.casting = Some(id);
        self.state.gcd_ready = self.ctx.now().saturating_add(global_cooldown);
        self.state.cast_event = Some(self.ctx.events.push(cast_time, SimEvent::FinishCast)?);
        Ok(())
    }

    fn spell_name(&self, id: SpellId) -> String {
        self.loadout
            .spell(id)
            .map_or_else(|| id.to_string(), |spell| spell.name().to_string())
    }
}

fn missing_spell(id: SpellId) -> SimError {
    SimError::InvalidState(format!("{id} is not in the loadout"))
}
