//! Stacking, time-limited buffs
//!
//! An active buff (stack > 0) always has exactly one expiration event on the
//! queue. Re-applying adds a stack and pushes that same event back to a full
//! duration from now rather than creating another one.

use crate::core::error::Result;
use crate::core::types::{BuffId, Tick};
use crate::engine::EventId;
use crate::rotation::context::{SimContext, SimEvent};

#[derive(Debug, Clone)]
pub struct Buff {
    id: BuffId,
    name: String,
    max_stack: u32,
    duration: Tick,
    stack: u32,
    expiration: Option<EventId>,
}

impl Buff {
    pub fn new(id: BuffId, name: impl Into<String>, max_stack: u32, duration: Tick) -> Self {
        Self {
            id,
            name: name.into(),
            max_stack,
            duration,
            stack: 0,
            expiration: None,
        }
    }

    pub fn id(&self) -> BuffId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stack(&self) -> u32 {
        self.stack
    }

    pub fn max_stack(&self) -> u32 {
        self.max_stack
    }

    pub fn duration(&self) -> Tick {
        self.duration
    }

    pub fn is_active(&self) -> bool {
        self.stack > 0
    }

    /// Handle of the pending expiration event
    pub fn expiration(&self) -> Option<EventId> {
        self.expiration
    }

    /// Time the buff will expire at, if active
    pub fn expires_at(&self, ctx: &SimContext) -> Option<Tick> {
        self.expiration.and_then(|id| ctx.events.time_of(id))
    }

    /// Add a stack (up to the maximum) and restart the full duration
    ///
    /// A buff that can hold no stacks never becomes active.
    pub fn apply(&mut self, ctx: &mut SimContext) -> Result<()> {
        if self.max_stack == 0 {
            return Ok(());
        }

        let expiration = match self.expiration {
            Some(id) => {
                ctx.events.reschedule(self.duration, id);
                id
            }
            None => {
                let id = ctx.events.push(self.duration, SimEvent::BuffExpired(self.id))?;
                self.expiration = Some(id);
                id
            }
        };

        let refreshed = self.stack > 0;
        self.stack = (self.stack + 1).min(self.max_stack);

        let expires_at = ctx.events.time_of(expiration).unwrap_or_default();
        ctx.message(format!(
            "{} {} ({}/{}), will expire at {} ms",
            if refreshed { "Refreshing" } else { "Starting" },
            self.name,
            self.stack,
            self.max_stack,
            expires_at
        ));
        Ok(())
    }

    /// Remove one stack; removing the last stack expires the buff
    pub fn decrement(&mut self, ctx: &mut SimContext) {
        match self.stack {
            0 => {}
            1 => self.expire(ctx),
            _ => {
                self.stack -= 1;
                ctx.message(format!(
                    "Decrementing {} ({}/{})",
                    self.name, self.stack, self.max_stack
                ));
            }
        }
    }

    /// End the buff now, cancelling its pending expiration
    pub fn expire(&mut self, ctx: &mut SimContext) {
        if self.stack == 0 {
            return;
        }

        if let Some(id) = self.expiration {
            ctx.events.cancel(id);
        }
        self.on_expiration(ctx);
    }

    /// Runs when the expiration event fires
    pub fn on_expiration(&mut self, ctx: &mut SimContext) {
        self.stack = 0;
        self.expiration = None;
        ctx.message(format!("Expiring {}", self.name));
    }

    /// Clear the buff without touching the queue
    ///
    /// Precondition: the owning queue has just been reset (or the buff is
    /// inactive). A still-scheduled expiration event is not cancelled here and
    /// would otherwise fire against the cleared buff.
    pub fn reset(&mut self) {
        self.stack = 0;
        self.expiration = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EventState;
    use crate::rotation::log::CombatLog;

    fn context() -> SimContext {
        SimContext::new(CombatLog::capturing(), 7)
    }

    /// Fire everything due before `end`, routing expirations to `buff`
    fn run(ctx: &mut SimContext, buff: &mut Buff, end: Tick) -> usize {
        let mut expirations = 0;
        while let Some((_, event)) = ctx.events.pop_due(end) {
            if event == SimEvent::BuffExpired(buff.id()) {
                buff.on_expiration(ctx);
                expirations += 1;
            }
        }
        expirations
    }

    /// Move the clock to exactly `time`
    fn advance_to(ctx: &mut SimContext, buff: &mut Buff, time: Tick) {
        ctx.events.push(time - ctx.now(), SimEvent::BeginCast).unwrap();
        run(ctx, buff, time + 1);
        assert_eq!(ctx.now(), time);
    }

    #[test]
    fn test_first_apply_schedules_one_expiration() {
        let mut ctx = context();
        let mut buff = Buff::new(BuffId(0), "Arcane Power", 3, 5000);

        buff.apply(&mut ctx).unwrap();

        assert_eq!(buff.stack(), 1);
        assert!(buff.is_active());
        assert_eq!(ctx.events.len(), 1);
        assert_eq!(buff.expires_at(&ctx), Some(5000));
        assert!(ctx.log.lines()[0].contains("Starting Arcane Power (1/3)"));
    }

    #[test]
    fn test_zero_capacity_buff_never_activates() {
        let mut ctx = context();
        let mut buff = Buff::new(BuffId(0), "Zero", 0, 100);

        buff.apply(&mut ctx).unwrap();

        assert_eq!(buff.stack(), 0);
        assert!(!buff.is_active());
        assert_eq!(buff.expiration(), None);
        assert!(ctx.events.is_empty());
        assert!(ctx.log.lines().is_empty());
    }

    #[test]
    fn test_reapply_refreshes_same_event() {
        let mut ctx = context();
        let mut buff = Buff::new(BuffId(0), "Arcane Power", 3, 5000);
        buff.apply(&mut ctx).unwrap();
        let first = buff.expiration();

        advance_to(&mut ctx, &mut buff, 2000);
        buff.apply(&mut ctx).unwrap();

        assert_eq!(buff.stack(), 2);
        assert_eq!(buff.expiration(), first);
        assert_eq!(ctx.events.len(), 1);
        assert_eq!(buff.expires_at(&ctx), Some(7000));
        assert!(ctx.log.lines().last().unwrap().contains("Refreshing Arcane Power (2/3)"));
    }

    #[test]
    fn test_stack_caps_at_max() {
        let mut ctx = context();
        let mut buff = Buff::new(BuffId(0), "Clearcasting", 2, 1000);
        for _ in 0..5 {
            buff.apply(&mut ctx).unwrap();
        }
        assert_eq!(buff.stack(), 2);
        assert_eq!(ctx.events.len(), 1);
    }

    #[test]
    fn test_expires_after_duration() {
        let mut ctx = context();
        let mut buff = Buff::new(BuffId(0), "Arcane Power", 3, 5000);
        buff.apply(&mut ctx).unwrap();
        buff.apply(&mut ctx).unwrap();

        assert_eq!(run(&mut ctx, &mut buff, 5000), 0);
        assert_eq!(buff.stack(), 2);

        assert_eq!(run(&mut ctx, &mut buff, 5001), 1);
        assert_eq!(buff.stack(), 0);
        assert_eq!(buff.expiration(), None);
        assert!(ctx.log.lines().last().unwrap().contains("Expiring Arcane Power"));
    }

    #[test]
    fn test_decrement_keeps_timer() {
        let mut ctx = context();
        let mut buff = Buff::new(BuffId(0), "Arcane Power", 3, 5000);
        buff.apply(&mut ctx).unwrap();
        buff.apply(&mut ctx).unwrap();

        buff.decrement(&mut ctx);

        assert_eq!(buff.stack(), 1);
        assert_eq!(buff.expires_at(&ctx), Some(5000));
    }

    #[test]
    fn test_decrement_last_stack_expires() {
        let mut ctx = context();
        let mut buff = Buff::new(BuffId(0), "Arcane Power", 3, 5000);
        buff.apply(&mut ctx).unwrap();
        let event = buff.expiration().unwrap();

        buff.decrement(&mut ctx);

        assert_eq!(buff.stack(), 0);
        assert_eq!(buff.expiration(), None);
        assert!(ctx.events.is_empty());
        assert_eq!(ctx.events.state(event), Some(EventState::Cancelled));
    }

    #[test]
    fn test_inactive_decrement_and_expire_are_noops() {
        let mut ctx = context();
        let mut buff = Buff::new(BuffId(0), "Arcane Power", 3, 5000);

        buff.decrement(&mut ctx);
        buff.expire(&mut ctx);

        assert_eq!(buff.stack(), 0);
        assert!(ctx.log.lines().is_empty());
    }

    #[test]
    fn test_expire_prevents_stale_callback() {
        let mut ctx = context();
        let mut buff = Buff::new(BuffId(0), "Arcane Power", 3, 5000);
        buff.apply(&mut ctx).unwrap();

        buff.expire(&mut ctx);
        let lines_after_expire = ctx.log.lines().len();

        assert_eq!(run(&mut ctx, &mut buff, 1_000_000), 0);
        assert_eq!(ctx.log.lines().len(), lines_after_expire);
    }

    #[test]
    fn test_apply_after_expiry_starts_fresh() {
        let mut ctx = context();
        let mut buff = Buff::new(BuffId(0), "Arcane Power", 3, 5000);
        buff.apply(&mut ctx).unwrap();
        run(&mut ctx, &mut buff, 10_000);
        assert!(!buff.is_active());

        advance_to(&mut ctx, &mut buff, 8000);
        buff.apply(&mut ctx).unwrap();

        assert_eq!(buff.stack(), 1);
        assert_eq!(buff.expires_at(&ctx), Some(13_000));
        assert!(ctx.log.lines().last().unwrap().contains("Starting"));
    }

    #[test]
    fn test_reset_alongside_queue_reset() {
        let mut ctx = context();
        let mut buff = Buff::new(BuffId(0), "Arcane Power", 3, 5000);
        buff.apply(&mut ctx).unwrap();

        ctx.events.reset();
        buff.reset();

        assert_eq!(buff.stack(), 0);
        assert_eq!(buff.expiration(), None);
        assert_eq!(run(&mut ctx, &mut buff, 1_000_000), 0);
    }
}
