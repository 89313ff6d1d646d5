//! Readiness timers

use crate::core::error::{Result, SimError};
use crate::core::types::Tick;
use crate::rotation::context::SimContext;

/// A named timer that is ready again `duration` ticks after it starts
///
/// Cooldowns only read the clock; they never put anything on the queue.
#[derive(Debug, Clone)]
pub struct Cooldown {
    name: String,
    duration: Tick,
    ready_at: Tick,
}

impl Cooldown {
    pub fn new(name: impl Into<String>, duration: Tick) -> Self {
        Self {
            name: name.into(),
            duration,
            ready_at: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration(&self) -> Tick {
        self.duration
    }

    pub fn ready_at(&self) -> Tick {
        self.ready_at
    }

    pub fn ready(&self, now: Tick) -> bool {
        now >= self.ready_at
    }

    /// Start the cooldown; it must be ready
    pub fn start(&mut self, ctx: &mut SimContext) -> Result<()> {
        let now = ctx.now();
        if !self.ready(now) {
            return Err(SimError::InvalidState(format!(
                "cooldown '{}' started at {} ms but is not ready until {} ms",
                self.name, now, self.ready_at
            )));
        }

        self.ready_at = now.saturating_add(self.duration);
        ctx.message(format!("Starting {}, will be ready at {} ms", self.name, self.ready_at));
        Ok(())
    }

    pub fn reset(&mut self) {
        self.ready_at = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::context::SimEvent;
    use crate::rotation::log::CombatLog;

    fn context() -> SimContext {
        SimContext::new(CombatLog::capturing(), 1)
    }

    fn advance_to(ctx: &mut SimContext, time: Tick) {
        let delay = time - ctx.now();
        ctx.events.push(delay, SimEvent::BeginCast).unwrap();
        ctx.events.run_until(time + 1, |_, _, _| Ok(())).unwrap();
    }

    #[test]
    fn test_ready_immediately() {
        let cooldown = Cooldown::new("Combustion", 10_000);
        assert!(cooldown.ready(0));
        assert_eq!(cooldown.ready_at(), 0);
    }

    #[test]
    fn test_start_sets_ready_at() {
        let mut ctx = context();
        let mut cooldown = Cooldown::new("Combustion", 10_000);
        advance_to(&mut ctx, 500);

        cooldown.start(&mut ctx).unwrap();

        assert_eq!(cooldown.ready_at(), 10_500);
        assert!(!cooldown.ready(10_499));
        assert!(cooldown.ready(10_500));
        assert!(ctx.log.lines()[0].contains("will be ready at 10500 ms"));
    }

    #[test]
    fn test_start_while_cooling_down_fails() {
        let mut ctx = context();
        let mut cooldown = Cooldown::new("Combustion", 10_000);
        cooldown.start(&mut ctx).unwrap();

        let result = cooldown.start(&mut ctx);
        assert!(matches!(result, Err(SimError::InvalidState(_))));
        assert_eq!(cooldown.ready_at(), 10_000);
    }

    #[test]
    fn test_reset_makes_ready() {
        let mut ctx = context();
        let mut cooldown = Cooldown::new("Combustion", 10_000);
        cooldown.start(&mut ctx).unwrap();

        cooldown.reset();

        assert!(cooldown.ready(ctx.now()));
        assert!(cooldown.start(&mut ctx).is_ok());
    }
}
