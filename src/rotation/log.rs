//! Combat log
//!
//! Human-readable lines stamped with the simulation time. Lines go to
//! `tracing` under the `combat` target; tests can capture them instead.

use crate::core::types::Tick;

#[derive(Debug, Clone, Default)]
pub struct CombatLog {
    enabled: bool,
    captured: Option<Vec<String>>,
}

impl CombatLog {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            captured: None,
        }
    }

    /// Log that keeps every line in memory as well as emitting it
    pub fn capturing() -> Self {
        Self {
            enabled: true,
            captured: Some(Vec::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn message(&mut self, now: Tick, text: impl AsRef<str>) {
        if !self.enabled {
            return;
        }

        let line = format!("{:>10} ms: {}", now, text.as_ref());
        tracing::info!(target: "combat", "{}", line);
        if let Some(captured) = &mut self.captured {
            captured.push(line);
        }
    }

    /// Captured lines (empty unless built with [`CombatLog::capturing`])
    pub fn lines(&self) -> &[String] {
        self.captured.as_deref().unwrap_or(&[])
    }

    pub fn clear(&mut self) {
        if let Some(captured) = &mut self.captured {
            captured.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_log_drops_lines() {
        let mut log = CombatLog::new(false);
        log.message(10, "ignored");
        assert!(log.lines().is_empty());
    }

    #[test]
    fn test_capturing_log_stamps_time() {
        let mut log = CombatLog::capturing();
        log.message(1500, "Casting Test Spell");
        assert_eq!(log.lines(), ["      1500 ms: Casting Test Spell"]);

        log.clear();
        assert!(log.lines().is_empty());
    }

    #[test]
    fn test_toggling_capture() {
        let mut log = CombatLog::capturing();
        assert!(log.is_enabled());
        log.set_enabled(false);
        assert!(!log.is_enabled());
        log.message(0, "quiet");
        log.set_enabled(true);
        log.message(5, "loud");
        assert_eq!(log.lines().len(), 1);
        assert!(log.lines()[0].ends_with("loud"));
    }
}
