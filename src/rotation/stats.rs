//! Damage accounting by source

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{Damage, Tick};

/// Running totals for one damage source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTotals {
    pub damage: Damage,
    pub hits: u64,
}

/// Accumulates damage per source name
#[derive(Debug, Clone, Default)]
pub struct DamageMeter {
    sources: AHashMap<String, SourceTotals>,
}

impl DamageMeter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, amount: Damage) {
        let totals = self.sources.entry(name.to_string()).or_default();
        totals.damage = totals.damage.saturating_add(amount);
        totals.hits = totals.hits.saturating_add(1);
    }

    pub fn total(&self) -> Damage {
        self.sources
            .values()
            .fold(0, |total: Damage, t| total.saturating_add(t.damage))
    }

    pub fn damage(&self, name: &str) -> Damage {
        self.sources.get(name).map_or(0, |t| t.damage)
    }

    pub fn hits(&self, name: &str) -> u64 {
        self.sources.get(name).map_or(0, |t| t.hits)
    }

    /// Per-source totals sorted by name
    pub fn breakdown(&self) -> Vec<(String, SourceTotals)> {
        let mut rows: Vec<_> = self
            .sources
            .iter()
            .map(|(name, totals)| (name.clone(), *totals))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        rows
    }

    /// Damage per second over `total_time` ticks (ticks are milliseconds)
    pub fn calculate_dps(&self, total_time: Tick) -> f64 {
        if total_time == 0 {
            return 0.0;
        }
        1000.0 * self.total() as f64 / total_time as f64
    }

    pub fn reset(&mut self) {
        self.sources.clear();
    }
}
