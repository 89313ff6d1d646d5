//! Output of a finished run

use serde::Serialize;

use crate::core::error::Result;
use crate::core::types::{Damage, Tick};
use crate::rotation::stats::DamageMeter;

/// Damage done by one source over a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceReport {
    pub name: String,
    pub damage: Damage,
    pub hits: u64,
}

/// Summary of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimReport {
    pub duration: Tick,
    pub casts: u64,
    pub total_damage: Damage,
    pub dps: f64,
    pub sources: Vec<SourceReport>,
}

impl SimReport {
    pub fn from_stats(stats: &DamageMeter, duration: Tick, casts: u64) -> Self {
        Self {
            duration,
            casts,
            total_damage: stats.total(),
            dps: stats.calculate_dps(duration),
            sources: stats
                .breakdown()
                .into_iter()
                .map(|(name, totals)| SourceReport {
                    name,
                    damage: totals.damage,
                    hits: totals.hits,
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn summary(&self) -> String {
        let mut text = format!(
            "Simulated {} ms: {} casts, {} damage\nSim finished, final DPS: {}",
            self.duration, self.casts, self.total_damage, self.dps
        );
        for source in &self.sources {
            text.push_str(&format!(
                "\n  {:<20} {:>10} damage {:>6} hits",
                source.name, source.damage, source.hits
            ));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_from_stats() {
        let mut stats = DamageMeter::new();
        stats.add("Test Spell", 100);
        stats.add("Test Spell", 100);

        let report = SimReport::from_stats(&stats, 10_000, 2);

        assert_eq!(report.total_damage, 200);
        assert_eq!(report.dps, 20.0);
        assert_eq!(
            report.sources,
            vec![SourceReport {
                name: "Test Spell".into(),
                damage: 200,
                hits: 2,
            }]
        );
        assert_eq!(report.summary().matches("final DPS: 20").count(), 1);
    }

    #[test]
    fn test_report_json() {
        let report = SimReport::from_stats(&DamageMeter::new(), 1000, 0);
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["duration"], 1000);
        assert_eq!(value["dps"], 0.0);
        assert!(value["sources"].as_array().unwrap().is_empty());
    }
}
