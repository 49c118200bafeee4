use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverOutcome {
    Ok,
    Error,
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    count: u64,
    ok: u64,
    error: u64,
    total: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverStats {
    pub count: u64,
    pub ok: u64,
    pub error: u64,
    /// Mean latency in milliseconds, 1 dp.
    pub avg_ms: Decimal,
}

/// Call counts and latency per property resolver.
#[derive(Debug, Clone, Default)]
pub struct ResolverMetrics {
    by_label: BTreeMap<String, Tally>,
}

impl ResolverMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, label: &str, outcome: ResolverOutcome, elapsed: Duration) {
        let tally = self.by_label.entry(label.to_string()).or_default();
        tally.count = tally.count.saturating_add(1);
        match outcome {
            ResolverOutcome::Ok => tally.ok = tally.ok.saturating_add(1),
            ResolverOutcome::Error => tally.error = tally.error.saturating_add(1),
        }
        tally.total = tally.total.saturating_add(elapsed);
    }

    pub fn snapshot(&self) -> BTreeMap<String, ResolverStats> {
        self.by_label
            .iter()
            .map(|(label, t)| {
                let avg_ms = if t.count == 0 {
                    Decimal::ZERO
                } else {
                    let total_us = Decimal::from(u64::try_from(t.total.as_micros()).unwrap_or(u64::MAX));
                    (total_us / Decimal::from(1000) / Decimal::from(t.count)).round_dp(1)
                };
                (
                    label.clone(),
                    ResolverStats {
                        count: t.count,
                        ok: t.ok,
                        error: t.error,
                        avg_ms,
                    },
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_snapshot_averages() {
        let mut m = ResolverMetrics::new();
        m.record("rentcast", ResolverOutcome::Ok, Duration::from_millis(120));
        m.record("rentcast", ResolverOutcome::Error, Duration::from_micros(80_250));
        m.record("attom", ResolverOutcome::Ok, Duration::from_millis(5));

        let snap = m.snapshot();
        let rc = &snap["rentcast"];
        assert_eq!((rc.count, rc.ok, rc.error), (2, 1, 1));
        // (120 + 80.25) / 2 = 100.125
        assert_eq!(rc.avg_ms, dec!(100.1));
        assert_eq!(snap["attom"].avg_ms, dec!(5));
    }

    #[test]
    fn test_empty_snapshot() {
        assert!(ResolverMetrics::new().snapshot().is_empty());
    }

    #[test]
    fn test_runaway_latency_saturates() {
        let mut m = ResolverMetrics::new();
        m.record("rentcast", ResolverOutcome::Ok, Duration::MAX);
        m.record("rentcast", ResolverOutcome::Ok, Duration::MAX);
        // as_micros exceeds u64, so the total pins at u64::MAX micros
        assert_eq!(m.snapshot()["rentcast"].avg_ms, dec!(9223372036854775.8));
    }
}
