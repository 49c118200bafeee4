use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::alerts::{spike_alert, SpikeAlert};
use crate::numeric::lenient;
use crate::types::*;

/// A borrower interaction with the document portal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentEvent {
    #[serde(default, deserialize_with = "lenient::text")]
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
}

impl DocumentEvent {
    pub fn new(event_type: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            event_type: event_type.into(),
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementInput {
    #[serde(default)]
    pub events: Vec<DocumentEvent>,
    /// Scoring instant; wall-clock time when omitted.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
    /// Name used in spike alert text.
    #[serde(default, deserialize_with = "lenient::text")]
    pub borrower_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementScore {
    pub score: u8,
    pub events_counted: usize,
    /// Activity burst in the last hour worth a loan-officer notification.
    pub spike: Option<SpikeAlert>,
}

pub const MAX_SCORE: u8 = 100;

fn weight(event_type: &str) -> Option<Decimal> {
    let w = match event_type {
        "opened" => dec!(10),
        "viewed" => dec!(15),
        "downloaded" => dec!(20),
        "uploaded" => dec!(35),
        "condition_cleared" => dec!(25),
        "emailed" => dec!(5),
        "status_changed" => dec!(5),
        _ => return None,
    };
    Some(w)
}

/// Hotter in the first two days; future-dated events count as fresh.
fn recency_boost(age: Duration) -> Decimal {
    if age < Duration::hours(6) {
        dec!(1.4)
    } else if age < Duration::hours(24) {
        dec!(1.2)
    } else if age < Duration::hours(48) {
        dec!(1.05)
    } else {
        Decimal::ONE
    }
}

/// Weighted, recency-boosted activity score in 0..=100.
pub fn engagement_score(events: &[DocumentEvent], now: DateTime<Utc>) -> u8 {
    let total: Decimal = events
        .iter()
        .filter_map(|e| weight(&e.event_type).map(|w| w * recency_boost(now - e.timestamp)))
        .sum();

    total
        .round()
        .min(Decimal::from(MAX_SCORE))
        .to_u8()
        .unwrap_or(MAX_SCORE)
}

pub fn score_engagement(input: &EngagementInput) -> ComputationOutput<EngagementScore> {
    let start = Instant::now();
    let now = input.now.unwrap_or_else(Utc::now);

    let events_counted = input
        .events
        .iter()
        .filter(|e| weight(&e.event_type).is_some())
        .count();
    let mut warnings = Vec::new();
    if events_counted < input.events.len() {
        warnings.push(format!(
            "{} event(s) with unrecognised type ignored.",
            input.events.len() - events_counted
        ));
    }

    let result = EngagementScore {
        score: engagement_score(&input.events, now),
        events_counted,
        spike: spike_alert(&input.borrower_name, &input.events, now),
    };

    with_metadata(
        "Weighted document-event score with recency boost, capped at 100; one-hour spike rules",
        &serde_json::json!({ "now": now }),
        warnings,
        start.elapsed().as_micros() as u64,
        result,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap()
    }

    fn ago(hours: i64) -> DateTime<Utc> {
        now() - Duration::hours(hours)
    }

    #[test]
    fn test_recency_tiers() {
        assert_eq!(engagement_score(&[DocumentEvent::new("viewed", ago(1))], now()), 21);
        assert_eq!(engagement_score(&[DocumentEvent::new("viewed", ago(12))], now()), 18);
        // 20 * 1.05 = 21
        assert_eq!(engagement_score(&[DocumentEvent::new("downloaded", ago(30))], now()), 21);
        assert_eq!(engagement_score(&[DocumentEvent::new("uploaded", ago(200))], now()), 35);
    }

    #[test]
    fn test_unknown_events_ignored() {
        let events = [DocumentEvent::new("printed", ago(1)), DocumentEvent::new("emailed", ago(100))];
        assert_eq!(engagement_score(&events, now()), 5);
    }

    #[test]
    fn test_rounds_half_to_even() {
        // 5 * 1.05 = 5.25 → 5; two of them 10.5 → 10
        let events = [DocumentEvent::new("emailed", ago(30)), DocumentEvent::new("emailed", ago(40))];
        assert_eq!(engagement_score(&events, now()), 10);
    }

    #[test]
    fn test_clamped_at_hundred() {
        let events: Vec<_> = (0..5).map(|_| DocumentEvent::new("uploaded", ago(1))).collect();
        assert_eq!(engagement_score(&events, now()), 100);
        assert_eq!(engagement_score(&[], now()), 0);
    }

    #[test]
    fn test_envelope_counts_recognised_events() {
        let input = EngagementInput {
            events: vec![DocumentEvent::new("opened", ago(2)), DocumentEvent::new("faxed", ago(2))],
            now: Some(now()),
            borrower_name: "Dana Reyes".into(),
        };
        let out = score_engagement(&input);
        assert_eq!(out.result.score, 14);
        assert_eq!(out.result.events_counted, 1);
        assert_eq!(out.result.spike, None);
        assert_eq!(out.warnings.len(), 1);
    }
}
