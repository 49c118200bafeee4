use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Time source, injectable so expiry can be tested without sleeping.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone, Copy)]
pub struct ManualClock {
    now: DateTime<Utc>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: start }
    }

    /// Moves forward (or back) by `by`, pinned at the ends of the calendar.
    pub fn advance(&mut self, by: Duration) {
        self.now = self.now.checked_add_signed(by).unwrap_or(if by > Duration::zero() {
            DateTime::<Utc>::MAX_UTC
        } else {
            DateTime::<Utc>::MIN_UTC
        });
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

/// Longest lifetime a `Duration` can hold, in whole seconds.
pub const MAX_TTL_SECONDS: i64 = i64::MAX / 1000;

/// Cache configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entry lifetime in seconds, clamped to `0..=MAX_TTL_SECONDS`
    pub ttl_seconds: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_seconds: 600 }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::try_seconds(self.ttl_seconds.clamp(0, MAX_TTL_SECONDS)).unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

/// Property lookups keyed by address, case- and whitespace-insensitive.
#[derive(Debug)]
pub struct TtlCache<V, C: Clock = SystemClock> {
    entries: HashMap<String, Entry<V>>,
    ttl: Duration,
    clock: C,
}

impl<V: Clone> TtlCache<V, SystemClock> {
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<V: Clone, C: Clock> TtlCache<V, C> {
    pub fn with_clock(config: CacheConfig, clock: C) -> Self {
        Self {
            entries: HashMap::new(),
            ttl: config.ttl(),
            clock,
        }
    }

    pub fn normalize_key(address: &str) -> String {
        address.trim().to_lowercase()
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Cached value for `address`; an expired entry is evicted and reported
    /// as a miss.
    pub fn get(&mut self, address: &str) -> Option<V> {
        let key = Self::normalize_key(address);
        let expires_at = self.entries.get(&key)?.expires_at;

        if self.clock.now() > expires_at {
            tracing::debug!(key = %key, "property cache entry expired");
            self.entries.remove(&key);
            return None;
        }

        tracing::debug!(key = %key, "property cache hit");
        self.entries.get(&key).map(|e| e.value.clone())
    }

    pub fn insert(&mut self, address: &str, value: V) {
        let key = Self::normalize_key(address);
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.entries.insert(key, Entry { value, expires_at });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every expired entry; returns how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, e| now <= e.expires_at);
        let purged = before - self.entries.len();
        if purged > 0 {
            tracing::debug!(purged, "property cache purged");
        }
        purged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn cache() -> TtlCache<u32, ManualClock> {
        let start = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
        TtlCache::with_clock(CacheConfig::default(), ManualClock::new(start))
    }

    #[test]
    fn test_key_normalised() {
        let mut c = cache();
        c.insert("  12 Elm St ", 7);
        assert_eq!(c.get("12 ELM ST"), Some(7));
    }

    #[test]
    fn test_entry_lives_through_ttl_boundary() {
        let mut c = cache();
        c.insert("12 Elm St", 7);
        c.clock_mut().advance(Duration::seconds(600));
        assert_eq!(c.get("12 elm st"), Some(7));

        c.clock_mut().advance(Duration::seconds(1));
        assert_eq!(c.get("12 elm st"), None);
        assert!(c.is_empty());
    }

    #[test]
    fn test_purge_expired() {
        let mut c = cache();
        c.insert("a", 1);
        c.clock_mut().advance(Duration::seconds(300));
        c.insert("b", 2);
        c.clock_mut().advance(Duration::seconds(400));
        assert_eq!(c.purge_expired(), 1);
        assert_eq!(c.len(), 1);
        assert_eq!(c.get("b"), Some(2));
    }

    #[test]
    fn test_config_from_partial_json() {
        let cfg: CacheConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.ttl_seconds, 600);
    }

    #[test]
    fn test_huge_ttl_clamps_instead_of_overflowing() {
        let cfg: CacheConfig = serde_json::from_str(r#"{"ttl_seconds": 9223372036854775807}"#).unwrap();
        assert_eq!(cfg.ttl(), Duration::try_seconds(MAX_TTL_SECONDS).unwrap());

        let mut c: TtlCache<u32> = TtlCache::new(cfg);
        c.insert("12 Elm St", 7);
        assert_eq!(c.get("12 elm st"), Some(7));
    }

    #[test]
    fn test_expiry_pins_at_calendar_end() {
        let cfg = CacheConfig {
            ttl_seconds: MAX_TTL_SECONDS,
        };
        let late = DateTime::<Utc>::MAX_UTC - Duration::days(1);
        let mut c = TtlCache::with_clock(cfg, ManualClock::new(late));
        c.insert("a", 1);
        c.clock_mut().advance(Duration::days(365));
        assert_eq!(c.clock_mut().now(), DateTime::<Utc>::MAX_UTC);
        assert_eq!(c.get("a"), Some(1));
    }

    #[test]
    fn test_negative_ttl_expires_immediately() {
        let mut c = TtlCache::with_clock(
            CacheConfig { ttl_seconds: -5 },
            ManualClock::new(Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap()),
        );
        c.insert("a", 1);
        assert_eq!(c.get("a"), Some(1));
        c.clock_mut().advance(Duration::seconds(1));
        assert_eq!(c.get("a"), None);
    }
}
