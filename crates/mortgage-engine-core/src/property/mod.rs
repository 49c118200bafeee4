//! Property lookup support: a TTL cache keyed by normalised address and
//! per-resolver call metrics. The resolvers themselves live in the host
//! application.

pub mod cache;
pub mod metrics;

pub use cache::{CacheConfig, Clock, ManualClock, SystemClock, TtlCache};
pub use metrics::{ResolverMetrics, ResolverOutcome, ResolverStats};
