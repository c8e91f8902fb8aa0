//! Vendor-agnostic lookup metrics via a pluggable sink.
//!
//! The resolver reports every object and collection lookup, and the guard
//! filters report every check, without tying the library to a metrics
//! backend.
//!
//! ## Usage
//!
//! ```ignore
//! use nested_resources::metrics::{GuardStats, LookupStats, MetricsSink};
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use std::sync::Arc;
//!
//! struct QueryCounter {
//!     queries: AtomicU64,
//! }
//!
//! impl MetricsSink for QueryCounter {
//!     fn on_lookup(&self, stats: &LookupStats) {
//!         if !stats.cache_hit {
//!             self.queries.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//! }
//!
//! nested_resources::metrics::set_sink(Arc::new(QueryCounter { queries: AtomicU64::new(0) }));
//! ```

use serde::Serialize;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use strum_macros::{AsRefStr, Display};
use tracing::warn;

use crate::guards::GuardMode;

/// Whether a lookup resolved one object or a whole collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LookupShape {
    Object,
    Collection,
}

/// One resolver lookup, passed to [`MetricsSink::on_lookup`].
#[derive(Debug, Clone, Serialize)]
pub struct LookupStats {
    /// Resource kind looked up
    pub kind: String,
    pub shape: LookupShape,
    /// True when the value came from the request cache
    pub cache_hit: bool,
    /// True when an object was found (or, for collections, the lookup
    /// completed)
    pub found: bool,
    /// Time spent, including parent resolution on a miss
    pub duration: Duration,
}

/// One guard check, passed to [`MetricsSink::on_guard`].
#[derive(Debug, Clone, Serialize)]
pub struct GuardStats {
    pub kind: String,
    pub mode: GuardMode,
    /// False when the not-found handler was invoked
    pub passed: bool,
}

/// Trait for consuming resolver and guard metrics.
///
/// Implementations must be thread-safe: one sink serves every request, and
/// requests may run concurrently. Calls happen in the request path, so
/// they should not block.
pub trait MetricsSink: Send + Sync {
    fn on_lookup(&self, stats: &LookupStats);

    /// Called after each guard check. The default implementation does
    /// nothing.
    fn on_guard(&self, _stats: &GuardStats) {}
}

/// Default sink; metrics are silently dropped.
struct NoOpSink;

impl MetricsSink for NoOpSink {
    fn on_lookup(&self, _stats: &LookupStats) {}
}

static SINK: OnceLock<Arc<dyn MetricsSink>> = OnceLock::new();

fn sink() -> Arc<dyn MetricsSink> {
    SINK.get_or_init(|| Arc::new(NoOpSink)).clone()
}

/// Set the global metrics sink.
///
/// Call this once at startup, before the first request. Later calls are
/// ignored with a warning.
pub fn set_sink(sink: Arc<dyn MetricsSink>) {
    if SINK.set(sink).is_err() {
        warn!(
            "Metrics sink was already initialized. Ignoring subsequent set_sink call. Set the sink before the first request."
        );
    }
}

pub(crate) fn record_lookup(stats: LookupStats) {
    sink().on_lookup(&stats);
}

pub(crate) fn record_guard(kind: &str, mode: GuardMode, passed: bool) {
    sink().on_guard(&GuardStats {
        kind: kind.to_string(),
        mode,
        passed,
    });
}
