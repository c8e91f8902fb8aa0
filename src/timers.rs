//! Timing for resolver lookups.
//!
//! [`LookupTimer`] is an RAII guard: it reports to the metrics sink when it
//! is dropped, so a lookup that exits early through `?` is still recorded.

use std::time::Instant;

use crate::metrics::{self, LookupShape, LookupStats};

pub(crate) struct LookupTimer {
    start: Instant,
    kind: String,
    shape: LookupShape,
    cache_hit: bool,
    found: bool,
}

impl LookupTimer {
    pub(crate) fn start(kind: &str, shape: LookupShape) -> Self {
        Self {
            start: Instant::now(),
            kind: kind.to_string(),
            shape,
            cache_hit: false,
            found: false,
        }
    }

    pub(crate) fn cache_hit(&mut self) {
        self.cache_hit = true;
    }

    pub(crate) fn found(&mut self, found: bool) {
        self.found = found;
    }
}

impl Drop for LookupTimer {
    fn drop(&mut self) {
        metrics::record_lookup(LookupStats {
            kind: std::mem::take(&mut self.kind),
            shape: self.shape,
            cache_hit: self.cache_hit,
            found: self.found,
            duration: self.start.elapsed(),
        });
    }
}
