//! In-flight request gauge.
//!
//! Interaction log records carry a point-in-time concurrency level. The
//! gauge is incremented for the lifetime of each request via an RAII
//! guard and read by the logger when it builds a record.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared counter of requests currently in flight.
#[derive(Debug, Default)]
pub struct RequestGauge {
    active: AtomicUsize,
}

impl RequestGauge {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Mark a request as in flight until the returned guard is dropped.
    pub fn track(self: &Arc<Self>) -> InFlightRequest {
        self.active.fetch_add(1, Ordering::Relaxed);
        InFlightRequest {
            gauge: Arc::clone(self),
        }
    }

    /// The number of requests currently in flight.
    pub fn current(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }
}

/// RAII guard decrementing the gauge on drop.
pub struct InFlightRequest {
    gauge: Arc<RequestGauge>,
}

impl Drop for InFlightRequest {
    fn drop(&mut self) {
        self.gauge.active.fetch_sub(1, Ordering::Relaxed);
    }
}
