use log::{Level, log_enabled, warn};
use std::time::{Duration, Instant};

/// Scoped trace span around one phase of a tick.
pub struct TraceSpan<'a> {
    label: &'a str,
    start: Instant,
}

impl<'a> TraceSpan<'a> {
    pub fn new(label: &'a str) -> Self {
        if log_enabled!(Level::Trace) {
            log::trace!("start {label}");
        }
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl<'a> Drop for TraceSpan<'a> {
    fn drop(&mut self) {
        if log_enabled!(Level::Trace) {
            let elapsed = self.start.elapsed();
            log::trace!("end {} ({} µs)", self.label, elapsed.as_micros());
        }
    }
}

/// Emits a warning when a tick exceeds its budget. Returns whether it did.
pub fn warn_if_frame_budget_exceeded(duration: Duration, budget_ms: f32) -> bool {
    let elapsed_ms = duration.as_secs_f32() * 1000.0;
    if elapsed_ms > budget_ms {
        warn!(
            "Physics tick exceeded budget: {:.2} ms > {:.2} ms",
            elapsed_ms, budget_ms
        );
        return true;
    }
    false
}
