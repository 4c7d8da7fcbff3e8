use std::time::{Duration, Instant};

/// Counters and timings gathered over one call to `PhysicsWorld::step`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StepProfile {
    pub integrate_time: Duration,
    pub refresh_time: Duration,
    pub sweep_time: Duration,
    pub total_time: Duration,

    pub substeps: u32,
    pub shape_count: usize,
    pub pairs_considered: usize,
    pub broadphase_hits: usize,
    pub narrowphase_hits: usize,
    pub contact_points: usize,
    pub asleep_count: usize,
}

impl StepProfile {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn report(&self) {
        let total_us = self.total_time.as_micros() as f32;
        if total_us < 1.0 {
            return;
        }

        log::debug!(
            "tick: {} substeps, {} shapes ({} asleep), pairs {} -> broad {} -> narrow {} ({} contacts)",
            self.substeps,
            self.shape_count,
            self.asleep_count,
            self.pairs_considered,
            self.broadphase_hits,
            self.narrowphase_hits,
            self.contact_points
        );
        log::debug!(
            "tick: {:.2} ms total, integrate {:.1}%, refresh {:.1}%, sweep {:.1}%",
            self.total_time.as_secs_f32() * 1000.0,
            (self.integrate_time.as_micros() as f32 / total_us) * 100.0,
            (self.refresh_time.as_micros() as f32 / total_us) * 100.0,
            (self.sweep_time.as_micros() as f32 / total_us) * 100.0
        );
    }
}

/// Adds the lifetime of the timer to `output` when dropped.
pub struct ScopedTimer<'a> {
    start: Instant,
    output: &'a mut Duration,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(output: &'a mut Duration) -> Self {
        Self {
            start: Instant::now(),
            output,
        }
    }
}

impl<'a> Drop for ScopedTimer<'a> {
    fn drop(&mut self) {
        *self.output += self.start.elapsed();
    }
}
