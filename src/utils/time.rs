use std::time::{Duration, Instant};

/// Wall-clock delta source for the frame loop.
///
/// Every [`delta`](Self::delta) call returns the time elapsed since the
/// previous call (or since creation for the first call), so a read right
/// after construction reports zero. Only deltas matter, there is no reset.
#[derive(Debug, Clone)]
pub struct Clock {
    start_time: Instant,
    last_read: Instant,
    /// Total number of reads
    pub read_count: u64,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// Creates a new clock starting from now.
    #[must_use]
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_read: now,
            read_count: 0,
        }
    }

    /// Returns the time since the previous read and advances the read mark.
    pub fn delta(&mut self) -> Duration {
        self.delta_at(Instant::now())
    }

    /// Same as [`delta`](Self::delta) with an explicit "now".
    ///
    /// Instants earlier than the previous read saturate to zero.
    pub fn delta_at(&mut self, now: Instant) -> Duration {
        let delta = now.saturating_duration_since(self.last_read);
        self.last_read = self.last_read.max(now);
        self.read_count += 1;
        delta
    }

    /// Seconds since the previous read.
    pub fn delta_seconds(&mut self) -> f32 {
        self.delta().as_secs_f32()
    }

    /// Time since the clock was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.last_read - self.start_time
    }
}
