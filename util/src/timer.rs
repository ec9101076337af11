use std::time::Instant;

/// Keeps track of how long a calculation took, reported through the `log` facade.
pub struct Timer {
    start_time: Instant,
}

impl Timer {
    pub fn now() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Log (at debug level) the elapsed time since the timer was created.
    pub fn log_elapsed(&self, task: &str) {
        log::debug!("{} took {:?}", task, self.start_time.elapsed());
    }
}
