use log::debug;
use std::time::{Duration, Instant};

pub struct PerfTimer {
    start: Instant,
    label: &'static str,
}

impl PerfTimer {
    pub fn start(label: &'static str) -> Self {
        Self {
            start: Instant::now(),
            label,
        }
    }

    pub fn stop(self) -> Duration {
        let duration = self.start.elapsed();
        debug!("[PERF] {}: {:?}", self.label, duration);
        duration
    }
}
