use std::{collections::VecDeque, time::Duration};

const MEASUREMENTS: usize = 120;

/// Rolling average of how long `World::update` takes
pub struct UpdateTimer {
    durations: VecDeque<Duration>,
    slowest: Duration,
}

impl UpdateTimer {
    pub fn new() -> Self {
        UpdateTimer {
            durations: VecDeque::with_capacity(MEASUREMENTS),
            slowest: Duration::ZERO,
        }
    }

    pub fn record(&mut self, duration: Duration) {
        if self.durations.len() == MEASUREMENTS {
            self.durations.pop_front();
        }
        self.durations.push_back(duration);
        self.slowest = self.slowest.max(duration);
    }

    pub fn average(&self) -> Duration {
        if self.durations.is_empty() {
            return Duration::ZERO;
        }

        let sum: Duration = self.durations.iter().sum();
        sum / (self.durations.len() as u32)
    }

    /// Slowest update since the timer was created
    pub fn slowest(&self) -> Duration {
        self.slowest
    }
}

impl Default for UpdateTimer {
    fn default() -> Self {
        Self::new()
    }
}
