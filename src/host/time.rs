//! Wall clock backed by the operating system

use std::thread;
use std::time::{Duration, Instant};

use crate::sim::clock::Clock;

/// Monotonic clock measured from its creation
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn sleep_hint(&mut self, ms: u64) {
        thread::sleep(Duration::from_millis(ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sleep_advances_clock() {
        let mut clock = SystemClock::new();
        let before = clock.now_ms();
        clock.sleep_hint(5);
        assert!(clock.now_ms() >= before + 5);
    }
}
