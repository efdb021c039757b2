//! Logical clock and frame pacing
//!
//! Wall time only decides how long to wait between ticks. The simulation
//! itself advances exactly one logical tick per update, never sub-ticks.

/// Source of wall time
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> u64;

    /// Wait for roughly `ms` milliseconds. Pure wait, no state mutation.
    fn sleep_hint(&mut self, ms: u64);
}

/// Outcome of pacing one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTiming {
    /// Time left until the next tick boundary
    pub sleep_ms: u64,
    /// The update overran its budget
    pub late: bool,
}

/// Maps wall time to discrete frames at a fixed rate
#[derive(Debug, Clone)]
pub struct FramePacer {
    frame_ms: u64,
    next_deadline: Option<u64>,
    ticks: u64,
    late_frames: u64,
}

impl FramePacer {
    pub fn new(fps: u32) -> Self {
        Self {
            frame_ms: 1000 / u64::from(fps.max(1)),
            next_deadline: None,
            ticks: 0,
            late_frames: 0,
        }
    }

    /// Milliseconds per logical tick
    pub fn frame_ms(&self) -> u64 {
        self.frame_ms
    }

    /// Logical ticks completed so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn late_frames(&self) -> u64 {
        self.late_frames
    }

    /// Mark the start of the first frame
    pub fn start(&mut self, clock: &impl Clock) {
        self.next_deadline = Some(clock.now_ms() + self.frame_ms);
    }

    /// Close the current frame: count the tick and compute the budget left
    /// until the next boundary. A late frame resets the deadline rather than
    /// trying to catch up.
    pub fn finish_frame(&mut self, clock: &impl Clock) -> FrameTiming {
        self.ticks += 1;
        let now = clock.now_ms();
        let deadline = self.next_deadline.unwrap_or(now + self.frame_ms);

        if now > deadline {
            self.late_frames += 1;
            self.next_deadline = Some(now + self.frame_ms);
            log::debug!("Frame {} late by {} ms", self.ticks, now - deadline);
            FrameTiming {
                sleep_ms: 0,
                late: true,
            }
        } else {
            self.next_deadline = Some(deadline + self.frame_ms);
            FrameTiming {
                sleep_ms: deadline - now,
                late: false,
            }
        }
    }

    /// Close the frame and wait out the remaining budget
    pub fn pace(&mut self, clock: &mut impl Clock) -> FrameTiming {
        let timing = self.finish_frame(clock);
        if timing.sleep_ms > 0 {
            clock.sleep_hint(timing.sleep_ms);
        }
        timing
    }
}

/// Clock driven by hand, for tests and headless replays
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    pub now: u64,
}

impl ManualClock {
    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now
    }

    fn sleep_hint(&mut self, ms: u64) {
        self.now += ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_budget() {
        let pacer = FramePacer::new(30);
        assert_eq!(pacer.frame_ms(), 33);
        assert_eq!(FramePacer::new(0).frame_ms(), 1000);
    }

    #[test]
    fn test_on_time_frame_sleeps_remaining_budget() {
        let mut clock = ManualClock::default();
        let mut pacer = FramePacer::new(50);
        pacer.start(&clock);

        clock.advance(5);
        let timing = pacer.finish_frame(&clock);
        assert_eq!(timing, FrameTiming { sleep_ms: 15, late: false });
        assert_eq!(pacer.ticks(), 1);
    }

    #[test]
    fn test_late_frame_is_one_tick() {
        let mut clock = ManualClock::default();
        let mut pacer = FramePacer::new(50);
        pacer.start(&clock);

        // Three frames worth of wall time still count as a single tick
        clock.advance(60);
        let timing = pacer.finish_frame(&clock);
        assert!(timing.late);
        assert_eq!(timing.sleep_ms, 0);
        assert_eq!(pacer.ticks(), 1);
        assert_eq!(pacer.late_frames(), 1);

        // Deadline restarts from the late frame
        clock.advance(4);
        let timing = pacer.finish_frame(&clock);
        assert_eq!(timing, FrameTiming { sleep_ms: 16, late: false });
    }

    #[test]
    fn test_pace_sleeps_on_clock() {
        let mut clock = ManualClock::default();
        let mut pacer = FramePacer::new(50);
        pacer.start(&clock);
        for _ in 0..10 {
            clock.advance(3);
            pacer.pace(&mut clock);
        }
        assert_eq!(clock.now, 200);
        assert_eq!(pacer.late_frames(), 0);
    }
}
