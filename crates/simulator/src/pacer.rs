//! Best-effort fixed-rate frame pacing.

use std::time::{Duration, Instant};
use tracing::trace;

/// Sleeps between frames to hold a target rate.
///
/// When a frame overruns its slot the schedule restarts from now instead of
/// bursting to catch up.
#[derive(Debug)]
pub struct FramePacer {
    frame: Duration,
    next_deadline: Instant,
    frames: u64,
    overruns: u64,
}

impl FramePacer {
    /// Pacer for `rate` frames per second. A rate of zero disables sleeping.
    pub fn new(rate: u32) -> Self {
        let frame = if rate == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs(1) / rate
        };
        Self {
            frame,
            next_deadline: Instant::now() + frame,
            frames: 0,
            overruns: 0,
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame
    }

    /// Frames waited for so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frames that finished after their deadline.
    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    /// Block until the current frame slot ends.
    pub fn wait(&mut self) {
        self.frames += 1;
        if self.frame.is_zero() {
            return;
        }

        let now = Instant::now();
        if now < self.next_deadline {
            std::thread::sleep(self.next_deadline - now);
            self.next_deadline += self.frame;
        } else {
            self.overruns += 1;
            trace!(late_by = ?(now - self.next_deadline), "Frame overran");
            self.next_deadline = now + self.frame;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_duration() {
        assert_eq!(FramePacer::new(60).frame_duration(), Duration::from_secs(1) / 60);
        assert_eq!(FramePacer::new(0).frame_duration(), Duration::ZERO);
    }

    #[test]
    fn test_wait_holds_rate() {
        let mut pacer = FramePacer::new(200);
        let start = Instant::now();
        for _ in 0..10 {
            pacer.wait();
        }
        // 10 slots of 5ms each.
        assert!(start.elapsed() >= Duration::from_millis(45));
        assert_eq!(pacer.frames(), 10);
    }

    #[test]
    fn test_unpaced_never_sleeps() {
        let mut pacer = FramePacer::new(0);
        let start = Instant::now();
        for _ in 0..1_000 {
            pacer.wait();
        }
        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(pacer.overruns(), 0);
    }
}
