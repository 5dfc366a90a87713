//! 60 Hz frame pacing

use std::time::Duration;

/// Per-frame budgets in microseconds, cycled by frame count. Averages 1/60 s.
pub const WAIT_PATTERN_US: [u64; 3] = [17_000, 17_000, 16_000];

/// Tracks the frame counter and how long each frame may take.
#[derive(Debug, Default)]
pub struct FramePacer {
    frame: u64,
}

impl FramePacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to the next frame and return its number (first frame is 1).
    pub fn begin_frame(&mut self) -> u64 {
        self.frame += 1;
        self.frame
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Time budget of the current frame.
    pub fn budget(&self) -> Duration {
        let index = (self.frame % WAIT_PATTERN_US.len() as u64) as usize;
        Duration::from_micros(WAIT_PATTERN_US[index])
    }

    /// How long to sleep after the frame's work took `elapsed`.
    pub fn remaining(&self, elapsed: Duration) -> Option<Duration> {
        self.budget().checked_sub(elapsed).filter(|d| !d.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_cycles() {
        let mut pacer = FramePacer::new();
        let budgets: Vec<u64> = (0..6)
            .map(|_| {
                pacer.begin_frame();
                pacer.budget().as_micros() as u64
            })
            .collect();
        assert_eq!(budgets, vec![17_000, 16_000, 17_000, 17_000, 16_000, 17_000]);
    }

    #[test]
    fn test_average_is_sixty_hz() {
        let total: u64 = WAIT_PATTERN_US.iter().sum();
        assert_eq!(total, 50_000);
    }

    #[test]
    fn test_remaining() {
        let mut pacer = FramePacer::new();
        pacer.begin_frame();
        assert_eq!(
            pacer.remaining(Duration::from_micros(5_000)),
            Some(Duration::from_micros(12_000))
        );
        assert_eq!(pacer.remaining(Duration::from_micros(17_000)), None);
        assert_eq!(pacer.remaining(Duration::from_millis(40)), None);
    }
}
