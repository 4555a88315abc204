//! Frame timing utilities
//!
//! [`FramePacer`] holds a render loop to a target frame period and hands
//! back the measured delta time; [`FpsCounter`] aggregates a once-per-second
//! frame rate report.

use std::time::{Duration, Instant};

/// Holds the render loop to a fixed frame period.
///
/// The wait is computed in signed milliseconds: a frame that overruns its
/// budget yields a negative wait and simply doesn't sleep. An unsigned
/// subtraction here would underflow on slow frames and sleep for days.
pub struct FramePacer {
    target_frame_ms: i64,
    last_frame: Instant,
}

/// Signed time-to-wait. Only waits inside `(0, target]` are honored.
fn wait_for_budget(target_ms: i64, elapsed_ms: i64) -> Option<u64> {
    let wait = target_ms - elapsed_ms;
    if wait > 0 && wait <= target_ms {
        Some(wait as u64)
    } else {
        None
    }
}

impl FramePacer {
    /// Create a pacer targeting `fps` frames per second
    pub fn new(fps: u32) -> Self {
        Self {
            target_frame_ms: i64::from(1000 / fps.max(1)),
            last_frame: Instant::now(),
        }
    }

    /// Sleep off the remainder of the frame budget, then return the time
    /// since the previous call in seconds.
    pub fn begin_frame(&mut self) -> f32 {
        let elapsed_ms = self.last_frame.elapsed().as_millis() as i64;
        if let Some(wait_ms) = wait_for_budget(self.target_frame_ms, elapsed_ms) {
            std::thread::sleep(Duration::from_millis(wait_ms));
        }

        let now = Instant::now();
        let delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        delta
    }
}

/// Rolling frames-per-second accounting
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsCounter {
    /// Create a counter with an empty window
    pub fn new() -> Self {
        Self {
            window_start: Instant::now(),
            frames: 0,
        }
    }

    /// Count one frame. Roughly once per second, returns
    /// `(fps, average frame time in ms)` and starts a new window.
    pub fn tick(&mut self) -> Option<(u32, u32)> {
        self.frames += 1;
        let elapsed = self.window_start.elapsed();
        if elapsed < Duration::from_secs(1) {
            return None;
        }

        let avg_frame_ms = elapsed.as_millis() as u32 / self.frames;
        let report = (self.frames, avg_frame_ms);
        self.frames = 0;
        self.window_start = Instant::now();
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_frames_wait_out_the_budget() {
        assert_eq!(wait_for_budget(33, 10), Some(23));
        assert_eq!(wait_for_budget(33, 33), None);
    }

    #[test]
    fn slow_frames_never_sleep() {
        // 10ms over budget: the signed delta goes negative instead of
        // wrapping into an enormous unsigned sleep.
        assert_eq!(wait_for_budget(33, 43), None);
        assert_eq!(wait_for_budget(33, i64::MAX), None);
    }
}
