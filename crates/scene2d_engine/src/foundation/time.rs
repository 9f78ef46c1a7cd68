//! Time management utilities

use std::time::Instant;

/// High-precision timer for frame timing
pub struct Timer {
    last_frame: Instant,
    delta_time: f64,
    total_time: f64,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.delta_time = elapsed.as_secs_f64();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Get the time since the last frame in seconds
    #[must_use]
    pub const fn delta_time(&self) -> f64 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    #[must_use]
    pub const fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Get the current frame count
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Reset the timer to a fresh start
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Measured frames-per-second over a one second sampling window
///
/// Reports 60 until the first full window has elapsed, so consumers that
/// derive a timestep from it start from the nominal rate.
pub struct FpsCounter {
    fps: u32,
    frames: u32,
    window_start: Instant,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsCounter {
    /// Nominal frame rate assumed before the first sample completes
    pub const NOMINAL_FPS: u32 = 60;

    /// Create a new counter
    #[must_use]
    pub fn new() -> Self {
        Self {
            fps: Self::NOMINAL_FPS,
            frames: 0,
            window_start: Instant::now(),
        }
    }

    /// Record one frame; rolls the sampling window when a second has passed
    pub fn frame(&mut self) {
        self.frames += 1;
        let elapsed = self.window_start.elapsed().as_secs_f64();
        if elapsed >= 1.0 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                self.fps = (f64::from(self.frames) / elapsed).round() as u32;
            }
            self.frames = 0;
            self.window_start = Instant::now();
        }
    }

    /// Most recently measured frames per second
    #[must_use]
    pub const fn fps(&self) -> u32 {
        self.fps
    }

    /// Reset to the nominal rate and restart the window
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_accumulates_frames() {
        let mut timer = Timer::new();
        timer.update();
        timer.update();
        assert_eq!(timer.frame_count(), 2);
        assert!(timer.total_time() >= 0.0);
    }

    #[test]
    fn test_fps_counter_starts_nominal() {
        let counter = FpsCounter::new();
        assert_eq!(counter.fps(), FpsCounter::NOMINAL_FPS);
    }

    #[test]
    fn test_fps_counter_reset() {
        let mut counter = FpsCounter::new();
        counter.frame();
        counter.reset();
        assert_eq!(counter.fps(), FpsCounter::NOMINAL_FPS);
    }
}
