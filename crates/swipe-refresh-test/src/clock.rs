//! Deterministic frame clock for driving indicator animations.

use swipe_refresh_core::SwipeRefresh;

/// Frame length of a 60 Hz display, rounded down.
pub const DEFAULT_FRAME_MS: f32 = 16.0;

/// Frames after which [`FrameClock::run_until_idle`] gives up.
pub const MAX_FRAMES: u32 = 1_000;

/// Steps a controller's animations in fixed increments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    frame_ms: f32,
    elapsed_ms: f32,
    frames: u32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_MS)
    }
}

impl FrameClock {
    /// Create a clock with a fixed frame length.
    #[must_use]
    pub const fn new(frame_ms: f32) -> Self {
        Self {
            frame_ms,
            elapsed_ms: 0.0,
            frames: 0,
        }
    }

    /// Frame length.
    #[must_use]
    pub const fn frame_ms(&self) -> f32 {
        self.frame_ms
    }

    /// Time spent on frames that advanced an animation.
    #[must_use]
    pub const fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    /// Frames that advanced an animation.
    #[must_use]
    pub const fn frames(&self) -> u32 {
        self.frames
    }

    /// Advance one frame. Returns whether an animation was running.
    pub fn tick(&mut self, refresh: &mut SwipeRefresh) -> bool {
        let ran = refresh.advance_animation_by(self.frame_ms);
        if ran {
            self.frames += 1;
            self.elapsed_ms += self.frame_ms;
        }
        ran
    }

    /// Advance `count` frames, stopping early when nothing is running.
    pub fn tick_n(&mut self, refresh: &mut SwipeRefresh, count: u32) -> u32 {
        let mut ran = 0;
        while ran < count && self.tick(refresh) {
            ran += 1;
        }
        ran
    }

    /// Advance until no animation is running. Returns the frames used.
    ///
    /// # Panics
    ///
    /// Panics if animations keep running for [`MAX_FRAMES`] frames.
    pub fn run_until_idle(&mut self, refresh: &mut SwipeRefresh) -> u32 {
        let mut ran = 0;
        while self.tick(refresh) {
            ran += 1;
            assert!(ran < MAX_FRAMES, "animations did not settle in {MAX_FRAMES} frames");
        }
        ran
    }
}
