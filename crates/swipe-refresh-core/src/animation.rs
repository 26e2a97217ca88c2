//! Timed indicator transitions advanced by the host's frame clock.
//!
//! The indicator runs at most one transition at a time. Starting a task
//! drops the previous one together with its completion, so a superseded
//! task can never complete. There is no other cancellation path besides
//! [`AnimationSequencer::discard`], which the controller only uses when it
//! force-resets.

use serde::{Deserialize, Serialize};

/// Decelerate curve factor used by the offset transitions.
pub const DECELERATE_INTERPOLATION_FACTOR: f32 = 2.0;
/// Scale-down and scale-down-to-start duration.
pub const SCALE_DOWN_DURATION_MS: u32 = 150;
/// Opacity fade duration.
pub const ALPHA_ANIMATION_DURATION_MS: u32 = 300;
/// Offset-to-trigger duration.
pub const ANIMATE_TO_TRIGGER_DURATION_MS: u32 = 200;
/// Offset-to-start duration.
pub const ANIMATE_TO_START_DURATION_MS: u32 = 200;

// =============================================================================
// Easing
// =============================================================================

/// Interpolation curves for indicator transitions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Easing {
    /// Linear interpolation (no easing)
    #[default]
    Linear,
    /// Cosine ease in and out
    AccelerateDecelerate,
    /// Fast start, slow end: `1 - (1 - t)^(2 * factor)`
    Decelerate {
        /// Curve strength; 1.0 is a plain quadratic ease-out
        factor: f32,
    },
}

impl Easing {
    /// Decelerate curve with the factor the offset transitions use.
    pub const DECELERATE: Self = Self::Decelerate {
        factor: DECELERATE_INTERPOLATION_FACTOR,
    };

    /// Apply easing function to a normalized time value (0.0 to 1.0).
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = clamp_unit(t);
        // endpoints are exact for every curve
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Self::Linear => t,
            Self::AccelerateDecelerate => (((t + 1.0) * std::f32::consts::PI).cos() / 2.0) + 0.5,
            Self::Decelerate { factor } => {
                if (factor - 1.0).abs() < f32::EPSILON {
                    1.0 - (1.0 - t) * (1.0 - t)
                } else {
                    1.0 - (1.0 - t).powf(2.0 * factor)
                }
            }
        }
    }
}

fn clamp_unit(t: f32) -> f32 {
    if t.is_nan() {
        0.0
    } else {
        t.clamp(0.0, 1.0)
    }
}

// =============================================================================
// AnimationKind / AnimationTask
// =============================================================================

/// What a transition animates, with the span it covers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AnimationKind {
    /// Scale 0 → 1
    ScaleUp,
    /// Scale `from_scale` → 0
    ScaleDown {
        /// Scale when the task started
        from_scale: f32,
    },
    /// Offset `from` → `to` (trigger rest), arrow fading 1 → 0 alongside
    OffsetToTrigger {
        /// Start offset
        from: f32,
        /// Trigger rest offset
        to: f32,
    },
    /// Offset `from` → `to` (rest)
    OffsetToStart {
        /// Start offset
        from: f32,
        /// Rest offset
        to: f32,
    },
    /// Scale `from_scale` → 0 while the offset returns `from` → `to`
    ScaleDownToStart {
        /// Scale when the task started
        from_scale: f32,
        /// Start offset
        from: f32,
        /// Rest offset
        to: f32,
    },
    /// Opacity `from` → `to`
    Fade {
        /// Start alpha
        from: u8,
        /// Target alpha
        to: u8,
    },
}

impl AnimationKind {
    /// Short name for diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ScaleUp => "scale-up",
            Self::ScaleDown { .. } => "scale-down",
            Self::OffsetToTrigger { .. } => "offset-to-trigger",
            Self::OffsetToStart { .. } => "offset-to-start",
            Self::ScaleDownToStart { .. } => "scale-down-to-start",
            Self::Fade { .. } => "fade",
        }
    }

    /// Standard duration; scale-up follows the host's medium duration.
    #[must_use]
    pub const fn duration_ms(&self, medium_ms: u32) -> u32 {
        match self {
            Self::ScaleUp => medium_ms,
            Self::ScaleDown { .. } | Self::ScaleDownToStart { .. } => SCALE_DOWN_DURATION_MS,
            Self::OffsetToTrigger { .. } => ANIMATE_TO_TRIGGER_DURATION_MS,
            Self::OffsetToStart { .. } => ANIMATE_TO_START_DURATION_MS,
            Self::Fade { .. } => ALPHA_ANIMATION_DURATION_MS,
        }
    }

    /// Standard interpolation curve.
    #[must_use]
    pub const fn easing(&self) -> Easing {
        match self {
            Self::OffsetToTrigger { .. } | Self::OffsetToStart { .. } => Easing::DECELERATE,
            Self::Fade { .. } => Easing::Linear,
            Self::ScaleUp | Self::ScaleDown { .. } | Self::ScaleDownToStart { .. } => {
                Easing::AccelerateDecelerate
            }
        }
    }

    /// Check if this is an opacity fade toward `alpha`.
    #[must_use]
    pub const fn is_fade_to(&self, alpha: u8) -> bool {
        matches!(self, Self::Fade { to, .. } if *to == alpha)
    }
}

/// A transition plus the completion to hand back when it finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationTask<C> {
    /// What is animated
    pub kind: AnimationKind,
    /// Total duration
    pub duration_ms: u32,
    /// Interpolation curve
    pub easing: Easing,
    /// Returned exactly once, when progress reaches 1
    pub on_complete: Option<C>,
}

impl<C> AnimationTask<C> {
    /// Task with the kind's standard duration and curve.
    #[must_use]
    pub const fn new(kind: AnimationKind, medium_ms: u32) -> Self {
        Self {
            kind,
            duration_ms: kind.duration_ms(medium_ms),
            easing: kind.easing(),
            on_complete: None,
        }
    }

    /// Attach a completion.
    #[must_use]
    pub fn on_complete(mut self, completion: C) -> Self {
        self.on_complete = Some(completion);
        self
    }

    #[cfg(test)]
    const fn with_duration(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

// =============================================================================
// AnimationSequencer
// =============================================================================

/// Identifies one started task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AnimationHandle(pub u64);

/// One step of the running task.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFrame<C> {
    /// Task that produced this frame
    pub handle: AnimationHandle,
    /// What is animated
    pub kind: AnimationKind,
    /// Linear progress, `[0, 1]`
    pub progress: f32,
    /// Eased progress
    pub fraction: f32,
    /// Set on the final frame only
    pub completion: Option<C>,
    /// Whether this was the final frame
    pub finished: bool,
}

#[derive(Debug)]
struct Running<C> {
    handle: AnimationHandle,
    task: AnimationTask<C>,
    elapsed_ms: f32,
}

/// Runs at most one [`AnimationTask`] at a time.
#[derive(Debug)]
pub struct AnimationSequencer<C> {
    active: Option<Running<C>>,
    next_handle: u64,
}

impl<C> Default for AnimationSequencer<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> AnimationSequencer<C> {
    /// Create an idle sequencer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            active: None,
            next_handle: 1,
        }
    }

    /// Start a task, superseding any running one.
    pub fn start(&mut self, task: AnimationTask<C>) -> AnimationHandle {
        let handle = AnimationHandle(self.next_handle);
        self.next_handle += 1;
        if let Some(previous) = self.active.take() {
            log::debug!(
                "animation {} superseded by {}",
                previous.task.kind.name(),
                task.kind.name()
            );
        } else {
            log::debug!("animation {} started", task.kind.name());
        }
        self.active = Some(Running {
            handle,
            task,
            elapsed_ms: 0.0,
        });
        handle
    }

    /// Drop the running task without completing it.
    pub fn discard(&mut self) -> bool {
        self.active.take().is_some()
    }

    /// Whether a task is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Handle of the running task.
    #[must_use]
    pub fn handle(&self) -> Option<AnimationHandle> {
        self.active.as_ref().map(|running| running.handle)
    }

    /// Kind of the running task.
    #[must_use]
    pub fn current_kind(&self) -> Option<AnimationKind> {
        self.active.as_ref().map(|running| running.task.kind)
    }

    /// Linear progress of the running task.
    #[must_use]
    pub fn progress(&self) -> Option<f32> {
        self.active
            .as_ref()
            .map(|running| linear_progress(running.elapsed_ms, running.task.duration_ms))
    }

    /// Move the running task to linear progress `t`.
    ///
    /// Returns `None` when nothing is running. The frame at `t >= 1` carries
    /// the completion and retires the task.
    pub fn advance_to(&mut self, t: f32) -> Option<AnimationFrame<C>> {
        let mut running = self.active.take()?;
        let t = clamp_unit(t);
        running.elapsed_ms = t * running.task.duration_ms as f32;
        Some(self.emit(running, t))
    }

    /// Advance the running task by `dt_ms` milliseconds of frame time.
    pub fn advance_by(&mut self, dt_ms: f32) -> Option<AnimationFrame<C>> {
        let mut running = self.active.take()?;
        running.elapsed_ms += dt_ms.max(0.0);
        let t = linear_progress(running.elapsed_ms, running.task.duration_ms);
        Some(self.emit(running, t))
    }

    /// Build the frame for `running`; it stays active unless finished.
    fn emit(&mut self, running: Running<C>, t: f32) -> AnimationFrame<C> {
        let finished = t >= 1.0;
        let handle = running.handle;
        let kind = running.task.kind;
        let fraction = running.task.easing.apply(t);
        let completion = if finished {
            log::debug!("animation {} finished", kind.name());
            running.task.on_complete
        } else {
            self.active = Some(running);
            None
        };
        AnimationFrame {
            handle,
            kind,
            progress: t,
            fraction,
            completion,
            finished,
        }
    }
}

fn linear_progress(elapsed_ms: f32, duration_ms: u32) -> f32 {
    if duration_ms == 0 {
        1.0
    } else {
        clamp_unit(elapsed_ms / duration_ms as f32)
    }
}
