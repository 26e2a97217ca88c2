//! Slingshot mapping from accumulated overscroll to spinner visuals.
//!
//! Pure functions only. The indicator tracks the finger linearly up to the
//! drag threshold, then keeps moving with a spring-like resistance for up to
//! twice the slingshot distance beyond it.

use crate::config::RefreshConfig;
use serde::{Deserialize, Serialize};

/// Fully opaque indicator.
pub const MAX_ALPHA: u8 = 255;
/// Dimmed indicator shown while the pull is still below the threshold.
pub const STARTING_PROGRESS_ALPHA: u8 = (0.3 * MAX_ALPHA as f32) as u8;
/// Largest fraction of the arc drawn while dragging.
pub const MAX_PROGRESS_ANGLE: f32 = 0.8;

/// Opacity level the indicator should fade toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpacityTarget {
    /// Below the threshold
    Starting,
    /// At or past the threshold
    Full,
}

impl OpacityTarget {
    /// Alpha value for this level.
    #[must_use]
    pub const fn alpha(self) -> u8 {
        match self {
            Self::Starting => STARTING_PROGRESS_ALPHA,
            Self::Full => MAX_ALPHA,
        }
    }
}

/// Visual parameters for one overscroll distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinnerFrame {
    /// `|d| / T` clamped to `[0, 1]`
    pub drag_percent: f32,
    /// Arrow/trim progress; zero until 40% of the threshold
    pub adjusted_percent: f32,
    /// Spring tension past the threshold, `[0, 0.5]`
    pub tension_percent: f32,
    /// Indicator offset along the active axis
    pub offset: f32,
    /// Rotation in turns
    pub rotation: f32,
    /// Arc start fraction
    pub trim_start: f32,
    /// Arc end fraction
    pub trim_end: f32,
    /// Arrow head scale
    pub arrow_scale: f32,
    /// Indicator scale when scaling instead of clipping
    pub scale_progress: f32,
    /// Opacity the indicator should fade toward
    pub target_opacity: OpacityTarget,
}

/// Divide, treating a non-positive or non-finite divisor as "no ratio".
fn ratio(numerator: f32, denominator: f32) -> f32 {
    if denominator > 0.0 && denominator.is_finite() {
        numerator / denominator
    } else {
        0.0
    }
}

/// Extra travel past the rest offset that maps to a full pull.
#[must_use]
pub fn slingshot_distance(config: &RefreshConfig) -> f32 {
    if config.using_custom_start_offset {
        config.trigger_offset - config.rest_offset
    } else {
        config.trigger_offset
    }
}

/// Offset the indicator parks at while refreshing.
#[must_use]
pub fn trigger_rest_offset(config: &RefreshConfig) -> f32 {
    config.rest_offset + slingshot_distance(config)
}

/// Compute the spinner visuals for an overscroll distance.
///
/// ```
/// use swipe_refresh_core::{physics, RefreshConfig};
///
/// let config = RefreshConfig::default().with_threshold(128.0);
/// let frame = physics::compute_visual(100.0, &config);
/// assert!((frame.drag_percent - 0.78125).abs() < 1e-6);
/// assert!((frame.arrow_scale - 0.6354).abs() < 1e-3);
/// ```
#[must_use]
pub fn compute_visual(overscroll: f32, config: &RefreshConfig) -> SpinnerFrame {
    let threshold = config.drag_distance_threshold;
    let distance = overscroll.abs();

    let drag_percent = ratio(distance, threshold).clamp(0.0, 1.0);
    let adjusted_percent = (drag_percent - 0.4).max(0.0) * 5.0 / 3.0;
    let extra = (distance - threshold.max(0.0)).max(0.0);

    let slingshot = slingshot_distance(config);
    let tension_slingshot_percent = if slingshot > 0.0 {
        ratio(extra.min(slingshot * 2.0), slingshot)
    } else {
        0.0
    };
    let quarter = tension_slingshot_percent / 4.0;
    let tension_percent = (quarter - quarter.powi(2)) * 2.0;
    let extra_move = slingshot * tension_percent * 2.0;

    let offset = config.rest_offset + slingshot * drag_percent + extra_move;
    let rotation = (-0.25 + 0.4 * adjusted_percent + tension_percent * 2.0) * 0.5;

    let target_opacity = if overscroll < threshold {
        OpacityTarget::Starting
    } else {
        OpacityTarget::Full
    };

    SpinnerFrame {
        drag_percent,
        adjusted_percent,
        tension_percent,
        offset,
        rotation,
        trim_start: 0.0,
        trim_end: MAX_PROGRESS_ANGLE.min(adjusted_percent * 0.8),
        arrow_scale: adjusted_percent.min(1.0),
        scale_progress: ratio(overscroll, threshold).clamp(0.0, 1.0),
        target_opacity,
    }
}
