//! Numeric state the rendering layer draws the indicator with.

use crate::animation::AnimationKind;
use crate::config::RefreshConfig;
use crate::physics::{SpinnerFrame, MAX_ALPHA};
use serde::{Deserialize, Serialize};

/// Indicator visuals. Written only by the controller; renderers read it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinnerVisualState {
    /// Position along the active axis, relative to the start edge
    pub offset: f32,
    /// Indicator scale
    pub scale: f32,
    /// Opacity, 0-255
    pub opacity: u8,
    /// Rotation in turns
    pub rotation: f32,
    /// Arc start fraction
    pub trim_start: f32,
    /// Arc end fraction
    pub trim_end: f32,
    /// Arrow head scale
    pub arrow_scale: f32,
    /// Indicator shown at all
    pub visible: bool,
    /// Arrow head drawn
    pub arrow_enabled: bool,
    /// Continuous spin running
    pub spinning: bool,
}

impl Default for SpinnerVisualState {
    fn default() -> Self {
        Self::at_rest(&RefreshConfig::default())
    }
}

impl SpinnerVisualState {
    /// Hidden indicator parked at the rest offset.
    #[must_use]
    pub fn at_rest(config: &RefreshConfig) -> Self {
        Self {
            offset: config.rest_offset,
            scale: if config.scale_indicator { 0.0 } else { 1.0 },
            opacity: MAX_ALPHA,
            rotation: 0.0,
            trim_start: 0.0,
            trim_end: 0.0,
            arrow_scale: 0.0,
            visible: false,
            arrow_enabled: false,
            spinning: false,
        }
    }

    /// Copy the live-drag values of a physics frame.
    pub fn apply_frame(&mut self, frame: &SpinnerFrame) {
        self.trim_start = frame.trim_start;
        self.trim_end = frame.trim_end;
        self.arrow_scale = frame.arrow_scale;
        self.rotation = frame.rotation;
        self.offset = frame.offset;
    }

    /// Write the quantity `kind` animates at eased progress `fraction`.
    pub fn apply_animation(&mut self, kind: AnimationKind, fraction: f32) {
        match kind {
            AnimationKind::ScaleUp => self.scale = fraction,
            AnimationKind::ScaleDown { from_scale } => {
                self.scale = lerp(from_scale, 0.0, fraction);
            }
            AnimationKind::OffsetToTrigger { from, to } => {
                self.offset = lerp(from, to, fraction);
                self.arrow_scale = 1.0 - fraction;
            }
            AnimationKind::OffsetToStart { from, to } => {
                self.offset = lerp(from, to, fraction);
            }
            AnimationKind::ScaleDownToStart {
                from_scale,
                from,
                to,
            } => {
                self.scale = lerp(from_scale, 0.0, fraction);
                self.offset = lerp(from, to, fraction);
            }
            AnimationKind::Fade { from, to } => {
                let alpha = lerp(f32::from(from), f32::from(to), fraction);
                // truncates like the integer alpha of a paint
                self.opacity = alpha.clamp(0.0, f32::from(MAX_ALPHA)) as u8;
            }
        }
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from * (1.0 - t) + to * t
}
