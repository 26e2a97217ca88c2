//! Host-supplied configuration for the refresh controller.
//!
//! All distances are in physical pixels. Defaults are derived from the
//! display density the same way platform widgets derive theirs from dp
//! constants.

use crate::error::ConfigError;
use crate::geometry::Axis;
use serde::{Deserialize, Serialize};

/// Indicator diameter at density 1.0, standard style.
pub const CIRCLE_DIAMETER: f32 = 40.0;
/// Indicator diameter at density 1.0, large style.
pub const CIRCLE_DIAMETER_LARGE: f32 = 56.0;
/// Default trigger offset at density 1.0.
pub const DEFAULT_CIRCLE_TARGET: f32 = 64.0;
/// Default touch slop at density 1.0.
pub const DEFAULT_TOUCH_SLOP: f32 = 8.0;
/// Host "medium" animation duration.
pub const MEDIUM_ANIMATION_MS: u32 = 200;

/// Indicator style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorSize {
    /// Standard spinner
    #[default]
    Standard,
    /// Large spinner
    Large,
}

impl IndicatorSize {
    /// Diameter in pixels for the given display density.
    #[must_use]
    pub fn diameter(self, density: f32) -> f32 {
        let base = match self {
            Self::Standard => CIRCLE_DIAMETER,
            Self::Large => CIRCLE_DIAMETER_LARGE,
        };
        (base * density).trunc()
    }
}

/// Refresh controller configuration.
///
/// Read-only to the gesture core; the host changes it through the
/// controller's setters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Accumulated overscroll needed to trigger a refresh.
    pub drag_distance_threshold: f32,
    /// Indicator offset while hidden at rest.
    pub rest_offset: f32,
    /// Indicator offset a completed pull parks at.
    pub trigger_offset: f32,
    /// Scale the indicator in and out instead of clipping it.
    pub scale_indicator: bool,
    /// The host placed the rest offset explicitly.
    pub using_custom_start_offset: bool,
    /// Minimum movement before a press becomes a drag.
    pub touch_slop: f32,
    /// Display density the pixel defaults were derived from.
    pub density: f32,
    /// Indicator style.
    pub indicator_size: IndicatorSize,
    /// Primary axis for direct touch drags.
    pub orientation: Axis,
    /// Host "medium" animation duration, used by the scale-up transition.
    pub medium_animation_ms: u32,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self::for_density(1.0)
    }
}

impl RefreshConfig {
    /// Defaults for a display density.
    #[must_use]
    pub fn for_density(density: f32) -> Self {
        let indicator_size = IndicatorSize::Standard;
        let trigger_offset = (DEFAULT_CIRCLE_TARGET * density).trunc();
        Self {
            drag_distance_threshold: trigger_offset,
            rest_offset: -indicator_size.diameter(density),
            trigger_offset,
            scale_indicator: false,
            using_custom_start_offset: false,
            touch_slop: (DEFAULT_TOUCH_SLOP * density).trunc(),
            density,
            indicator_size,
            orientation: Axis::Vertical,
            medium_animation_ms: MEDIUM_ANIMATION_MS,
        }
    }

    /// Set the drag distance threshold.
    #[must_use]
    pub const fn with_threshold(mut self, threshold: f32) -> Self {
        self.drag_distance_threshold = threshold;
        self
    }

    /// Set the primary drag axis.
    #[must_use]
    pub const fn with_orientation(mut self, orientation: Axis) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the touch slop.
    #[must_use]
    pub const fn with_touch_slop(mut self, touch_slop: f32) -> Self {
        self.touch_slop = touch_slop;
        self
    }

    /// Place the indicator explicitly. Marks the start offset as custom.
    #[must_use]
    pub const fn with_offsets(mut self, scale: bool, rest: f32, trigger: f32) -> Self {
        self.scale_indicator = scale;
        self.rest_offset = rest;
        self.trigger_offset = trigger;
        self.using_custom_start_offset = true;
        self
    }

    /// Current indicator diameter in pixels.
    #[must_use]
    pub fn diameter(&self) -> f32 {
        self.indicator_size.diameter(self.density)
    }

    /// Check the configuration for values the controller cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("drag_distance_threshold", self.drag_distance_threshold),
            ("rest_offset", self.rest_offset),
            ("trigger_offset", self.trigger_offset),
            ("touch_slop", self.touch_slop),
            ("density", self.density),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
        }
        if self.density <= 0.0 {
            return Err(ConfigError::NonPositiveDensity(self.density));
        }
        if self.drag_distance_threshold <= 0.0 {
            return Err(ConfigError::NonPositiveThreshold(
                self.drag_distance_threshold,
            ));
        }
        if self.touch_slop < 0.0 {
            return Err(ConfigError::NegativeTouchSlop(self.touch_slop));
        }
        Ok(())
    }

    /// Load a configuration from TOML.
    ///
    /// Missing keys fall back to the defaults for the document's `density`
    /// (1.0 when absent), so a file may set only what it changes.
    ///
    /// ```
    /// use swipe_refresh_core::RefreshConfig;
    ///
    /// let config = RefreshConfig::from_toml_str("density = 2.0\nscale_indicator = true").unwrap();
    /// assert_eq!(config.trigger_offset, 128.0);
    /// assert!(config.scale_indicator);
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(source)?;
        let config = file.resolve();
        config.validate()?;
        Ok(config)
    }
}

/// On-disk form: every key optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    drag_distance_threshold: Option<f32>,
    rest_offset: Option<f32>,
    trigger_offset: Option<f32>,
    scale_indicator: Option<bool>,
    using_custom_start_offset: Option<bool>,
    touch_slop: Option<f32>,
    density: Option<f32>,
    indicator_size: Option<IndicatorSize>,
    orientation: Option<Axis>,
    medium_animation_ms: Option<u32>,
}

impl ConfigFile {
    fn resolve(self) -> RefreshConfig {
        let mut config = RefreshConfig::for_density(self.density.unwrap_or(1.0));
        if let Some(size) = self.indicator_size {
            config.indicator_size = size;
            config.rest_offset = -config.diameter();
        }
        if let Some(trigger) = self.trigger_offset {
            config.trigger_offset = trigger;
            config.drag_distance_threshold = trigger;
        }
        if let Some(threshold) = self.drag_distance_threshold {
            config.drag_distance_threshold = threshold;
        }
        if let Some(rest) = self.rest_offset {
            config.rest_offset = rest;
        }
        if let Some(scale) = self.scale_indicator {
            config.scale_indicator = scale;
        }
        if let Some(custom) = self.using_custom_start_offset {
            config.using_custom_start_offset = custom;
        }
        if let Some(slop) = self.touch_slop {
            config.touch_slop = slop;
        }
        if let Some(orientation) = self.orientation {
            config.orientation = orientation;
        }
        if let Some(ms) = self.medium_animation_ms {
            config.medium_animation_ms = ms;
        }
        config
    }
}
