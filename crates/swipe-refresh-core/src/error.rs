//! Error types for swipe-refresh configuration.

use thiserror::Error;

/// Errors produced while building or loading a [`RefreshConfig`](crate::RefreshConfig).
///
/// Gesture and scroll handling never fail; only configuration does.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Drag distance threshold must be strictly positive.
    #[error("drag distance threshold must be positive, got {0}")]
    NonPositiveThreshold(f32),

    /// Display density must be strictly positive.
    #[error("display density must be positive, got {0}")]
    NonPositiveDensity(f32),

    /// Touch slop cannot be negative.
    #[error("touch slop must not be negative, got {0}")]
    NegativeTouchSlop(f32),

    /// A numeric field was NaN or infinite.
    #[error("{field} must be finite")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The TOML document could not be parsed.
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
}
