//! Geometric primitives: `Point` and the scroll `Axis`.

use serde::{Deserialize, Serialize};
use std::ops::Sub;

/// A 2D point with x and y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Origin point (0, 0)
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Coordinate of this point along `axis`.
    #[must_use]
    pub const fn along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Vertical => self.y,
            Axis::Horizontal => self.x,
        }
    }

    /// Copy of this point moved by `amount` along `axis`.
    #[must_use]
    pub fn offset_along(&self, axis: Axis, amount: f32) -> Self {
        match axis {
            Axis::Vertical => Self::new(self.x, self.y + amount),
            Axis::Horizontal => Self::new(self.x + amount, self.y),
        }
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Scroll axis a gesture or nested-scroll session runs along.
///
/// Positive deltas along an axis move content toward its end (down or
/// right); negative deltas move it toward its start edge, which is where
/// the refresh indicator lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Top-to-bottom scrolling
    #[default]
    Vertical,
    /// Left-to-right scrolling
    Horizontal,
}

impl Axis {
    /// Slot of this axis in an `[x, y]` pair.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Horizontal => 0,
            Self::Vertical => 1,
        }
    }

    /// Pick this axis' component out of an `(x, y)` pair.
    #[must_use]
    pub const fn pick(self, x: f32, y: f32) -> f32 {
        match self {
            Self::Horizontal => x,
            Self::Vertical => y,
        }
    }

    /// Check if this is the vertical axis.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Vertical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_point_new() {
        let p = Point::new(10.0, 20.0);
        assert_eq!(p.x, 10.0);
        assert_eq!(p.y, 20.0);
    }

    #[test]
    fn test_point_default_is_origin() {
        assert_eq!(Point::default(), Point::ORIGIN);
    }

    #[test]
    fn test_point_sub() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(3.0, 5.0);
        assert_eq!(b - a, Point::new(2.0, 3.0));
    }

    #[test]
    fn test_point_along_axis() {
        let p = Point::new(3.0, 9.0);
        assert_eq!(p.along(Axis::Horizontal), 3.0);
        assert_eq!(p.along(Axis::Vertical), 9.0);
    }

    #[test]
    fn test_point_offset_along_only_touches_one_axis() {
        let p = Point::new(3.0, 9.0);
        assert_eq!(p.offset_along(Axis::Vertical, 8.0), Point::new(3.0, 17.0));
        assert_eq!(p.offset_along(Axis::Horizontal, -8.0), Point::new(-5.0, 9.0));
    }

    #[test]
    fn test_axis_index_matches_pair_layout() {
        assert_eq!(Axis::Horizontal.index(), 0);
        assert_eq!(Axis::Vertical.index(), 1);
        assert_eq!(Axis::Vertical.pick(1.0, 2.0), 2.0);
        assert_eq!(Axis::Horizontal.pick(1.0, 2.0), 1.0);
    }

    #[test]
    fn test_axis_default_is_vertical() {
        assert!(Axis::default().is_vertical());
    }

    proptest! {
        #[test]
        fn prop_offset_along_moves_by_amount(x in -500.0f32..500.0, y in -500.0f32..500.0, d in -100.0f32..100.0) {
            let p = Point::new(x, y);
            for axis in [Axis::Vertical, Axis::Horizontal] {
                let moved = p.offset_along(axis, d);
                prop_assert!((moved.along(axis) - p.along(axis) - d).abs() < 0.001);
            }
        }
    }
}
