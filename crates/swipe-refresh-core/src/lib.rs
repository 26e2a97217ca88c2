//! Pull-to-refresh gesture controller.
//!
//! This crate is headless: it turns pointer and nested-scroll input into
//! the numeric state a refresh indicator is drawn with, and tells the host
//! when a gesture asked for a refresh.
//! - Spinner physics: [`physics::compute_visual`]
//! - Pointer tracking: [`GestureTracker`]
//! - Indicator transitions: [`AnimationSequencer`]
//! - Scroll chain splitting: [`NestedScrollCoordinator`]
//! - The state machine tying them together: [`SwipeRefresh`]
//!
//! Animations are advanced by the host's frame clock through
//! [`SwipeRefresh::advance_animation_to`] or
//! [`SwipeRefresh::advance_animation_by`].

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod animation;
mod config;
mod controller;
mod error;
mod event;
mod geometry;
pub mod nested;
pub mod physics;
mod tracker;
mod visual;

pub use animation::{
    AnimationFrame, AnimationHandle, AnimationKind, AnimationSequencer, AnimationTask, Easing,
};
pub use config::{
    IndicatorSize, RefreshConfig, CIRCLE_DIAMETER, CIRCLE_DIAMETER_LARGE, DEFAULT_CIRCLE_TARGET,
    DEFAULT_TOUCH_SLOP, MEDIUM_ANIMATION_MS,
};
pub use controller::{RefreshCallback, RefreshState, SwipeRefresh};
pub use error::ConfigError;
pub use event::{PointerEvent, PointerId};
pub use geometry::{Axis, Point};
pub use nested::{
    ChildScrollProbe, NestedScrollAncestor, NestedScrollCoordinator, NoAncestor,
    OverscrollAccumulator, ScrollableChild,
};
pub use physics::{OpacityTarget, SpinnerFrame};
pub use tracker::{DragSession, GestureTracker, TrackerOutput, DRAG_RATE};
pub use visual::SpinnerVisualState;
