//! Test harness wrapping a [`SwipeRefresh`] with a frame clock, a fake
//! child, a recording ancestor and a refresh counter.

use crate::ancestor::RecordingAncestor;
use crate::child::FakeChild;
use crate::clock::FrameClock;
use crate::gesture::GestureScript;
use serde::Serialize;
use std::cell::Cell;
use std::rc::Rc;
use swipe_refresh_core::{
    Axis, PointerId, RefreshConfig, RefreshState, SpinnerVisualState, SwipeRefresh,
};

/// Serializable view of the controller for snapshot comparisons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Lifecycle state
    pub state: RefreshState,
    /// Refresh flag
    pub refreshing: bool,
    /// Nested overscroll
    pub total_unconsumed: f32,
    /// Animation running
    pub animating: bool,
    /// Indicator visuals
    pub visual: SpinnerVisualState,
}

/// Test harness for a refresh controller.
#[derive(Debug)]
pub struct RefreshHarness {
    refresh: SwipeRefresh,
    clock: FrameClock,
    child: FakeChild,
    ancestor: Option<RecordingAncestor>,
    refreshes: Rc<Cell<u32>>,
}

impl RefreshHarness {
    /// Harness around a fresh controller with a child at its start edge.
    #[must_use]
    pub fn new(config: RefreshConfig) -> Self {
        let mut refresh = SwipeRefresh::new(config);
        let child = FakeChild::at_start();
        refresh.set_child(child.clone());
        let refreshes = Rc::new(Cell::new(0));
        let counter = Rc::clone(&refreshes);
        refresh.set_on_refresh(move || counter.set(counter.get() + 1));
        Self {
            refresh,
            clock: FrameClock::default(),
            child,
            ancestor: None,
            refreshes,
        }
    }

    /// Harness with a drag threshold and otherwise default config.
    #[must_use]
    pub fn with_threshold(threshold: f32) -> Self {
        Self::new(RefreshConfig::default().with_threshold(threshold))
    }

    /// Install a recording ancestor.
    #[must_use]
    pub fn ancestor(mut self, ancestor: RecordingAncestor) -> Self {
        self.refresh.set_ancestor(ancestor.clone());
        self.ancestor = Some(ancestor);
        self
    }

    /// Use a different frame clock.
    #[must_use]
    pub const fn clock(mut self, clock: FrameClock) -> Self {
        self.clock = clock;
        self
    }

    // === Access ===

    /// The controller.
    #[must_use]
    pub const fn refresh(&self) -> &SwipeRefresh {
        &self.refresh
    }

    /// The controller, mutably.
    pub fn refresh_mut(&mut self) -> &mut SwipeRefresh {
        &mut self.refresh
    }

    /// The fake child.
    #[must_use]
    pub const fn child(&self) -> &FakeChild {
        &self.child
    }

    /// The recording ancestor, if installed.
    #[must_use]
    pub const fn recorded_ancestor(&self) -> Option<&RecordingAncestor> {
        self.ancestor.as_ref()
    }

    /// Times the refresh notification fired.
    #[must_use]
    pub fn refresh_count(&self) -> u32 {
        self.refreshes.get()
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> RefreshState {
        self.refresh.state()
    }

    /// Visual state.
    #[must_use]
    pub const fn visual(&self) -> &SpinnerVisualState {
        self.refresh.visual()
    }

    /// A script matching the controller's axis and slop.
    #[must_use]
    pub fn script(&self) -> GestureScript {
        let config = self.refresh.config();
        GestureScript::new(config.orientation, config.touch_slop)
    }

    // === Input ===

    /// Play a scripted gesture.
    pub fn play(&mut self, script: &GestureScript) -> Vec<bool> {
        script.play(&mut self.refresh)
    }

    /// Single-finger pull to `overscroll`, then release.
    pub fn pull_and_release(&mut self, overscroll: f32) -> &mut Self {
        let id = PointerId(0);
        let script = self.script().pull(id, overscroll).release(id);
        self.play(&script);
        self
    }

    /// One nested scroll session overscrolling by `total` in `steps` equal
    /// post-scrolls, then stopping.
    pub fn nested_overscroll(&mut self, axis: Axis, total: f32, steps: u32) -> &mut Self {
        self.begin_nested(axis);
        let steps = steps.max(1);
        let step = total / steps as f32;
        for _ in 0..steps {
            match axis {
                Axis::Vertical => self.refresh.on_nested_scroll(0.0, 0.0, 0.0, -step),
                Axis::Horizontal => self.refresh.on_nested_scroll(0.0, 0.0, -step, 0.0),
            }
        }
        self.refresh.on_stop_nested_scroll();
        self
    }

    /// Start and accept a nested scroll. Returns whether it was accepted.
    pub fn begin_nested(&mut self, axis: Axis) -> bool {
        let accepted = self.refresh.on_start_nested_scroll(axis);
        if accepted {
            self.refresh.on_nested_scroll_accepted(axis);
        }
        accepted
    }

    // === Time ===

    /// Run animations until idle. Returns the frames used.
    pub fn settle(&mut self) -> u32 {
        self.clock.run_until_idle(&mut self.refresh)
    }

    /// Advance up to `count` frames.
    pub fn tick(&mut self, count: u32) -> u32 {
        self.clock.tick_n(&mut self.refresh, count)
    }

    /// Frame clock state.
    #[must_use]
    pub const fn frame_clock(&self) -> &FrameClock {
        &self.clock
    }

    // === Snapshots ===

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.refresh.state(),
            refreshing: self.refresh.is_refreshing(),
            total_unconsumed: self.refresh.total_unconsumed(),
            animating: self.refresh.is_animating(),
            visual: *self.refresh.visual(),
        }
    }

    /// Current snapshot as JSON.
    #[must_use]
    pub fn snapshot_json(&self) -> serde_json::Value {
        serde_json::to_value(self.snapshot()).unwrap_or(serde_json::Value::Null)
    }

    // === Assertions ===

    /// Assert the lifecycle state.
    ///
    /// # Panics
    ///
    /// Panics if the state differs.
    pub fn assert_state(&self, expected: RefreshState) -> &Self {
        assert_eq!(
            self.refresh.state(),
            expected,
            "unexpected refresh state; snapshot: {}",
            self.snapshot_json()
        );
        self
    }

    /// Assert the notification count.
    ///
    /// # Panics
    ///
    /// Panics if the count differs.
    pub fn assert_refresh_count(&self, expected: u32) -> &Self {
        assert_eq!(self.refresh_count(), expected, "unexpected refresh count");
        self
    }

    /// Assert the idle invariants: hidden, nothing accumulated, no session,
    /// no animation.
    ///
    /// # Panics
    ///
    /// Panics if any of them fails.
    pub fn assert_idle(&self) -> &Self {
        self.assert_state(RefreshState::Idle);
        assert!(!self.refresh.visual().visible, "indicator still visible");
        assert_eq!(self.refresh.total_unconsumed(), 0.0);
        assert!(self.refresh.drag_session().is_empty(), "drag session left");
        assert!(!self.refresh.is_animating(), "animation still running");
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_harness_is_idle() {
        let harness = RefreshHarness::with_threshold(64.0);
        harness.assert_idle().assert_refresh_count(0);
    }

    #[test]
    fn test_pull_and_release_counts_refresh() {
        let mut harness = RefreshHarness::with_threshold(64.0);
        harness.pull_and_release(100.0).settle();
        harness
            .assert_state(RefreshState::Refreshing)
            .assert_refresh_count(1);
    }

    #[test]
    fn test_child_scroll_blocks_pull() {
        let mut harness = RefreshHarness::with_threshold(64.0);
        harness.child().set_can_scroll(true);
        harness.pull_and_release(100.0);
        harness.assert_idle();
        assert!(harness.child().queries() > 0);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let harness = RefreshHarness::with_threshold(64.0);
        let json = harness.snapshot_json();
        assert_eq!(json["state"], "Idle");
        assert_eq!(json["refreshing"], false);
        assert_eq!(json["visual"]["opacity"], 255);
    }

    #[test]
    fn test_nested_overscroll_with_ancestor() {
        let ancestor = RecordingAncestor::new(0.0);
        let mut harness = RefreshHarness::with_threshold(64.0).ancestor(ancestor);
        harness.nested_overscroll(Axis::Vertical, 90.0, 3).settle();
        harness.assert_refresh_count(1);
        let log = harness.recorded_ancestor().map(RecordingAncestor::log).unwrap();
        assert_eq!(log.starts, vec![Axis::Vertical]);
        assert_eq!(log.scrolls.len(), 3);
        assert_eq!(log.stops, 1);
    }
}
