//! Nested scroll coordination.
//!
//! One scroll delta travels child → this controller → ancestor. The
//! controller first takes back overscroll it accumulated earlier, then
//! forwards whatever is left to the ancestor. Nothing is created or lost on
//! the way: what each layer reports consumed plus what is left for the
//! child always adds up to the original delta.

use crate::geometry::Axis;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Capabilities
// =============================================================================

/// A further scroll consumer above the controller.
///
/// Every method has a do-nothing default, so an ancestor only overrides the
/// phases it takes part in.
pub trait NestedScrollAncestor {
    /// A nested scroll is starting along `axis`. Return whether to take part.
    fn start_nested_scroll(&mut self, axis: Axis) -> bool {
        let _ = axis;
        false
    }

    /// Offer `(dx, dy)` before the child scrolls. Returns what was consumed.
    fn pre_scroll(&mut self, dx: f32, dy: f32) -> [f32; 2] {
        let _ = (dx, dy);
        [0.0, 0.0]
    }

    /// Report what the child consumed and left over. Returns how far the
    /// ancestor moved this layer in its window.
    fn scroll(
        &mut self,
        consumed_x: f32,
        consumed_y: f32,
        unconsumed_x: f32,
        unconsumed_y: f32,
    ) -> [f32; 2] {
        let _ = (consumed_x, consumed_y, unconsumed_x, unconsumed_y);
        [0.0, 0.0]
    }

    /// The nested scroll ended.
    fn stop_nested_scroll(&mut self) {}

    /// Offer a fling before the child handles it.
    fn pre_fling(&mut self, velocity_x: f32, velocity_y: f32) -> bool {
        let _ = (velocity_x, velocity_y);
        false
    }

    /// Report a fling after the child handled it.
    fn fling(&mut self, velocity_x: f32, velocity_y: f32, consumed: bool) -> bool {
        let _ = (velocity_x, velocity_y, consumed);
        false
    }
}

/// Ancestor that never takes part.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAncestor;

impl NestedScrollAncestor for NoAncestor {}

/// The scrollable content the indicator sits on top of.
pub trait ScrollableChild {
    /// Whether the content can still scroll toward its start edge.
    fn can_scroll_toward_start(&self, axis: Axis) -> bool;

    /// Whether the content runs its own nested scrolling.
    fn supports_nested_scrolling(&self) -> bool {
        true
    }
}

/// Host override for the child scroll check.
pub type ChildScrollCallback = Box<dyn Fn(Axis) -> bool>;

/// Answers "can the child scroll toward start?".
///
/// A host callback, when set, is the whole answer. Otherwise the child is
/// asked; with no child the answer is `false`.
#[derive(Default)]
pub struct ChildScrollProbe {
    child: Option<Box<dyn ScrollableChild>>,
    callback: Option<ChildScrollCallback>,
}

impl fmt::Debug for ChildScrollProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildScrollProbe")
            .field("has_child", &self.child.is_some())
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

impl ChildScrollProbe {
    /// Set or clear the child.
    pub fn set_child(&mut self, child: Option<Box<dyn ScrollableChild>>) {
        self.child = child;
    }

    /// Set or clear the override callback.
    pub fn set_callback(&mut self, callback: Option<ChildScrollCallback>) {
        self.callback = callback;
    }

    /// Check if a child is attached.
    #[must_use]
    pub fn has_child(&self) -> bool {
        self.child.is_some()
    }

    /// Whether the child can scroll toward its start edge along `axis`.
    #[must_use]
    pub fn can_scroll_toward_start(&self, axis: Axis) -> bool {
        if let Some(callback) = &self.callback {
            return callback(axis);
        }
        self.child
            .as_ref()
            .is_some_and(|child| child.can_scroll_toward_start(axis))
    }

    /// Whether the child runs its own nested scrolling. `true` with no child.
    #[must_use]
    pub fn supports_nested_scrolling(&self) -> bool {
        self.child
            .as_ref()
            .map_or(true, |child| child.supports_nested_scrolling())
    }
}

// =============================================================================
// OverscrollAccumulator
// =============================================================================

/// Overscroll gathered from nested scrolls the child could not use.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OverscrollAccumulator {
    total_unconsumed: f32,
}

impl OverscrollAccumulator {
    /// Current total, never negative.
    #[must_use]
    pub const fn total(&self) -> f32 {
        self.total_unconsumed
    }

    /// Check if nothing is accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_unconsumed <= 0.0
    }

    /// Add the magnitude of `amount`.
    pub fn add(&mut self, amount: f32) {
        if amount.is_finite() {
            self.total_unconsumed += amount.abs();
        }
    }

    /// Take up to `delta` back out. Returns the amount taken.
    pub fn consume(&mut self, delta: f32) -> f32 {
        if delta <= 0.0 || self.is_empty() {
            return 0.0;
        }
        let taken = delta.min(self.total_unconsumed);
        self.total_unconsumed -= taken;
        if self.total_unconsumed < 0.0 {
            self.total_unconsumed = 0.0;
        }
        taken
    }

    /// Return the total and reset to zero.
    pub fn take(&mut self) -> f32 {
        std::mem::take(&mut self.total_unconsumed)
    }

    /// Reset to zero.
    pub fn reset(&mut self) {
        self.total_unconsumed = 0.0;
    }
}

// =============================================================================
// NestedScrollCoordinator
// =============================================================================

/// Result of one pre-scroll.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PreScrollOutcome {
    /// Total consumed, by this layer and the ancestor, per axis
    pub consumed: [f32; 2],
    /// Part of the consumption that came out of the accumulator
    pub consumed_here: f32,
    /// Accumulator was drained to zero with delta still left over
    pub drained_with_leftover: bool,
}

impl PreScrollOutcome {
    /// Whether the accumulator changed.
    #[must_use]
    pub fn moved_indicator(&self) -> bool {
        self.consumed_here > 0.0
    }
}

/// Splits scroll deltas between the indicator and the ancestor.
pub struct NestedScrollCoordinator {
    accumulator: OverscrollAccumulator,
    axis: Axis,
    in_progress: bool,
    ancestor: Box<dyn NestedScrollAncestor>,
    ancestor_engaged: bool,
    child_role_enabled: bool,
    probe: ChildScrollProbe,
}

impl fmt::Debug for NestedScrollCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NestedScrollCoordinator")
            .field("accumulator", &self.accumulator)
            .field("axis", &self.axis)
            .field("in_progress", &self.in_progress)
            .field("ancestor_engaged", &self.ancestor_engaged)
            .field("child_role_enabled", &self.child_role_enabled)
            .field("probe", &self.probe)
            .finish_non_exhaustive()
    }
}

impl Default for NestedScrollCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl NestedScrollCoordinator {
    /// Coordinator with no ancestor and no child.
    #[must_use]
    pub fn new() -> Self {
        Self {
            accumulator: OverscrollAccumulator::default(),
            axis: Axis::Vertical,
            in_progress: false,
            ancestor: Box::new(NoAncestor),
            ancestor_engaged: false,
            child_role_enabled: true,
            probe: ChildScrollProbe::default(),
        }
    }

    /// Replace the ancestor consumer.
    pub fn set_ancestor(&mut self, ancestor: Box<dyn NestedScrollAncestor>) {
        if self.ancestor_engaged {
            self.ancestor.stop_nested_scroll();
            self.ancestor_engaged = false;
        }
        self.ancestor = ancestor;
    }

    /// Enable or disable forwarding to the ancestor.
    pub fn set_child_role_enabled(&mut self, enabled: bool) {
        if !enabled && self.ancestor_engaged {
            self.ancestor.stop_nested_scroll();
            self.ancestor_engaged = false;
        }
        self.child_role_enabled = enabled;
    }

    /// Whether forwarding to the ancestor is enabled.
    #[must_use]
    pub const fn child_role_enabled(&self) -> bool {
        self.child_role_enabled
    }

    /// Child scroll check.
    #[must_use]
    pub const fn probe(&self) -> &ChildScrollProbe {
        &self.probe
    }

    /// Mutable child scroll check.
    pub fn probe_mut(&mut self) -> &mut ChildScrollProbe {
        &mut self.probe
    }

    /// Axis of the current or last session.
    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    /// Whether a nested scroll is running.
    #[must_use]
    pub const fn is_in_progress(&self) -> bool {
        self.in_progress
    }

    /// Whether the ancestor accepted the current session.
    #[must_use]
    pub const fn is_ancestor_engaged(&self) -> bool {
        self.ancestor_engaged
    }

    /// Accumulated overscroll.
    #[must_use]
    pub const fn total_unconsumed(&self) -> f32 {
        self.accumulator.total()
    }

    /// A nested scroll along `axis` was accepted.
    pub fn on_scroll_accepted(&mut self, axis: Axis) {
        self.accumulator.reset();
        self.axis = axis;
        self.in_progress = true;
        self.ancestor_engaged = self.child_role_enabled && self.ancestor.start_nested_scroll(axis);
        log::debug!(
            "nested scroll accepted on {axis:?}, ancestor engaged: {}",
            self.ancestor_engaged
        );
    }

    /// Pre-scroll: take back accumulated overscroll, then offer the rest
    /// to the ancestor.
    pub fn pre_scroll(&mut self, dx: f32, dy: f32) -> PreScrollOutcome {
        let index = self.axis.index();
        let delta = self.axis.pick(dx, dy);
        let had_overscroll = !self.accumulator.is_empty();

        let consumed_here = self.accumulator.consume(delta);
        let mut consumed = [0.0, 0.0];
        consumed[index] = consumed_here;
        let drained_with_leftover =
            had_overscroll && self.accumulator.is_empty() && delta - consumed_here > 0.0;

        if self.ancestor_engaged {
            let remainder = [dx - consumed[0], dy - consumed[1]];
            let by_ancestor = self.ancestor.pre_scroll(remainder[0], remainder[1]);
            for axis in 0..2 {
                consumed[axis] += clamp_toward(by_ancestor[axis], remainder[axis]);
            }
        }

        PreScrollOutcome {
            consumed,
            consumed_here,
            drained_with_leftover,
        }
    }

    /// Post-scroll: forward to the ancestor, then accumulate whatever is
    /// still left pulling away from rest. Returns whether the total changed.
    pub fn on_scroll(&mut self, consumed: [f32; 2], unconsumed: [f32; 2]) -> bool {
        let offset_in_window = if self.ancestor_engaged {
            self.ancestor
                .scroll(consumed[0], consumed[1], unconsumed[0], unconsumed[1])
        } else {
            [0.0, 0.0]
        };
        let index = self.axis.index();
        let residual = unconsumed[index] + offset_in_window[index];
        if residual < 0.0 && !self.probe.can_scroll_toward_start(self.axis) {
            self.accumulator.add(residual);
            log::trace!(
                "nested overscroll {residual}, total {}",
                self.accumulator.total()
            );
            return true;
        }
        false
    }

    /// The nested scroll stopped. Returns the accumulated total, now reset.
    pub fn on_stop(&mut self) -> f32 {
        self.in_progress = false;
        if self.ancestor_engaged {
            self.ancestor.stop_nested_scroll();
            self.ancestor_engaged = false;
        }
        self.accumulator.take()
    }

    /// Pass a pre-fling to the ancestor.
    pub fn pre_fling(&mut self, velocity_x: f32, velocity_y: f32) -> bool {
        self.ancestor_engaged && self.ancestor.pre_fling(velocity_x, velocity_y)
    }

    /// Pass a fling to the ancestor.
    pub fn fling(&mut self, velocity_x: f32, velocity_y: f32, consumed: bool) -> bool {
        self.ancestor_engaged && self.ancestor.fling(velocity_x, velocity_y, consumed)
    }

    /// Clear the accumulated overscroll.
    pub fn reset(&mut self) {
        self.accumulator.reset();
    }
}

/// Clamp an ancestor's consumption to what it was offered.
fn clamp_toward(value: f32, offered: f32) -> f32 {
    if !value.is_finite() {
        return 0.0;
    }
    if offered >= 0.0 {
        value.clamp(0.0, offered)
    } else {
        value.clamp(offered, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Ancestor consuming a fixed fraction of every pre-scroll.
    struct Greedy {
        fraction: f32,
        window_offset: [f32; 2],
        stopped: Rc<Cell<u32>>,
    }

    impl Greedy {
        fn new(fraction: f32) -> Self {
            Self {
                fraction,
                window_offset: [0.0, 0.0],
                stopped: Rc::new(Cell::new(0)),
            }
        }
    }

    impl NestedScrollAncestor for Greedy {
        fn start_nested_scroll(&mut self, _axis: Axis) -> bool {
            true
        }

        fn pre_scroll(&mut self, dx: f32, dy: f32) -> [f32; 2] {
            [dx * self.fraction, dy * self.fraction]
        }

        fn scroll(&mut self, _: f32, _: f32, _: f32, _: f32) -> [f32; 2] {
            self.window_offset
        }

        fn stop_nested_scroll(&mut self) {
            self.stopped.set(self.stopped.get() + 1);
        }

        fn pre_fling(&mut self, _: f32, _: f32) -> bool {
            true
        }
    }

    struct Child(bool);

    impl ScrollableChild for Child {
        fn can_scroll_toward_start(&self, _axis: Axis) -> bool {
            self.0
        }
    }

    fn accumulated(total: f32) -> NestedScrollCoordinator {
        let mut c = NestedScrollCoordinator::new();
        c.on_scroll_accepted(Axis::Vertical);
        c.on_scroll([0.0, 0.0], [0.0, -total]);
        c
    }

    // -------------------------------------------------------------------------
    // Child scroll probe
    // -------------------------------------------------------------------------

    #[test]
    fn test_probe_without_child_is_false() {
        let probe = ChildScrollProbe::default();
        assert!(!probe.can_scroll_toward_start(Axis::Vertical));
        assert!(probe.supports_nested_scrolling());
    }

    #[test]
    fn test_probe_asks_child() {
        let mut probe = ChildScrollProbe::default();
        probe.set_child(Some(Box::new(Child(true))));
        assert!(probe.can_scroll_toward_start(Axis::Horizontal));
    }

    #[test]
    fn test_probe_callback_replaces_child_check() {
        let mut probe = ChildScrollProbe::default();
        probe.set_child(Some(Box::new(Child(true))));
        probe.set_callback(Some(Box::new(|_| false)));
        assert!(!probe.can_scroll_toward_start(Axis::Horizontal));
        assert!(!probe.can_scroll_toward_start(Axis::Vertical));

        probe.set_callback(None);
        assert!(probe.can_scroll_toward_start(Axis::Vertical));
    }

    #[test]
    fn test_probe_callback_sees_axis() {
        let mut probe = ChildScrollProbe::default();
        probe.set_callback(Some(Box::new(|axis| axis == Axis::Horizontal)));
        assert!(probe.can_scroll_toward_start(Axis::Horizontal));
        assert!(!probe.can_scroll_toward_start(Axis::Vertical));
    }

    // -------------------------------------------------------------------------
    // Accumulator
    // -------------------------------------------------------------------------

    #[test]
    fn test_accumulator_add_consume_take() {
        let mut acc = OverscrollAccumulator::default();
        acc.add(-30.0);
        assert_eq!(acc.total(), 30.0);
        assert_eq!(acc.consume(-5.0), 0.0);
        assert_eq!(acc.consume(10.0), 10.0);
        assert_eq!(acc.consume(50.0), 20.0);
        assert!(acc.is_empty());
        acc.add(f32::NAN);
        assert_eq!(acc.total(), 0.0);
        acc.add(4.0);
        assert_eq!(acc.take(), 4.0);
        assert_eq!(acc.total(), 0.0);
    }

    // -------------------------------------------------------------------------
    // Post-scroll accumulation
    // -------------------------------------------------------------------------

    #[test]
    fn test_scroll_accumulates_when_child_at_start() {
        let c = accumulated(40.0);
        assert_eq!(c.total_unconsumed(), 40.0);
    }

    #[test]
    fn test_scroll_ignored_when_child_can_scroll() {
        let mut c = NestedScrollCoordinator::new();
        c.probe_mut().set_child(Some(Box::new(Child(true))));
        c.on_scroll_accepted(Axis::Vertical);
        assert!(!c.on_scroll([0.0, 0.0], [0.0, -40.0]));
        assert_eq!(c.total_unconsumed(), 0.0);
    }

    #[test]
    fn test_scroll_ignores_other_axis_and_positive_residual() {
        let mut c = NestedScrollCoordinator::new();
        c.on_scroll_accepted(Axis::Vertical);
        assert!(!c.on_scroll([0.0, 0.0], [-40.0, 0.0]));
        assert!(!c.on_scroll([0.0, 0.0], [0.0, 12.0]));
        assert_eq!(c.total_unconsumed(), 0.0);
    }

    #[test]
    fn test_scroll_uses_ancestor_window_offset() {
        let mut ancestor = Greedy::new(0.0);
        ancestor.window_offset = [0.0, 15.0];
        let mut c = NestedScrollCoordinator::new();
        c.set_ancestor(Box::new(ancestor));
        c.on_scroll_accepted(Axis::Vertical);
        c.on_scroll([0.0, 0.0], [0.0, -40.0]);
        assert_eq!(c.total_unconsumed(), 25.0);
    }

    #[test]
    fn test_accept_resets_accumulator() {
        let mut c = accumulated(40.0);
        c.on_scroll_accepted(Axis::Horizontal);
        assert_eq!(c.total_unconsumed(), 0.0);
        assert_eq!(c.axis(), Axis::Horizontal);
    }

    // -------------------------------------------------------------------------
    // Pre-scroll
    // -------------------------------------------------------------------------

    #[test]
    fn test_pre_scroll_takes_back_overscroll() {
        let mut c = accumulated(40.0);
        let out = c.pre_scroll(0.0, 15.0);
        assert_eq!(out.consumed, [0.0, 15.0]);
        assert_eq!(out.consumed_here, 15.0);
        assert!(!out.drained_with_leftover);
        assert_eq!(c.total_unconsumed(), 25.0);
    }

    #[test]
    fn test_pre_scroll_consumes_at_most_total() {
        let mut c = accumulated(10.0);
        let out = c.pre_scroll(0.0, 25.0);
        assert_eq!(out.consumed, [0.0, 10.0]);
        assert!(out.drained_with_leftover);
        assert_eq!(c.total_unconsumed(), 0.0);
    }

    #[test]
    fn test_pre_scroll_away_from_rest_not_consumed() {
        let mut c = accumulated(10.0);
        let out = c.pre_scroll(0.0, -25.0);
        assert_eq!(out.consumed, [0.0, 0.0]);
        assert!(!out.moved_indicator());
        assert_eq!(c.total_unconsumed(), 10.0);
    }

    #[test]
    fn test_pre_scroll_forwards_remainder() {
        let mut c = NestedScrollCoordinator::new();
        c.set_ancestor(Box::new(Greedy::new(0.5)));
        c.on_scroll_accepted(Axis::Vertical);
        c.on_scroll([0.0, 0.0], [0.0, -10.0]);
        let out = c.pre_scroll(4.0, 30.0);
        // 10 here, half of the remaining 20 above, half of dx above
        assert_eq!(out.consumed, [2.0, 20.0]);
        assert_eq!(out.consumed_here, 10.0);
    }

    #[test]
    fn test_disabled_child_role_forwards_nothing() {
        let mut c = NestedScrollCoordinator::new();
        c.set_ancestor(Box::new(Greedy::new(1.0)));
        c.set_child_role_enabled(false);
        c.on_scroll_accepted(Axis::Vertical);
        assert!(!c.is_ancestor_engaged());
        assert_eq!(c.pre_scroll(5.0, 5.0).consumed, [0.0, 0.0]);
        assert!(!c.pre_fling(0.0, 100.0));
    }

    #[test]
    fn test_overeager_ancestor_is_clamped() {
        let mut c = NestedScrollCoordinator::new();
        c.set_ancestor(Box::new(Greedy::new(3.0)));
        c.on_scroll_accepted(Axis::Vertical);
        assert_eq!(c.pre_scroll(0.0, 10.0).consumed, [0.0, 10.0]);
        assert_eq!(c.pre_scroll(-4.0, 0.0).consumed, [-4.0, 0.0]);
    }

    // -------------------------------------------------------------------------
    // Stop and fling
    // -------------------------------------------------------------------------

    #[test]
    fn test_stop_returns_total_and_notifies_ancestor() {
        let ancestor = Greedy::new(0.0);
        let stopped = Rc::clone(&ancestor.stopped);
        let mut c = NestedScrollCoordinator::new();
        c.set_ancestor(Box::new(ancestor));
        c.on_scroll_accepted(Axis::Vertical);
        c.on_scroll([0.0, 0.0], [0.0, -33.0]);
        assert!(c.is_in_progress());
        assert_eq!(c.on_stop(), 33.0);
        assert_eq!(c.total_unconsumed(), 0.0);
        assert!(!c.is_in_progress());
        assert_eq!(stopped.get(), 1);
    }

    #[test]
    fn test_fling_forwarded_only_when_engaged() {
        let mut c = NestedScrollCoordinator::new();
        assert!(!c.pre_fling(0.0, 10.0));
        c.set_ancestor(Box::new(Greedy::new(0.0)));
        c.on_scroll_accepted(Axis::Vertical);
        assert!(c.pre_fling(0.0, 10.0));
        assert!(!c.fling(0.0, 10.0, false));
    }

    proptest! {
        #[test]
        fn prop_pre_scroll_conserves_delta(
            total in 0.0f32..500.0,
            dx in -300.0f32..300.0,
            dy in -300.0f32..300.0,
            fraction in 0.0f32..1.5,
        ) {
            let mut c = NestedScrollCoordinator::new();
            c.set_ancestor(Box::new(Greedy::new(fraction)));
            c.on_scroll_accepted(Axis::Vertical);
            c.on_scroll([0.0, 0.0], [0.0, -total]);
            let before = c.total_unconsumed();

            let out = c.pre_scroll(dx, dy);
            let left_for_child = [dx - out.consumed[0], dy - out.consumed[1]];

            prop_assert!((out.consumed[1] + left_for_child[1] - dy).abs() < 1e-3);
            // nothing flips direction on the way up
            prop_assert!(left_for_child[1] * dy >= -1e-3);
            prop_assert!(left_for_child[1].abs() <= dy.abs() + 1e-3);
            prop_assert!((before - c.total_unconsumed() - out.consumed_here).abs() < 1e-3);
            prop_assert!(c.total_unconsumed() >= 0.0);
        }
    }
}
