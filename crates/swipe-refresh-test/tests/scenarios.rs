//! End-to-end refresh scenarios driven through the harness.

use proptest::prelude::*;
use swipe_refresh_core::physics::STARTING_PROGRESS_ALPHA;
use swipe_refresh_core::{
    physics, Axis, Point, PointerId, RefreshConfig, RefreshState, SwipeRefresh,
};
use swipe_refresh_test::{GestureScript, RecordingAncestor, RefreshHarness};

const FINGER: PointerId = PointerId(0);

// =============================================================================
// Worked Scenarios
// =============================================================================

#[test]
fn test_scenario_a_partial_pull_visuals() {
    let mut harness = RefreshHarness::with_threshold(128.0);
    let script = harness.script().pull(FINGER, 100.0);
    harness.play(&script);

    harness.assert_state(RefreshState::Dragging);
    let visual = harness.visual();
    assert!((visual.trim_end - 0.508_333).abs() < 1e-4);
    assert!((visual.arrow_scale - 0.635_416).abs() < 1e-4);
    assert_eq!(visual.trim_start, 0.0);
    assert_eq!(visual.opacity, STARTING_PROGRESS_ALPHA);
    assert!(visual.visible);
}

#[test]
fn test_scenario_b_release_past_threshold_refreshes_once() {
    let mut harness = RefreshHarness::with_threshold(128.0);
    harness.pull_and_release(200.0);
    harness.assert_state(RefreshState::AnimatingToTrigger);
    harness.assert_refresh_count(0);

    harness.settle();
    harness
        .assert_state(RefreshState::Refreshing)
        .assert_refresh_count(1);
    assert!(harness.visual().spinning);
    assert!(harness.visual().visible);

    // host finishes its work
    harness.refresh_mut().set_refreshing(false);
    harness.settle();
    harness.assert_idle().assert_refresh_count(1);
}

#[test]
fn test_scenario_c_release_short_of_threshold_cancels() {
    let mut harness = RefreshHarness::with_threshold(128.0);
    harness.pull_and_release(50.0);
    harness.assert_state(RefreshState::AnimatingToStart);
    harness.settle();
    harness.assert_idle().assert_refresh_count(0);
}

#[test]
fn test_swipe_toward_content_is_not_claimed() {
    let mut harness = RefreshHarness::with_threshold(128.0);
    let script = harness
        .script()
        .down(FINGER, Point::new(0.0, 400.0))
        .move_to(FINGER, Point::new(0.0, 350.0))
        .move_to(FINGER, Point::new(0.0, 200.0))
        .release(FINGER);
    let claimed = harness.play(&script);
    assert!(claimed.iter().all(|c| !c), "claimed {claimed:?}");
    harness.assert_idle();
    assert!(!harness.refresh().is_animating());
    assert!(!harness.visual().visible);

    // nothing left running, so a pull right after is taken
    assert!(harness.refresh().on_start_nested_scroll(Axis::Vertical));
    let script = harness.script().pull(FINGER, 60.0);
    harness.play(&script);
    harness.assert_state(RefreshState::Dragging);
    assert!(harness.visual().visible);
}

#[test]
fn test_scenario_d_disable_from_every_state() {
    type Setup = fn(&mut RefreshHarness);
    let setups: [(RefreshState, Setup); 4] = [
        (RefreshState::Dragging, |h: &mut RefreshHarness| {
            let script = h.script().pull(FINGER, 100.0);
            h.play(&script);
        }),
        (RefreshState::AnimatingToTrigger, |h: &mut RefreshHarness| {
            h.pull_and_release(200.0);
        }),
        (RefreshState::Refreshing, |h: &mut RefreshHarness| {
            h.pull_and_release(200.0);
            h.settle();
        }),
        (RefreshState::AnimatingToStart, |h: &mut RefreshHarness| {
            h.pull_and_release(20.0);
            h.tick(2);
        }),
    ];

    for (expected, setup) in setups {
        let mut harness = RefreshHarness::with_threshold(128.0);
        setup(&mut harness);
        harness.assert_state(expected);

        harness.refresh_mut().set_enabled(false);
        harness.assert_idle();
        assert_eq!(harness.settle(), 0);
        harness.assert_idle();
    }
}

#[test]
fn test_scenario_d_nested_drag_disabled() {
    let mut harness = RefreshHarness::with_threshold(128.0);
    assert!(harness.begin_nested(Axis::Vertical));
    harness.refresh_mut().on_nested_scroll(0.0, 0.0, 0.0, -60.0);
    harness.assert_state(RefreshState::Dragging);
    assert_eq!(harness.refresh().total_unconsumed(), 60.0);

    harness.refresh_mut().set_enabled(false);
    harness.assert_idle();
    harness.refresh_mut().on_stop_nested_scroll();
    harness.assert_idle().assert_refresh_count(0);
}

// =============================================================================
// Finish Decision
// =============================================================================

#[test]
fn test_release_exactly_at_threshold_cancels() {
    let mut harness = RefreshHarness::with_threshold(128.0);
    harness.pull_and_release(128.0);
    harness.assert_state(RefreshState::AnimatingToStart);
    harness.settle();
    harness.assert_refresh_count(0);
}

#[test]
fn test_nested_stop_past_threshold_refreshes() {
    let mut harness = RefreshHarness::with_threshold(128.0);
    harness.nested_overscroll(Axis::Vertical, 150.0, 5);
    harness.assert_state(RefreshState::AnimatingToTrigger);
    assert_eq!(harness.refresh().total_unconsumed(), 0.0);
    harness.settle();
    harness.assert_refresh_count(1);
}

#[test]
fn test_nested_stop_below_threshold_cancels() {
    let mut harness = RefreshHarness::with_threshold(128.0);
    harness.nested_overscroll(Axis::Vertical, 100.0, 4);
    harness.assert_state(RefreshState::AnimatingToStart);
    harness.settle();
    harness.assert_idle().assert_refresh_count(0);
}

// =============================================================================
// Idempotence
// =============================================================================

#[test]
fn test_set_refreshing_twice_runs_one_sequence() {
    let mut harness = RefreshHarness::with_threshold(128.0);
    harness.refresh_mut().set_refreshing(true);
    harness.tick(3);
    harness.refresh_mut().set_refreshing(true);
    let frames = harness.settle();
    // remaining frames of the first 200ms scale-up only
    assert_eq!(frames, 10);
    harness
        .assert_state(RefreshState::Refreshing)
        .assert_refresh_count(0);

    harness.refresh_mut().set_refreshing(true);
    assert!(!harness.refresh().is_animating());
}

#[test]
fn test_external_refresh_parks_at_trigger_rest_offset() {
    let mut harness = RefreshHarness::with_threshold(128.0);
    harness.refresh_mut().set_refreshing(true);
    let expected = physics::trigger_rest_offset(harness.refresh().config());
    assert_eq!(harness.visual().offset, expected);
    harness.settle();
    assert_eq!(harness.visual().offset, expected);
    assert_eq!(harness.visual().scale, 1.0);
}

// =============================================================================
// Pointer Reassignment
// =============================================================================

#[test]
fn test_releasing_second_finger_hands_drag_back_to_first() {
    let mut harness = RefreshHarness::with_threshold(128.0);
    let first = PointerId(1);
    let second = PointerId(2);
    let script = harness
        .script()
        .pull(first, 40.0)
        .secondary_down(second, Point::new(0.0, 300.0))
        .secondary_up(second);
    harness.play(&script);
    assert_eq!(harness.refresh().drag_session().active_pointer, Some(first));

    // the first finger still drives the drag
    let script = harness.script().drag_to(first, 60.0);
    harness.play(&script);
    let expected = physics::compute_visual(60.0, harness.refresh().config());
    assert!((harness.visual().offset - expected.offset).abs() < 1e-4);
}

#[test]
fn test_releasing_first_finger_hands_drag_to_second() {
    let mut harness = RefreshHarness::with_threshold(128.0);
    let first = PointerId(1);
    let second = PointerId(2);
    let script = harness
        .script()
        .pull(first, 40.0)
        .secondary_down(second, Point::new(0.0, 100.0));
    harness.play(&script);
    // first finger touches again and takes the drag back
    let position = harness.script().position_for(40.0);
    let script = harness.script().secondary_down(first, position);
    harness.play(&script);
    assert_eq!(harness.refresh().drag_session().active_pointer, Some(first));

    let script = harness.script().secondary_up(first);
    harness.play(&script);
    assert_eq!(harness.refresh().drag_session().active_pointer, Some(second));

    let script = harness.script().release(second);
    harness.play(&script);
    assert!(harness.refresh().drag_session().is_empty());
}

#[test]
fn test_moves_from_unknown_pointer_are_not_claimed() {
    let mut harness = RefreshHarness::with_threshold(128.0);
    let script = harness
        .script()
        .pull(FINGER, 30.0)
        .move_to(PointerId(9), Point::new(0.0, 900.0));
    let claims = harness.play(&script);
    assert_eq!(claims, vec![false, true, false]);
    let expected = physics::compute_visual(30.0, harness.refresh().config());
    assert!((harness.visual().offset - expected.offset).abs() < 1e-4);
}

// =============================================================================
// Nested Chain
// =============================================================================

#[test]
fn test_ancestor_sees_remainder_after_indicator() {
    let ancestor = RecordingAncestor::new(0.5);
    let mut harness = RefreshHarness::with_threshold(128.0).ancestor(ancestor);
    harness.begin_nested(Axis::Vertical);
    harness.refresh_mut().on_nested_scroll(0.0, 0.0, 0.0, -20.0);
    let consumed = harness.refresh_mut().on_nested_pre_scroll(0.0, 50.0);
    assert_eq!(consumed, [0.0, 35.0]);

    let log = harness.recorded_ancestor().map(RecordingAncestor::log).unwrap_or_default();
    assert_eq!(log.pre_scrolls, vec![([0.0, 30.0], [0.0, 15.0])]);
    assert_eq!(log.scrolls, vec![[0.0, 0.0, 0.0, -20.0]]);
}

#[test]
fn test_ancestor_window_offset_reduces_overscroll() {
    let ancestor = RecordingAncestor::new(0.0).with_window_offset(0.0, 8.0);
    let mut harness = RefreshHarness::with_threshold(128.0).ancestor(ancestor);
    harness.begin_nested(Axis::Vertical);
    harness.refresh_mut().on_nested_scroll(0.0, 0.0, 0.0, -20.0);
    assert_eq!(harness.refresh().total_unconsumed(), 12.0);
}

#[test]
fn test_flings_are_forwarded_not_consumed() {
    let ancestor = RecordingAncestor::new(0.0).claiming_flings();
    let mut harness = RefreshHarness::with_threshold(128.0).ancestor(ancestor);
    harness.begin_nested(Axis::Vertical);
    assert!(harness.refresh_mut().on_nested_pre_fling(0.0, -2000.0));
    assert!(harness.refresh_mut().on_nested_fling(0.0, -2000.0, false));
    harness.refresh_mut().on_stop_nested_scroll();

    let log = harness.recorded_ancestor().map(RecordingAncestor::log).unwrap_or_default();
    assert_eq!(log.pre_flings, vec![[0.0, -2000.0]]);
    assert_eq!(log.flings, vec![[0.0, -2000.0]]);
    assert_eq!(log.stops, 1);
    harness.assert_idle();
}

#[test]
fn test_refusing_ancestor_gets_nothing_forwarded() {
    let ancestor = RecordingAncestor::refusing();
    let mut harness = RefreshHarness::with_threshold(128.0).ancestor(ancestor);
    harness.begin_nested(Axis::Vertical);
    assert_eq!(harness.refresh_mut().on_nested_pre_scroll(0.0, 10.0), [0.0, 0.0]);
    let log = harness.recorded_ancestor().map(RecordingAncestor::log).unwrap_or_default();
    assert!(log.pre_scrolls.is_empty());
}

#[test]
fn test_horizontal_nested_scroll_uses_x() {
    let mut harness = RefreshHarness::with_threshold(128.0);
    harness.nested_overscroll(Axis::Horizontal, 150.0, 3);
    assert_eq!(harness.refresh().active_axis(), Axis::Horizontal);
    harness.settle();
    harness.assert_refresh_count(1);
}

#[test]
fn test_child_scroll_override_replaces_child_check() {
    let mut harness = RefreshHarness::with_threshold(128.0);
    harness.child().set_can_scroll(true);
    harness.refresh_mut().set_child_scroll_callback(|_| false);
    harness.pull_and_release(200.0);
    harness.assert_state(RefreshState::AnimatingToTrigger);
    assert_eq!(harness.child().queries(), 0);
}

// =============================================================================
// Snapshots
// =============================================================================

#[test]
fn test_refreshing_snapshot() {
    let mut harness = RefreshHarness::new(RefreshConfig::default());
    harness.refresh_mut().set_refreshing(true);
    harness.settle();
    let json = harness.snapshot_json();
    assert_eq!(
        json,
        serde_json::json!({
            "state": "Refreshing",
            "refreshing": true,
            "total_unconsumed": 0.0,
            "animating": false,
            "visual": {
                "offset": 24.0,
                "scale": 1.0,
                "opacity": 255,
                "rotation": 0.0,
                "trim_start": 0.0,
                "trim_end": 0.0,
                "arrow_scale": 0.0,
                "visible": true,
                "arrow_enabled": false,
                "spinning": true
            }
        })
    );
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_release_refreshes_iff_past_threshold(d in 1.0f32..400.0, threshold in 16.0f32..256.0) {
        let mut harness = RefreshHarness::with_threshold(threshold);
        let script = GestureScript::new(Axis::Vertical, 0.0).pull(FINGER, d).release(FINGER);
        harness.refresh_mut().set_touch_slop(0.0);
        harness.play(&script);
        harness.settle();
        let expected = u32::from(d > threshold);
        prop_assert_eq!(harness.refresh_count(), expected);
    }

    #[test]
    fn prop_chain_conserves_delta(total in 0.0f32..300.0, dy in -200.0f32..200.0, fraction in 0.0f32..1.0) {
        let ancestor = RecordingAncestor::new(fraction);
        let mut harness = RefreshHarness::with_threshold(128.0).ancestor(ancestor);
        harness.begin_nested(Axis::Vertical);
        harness.refresh_mut().on_nested_scroll(0.0, 0.0, 0.0, -total);
        let before = harness.refresh().total_unconsumed();

        let consumed = harness.refresh_mut().on_nested_pre_scroll(0.0, dy);
        let here = before - harness.refresh().total_unconsumed();
        let log = harness.recorded_ancestor().map(RecordingAncestor::log).unwrap_or_default();
        let by_ancestor = log.total_pre_consumed()[1];
        let left_for_child = dy - consumed[1];

        prop_assert!((here + by_ancestor + left_for_child - dy).abs() < 1e-3);
        prop_assert!((consumed[1] - here - by_ancestor).abs() < 1e-3);
    }

    #[test]
    fn prop_disable_always_yields_idle(d in 0.0f32..400.0, frames in 0u32..40) {
        let mut harness = RefreshHarness::with_threshold(128.0);
        harness.pull_and_release(d);
        harness.tick(frames);
        harness.refresh_mut().set_enabled(false);
        prop_assert_eq!(harness.state(), RefreshState::Idle);
        prop_assert_eq!(harness.refresh().total_unconsumed(), 0.0);
        prop_assert!(!harness.refresh().is_animating());
    }
}

#[test]
fn test_controller_default_is_usable_without_harness() {
    let refresh = SwipeRefresh::default();
    assert_eq!(refresh.state(), RefreshState::Idle);
}
