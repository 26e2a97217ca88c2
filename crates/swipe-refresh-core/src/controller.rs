//! The refresh state machine.
//!
//! [`SwipeRefresh`] owns every piece of gesture state: the drag session,
//! the nested-scroll accumulator, the running animation and the visual
//! state. All entry points run on the host's UI loop; nothing here is
//! shared across threads.

use crate::animation::{AnimationKind, AnimationSequencer, AnimationTask};
use crate::config::{IndicatorSize, RefreshConfig};
use crate::error::ConfigError;
use crate::event::{PointerEvent, PointerId};
use crate::geometry::{Axis, Point};
use crate::nested::{NestedScrollAncestor, NestedScrollCoordinator, ScrollableChild};
use crate::physics::{self, MAX_ALPHA, STARTING_PROGRESS_ALPHA};
use crate::tracker::{DragSession, GestureTracker, TrackerOutput};
use crate::visual::SpinnerVisualState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Refresh lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RefreshState {
    /// Nothing happening; indicator hidden
    #[default]
    Idle,
    /// Indicator follows a drag or nested overscroll
    Dragging,
    /// Moving to the trigger-rest offset (or scaling in) before refreshing
    AnimatingToTrigger,
    /// Refresh running; indicator spinning
    Refreshing,
    /// Returning to rest before going idle
    AnimatingToStart,
}

/// What to do when the running animation finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Completion {
    /// Enter [`RefreshState::Refreshing`], or reset if refreshing was
    /// cleared in the meantime
    EnterRefreshing,
    /// Run a scale-down, then reset
    ScaleDownThenReset,
    /// Reset to idle
    Reset,
}

/// Refresh notification callback.
pub type RefreshCallback = Box<dyn FnMut()>;

/// Pull-to-refresh gesture controller.
///
/// # Example
///
/// ```
/// use swipe_refresh_core::{Point, PointerEvent, PointerId, RefreshConfig, RefreshState, SwipeRefresh};
///
/// let mut refresh = SwipeRefresh::new(RefreshConfig::default());
/// let id = PointerId(0);
/// refresh.on_pointer_event(&PointerEvent::Down { pointer_id: id, position: Point::new(0.0, 0.0) });
/// refresh.on_pointer_event(&PointerEvent::Move { pointer_id: id, position: Point::new(0.0, 208.0) });
/// assert_eq!(refresh.state(), RefreshState::Dragging);
///
/// refresh.on_pointer_event(&PointerEvent::Up { pointer_id: id });
/// refresh.advance_animation_to(1.0);
/// assert!(refresh.is_refreshing());
/// ```
pub struct SwipeRefresh {
    config: RefreshConfig,
    state: RefreshState,
    visual: SpinnerVisualState,
    tracker: GestureTracker,
    nested: NestedScrollCoordinator,
    animations: AnimationSequencer<Completion>,
    enabled: bool,
    refreshing: bool,
    notify: bool,
    active_axis: Axis,
    on_refresh: Option<RefreshCallback>,
}

impl fmt::Debug for SwipeRefresh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwipeRefresh")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("visual", &self.visual)
            .field("tracker", &self.tracker)
            .field("nested", &self.nested)
            .field("animations", &self.animations)
            .field("enabled", &self.enabled)
            .field("refreshing", &self.refreshing)
            .field("active_axis", &self.active_axis)
            .field("has_on_refresh", &self.on_refresh.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for SwipeRefresh {
    fn default() -> Self {
        Self::new(RefreshConfig::default())
    }
}

impl SwipeRefresh {
    /// Create a controller.
    ///
    /// Invalid values are logged and then guarded at use; see
    /// [`SwipeRefresh::try_new`] to reject them instead.
    #[must_use]
    pub fn new(config: RefreshConfig) -> Self {
        if let Err(err) = config.validate() {
            log::warn!("swipe refresh created with questionable config: {err}");
        }
        Self {
            visual: SpinnerVisualState::at_rest(&config),
            tracker: GestureTracker::new(config.orientation, config.touch_slop),
            active_axis: config.orientation,
            config,
            state: RefreshState::Idle,
            nested: NestedScrollCoordinator::new(),
            animations: AnimationSequencer::new(),
            enabled: true,
            refreshing: false,
            notify: false,
            on_refresh: None,
        }
    }

    /// Create a controller from a validated configuration.
    pub fn try_new(config: RefreshConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    // =========================================================================
    // Collaborators
    // =========================================================================

    /// Set the refresh notification.
    pub fn set_on_refresh(&mut self, callback: impl FnMut() + 'static) {
        self.on_refresh = Some(Box::new(callback));
    }

    /// Set the ancestor scroll consumer.
    pub fn set_ancestor(&mut self, ancestor: impl NestedScrollAncestor + 'static) {
        self.nested.set_ancestor(Box::new(ancestor));
    }

    /// Set the scrollable content.
    pub fn set_child(&mut self, child: impl ScrollableChild + 'static) {
        self.nested.probe_mut().set_child(Some(Box::new(child)));
    }

    /// Remove the scrollable content.
    pub fn clear_child(&mut self) {
        self.nested.probe_mut().set_child(None);
    }

    /// Override the "can the child scroll toward start" check.
    pub fn set_child_scroll_callback(&mut self, callback: impl Fn(Axis) -> bool + 'static) {
        self.nested.probe_mut().set_callback(Some(Box::new(callback)));
    }

    /// Remove the override; the child is asked again.
    pub fn clear_child_scroll_callback(&mut self) {
        self.nested.probe_mut().set_callback(None);
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &RefreshConfig {
        &self.config
    }

    /// Enable or disable the control. Disabling resets immediately.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.reset();
        }
    }

    /// Whether the control reacts to input.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The host detached the control. Resets immediately.
    pub fn on_detached(&mut self) {
        self.reset();
    }

    /// Overscroll needed to trigger a refresh.
    pub fn set_drag_distance_threshold(&mut self, distance: f32) {
        if !(distance > 0.0 && distance.is_finite()) {
            log::warn!("drag distance threshold {distance} is not positive; drag ratios fall back to 0");
        }
        self.config.drag_distance_threshold = distance;
    }

    /// Overscroll needed to trigger a refresh.
    #[must_use]
    pub const fn drag_distance_threshold(&self) -> f32 {
        self.config.drag_distance_threshold
    }

    /// Place the indicator explicitly. Resets to idle without notifying.
    pub fn set_indicator_offsets(&mut self, scale: bool, rest: f32, trigger: f32) {
        self.config = self.config.clone().with_offsets(scale, rest, trigger);
        self.reset();
    }

    /// Change where a completed pull parks the indicator.
    pub fn set_indicator_end_target(&mut self, scale: bool, trigger: f32) {
        self.config.trigger_offset = trigger;
        self.config.scale_indicator = scale;
    }

    /// Change the indicator style. Offsets are left alone.
    pub fn set_indicator_size(&mut self, size: IndicatorSize) {
        self.config.indicator_size = size;
    }

    /// Indicator diameter in pixels.
    #[must_use]
    pub fn indicator_diameter(&self) -> f32 {
        self.config.diameter()
    }

    /// Hidden indicator offset.
    #[must_use]
    pub const fn rest_offset(&self) -> f32 {
        self.config.rest_offset
    }

    /// Configured trigger offset.
    #[must_use]
    pub const fn trigger_offset(&self) -> f32 {
        self.config.trigger_offset
    }

    /// Change the primary drag axis for direct touch.
    pub fn set_orientation(&mut self, axis: Axis) {
        self.config.orientation = axis;
        self.tracker.set_axis(axis);
        if !self.nested.is_in_progress() {
            self.active_axis = axis;
        }
    }

    /// Change the touch slop.
    pub fn set_touch_slop(&mut self, touch_slop: f32) {
        self.config.touch_slop = touch_slop;
        self.tracker.set_touch_slop(touch_slop);
    }

    /// Enable or disable forwarding nested scrolls to the ancestor.
    pub fn set_nested_scrolling_enabled(&mut self, enabled: bool) {
        self.nested.set_child_role_enabled(enabled);
    }

    /// Whether nested scrolls are forwarded to the ancestor.
    #[must_use]
    pub const fn is_nested_scrolling_enabled(&self) -> bool {
        self.nested.child_role_enabled()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> RefreshState {
        self.state
    }

    /// Visual state for the renderer.
    #[must_use]
    pub const fn visual(&self) -> &SpinnerVisualState {
        &self.visual
    }

    /// Whether a refresh is running or about to start.
    #[must_use]
    pub const fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    /// Whether an animation is running.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.animations.is_running()
    }

    /// The running animation.
    #[must_use]
    pub fn current_animation(&self) -> Option<AnimationKind> {
        self.animations.current_kind()
    }

    /// Axis the indicator offset is measured along.
    #[must_use]
    pub const fn active_axis(&self) -> Axis {
        self.active_axis
    }

    /// Nested overscroll gathered so far.
    #[must_use]
    pub const fn total_unconsumed(&self) -> f32 {
        self.nested.total_unconsumed()
    }

    /// Current drag session.
    #[must_use]
    pub const fn drag_session(&self) -> &DragSession {
        self.tracker.session()
    }

    /// Whether the content can still scroll toward its start edge.
    #[must_use]
    pub fn can_child_scroll_toward_start(&self, axis: Axis) -> bool {
        self.nested.probe().can_scroll_toward_start(axis)
    }

    /// Whether a disallow-intercept request from the child should be honoured.
    #[must_use]
    pub fn should_honor_disallow_intercept(&self) -> bool {
        self.nested.probe().supports_nested_scrolling()
    }

    // =========================================================================
    // Refresh lifecycle
    // =========================================================================

    /// Start or stop refreshing from the host. Never notifies.
    ///
    /// Setting the value the controller already has does nothing.
    pub fn set_refreshing(&mut self, refreshing: bool) {
        if refreshing == self.refreshing {
            return;
        }
        if refreshing {
            self.refreshing = true;
            self.notify = false;
            self.nested.reset();
            self.visual.offset = physics::trigger_rest_offset(&self.config);
            self.visual.visible = true;
            self.visual.opacity = MAX_ALPHA;
            self.set_state(RefreshState::AnimatingToTrigger);
            self.start_animation(AnimationKind::ScaleUp, Completion::EnterRefreshing);
        } else {
            self.refreshing = false;
            self.set_state(RefreshState::AnimatingToStart);
            let kind = if self.config.scale_indicator {
                AnimationKind::ScaleDownToStart {
                    from_scale: self.visual.scale,
                    from: self.visual.offset,
                    to: self.config.rest_offset,
                }
            } else {
                AnimationKind::ScaleDown {
                    from_scale: self.visual.scale,
                }
            };
            self.start_animation(kind, Completion::Reset);
        }
    }

    /// Decide between refreshing and cancelling for a released drag.
    fn finish(&mut self, overscroll: f32) {
        if overscroll > self.config.drag_distance_threshold {
            log::debug!(
                "released at {overscroll} past threshold {}, refreshing",
                self.config.drag_distance_threshold
            );
            self.refreshing = true;
            self.notify = true;
            self.set_state(RefreshState::AnimatingToTrigger);
            let kind = AnimationKind::OffsetToTrigger {
                from: self.visual.offset,
                to: physics::trigger_rest_offset(&self.config),
            };
            self.start_animation(kind, Completion::EnterRefreshing);
            return;
        }

        log::debug!(
            "released at {overscroll} within threshold {}, cancelling",
            self.config.drag_distance_threshold
        );
        self.refreshing = false;
        self.visual.trim_start = 0.0;
        self.visual.trim_end = 0.0;
        self.visual.arrow_enabled = false;
        self.set_state(RefreshState::AnimatingToStart);
        let from = self.visual.offset;
        let to = self.config.rest_offset;
        if self.config.scale_indicator {
            let kind = AnimationKind::ScaleDownToStart {
                from_scale: self.visual.scale,
                from,
                to,
            };
            self.start_animation(kind, Completion::Reset);
        } else {
            self.start_animation(
                AnimationKind::OffsetToStart { from, to },
                Completion::ScaleDownThenReset,
            );
        }
    }

    fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::EnterRefreshing => {
                if !self.refreshing {
                    self.reset();
                    return;
                }
                self.visual.opacity = MAX_ALPHA;
                self.visual.spinning = true;
                self.set_state(RefreshState::Refreshing);
                if std::mem::take(&mut self.notify) {
                    log::debug!("refresh triggered by gesture");
                    if let Some(callback) = self.on_refresh.as_mut() {
                        callback();
                    }
                }
            }
            Completion::ScaleDownThenReset => {
                let kind = AnimationKind::ScaleDown {
                    from_scale: self.visual.scale,
                };
                self.start_animation(kind, Completion::Reset);
            }
            Completion::Reset => self.reset(),
        }
    }

    /// Unanimated return to idle.
    fn reset(&mut self) {
        if self.animations.discard() {
            log::debug!("running animation discarded by reset");
        }
        self.visual = SpinnerVisualState::at_rest(&self.config);
        self.tracker.reset();
        self.nested.reset();
        self.refreshing = false;
        self.notify = false;
        self.set_state(RefreshState::Idle);
    }

    fn set_state(&mut self, next: RefreshState) {
        if self.state != next {
            log::debug!("refresh state {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    fn start_animation(&mut self, kind: AnimationKind, completion: Completion) {
        let task = AnimationTask::new(kind, self.config.medium_animation_ms).on_complete(completion);
        self.animations.start(task);
    }

    // =========================================================================
    // Animation clock
    // =========================================================================

    /// Set the running animation's progress to `t` in `[0, 1]`.
    ///
    /// Returns whether an animation was running.
    pub fn advance_animation_to(&mut self, t: f32) -> bool {
        let Some(frame) = self.animations.advance_to(t) else {
            return false;
        };
        self.visual.apply_animation(frame.kind, frame.fraction);
        if let Some(completion) = frame.completion {
            self.complete(completion);
        }
        true
    }

    /// Advance the running animation by `dt_ms` of frame time.
    ///
    /// Returns whether an animation was running.
    pub fn advance_animation_by(&mut self, dt_ms: f32) -> bool {
        let Some(frame) = self.animations.advance_by(dt_ms) else {
            return false;
        };
        self.visual.apply_animation(frame.kind, frame.fraction);
        if let Some(completion) = frame.completion {
            self.complete(completion);
        }
        true
    }

    // =========================================================================
    // Pointer input
    // =========================================================================

    /// Feed one pointer event. Returns whether the gesture is claimed.
    pub fn on_pointer_event(&mut self, event: &PointerEvent) -> bool {
        let gated = matches!(
            event,
            PointerEvent::Down { .. } | PointerEvent::SecondaryDown { .. } | PointerEvent::Move { .. }
        );
        if gated && !self.can_start_touch() {
            return false;
        }

        match self.tracker.process(event) {
            TrackerOutput::DragStarted { overscroll } | TrackerOutput::Dragged { overscroll } => {
                // a swipe toward the content belongs to the child
                if overscroll <= 0.0 {
                    return false;
                }
                if self.state == RefreshState::Idle {
                    self.active_axis = self.config.orientation;
                    self.visual.opacity = STARTING_PROGRESS_ALPHA;
                    self.set_state(RefreshState::Dragging);
                }
                self.drag_to(overscroll);
                true
            }
            TrackerOutput::Released {
                overscroll: Some(overscroll),
            } => {
                if self.state == RefreshState::Dragging {
                    self.finish(overscroll.max(0.0));
                }
                false
            }
            TrackerOutput::Released { overscroll: None }
            | TrackerOutput::Rejected
            | TrackerOutput::Ignored
            | TrackerOutput::Tracking => false,
        }
    }

    /// First pointer down.
    pub fn on_pointer_down(&mut self, id: PointerId, position: Point) -> bool {
        self.on_pointer_event(&PointerEvent::Down {
            pointer_id: id,
            position,
        })
    }

    /// Additional pointer down.
    pub fn on_secondary_pointer_down(&mut self, id: PointerId, position: Point) -> bool {
        self.on_pointer_event(&PointerEvent::SecondaryDown {
            pointer_id: id,
            position,
        })
    }

    /// Pointer moved.
    pub fn on_pointer_move(&mut self, id: PointerId, position: Point) -> bool {
        self.on_pointer_event(&PointerEvent::Move {
            pointer_id: id,
            position,
        })
    }

    /// Non-final pointer up.
    pub fn on_secondary_pointer_up(&mut self, id: PointerId) -> bool {
        self.on_pointer_event(&PointerEvent::SecondaryUp { pointer_id: id })
    }

    /// Final pointer up.
    pub fn on_pointer_up(&mut self, id: PointerId) -> bool {
        self.on_pointer_event(&PointerEvent::Up { pointer_id: id })
    }

    /// Gesture cancelled.
    pub fn on_pointer_cancel(&mut self) -> bool {
        self.on_pointer_event(&PointerEvent::Cancel)
    }

    fn can_start_touch(&self) -> bool {
        self.enabled
            && matches!(self.state, RefreshState::Idle | RefreshState::Dragging)
            && !self.refreshing
            && !self.nested.is_in_progress()
            && !self
                .nested
                .probe()
                .can_scroll_toward_start(self.config.orientation)
    }

    fn drag_to(&mut self, overscroll: f32) {
        if self.state == RefreshState::Dragging {
            self.move_spinner(overscroll);
        }
    }

    fn move_spinner(&mut self, overscroll: f32) {
        let frame = physics::compute_visual(overscroll, &self.config);
        log::trace!(
            "overscroll {overscroll}: offset {} rotation {}",
            frame.offset,
            frame.rotation
        );
        self.visual.visible = true;
        self.visual.arrow_enabled = true;
        self.visual.scale = if self.config.scale_indicator {
            frame.scale_progress
        } else {
            1.0
        };

        let target = frame.target_opacity.alpha();
        let fading_there = self
            .animations
            .current_kind()
            .is_some_and(|kind| kind.is_fade_to(target));
        if self.visual.opacity != target && !fading_there {
            let fade = AnimationTask::new(
                AnimationKind::Fade {
                    from: self.visual.opacity,
                    to: target,
                },
                self.config.medium_animation_ms,
            );
            self.animations.start(fade);
        }

        self.visual.apply_frame(&frame);
    }

    // =========================================================================
    // Nested scrolling
    // =========================================================================

    fn nested_drag_allowed(&self) -> bool {
        !self.refreshing && matches!(self.state, RefreshState::Idle | RefreshState::Dragging)
    }

    /// A descendant wants to start a nested scroll along `axis`.
    #[must_use]
    pub fn on_start_nested_scroll(&self, axis: Axis) -> bool {
        let accepted = self.enabled && self.state != RefreshState::AnimatingToStart && !self.refreshing;
        log::debug!("nested scroll start on {axis:?}: accepted {accepted}");
        accepted
    }

    /// The nested scroll was accepted.
    pub fn on_nested_scroll_accepted(&mut self, axis: Axis) {
        self.active_axis = axis;
        self.nested.on_scroll_accepted(axis);
    }

    /// Pre-scroll. Returns `[consumed_x, consumed_y]`.
    pub fn on_nested_pre_scroll(&mut self, dx: f32, dy: f32) -> [f32; 2] {
        let outcome = self.nested.pre_scroll(dx, dy);
        if outcome.moved_indicator() && self.state == RefreshState::Dragging {
            self.move_spinner(self.nested.total_unconsumed());
        }
        if self.config.using_custom_start_offset && outcome.drained_with_leftover {
            self.visual.visible = false;
        }
        outcome.consumed
    }

    /// Post-scroll with what the child consumed and left over.
    pub fn on_nested_scroll(
        &mut self,
        consumed_x: f32,
        consumed_y: f32,
        unconsumed_x: f32,
        unconsumed_y: f32,
    ) {
        let grew = self
            .nested
            .on_scroll([consumed_x, consumed_y], [unconsumed_x, unconsumed_y]);
        if !grew {
            return;
        }
        if !self.nested_drag_allowed() {
            self.nested.reset();
            return;
        }
        self.set_state(RefreshState::Dragging);
        self.move_spinner(self.nested.total_unconsumed());
    }

    /// The nested scroll ended.
    pub fn on_stop_nested_scroll(&mut self) {
        let total = self.nested.on_stop();
        if self.state == RefreshState::Dragging && !self.tracker.is_dragging() {
            self.finish(total);
        }
    }

    /// Pre-fling, forwarded to the ancestor.
    pub fn on_nested_pre_fling(&mut self, velocity_x: f32, velocity_y: f32) -> bool {
        self.nested.pre_fling(velocity_x, velocity_y)
    }

    /// Fling, forwarded to the ancestor.
    pub fn on_nested_fling(&mut self, velocity_x: f32, velocity_y: f32, consumed: bool) -> bool {
        self.nested.fling(velocity_x, velocity_y, consumed)
    }
}
