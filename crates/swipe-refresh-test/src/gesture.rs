//! Scripted pointer gestures.

use swipe_refresh_core::{Axis, Point, PointerEvent, PointerId, SwipeRefresh, DRAG_RATE};

/// A recorded sequence of pointer events.
///
/// ```
/// use swipe_refresh_test::GestureScript;
/// use swipe_refresh_core::{Axis, PointerId};
///
/// let script = GestureScript::new(Axis::Vertical, 8.0).pull(PointerId(0), 100.0).release(PointerId(0));
/// assert_eq!(script.events().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GestureScript {
    axis: Axis,
    touch_slop: f32,
    origin: Point,
    events: Vec<PointerEvent>,
}

impl GestureScript {
    /// Script for a drag axis and touch slop.
    #[must_use]
    pub const fn new(axis: Axis, touch_slop: f32) -> Self {
        Self {
            axis,
            touch_slop,
            origin: Point::ORIGIN,
            events: Vec::new(),
        }
    }

    /// Where [`GestureScript::pull`] puts the first finger down.
    #[must_use]
    pub const fn origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Recorded events.
    #[must_use]
    pub fn events(&self) -> &[PointerEvent] {
        &self.events
    }

    /// Finger position that yields `overscroll` once past the slop.
    #[must_use]
    pub fn position_for(&self, overscroll: f32) -> Point {
        let travel = self.touch_slop + overscroll / DRAG_RATE;
        self.origin.offset_along(self.axis, travel)
    }

    /// First pointer down.
    #[must_use]
    pub fn down(mut self, id: PointerId, position: Point) -> Self {
        self.events.push(PointerEvent::Down {
            pointer_id: id,
            position,
        });
        self
    }

    /// Additional pointer down.
    #[must_use]
    pub fn secondary_down(mut self, id: PointerId, position: Point) -> Self {
        self.events.push(PointerEvent::SecondaryDown {
            pointer_id: id,
            position,
        });
        self
    }

    /// Pointer moved.
    #[must_use]
    pub fn move_to(mut self, id: PointerId, position: Point) -> Self {
        self.events.push(PointerEvent::Move {
            pointer_id: id,
            position,
        });
        self
    }

    /// Move so the tracker reports `overscroll`.
    #[must_use]
    pub fn drag_to(self, id: PointerId, overscroll: f32) -> Self {
        let position = self.position_for(overscroll);
        self.move_to(id, position)
    }

    /// Down at the origin, then drag to `overscroll`.
    #[must_use]
    pub fn pull(self, id: PointerId, overscroll: f32) -> Self {
        let origin = self.origin;
        self.down(id, origin).drag_to(id, overscroll)
    }

    /// Drag to `overscroll` in `steps` even moves.
    #[must_use]
    pub fn drag_in_steps(mut self, id: PointerId, overscroll: f32, steps: u32) -> Self {
        let steps = steps.max(1);
        for step in 1..=steps {
            self = self.drag_to(id, overscroll * step as f32 / steps as f32);
        }
        self
    }

    /// Non-final pointer up.
    #[must_use]
    pub fn secondary_up(mut self, id: PointerId) -> Self {
        self.events.push(PointerEvent::SecondaryUp { pointer_id: id });
        self
    }

    /// Final pointer up.
    #[must_use]
    pub fn release(mut self, id: PointerId) -> Self {
        self.events.push(PointerEvent::Up { pointer_id: id });
        self
    }

    /// Host cancel.
    #[must_use]
    pub fn cancel(mut self) -> Self {
        self.events.push(PointerEvent::Cancel);
        self
    }

    /// Feed every event. Returns the per-event "claimed" results.
    pub fn play(&self, refresh: &mut SwipeRefresh) -> Vec<bool> {
        self.events
            .iter()
            .map(|event| refresh.on_pointer_event(event))
            .collect()
    }
}
