//! Pointer tracking: slop-gated drag start, damped drag delta and
//! multi-touch active-pointer reassignment.

use crate::event::{PointerEvent, PointerId};
use crate::geometry::{Axis, Point};
use serde::{Deserialize, Serialize};

/// Damping applied to finger travel so the indicator lags the finger.
pub const DRAG_RATE: f32 = 0.5;

/// The single drag session owned by a [`GestureTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DragSession {
    /// Pointer whose movement drives the drag
    pub active_pointer: Option<PointerId>,
    /// Where the first pointer went down
    pub initial_down: Point,
    /// Anchor set once the slop is exceeded
    pub drag_start: Option<Point>,
    /// Slop exceeded
    pub is_dragging: bool,
}

impl DragSession {
    /// Check if no pointer is tracked.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.active_pointer.is_none()
    }
}

/// What a pointer event did to the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackerOutput {
    /// Unknown pointer, or no session to apply the event to
    Rejected,
    /// Known pointer, nothing to report
    Ignored,
    /// Session active, slop not yet exceeded
    Tracking,
    /// Slop just exceeded
    DragStarted {
        /// Damped distance past the slop anchor
        overscroll: f32,
    },
    /// Drag continued
    Dragged {
        /// Damped distance from the drag anchor; may be negative
        overscroll: f32,
    },
    /// Session ended by final up or cancel
    Released {
        /// Terminal distance if a drag was in progress
        overscroll: Option<f32>,
    },
}

impl TrackerOutput {
    /// Overscroll reported by a drag step.
    #[must_use]
    pub const fn drag_overscroll(&self) -> Option<f32> {
        match self {
            Self::DragStarted { overscroll } | Self::Dragged { overscroll } => Some(*overscroll),
            _ => None,
        }
    }
}

/// Converts raw pointer events into a [`DragSession`].
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    axis: Axis,
    touch_slop: f32,
    session: DragSession,
    /// Pointers currently down, in the order they went down.
    pointers: Vec<(PointerId, Point)>,
}

impl GestureTracker {
    /// Create a tracker for a drag axis and slop.
    #[must_use]
    pub const fn new(axis: Axis, touch_slop: f32) -> Self {
        Self {
            axis,
            touch_slop,
            session: DragSession {
                active_pointer: None,
                initial_down: Point::ORIGIN,
                drag_start: None,
                is_dragging: false,
            },
            pointers: Vec::new(),
        }
    }

    /// Change the drag axis. Takes effect for the next move.
    pub fn set_axis(&mut self, axis: Axis) {
        self.axis = axis;
    }

    /// Change the touch slop.
    pub fn set_touch_slop(&mut self, touch_slop: f32) {
        self.touch_slop = touch_slop;
    }

    /// Current session.
    #[must_use]
    pub const fn session(&self) -> &DragSession {
        &self.session
    }

    /// Check if the slop has been exceeded.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.session.is_dragging
    }

    /// Active pointer, if any.
    #[must_use]
    pub const fn active_pointer(&self) -> Option<PointerId> {
        self.session.active_pointer
    }

    /// Pointers currently down, in down order.
    #[must_use]
    pub fn pointers(&self) -> Vec<PointerId> {
        self.pointers.iter().map(|(id, _)| *id).collect()
    }

    /// Dispatch one event.
    pub fn process(&mut self, event: &PointerEvent) -> TrackerOutput {
        match *event {
            PointerEvent::Down {
                pointer_id,
                position,
            } => self.on_down(pointer_id, position),
            PointerEvent::SecondaryDown {
                pointer_id,
                position,
            } => self.on_secondary_down(pointer_id, position),
            PointerEvent::Move {
                pointer_id,
                position,
            } => self.on_move(pointer_id, position),
            PointerEvent::SecondaryUp { pointer_id } => self.on_secondary_up(pointer_id),
            PointerEvent::Up { pointer_id } => self.on_up(pointer_id),
            PointerEvent::Cancel => self.on_cancel(),
        }
    }

    /// First pointer down. Ignored while a session exists.
    pub fn on_down(&mut self, id: PointerId, position: Point) -> TrackerOutput {
        if !self.session.is_empty() {
            log::debug!("pointer {} down ignored, session already active", id.0);
            return TrackerOutput::Ignored;
        }
        self.pointers.clear();
        self.pointers.push((id, position));
        self.session = DragSession {
            active_pointer: Some(id),
            initial_down: position,
            drag_start: None,
            is_dragging: false,
        };
        TrackerOutput::Tracking
    }

    /// Another pointer down; it becomes the active pointer.
    pub fn on_secondary_down(&mut self, id: PointerId, position: Point) -> TrackerOutput {
        if self.session.is_empty() {
            log::debug!("secondary pointer {} down without a session", id.0);
            return TrackerOutput::Rejected;
        }
        match self.index_of(id) {
            Some(index) => self.pointers[index].1 = position,
            None => self.pointers.push((id, position)),
        }
        self.session.active_pointer = Some(id);
        TrackerOutput::Ignored
    }

    /// Pointer moved.
    pub fn on_move(&mut self, id: PointerId, position: Point) -> TrackerOutput {
        let Some(index) = self.index_of(id) else {
            log::debug!("move for unknown pointer {} rejected", id.0);
            return TrackerOutput::Rejected;
        };
        self.pointers[index].1 = position;
        if self.session.active_pointer != Some(id) {
            return TrackerOutput::Ignored;
        }

        if !self.session.is_dragging {
            let delta = (position - self.session.initial_down).along(self.axis);
            if delta.abs() <= self.touch_slop {
                return TrackerOutput::Tracking;
            }
            let anchor = self
                .session
                .initial_down
                .offset_along(self.axis, self.touch_slop.copysign(delta));
            self.session.drag_start = Some(anchor);
            self.session.is_dragging = true;
            return TrackerOutput::DragStarted {
                overscroll: self.overscroll_at(position),
            };
        }

        TrackerOutput::Dragged {
            overscroll: self.overscroll_at(position),
        }
    }

    /// Non-final pointer up.
    ///
    /// Releasing the active pointer hands the drag to the pointer at index
    /// 1 if the released one was at index 0, otherwise to index 0.
    pub fn on_secondary_up(&mut self, id: PointerId) -> TrackerOutput {
        let Some(released) = self.index_of(id) else {
            log::debug!("secondary up for unknown pointer {} rejected", id.0);
            return TrackerOutput::Rejected;
        };
        if self.session.active_pointer == Some(id) {
            let replacement = if released == 0 { 1 } else { 0 };
            self.session.active_pointer = self.pointers.get(replacement).map(|(p, _)| *p);
        }
        self.pointers.remove(released);
        TrackerOutput::Ignored
    }

    /// Final pointer up. Clears the session.
    pub fn on_up(&mut self, id: PointerId) -> TrackerOutput {
        if self.index_of(id).is_none() {
            log::debug!("up for unknown pointer {} rejected", id.0);
            return TrackerOutput::Rejected;
        }
        self.release()
    }

    /// Gesture cancelled. Clears the session.
    pub fn on_cancel(&mut self) -> TrackerOutput {
        if self.session.is_empty() {
            return TrackerOutput::Ignored;
        }
        self.release()
    }

    /// Drop all pointer state.
    pub fn reset(&mut self) {
        self.session = DragSession::default();
        self.pointers.clear();
    }

    fn release(&mut self) -> TrackerOutput {
        let overscroll = if self.session.is_dragging {
            self.active_position().map(|p| self.overscroll_at(p))
        } else {
            None
        };
        self.reset();
        TrackerOutput::Released { overscroll }
    }

    fn index_of(&self, id: PointerId) -> Option<usize> {
        self.pointers.iter().position(|(p, _)| *p == id)
    }

    fn active_position(&self) -> Option<Point> {
        let active = self.session.active_pointer?;
        self.index_of(active).map(|i| self.pointers[i].1)
    }

    fn overscroll_at(&self, position: Point) -> f32 {
        let anchor = self.session.drag_start.unwrap_or(self.session.initial_down);
        (position - anchor).along(self.axis) * DRAG_RATE
    }
}
