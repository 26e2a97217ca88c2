//! Pointer input delivered by the host's event dispatch.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Pointer identifier for multi-touch tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct PointerId(pub u32);

impl PointerId {
    /// Create a new pointer ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Raw pointer events as seen by the refresh controller.
///
/// Pointers are indexed in the order they went down; secondary pointer up
/// uses that ordering to pick a replacement active pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// First pointer went down
    Down {
        /// Pointer ID
        pointer_id: PointerId,
        /// Position
        position: Point,
    },
    /// Another pointer went down while a session is active
    SecondaryDown {
        /// Pointer ID
        pointer_id: PointerId,
        /// Position
        position: Point,
    },
    /// Pointer moved
    Move {
        /// Pointer ID
        pointer_id: PointerId,
        /// New position
        position: Point,
    },
    /// Non-final pointer went up
    SecondaryUp {
        /// Pointer ID
        pointer_id: PointerId,
    },
    /// Final pointer went up
    Up {
        /// Pointer ID
        pointer_id: PointerId,
    },
    /// Gesture cancelled by the host
    Cancel,
}

impl PointerEvent {
    /// Pointer this event refers to, if any.
    #[must_use]
    pub const fn pointer_id(&self) -> Option<PointerId> {
        match self {
            Self::Down { pointer_id, .. }
            | Self::SecondaryDown { pointer_id, .. }
            | Self::Move { pointer_id, .. }
            | Self::SecondaryUp { pointer_id }
            | Self::Up { pointer_id } => Some(*pointer_id),
            Self::Cancel => None,
        }
    }

    /// Position carried by the event, if any.
    #[must_use]
    pub const fn position(&self) -> Option<Point> {
        match self {
            Self::Down { position, .. }
            | Self::SecondaryDown { position, .. }
            | Self::Move { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Check if this event ends the whole gesture.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Up { .. } | Self::Cancel)
    }
}
