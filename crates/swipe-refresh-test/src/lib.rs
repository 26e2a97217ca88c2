//! Testing harness for swipe-refresh controllers.
//!
//! - [`FrameClock`]: fixed-step animation clock
//! - [`GestureScript`]: scripted pointer input
//! - [`FakeChild`]: scrollable content with a hand-set scroll position
//! - [`RecordingAncestor`]: ancestor scroll consumer that records every call
//! - [`RefreshHarness`]: all of the above around one controller, with a
//!   refresh counter and JSON snapshots

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod ancestor;
mod child;
mod clock;
mod gesture;
mod harness;

pub use ancestor::{AncestorLog, RecordingAncestor};
pub use child::FakeChild;
pub use clock::{FrameClock, DEFAULT_FRAME_MS, MAX_FRAMES};
pub use gesture::GestureScript;
pub use harness::{RefreshHarness, Snapshot};
