//! Recording ancestor scroll consumer.

use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use swipe_refresh_core::{Axis, NestedScrollAncestor};

/// Everything an ancestor was told.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AncestorLog {
    /// Axes of accepted starts
    pub starts: Vec<Axis>,
    /// `(offered, consumed)` per pre-scroll
    pub pre_scrolls: Vec<([f32; 2], [f32; 2])>,
    /// `[consumed_x, consumed_y, unconsumed_x, unconsumed_y]` per scroll
    pub scrolls: Vec<[f32; 4]>,
    /// Stop count
    pub stops: u32,
    /// Pre-fling velocities
    pub pre_flings: Vec<[f32; 2]>,
    /// Fling velocities
    pub flings: Vec<[f32; 2]>,
}

impl AncestorLog {
    /// Sum of everything consumed in pre-scrolls, per axis.
    #[must_use]
    pub fn total_pre_consumed(&self) -> [f32; 2] {
        self.pre_scrolls
            .iter()
            .fold([0.0, 0.0], |acc, (_, c)| [acc[0] + c[0], acc[1] + c[1]])
    }
}

/// Ancestor that consumes a fixed fraction of every pre-scroll and records
/// every call.
///
/// Clones share the log.
#[derive(Debug, Clone)]
pub struct RecordingAncestor {
    accepts: bool,
    consume_fraction: f32,
    window_offset: [f32; 2],
    claims_flings: bool,
    log: Rc<RefCell<AncestorLog>>,
}

impl Default for RecordingAncestor {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl RecordingAncestor {
    /// Ancestor consuming `consume_fraction` of each pre-scroll.
    #[must_use]
    pub fn new(consume_fraction: f32) -> Self {
        Self {
            accepts: true,
            consume_fraction,
            window_offset: [0.0, 0.0],
            claims_flings: false,
            log: Rc::new(RefCell::new(AncestorLog::default())),
        }
    }

    /// Ancestor that turns every nested scroll down.
    #[must_use]
    pub fn refusing() -> Self {
        Self {
            accepts: false,
            ..Self::new(0.0)
        }
    }

    /// Report this window movement from every post-scroll.
    #[must_use]
    pub fn with_window_offset(mut self, dx: f32, dy: f32) -> Self {
        self.window_offset = [dx, dy];
        self
    }

    /// Claim every fling.
    #[must_use]
    pub fn claiming_flings(mut self) -> Self {
        self.claims_flings = true;
        self
    }

    /// Snapshot of the log.
    #[must_use]
    pub fn log(&self) -> AncestorLog {
        self.log.borrow().clone()
    }
}

impl NestedScrollAncestor for RecordingAncestor {
    fn start_nested_scroll(&mut self, axis: Axis) -> bool {
        if self.accepts {
            self.log.borrow_mut().starts.push(axis);
        }
        self.accepts
    }

    fn pre_scroll(&mut self, dx: f32, dy: f32) -> [f32; 2] {
        let consumed = [dx * self.consume_fraction, dy * self.consume_fraction];
        self.log.borrow_mut().pre_scrolls.push(([dx, dy], consumed));
        consumed
    }

    fn scroll(
        &mut self,
        consumed_x: f32,
        consumed_y: f32,
        unconsumed_x: f32,
        unconsumed_y: f32,
    ) -> [f32; 2] {
        self.log
            .borrow_mut()
            .scrolls
            .push([consumed_x, consumed_y, unconsumed_x, unconsumed_y]);
        self.window_offset
    }

    fn stop_nested_scroll(&mut self) {
        self.log.borrow_mut().stops += 1;
    }

    fn pre_fling(&mut self, velocity_x: f32, velocity_y: f32) -> bool {
        self.log.borrow_mut().pre_flings.push([velocity_x, velocity_y]);
        self.claims_flings
    }

    fn fling(&mut self, velocity_x: f32, velocity_y: f32, _consumed: bool) -> bool {
        self.log.borrow_mut().flings.push([velocity_x, velocity_y]);
        self.claims_flings
    }
}
