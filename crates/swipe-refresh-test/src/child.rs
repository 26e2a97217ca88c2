//! Fake scrollable content.

use std::cell::Cell;
use std::rc::Rc;
use swipe_refresh_core::{Axis, ScrollableChild};

/// Scrollable child whose scroll position the test flips by hand.
///
/// Clones share state, so a test can hand one clone to the controller and
/// keep another to move the content.
#[derive(Debug, Clone, Default)]
pub struct FakeChild {
    can_scroll: Rc<Cell<bool>>,
    nested: bool,
    queries: Rc<Cell<u32>>,
}

impl FakeChild {
    /// Child scrolled to its start edge.
    #[must_use]
    pub fn at_start() -> Self {
        Self {
            nested: true,
            ..Self::default()
        }
    }

    /// Child that does not run nested scrolling itself.
    #[must_use]
    pub fn without_nested_scrolling() -> Self {
        Self::default()
    }

    /// Move the content away from (or back to) its start edge.
    pub fn set_can_scroll(&self, can_scroll: bool) {
        self.can_scroll.set(can_scroll);
    }

    /// Times the controller asked whether the content can scroll.
    #[must_use]
    pub fn queries(&self) -> u32 {
        self.queries.get()
    }
}

impl ScrollableChild for FakeChild {
    fn can_scroll_toward_start(&self, _axis: Axis) -> bool {
        self.queries.set(self.queries.get() + 1);
        self.can_scroll.get()
    }

    fn supports_nested_scrolling(&self) -> bool {
        self.nested
    }
}
