//! [`HookRecorder`] for asserting hook order.

use std::cell::RefCell;
use std::rc::Rc;

/// Ordered, shared log of labelled events.
#[derive(Clone, Default)]
pub struct HookRecorder {
    events: Rc<RefCell<Vec<String>>>,
}

impl HookRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: impl Into<String>) {
        self.events.borrow_mut().push(event.into());
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}
