use std::cell::RefCell;
use std::rc::Rc;

use hyoka_core::flow::{apply, FlowAction, FlowEffect, FlowState};

// Commits always read from here, never from the yew mirrors, so the committed
// rating is the last sampled value and not one deferred by the renderer.
#[derive(Clone)]
pub(crate) struct FlowCore {
    state: Rc<RefCell<FlowState>>,
}

impl FlowCore {
    pub(crate) fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(FlowState::new())),
        }
    }

    pub(crate) fn snapshot(&self) -> FlowState {
        self.state.borrow().clone()
    }

    pub(crate) fn dispatch(&self, action: FlowAction) -> Option<FlowEffect> {
        apply(&mut self.state.borrow_mut(), action)
    }
}
