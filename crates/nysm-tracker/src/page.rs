//! Page - A window plus the event loop that drives it
//!
//! Implements both host seams, so a [`Tracker`](crate::Tracker) can be
//! built directly on top of it.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;
use std::time::Duration;

use nysm_dom::{ComputedStyle, DOMRect, DomError, NodeId, Target, Window};
use nysm_viewability::LayoutHost;

use crate::{EventLoop, FrameScheduler, TimerId};

pub struct Page {
    window: RefCell<Window>,
    event_loop: EventLoop,
}

impl Page {
    pub fn new(window: Window) -> Self {
        Self {
            window: RefCell::new(window),
            event_loop: EventLoop::new(),
        }
    }

    pub fn window(&self) -> Ref<'_, Window> {
        self.window.borrow()
    }

    /// Mutable access for scrolling, resizing and DOM edits. Do not hold
    /// across `advance`/`paint`.
    pub fn window_mut(&self) -> RefMut<'_, Window> {
        self.window.borrow_mut()
    }

    pub fn event_loop(&self) -> &EventLoop {
        &self.event_loop
    }
}

impl LayoutHost for Page {
    fn resolve(&self, target: &Target) -> Result<NodeId, DomError> {
        self.window.borrow().resolve(target)
    }

    fn default_viewport(&self) -> NodeId {
        self.window.borrow().document.body()
    }

    fn bounding_client_rect(&self, node: NodeId) -> Option<DOMRect> {
        self.window.borrow().bounding_client_rect(node)
    }

    fn computed_style(&self, node: NodeId) -> Option<ComputedStyle> {
        self.window.borrow().computed_style(node)
    }

    fn inner_size(&self) -> (f64, f64) {
        let window = self.window.borrow();
        (window.inner_width(), window.inner_height())
    }
}

impl FrameScheduler for Page {
    fn set_interval(&self, period: Duration, callback: Rc<dyn Fn()>) -> TimerId {
        self.event_loop.set_interval(period, callback)
    }

    fn clear_interval(&self, id: TimerId) {
        self.event_loop.clear_interval(id);
    }

    fn request_animation_frame(&self, callback: Box<dyn FnOnce()>) {
        self.event_loop.request_animation_frame(callback);
    }
}
