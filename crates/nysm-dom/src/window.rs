//! Window - The display surface a document is shown in
//!
//! Owns the document, the inner size and the scroll offset, and answers
//! the viewport-relative queries (`getBoundingClientRect`,
//! `getComputedStyle`).

use crate::{ComputedStyle, DOMRect, Document, DomError, NodeId, Target};

#[derive(Debug, Clone)]
pub struct Window {
    pub document: Document,
    inner_width: f64,
    inner_height: f64,
    scroll_x: f64,
    scroll_y: f64,
}

impl Window {
    pub fn new(document: Document, inner_width: f64, inner_height: f64) -> Self {
        Self {
            document,
            inner_width,
            inner_height,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }

    pub fn inner_width(&self) -> f64 {
        self.inner_width
    }

    pub fn inner_height(&self) -> f64 {
        self.inner_height
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        tracing::debug!(width, height, "window resized");
        self.inner_width = width;
        self.inner_height = height;
    }

    pub fn scroll_x(&self) -> f64 {
        self.scroll_x
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Scroll to an absolute offset (negative offsets clamp to 0)
    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.scroll_x = x.max(0.0);
        self.scroll_y = y.max(0.0);
    }

    /// Scroll by amount
    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        self.scroll_to(self.scroll_x + dx, self.scroll_y + dy);
    }

    /// Border box relative to the top-left of the display surface.
    ///
    /// `None` once the node is no longer connected.
    pub fn bounding_client_rect(&self, node: NodeId) -> Option<DOMRect> {
        self.document
            .layout_rect(node)
            .map(|rect| rect.translated(-self.scroll_x, -self.scroll_y))
    }

    pub fn computed_style(&self, node: NodeId) -> Option<ComputedStyle> {
        self.document.computed_style(node)
    }

    pub fn resolve(&self, target: &Target) -> Result<NodeId, DomError> {
        self.document.resolve(target)
    }
}
