//! Host queries
//!
//! The layout engine the calculator measures against.

use nysm_dom::{ComputedStyle, DOMRect, DomError, NodeId, Target, Window};

/// Rectangle, style and window-size queries plus target resolution.
pub trait LayoutHost {
    /// Resolve a selector or pass a node handle through.
    fn resolve(&self, target: &Target) -> Result<NodeId, DomError>;

    /// Viewport used when the caller does not name one (the document body).
    fn default_viewport(&self) -> NodeId;

    /// Viewport-relative border box; `None` if the node has no layout.
    fn bounding_client_rect(&self, node: NodeId) -> Option<DOMRect>;

    fn computed_style(&self, node: NodeId) -> Option<ComputedStyle>;

    /// Display surface size as (width, height).
    fn inner_size(&self) -> (f64, f64);
}

impl LayoutHost for Window {
    fn resolve(&self, target: &Target) -> Result<NodeId, DomError> {
        Window::resolve(self, target)
    }

    fn default_viewport(&self) -> NodeId {
        self.document.body()
    }

    fn bounding_client_rect(&self, node: NodeId) -> Option<DOMRect> {
        Window::bounding_client_rect(self, node)
    }

    fn computed_style(&self, node: NodeId) -> Option<ComputedStyle> {
        Window::computed_style(self, node)
    }

    fn inner_size(&self) -> (f64, f64) {
        (self.inner_width(), self.inner_height())
    }
}
