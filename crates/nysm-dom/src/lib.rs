//! nysm DOM - Host document model
//!
//! Element geometry, computed style, selector resolution and the window
//! those elements are laid out in.

mod document;
mod geometry;
mod selector;
mod style;
mod window;

pub use document::Document;
pub use geometry::DOMRect;
pub use selector::{SimpleSelector, Target, TargetKey};
pub use style::{ComputedStyle, Display, Visibility};
pub use window::Window;

/// Node identifier (index into the document arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Build an id from its raw arena index.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// DOM error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("An invalid selector was passed: \"{0}\".")]
    InvalidSelector(String),

    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),

    /// Inserting the node would make it its own ancestor.
    #[error("Cannot insert {child:?} into {parent:?}: the new child is an ancestor of the parent")]
    HierarchyRequest { parent: NodeId, child: NodeId },
}
