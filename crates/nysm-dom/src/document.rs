//! Document - Element tree with layout and style

use crate::{ComputedStyle, DOMRect, DomError, NodeId, SimpleSelector, Target};

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Border box in page coordinates
    layout: DOMRect,
    style: ComputedStyle,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
            parent: None,
            children: Vec::new(),
            layout: DOMRect::default(),
            style: ComputedStyle::default(),
        }
    }
}

/// HTML Document
///
/// Nodes live in an arena and are never freed; removing a node only
/// disconnects it, so stale `NodeId`s stay valid but stop reporting layout.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    html_element: NodeId,
    body_element: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document with `<html>` and `<body>`
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: vec![NodeData::new("html")],
            html_element: NodeId(0),
            body_element: NodeId(0),
        };
        let body = doc.create_element("body");
        doc.link(doc.html_element, body);
        doc.body_element = body;
        doc
    }

    /// Get `<html>` element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get `<body>` element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a disconnected element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData::new(tag));
        id
    }

    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.node(node).map(|n| n.tag.as_str())
    }

    pub fn set_id(&mut self, node: NodeId, id: &str) -> Result<(), DomError> {
        self.node_mut(node)?.id = Some(id.to_string());
        Ok(())
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) -> Result<(), DomError> {
        let data = self.node_mut(node)?;
        if !data.classes.iter().any(|c| c == class) {
            data.classes.push(class.to_string());
        }
        Ok(())
    }

    /// Append `child` to `parent`, moving it out of any previous parent.
    ///
    /// Fails with `HierarchyRequest` if `child` is `parent` or one of its
    /// ancestors.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.node(parent).ok_or(DomError::UnknownNode(parent))?;
        self.node(child).ok_or(DomError::UnknownNode(child))?;
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        self.unlink(child);
        self.link(parent, child);
        Ok(())
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).and_then(|n| n.parent);
        }
        false
    }

    /// Disconnect a node (and its subtree) from the document.
    pub fn remove(&mut self, node: NodeId) -> Result<(), DomError> {
        self.node(node).ok_or(DomError::UnknownNode(node))?;
        self.unlink(node);
        tracing::trace!(?node, "node removed from document");
        Ok(())
    }

    /// Whether the node is reachable from `<html>`.
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.is_inclusive_ancestor(self.html_element, node)
    }

    pub fn set_layout_rect(&mut self, node: NodeId, rect: DOMRect) -> Result<(), DomError> {
        self.node_mut(node)?.layout = rect;
        Ok(())
    }

    /// Border box in page coordinates, if the node is connected.
    pub fn layout_rect(&self, node: NodeId) -> Option<DOMRect> {
        self.connected(node).map(|n| n.layout)
    }

    pub fn set_style(&mut self, node: NodeId, style: ComputedStyle) -> Result<(), DomError> {
        self.node_mut(node)?.style = style;
        Ok(())
    }

    /// Computed style, if the node is connected.
    pub fn computed_style(&self, node: NodeId) -> Option<ComputedStyle> {
        self.connected(node).map(|n| n.style)
    }

    /// First connected element matching `selector` in document order.
    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        let selector = SimpleSelector::parse(selector)?;
        let mut stack = vec![self.html_element];

        while let Some(id) = stack.pop() {
            let node = self.node(id)?;
            if selector.matches(&node.tag, node.id.as_deref(), &node.classes) {
                return Some(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Resolve a target to a node handle.
    ///
    /// Selectors must match a connected element; node handles pass through
    /// untouched even when they are no longer connected.
    pub fn resolve(&self, target: &Target) -> Result<NodeId, DomError> {
        match target {
            Target::Node(node) => Ok(*node),
            Target::Selector(selector) => self
                .query_selector(selector)
                .ok_or_else(|| DomError::InvalidSelector(selector.clone())),
        }
    }

    fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.index())
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData, DomError> {
        self.nodes.get_mut(id.index()).ok_or(DomError::UnknownNode(id))
    }

    fn connected(&self, id: NodeId) -> Option<&NodeData> {
        if self.is_connected(id) { self.node(id) } else { None }
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(p) = self.nodes.get_mut(parent.index()) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child.index()) {
            c.parent = Some(parent);
        }
    }

    fn unlink(&mut self, child: NodeId) {
        let Some(parent) = self.node(child).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent.index()) {
            p.children.retain(|&c| c != child);
        }
        if let Some(c) = self.nodes.get_mut(child.index()) {
            c.parent = None;
        }
    }
}
