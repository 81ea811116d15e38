//! Selectors and target resolution
//!
//! A target is either a selector string, resolved against the document on
//! demand, or a node handle that is passed through unchanged.

use crate::NodeId;

/// Simple selector for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Tag(String),
    Class(String),
    Id(String),
    Universal,
}

impl SimpleSelector {
    /// Parse a simple selector string.
    ///
    /// Only `*`, `tag`, `#id` and `.class` are understood; compound
    /// selectors and combinators yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s == "*" {
            return Some(Self::Universal);
        }

        if let Some(id) = s.strip_prefix('#') {
            is_ident(id).then(|| Self::Id(id.to_string()))
        } else if let Some(class) = s.strip_prefix('.') {
            is_ident(class).then(|| Self::Class(class.to_string()))
        } else {
            is_ident(s).then(|| Self::Tag(s.to_ascii_lowercase()))
        }
    }

    /// Check an element's tag, id and class list against this selector.
    pub fn matches(&self, tag: &str, id: Option<&str>, classes: &[String]) -> bool {
        match self {
            Self::Universal => true,
            Self::Tag(name) => tag.eq_ignore_ascii_case(name),
            Self::Id(wanted) => id == Some(wanted.as_str()),
            Self::Class(class) => classes.iter().any(|c| c == class),
        }
    }
}

fn is_ident(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Something to measure: a selector or a node handle.
///
/// Also serves as the identity key of a tracked entry, so re-tracking the
/// same selector replaces the earlier registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Selector(String),
    Node(NodeId),
}

/// Registry key of a tracked entry; the caller's [`Target`] as given.
pub type TargetKey = Target;

impl From<&str> for Target {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl From<String> for Target {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

impl From<NodeId> for Target {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}
