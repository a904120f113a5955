//! tabnav DOM - Document Object Model
//!
//! Arena-based DOM tree with shadow roots and slot assignment, the host
//! tree that the focus engine walks.

mod document;
mod geometry;
mod node;
mod shadow;
mod style;
mod tree;

pub use document::Document;
pub use geometry::DOMRect;
pub use node::{Attribute, ElementData, Node, NodeData, NodeType, ShadowRootData};
pub use shadow::{ShadowRootInit, ShadowRootMode};
pub use style::{Display, InlineStyle, Visibility};
pub use tree::{Children, DomError, DomResult, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Document node ID (always the first node in the arena)
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID points at a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw arena index
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }

    /// Convert the sentinel into `None`
    #[inline]
    pub fn to_option(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            write!(f, "#none")
        }
    }
}
