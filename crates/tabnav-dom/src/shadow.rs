//! Shadow DOM
//!
//! Shadow root options and slot assignment.
//!
//! Assignment is the "named" mode: a `<slot name=N>` inside a shadow tree
//! receives the host's light children whose `slot` attribute equals `N`.
//! The default slot (no name, or empty name) receives children without a
//! `slot` attribute, text included. Only the first slot in tree order with
//! a given name receives nodes.

use crate::{DomTree, Node, NodeId};

/// Shadow root mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowRootMode {
    #[default]
    Open,
    Closed,
}

impl ShadowRootMode {
    /// Parse the `shadowrootmode` attribute value
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

/// Shadow root initialization options
#[derive(Debug, Clone, Copy, Default)]
pub struct ShadowRootInit {
    pub mode: ShadowRootMode,
    pub delegates_focus: bool,
}

impl ShadowRootInit {
    /// Open shadow root without focus delegation
    pub fn open() -> Self {
        Self::default()
    }

    /// Open shadow root that delegates focus
    pub fn delegating() -> Self {
        Self {
            mode: ShadowRootMode::Open,
            delegates_focus: true,
        }
    }
}

impl DomTree {
    /// Whether `id` is a `<slot>` element
    #[inline]
    pub fn is_slot(&self, id: NodeId) -> bool {
        self.is_tag(id, "slot")
    }

    /// Name a slot matches (empty for the default slot)
    pub fn slot_name(&self, slot: NodeId) -> &str {
        self.attr(slot, "name").unwrap_or("")
    }

    /// Shadow root whose tree structurally contains `id`
    pub fn containing_shadow_root(&self, id: NodeId) -> Option<NodeId> {
        let mut cursor = self.parent(id);
        let mut last = id;
        while let Some(p) = cursor {
            last = p;
            cursor = self.parent(p);
        }
        self.get(last)
            .filter(|n| n.is_shadow_root() && last != id)
            .map(|_| last)
    }

    /// First slot in tree order under `shadow_root` with `name`
    pub fn find_slot(&self, shadow_root: NodeId, name: &str) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.children(shadow_root).collect();
        stack.reverse();
        while let Some(id) = stack.pop() {
            if self.is_slot(id) && self.slot_name(id) == name {
                return Some(id);
            }
            let mark = stack.len();
            stack.extend(self.children(id));
            stack[mark..].reverse();
        }
        None
    }

    /// Name of the slot a light child asks for
    fn requested_slot(&self, id: NodeId) -> &str {
        match self.get(id).map(Node::node_type) {
            Some(crate::NodeType::Element) => self.attr(id, "slot").unwrap_or(""),
            _ => "",
        }
    }

    /// Slot `id` is assigned to, if its parent hosts a shadow tree
    pub fn assigned_slot(&self, id: NodeId) -> Option<NodeId> {
        let node = self.get(id)?;
        if !matches!(
            node.node_type(),
            crate::NodeType::Element | crate::NodeType::Text
        ) {
            return None;
        }
        let host = self.parent(id)?;
        let shadow_root = self.shadow_root(host)?;
        self.find_slot(shadow_root, self.requested_slot(id))
    }

    /// Nodes assigned to `slot`, in the host's child order
    pub fn assigned_nodes(&self, slot: NodeId) -> Vec<NodeId> {
        if !self.is_slot(slot) {
            return Vec::new();
        }
        let Some(shadow_root) = self.containing_shadow_root(slot) else {
            return Vec::new();
        };
        let Some(host) = self.shadow_host(shadow_root) else {
            return Vec::new();
        };
        let name = self.slot_name(slot);
        if self.find_slot(shadow_root, name) != Some(slot) {
            return Vec::new();
        }
        self.children(host)
            .filter(|&c| {
                matches!(
                    self.get(c).map(Node::node_type),
                    Some(crate::NodeType::Element | crate::NodeType::Text)
                ) && self.requested_slot(c) == name
            })
            .collect()
    }

    /// Whether `slot` currently has assigned nodes
    pub fn has_assigned_nodes(&self, slot: NodeId) -> bool {
        !self.assigned_nodes(slot).is_empty()
    }

    /// Shadow-including pre-order over the elements below `start`
    ///
    /// A host's shadow tree comes before its light children.
    pub fn shadow_including_descendants(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            if node != start && self.element(node).is_some() {
                out.push(node);
            }
            let mut next: Vec<NodeId> = self.children(node).collect();
            if let Some(shadow) = self.shadow_root(node) {
                let mut inner: Vec<NodeId> = self.children(shadow).collect();
                inner.append(&mut next);
                next = inner;
            }
            stack.extend(next.into_iter().rev());
        }
        out
    }
}
