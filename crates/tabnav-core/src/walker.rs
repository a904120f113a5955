//! Composed tree walker
//!
//! A DOM `TreeWalker` that crosses shadow roots and slots, presenting light
//! DOM, shadow trees and slotted content as one document order.
//!
//! The walker keeps a stack of frames. Frame 0 is scoped to the traversal
//! root; entering a shadow host pushes a `Shadow` frame over its shadow
//! tree and entering a slot with assigned nodes pushes a `Slot` frame over
//! the assigned list. Inside a frame, shadow hosts and slots with assigned
//! nodes are leaves: their content is only reachable by pushing a frame.
//! Climbing out of a frame's root pops it; frame 0 is never popped.

use tabnav_dom::{DomTree, NodeId, NodeType};

/// What types of nodes to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhatToShow(u32);

impl WhatToShow {
    pub const ALL: WhatToShow = WhatToShow(0xFFFF_FFFF);
    pub const ELEMENT: WhatToShow = WhatToShow(0x1);
    pub const TEXT: WhatToShow = WhatToShow(0x4);
    pub const COMMENT: WhatToShow = WhatToShow(0x80);
    pub const DOCUMENT: WhatToShow = WhatToShow(0x100);
    pub const DOCUMENT_FRAGMENT: WhatToShow = WhatToShow(0x400);

    /// Check if a node type is shown
    pub fn includes(self, node_type: NodeType) -> bool {
        let flag = match node_type {
            NodeType::Element => Self::ELEMENT.0,
            NodeType::Text => Self::TEXT.0,
            NodeType::Comment => Self::COMMENT.0,
            NodeType::Document => Self::DOCUMENT.0,
            NodeType::DocumentFragment => Self::DOCUMENT_FRAGMENT.0,
        };
        (self.0 & flag) != 0
    }

    /// Union of two WhatToShow filters
    pub fn or(self, other: WhatToShow) -> WhatToShow {
        WhatToShow(self.0 | other.0)
    }
}

impl Default for WhatToShow {
    fn default() -> Self {
        Self::ALL
    }
}

/// Node filter result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    /// Accept the node
    Accept,
    /// Reject the node and its descendants
    Reject,
    /// Skip this node but process its children
    Skip,
}

/// Node filter consulted for every visited node
pub trait NodeFilter {
    fn accept_node(&mut self, node: NodeId) -> FilterResult;
}

impl<F> NodeFilter for F
where
    F: FnMut(NodeId) -> FilterResult,
{
    fn accept_node(&mut self, node: NodeId) -> FilterResult {
        self(node)
    }
}

/// Default filter that accepts all nodes
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllFilter;

impl NodeFilter for AcceptAllFilter {
    fn accept_node(&mut self, _node: NodeId) -> FilterResult {
        FilterResult::Accept
    }
}

/// What a frame iterates over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Structural children of the root
    Light,
    /// The shadow tree of the root host
    Shadow,
    /// The nodes assigned to the root slot
    Slot,
}

/// One cursor scoped to a light subtree, a shadow tree or a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub kind: FrameKind,
    /// Node the frame was entered through
    pub root: NodeId,
    /// Position of this frame's cursor
    pub cursor: NodeId,
}

/// Frame kind a node opens when the walker steps into it
fn boundary_kind(tree: &DomTree, node: NodeId) -> Option<FrameKind> {
    if tree.shadow_root(node).is_some() {
        Some(FrameKind::Shadow)
    } else if tree.is_slot(node) && tree.has_assigned_nodes(node) {
        Some(FrameKind::Slot)
    } else {
        None
    }
}

/// Nodes the walker steps through instead of returning them
pub fn is_pass_through(tree: &DomTree, node: NodeId) -> bool {
    tree.delegates_focus(node) || (tree.is_slot(node) && tree.has_assigned_nodes(node))
}

impl Frame {
    fn new(kind: FrameKind, root: NodeId) -> Self {
        Self {
            kind,
            root,
            cursor: root,
        }
    }

    fn first_top(&self, tree: &DomTree) -> Option<NodeId> {
        match self.kind {
            FrameKind::Light => tree.first_child(self.root),
            FrameKind::Shadow => tree.shadow_root(self.root).and_then(|s| tree.first_child(s)),
            FrameKind::Slot => tree.assigned_nodes(self.root).first().copied(),
        }
    }

    fn last_top(&self, tree: &DomTree) -> Option<NodeId> {
        match self.kind {
            FrameKind::Light => tree.last_child(self.root),
            FrameKind::Shadow => tree.shadow_root(self.root).and_then(|s| tree.last_child(s)),
            FrameKind::Slot => tree.assigned_nodes(self.root).last().copied(),
        }
    }

    fn is_top_level(&self, tree: &DomTree, node: NodeId) -> bool {
        match self.kind {
            FrameKind::Light => tree.parent(node) == Some(self.root),
            FrameKind::Shadow => {
                tree.parent(node).is_some() && tree.parent(node) == tree.shadow_root(self.root)
            }
            FrameKind::Slot => tree.assigned_nodes(self.root).contains(&node),
        }
    }

    fn parent_of(&self, tree: &DomTree, node: NodeId) -> Option<NodeId> {
        if node == self.root {
            return None;
        }
        if self.kind != FrameKind::Light && self.is_top_level(tree, node) {
            return Some(self.root);
        }
        tree.parent(node)
    }

    fn first_child_of(&self, tree: &DomTree, node: NodeId) -> Option<NodeId> {
        if node == self.root {
            return self.first_top(tree);
        }
        if boundary_kind(tree, node).is_some() {
            return None;
        }
        tree.first_child(node)
    }

    fn last_child_of(&self, tree: &DomTree, node: NodeId) -> Option<NodeId> {
        if node == self.root {
            return self.last_top(tree);
        }
        if boundary_kind(tree, node).is_some() {
            return None;
        }
        tree.last_child(node)
    }

    fn next_sibling_of(&self, tree: &DomTree, node: NodeId) -> Option<NodeId> {
        if node == self.root {
            return None;
        }
        if self.kind == FrameKind::Slot {
            let assigned = tree.assigned_nodes(self.root);
            if let Some(pos) = assigned.iter().position(|&n| n == node) {
                return assigned.get(pos + 1).copied();
            }
        }
        tree.next_sibling(node)
    }

    fn previous_sibling_of(&self, tree: &DomTree, node: NodeId) -> Option<NodeId> {
        if node == self.root {
            return None;
        }
        if self.kind == FrameKind::Slot {
            let assigned = tree.assigned_nodes(self.root);
            if let Some(pos) = assigned.iter().position(|&n| n == node) {
                return pos.checked_sub(1).map(|p| assigned[p]);
            }
        }
        tree.previous_sibling(node)
    }
}

/// TreeWalker over the composed tree
pub struct ComposedWalker<'t, F> {
    tree: &'t DomTree,
    root: NodeId,
    what_to_show: WhatToShow,
    filter: F,
    frames: Vec<Frame>,
}

impl<'t, F: NodeFilter> ComposedWalker<'t, F> {
    /// Create a walker over `root`; a shadow host root starts inside its shadow tree
    pub fn new(tree: &'t DomTree, root: NodeId, what_to_show: WhatToShow, filter: F) -> Self {
        let frames = if tree.get(root).is_some() {
            let kind = boundary_kind(tree, root).unwrap_or(FrameKind::Light);
            vec![Frame::new(kind, root)]
        } else {
            Vec::new()
        };
        Self {
            tree,
            root,
            what_to_show,
            filter,
            frames,
        }
    }

    /// The root of the traversal
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The current node
    pub fn current_node(&self) -> NodeId {
        self.frames.last().map_or(self.root, |f| f.cursor)
    }

    /// Number of frames on the stack (1 at the root level)
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The frame stack, outermost first
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut F {
        &mut self.filter
    }

    /// Move the cursor to `node`, rebuilding the frames between the root and it
    pub fn set_current_node(&mut self, node: NodeId) {
        let Some(&base) = self.frames.first() else {
            return;
        };

        let mut chain = Vec::new();
        let mut cursor = node;
        let mut reached = false;
        loop {
            if cursor == self.root {
                reached = true;
                break;
            }
            let step = match self.tree.assigned_slot(cursor) {
                Some(slot) => Some((slot, Some(FrameKind::Slot))),
                None => self.tree.parent(cursor).map(|p| match self.tree.shadow_host(p) {
                    Some(host) => (host, Some(FrameKind::Shadow)),
                    None => (p, None),
                }),
            };
            let Some((parent, kind)) = step else {
                break;
            };
            if let Some(kind) = kind {
                if parent != self.root {
                    chain.push(Frame::new(kind, parent));
                }
            }
            cursor = parent;
        }

        let mut frames = vec![base];
        if reached {
            frames.extend(chain.into_iter().rev());
        }
        tracing::trace!("walker: cursor set to {} at depth {}", node, frames.len());
        self.commit(frames, node);
    }

    fn commit(&mut self, mut frames: Vec<Frame>, node: NodeId) -> NodeId {
        for i in 1..frames.len() {
            frames[i - 1].cursor = frames[i].root;
        }
        if let Some(top) = frames.last_mut() {
            top.cursor = node;
        }
        self.frames = frames;
        node
    }

    fn accept(&mut self, node: NodeId) -> FilterResult {
        let Some(n) = self.tree.get(node) else {
            return FilterResult::Reject;
        };
        if !self.what_to_show.includes(n.node_type()) {
            return FilterResult::Skip;
        }
        self.filter.accept_node(node)
    }

    fn should_return(&self, node: NodeId, result: FilterResult) -> bool {
        result == FilterResult::Accept && !is_pass_through(self.tree, node)
    }

    /// Pop frames entered through `node`, so it is seen from its outer frame
    fn settle(frames: &mut Vec<Frame>, node: NodeId) {
        while frames.len() > 1 && frames.last().is_some_and(|f| f.root == node) {
            if let Some(frame) = frames.pop() {
                tracing::trace!("walker: leave {:?} frame at {}", frame.kind, frame.root);
            }
        }
    }

    fn child_in(&self, frames: &mut Vec<Frame>, node: NodeId, last: bool) -> Option<NodeId> {
        let top = *frames.last()?;
        if node != top.root {
            if let Some(kind) = boundary_kind(self.tree, node) {
                let frame = Frame::new(kind, node);
                let child = if last {
                    frame.last_top(self.tree)
                } else {
                    frame.first_top(self.tree)
                }?;
                tracing::trace!("walker: enter {:?} frame at {}", kind, node);
                frames.push(frame);
                return Some(child);
            }
        }
        if last {
            top.last_child_of(self.tree, node)
        } else {
            top.first_child_of(self.tree, node)
        }
    }

    /// Next node in composed document order
    pub fn next_node(&mut self) -> Option<NodeId> {
        let mut frames = self.frames.clone();
        let mut node = frames.last()?.cursor;
        let mut result = FilterResult::Accept;

        loop {
            while result != FilterResult::Reject {
                let Some(child) = self.child_in(&mut frames, node, false) else {
                    break;
                };
                node = child;
                result = self.accept(node);
                if self.should_return(node, result) {
                    return Some(self.commit(frames, node));
                }
            }

            // Following node that is not a descendant
            let mut temp = node;
            let sibling = loop {
                let top = *frames.last()?;
                if temp == top.root {
                    if frames.len() == 1 {
                        return None;
                    }
                    frames.pop();
                    tracing::trace!("walker: leave {:?} frame at {}", top.kind, top.root);
                    continue;
                }
                if let Some(sibling) = top.next_sibling_of(self.tree, temp) {
                    break sibling;
                }
                temp = top.parent_of(self.tree, temp)?;
            };

            node = sibling;
            result = self.accept(node);
            if self.should_return(node, result) {
                return Some(self.commit(frames, node));
            }
        }
    }

    /// Previous node in composed document order
    pub fn previous_node(&mut self) -> Option<NodeId> {
        let mut frames = self.frames.clone();
        let mut node = frames.last()?.cursor;

        while node != self.root {
            let mut sibling = frames.last()?.previous_sibling_of(self.tree, node);
            while let Some(s) = sibling {
                node = s;
                let mut result = self.accept(node);
                while result != FilterResult::Reject {
                    let Some(child) = self.child_in(&mut frames, node, true) else {
                        break;
                    };
                    node = child;
                    result = self.accept(node);
                }
                if self.should_return(node, result) {
                    return Some(self.commit(frames, node));
                }
                sibling = frames.last()?.previous_sibling_of(self.tree, node);
            }

            node = frames.last()?.parent_of(self.tree, node)?;
            Self::settle(&mut frames, node);
            let result = self.accept(node);
            if self.should_return(node, result) {
                return Some(self.commit(frames, node));
            }
        }
        None
    }

    /// First accepted child of the current node
    pub fn first_child(&mut self) -> Option<NodeId> {
        self.traverse_children(false)
    }

    /// Last accepted child of the current node
    pub fn last_child(&mut self) -> Option<NodeId> {
        self.traverse_children(true)
    }

    fn traverse_children(&mut self, last: bool) -> Option<NodeId> {
        let mut frames = self.frames.clone();
        let current = frames.last()?.cursor;
        let mut node = self.child_in(&mut frames, current, last)?;

        loop {
            let result = self.accept(node);
            if result == FilterResult::Accept {
                return Some(self.commit(frames, node));
            }
            if result == FilterResult::Skip {
                if let Some(child) = self.child_in(&mut frames, node, last) {
                    node = child;
                    continue;
                }
            }
            loop {
                let top = *frames.last()?;
                let sibling = if last {
                    top.previous_sibling_of(self.tree, node)
                } else {
                    top.next_sibling_of(self.tree, node)
                };
                if let Some(sibling) = sibling {
                    node = sibling;
                    break;
                }
                let parent = top.parent_of(self.tree, node)?;
                if parent == self.root || parent == current {
                    return None;
                }
                node = parent;
                Self::settle(&mut frames, node);
            }
        }
    }

    /// Closest accepted ancestor of the current node
    pub fn parent_node(&mut self) -> Option<NodeId> {
        let mut frames = self.frames.clone();
        let mut node = frames.last()?.cursor;

        while node != self.root {
            node = frames.last()?.parent_of(self.tree, node)?;
            Self::settle(&mut frames, node);
            if self.accept(node) == FilterResult::Accept {
                return Some(self.commit(frames, node));
            }
        }
        None
    }

    /// Next accepted sibling of the current node
    pub fn next_sibling(&mut self) -> Option<NodeId> {
        self.traverse_siblings(true)
    }

    /// Previous accepted sibling of the current node
    pub fn previous_sibling(&mut self) -> Option<NodeId> {
        self.traverse_siblings(false)
    }

    fn traverse_siblings(&mut self, next: bool) -> Option<NodeId> {
        let mut frames = self.frames.clone();
        let mut node = frames.last()?.cursor;
        if node == self.root {
            return None;
        }

        let sibling_of = |frame: &Frame, tree: &DomTree, n: NodeId| {
            if next {
                frame.next_sibling_of(tree, n)
            } else {
                frame.previous_sibling_of(tree, n)
            }
        };

        loop {
            let mut sibling = sibling_of(frames.last()?, self.tree, node);
            while let Some(s) = sibling {
                node = s;
                let result = self.accept(node);
                if result == FilterResult::Accept {
                    return Some(self.commit(frames, node));
                }
                sibling = if result == FilterResult::Reject {
                    None
                } else {
                    self.child_in(&mut frames, node, !next)
                };
                if sibling.is_none() {
                    sibling = sibling_of(frames.last()?, self.tree, node);
                }
            }

            node = frames.last()?.parent_of(self.tree, node)?;
            Self::settle(&mut frames, node);
            if node == self.root || self.accept(node) == FilterResult::Accept {
                return None;
            }
        }
    }
}
