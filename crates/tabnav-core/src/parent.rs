//! Parent resolution over the composed tree
//!
//! Containment checks in the engine never use the raw light-DOM parent: a
//! slotted node belongs to its slot and a shadow tree belongs to its host.

use tabnav_dom::{DomTree, NodeId};

use crate::config::ParentMode;

/// Logical parent of `node`
///
/// Composed mode, in priority order: the assigned slot of a slotted
/// non-slot node, the host when the structural parent is a shadow root,
/// otherwise the structural parent element. Light mode is `parentElement`.
pub fn resolve_parent(tree: &DomTree, node: NodeId, mode: ParentMode) -> Option<NodeId> {
    if mode == ParentMode::Composed {
        if !tree.is_slot(node) {
            if let Some(slot) = tree.assigned_slot(node) {
                return Some(slot);
            }
        }
        let parent = tree.parent(node)?;
        if let Some(host) = tree.shadow_host(parent) {
            return Some(host);
        }
        return tree.element(parent).map(|_| parent);
    }

    let parent = tree.parent(node)?;
    tree.element(parent).map(|_| parent)
}

/// Inclusive containment: `container` is `node` or one of its logical ancestors
pub fn element_contains(
    tree: &DomTree,
    container: NodeId,
    node: NodeId,
    mode: ParentMode,
) -> bool {
    let mut cursor = Some(node);
    while let Some(current) = cursor {
        if current == container {
            return true;
        }
        cursor = resolve_parent(tree, current, mode);
    }
    false
}

/// Iterate `node` and its logical ancestors
pub fn ancestors(tree: &DomTree, node: NodeId, mode: ParentMode) -> Ancestors<'_> {
    Ancestors {
        tree,
        mode,
        next: Some(node),
    }
}

/// Inclusive ancestor iterator
pub struct Ancestors<'t> {
    tree: &'t DomTree,
    mode: ParentMode,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = resolve_parent(self.tree, current, self.mode);
        Some(current)
    }
}

/// Children of `node` in the composed tree
///
/// A shadow host yields its shadow tree, a slot with assigned nodes yields
/// those nodes, anything else its structural children.
pub fn composed_children(tree: &DomTree, node: NodeId) -> Vec<NodeId> {
    if let Some(shadow) = tree.shadow_root(node) {
        return tree.children(shadow).collect();
    }
    if tree.is_slot(node) {
        let assigned = tree.assigned_nodes(node);
        if !assigned.is_empty() {
            return assigned;
        }
    }
    tree.children(node).collect()
}

/// Deepest last element descendant of `container` in the composed tree
pub fn last_composed_descendant(tree: &DomTree, container: NodeId) -> Option<NodeId> {
    let mut last = None;
    let mut cursor = container;
    while let Some(child) = composed_children(tree, cursor)
        .into_iter()
        .rev()
        .find(|&c| tree.element(c).is_some())
    {
        last = Some(child);
        cursor = child;
    }
    last
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabnav_dom::ShadowRootInit;

    /// div > host(light: b[slot]) -> shadow(span > slot)
    fn fixture() -> (DomTree, NodeId, NodeId, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.append_child(tree.root(), div).unwrap();
        let host = tree.create_element("x-host");
        tree.append_child(div, host).unwrap();
        let b = tree.create_element("button");
        tree.append_child(host, b).unwrap();
        let shadow = tree.attach_shadow(host, ShadowRootInit::open()).unwrap();
        let span = tree.create_element("span");
        tree.append_child(shadow, span).unwrap();
        let slot = tree.create_element("slot");
        tree.append_child(span, slot).unwrap();
        (tree, div, host, b, span, slot)
    }

    #[test]
    fn test_composed_parent_chain() {
        let (tree, div, host, b, span, slot) = fixture();
        let mode = ParentMode::Composed;

        assert_eq!(resolve_parent(&tree, b, mode), Some(slot));
        assert_eq!(resolve_parent(&tree, slot, mode), Some(span));
        // The shadow root itself is never exposed
        assert_eq!(resolve_parent(&tree, span, mode), Some(host));
        assert_eq!(resolve_parent(&tree, host, mode), Some(div));
        assert_eq!(resolve_parent(&tree, div, mode), None);

        let chain: Vec<_> = ancestors(&tree, b, mode).collect();
        assert_eq!(chain, vec![b, slot, span, host, div]);
    }

    #[test]
    fn test_light_parent_chain() {
        let (tree, _, host, b, span, _) = fixture();
        let mode = ParentMode::Light;

        assert_eq!(resolve_parent(&tree, b, mode), Some(host));
        assert_eq!(resolve_parent(&tree, span, mode), None);
        assert!(!element_contains(&tree, host, span, mode));
        assert!(element_contains(&tree, host, span, ParentMode::Composed));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let (tree, div, _, b, _, slot) = fixture();
        assert!(element_contains(&tree, div, div, ParentMode::Composed));
        assert!(element_contains(&tree, slot, b, ParentMode::Composed));
        assert!(!element_contains(&tree, b, div, ParentMode::Composed));
    }

    #[test]
    fn test_last_composed_descendant() {
        let (tree, div, host, b, _, _) = fixture();
        assert_eq!(last_composed_descendant(&tree, div), Some(b));
        assert_eq!(composed_children(&tree, host).len(), 1);
        assert_eq!(last_composed_descendant(&tree, b), None);
    }
}
