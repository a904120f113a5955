//! Focusability predicate
//!
//! Candidate: an element matching the focusable selector
//! (`a[href]`, enabled `button`/`input`/`select`/`textarea`, `[tabindex]`,
//! `[contenteditable]`) whose tab index is not -1 unless programmatic focus
//! is allowed. Candidates must then be visible and accessible.

use tabnav_dom::{Display, DomTree, NodeId, Visibility};

use crate::config::ParentMode;
use crate::context::FocusableProps;
use crate::find::Navigator;
use crate::parent::ancestors;

/// Parsed tab index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabIndex {
    /// Focusable by script only (negative value)
    Programmatic,
    /// In sequential navigation order
    Sequential(i32),
}

impl TabIndex {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().parse::<i32>() {
            Ok(n) if n < 0 => Some(Self::Programmatic),
            Ok(n) => Some(Self::Sequential(n)),
            Err(_) => None,
        }
    }

    /// Effective tab index of `node`; invalid or missing values fall back to
    /// 0 for natively focusable elements and -1 otherwise
    pub fn of(tree: &DomTree, node: NodeId) -> Self {
        if let Some(index) = tree.attr(node, "tabindex").and_then(Self::parse) {
            return index;
        }
        if is_natively_focusable(tree, node) || tree.has_attr(node, "contenteditable") {
            Self::Sequential(0)
        } else {
            Self::Programmatic
        }
    }

    pub fn is_sequential(&self) -> bool {
        matches!(self, Self::Sequential(_))
    }
}

fn is_natively_focusable(tree: &DomTree, node: NodeId) -> bool {
    let Some(elem) = tree.element(node) else {
        return false;
    };
    match elem.tag.as_str() {
        "a" => elem.has_attr("href"),
        "button" | "input" | "select" | "textarea" => !elem.has_attr("disabled"),
        _ => false,
    }
}

/// Matches the focusable selector
pub fn matches_focusable_selector(tree: &DomTree, node: NodeId) -> bool {
    is_natively_focusable(tree, node)
        || tree.has_attr(node, "tabindex")
        || tree.has_attr(node, "contenteditable")
}

/// Elements the user agent never renders
fn is_unrendered_tag(tree: &DomTree, node: NodeId) -> bool {
    let Some(elem) = tree.element(node) else {
        return false;
    };
    match elem.tag.as_str() {
        "head" | "script" | "style" | "template" | "title" | "meta" | "link" => true,
        "input" => elem
            .get_attr("type")
            .is_some_and(|t| t.eq_ignore_ascii_case("hidden")),
        _ => false,
    }
}

/// Light child of a shadow host that no slot picked up, or fallback
/// content of a slot that has assigned nodes
fn is_unprojected(tree: &DomTree, node: NodeId) -> bool {
    let Some(parent) = tree.parent(node) else {
        return false;
    };
    if tree.shadow_root(parent).is_some() {
        return tree.assigned_slot(node).is_none();
    }
    tree.is_slot(parent) && tree.has_assigned_nodes(parent)
}

fn is_aria_hidden(tree: &DomTree, node: NodeId) -> bool {
    tree.attr(node, "aria-hidden")
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

impl Navigator<'_> {
    /// Whether `node` can take focus
    pub fn is_focusable(
        &self,
        node: NodeId,
        include_programmatic: bool,
        skip_visibility: bool,
        skip_accessibility: bool,
    ) -> bool {
        let tree = self.tree();
        if !matches_focusable_selector(tree, node) {
            return false;
        }
        if !include_programmatic && !TabIndex::of(tree, node).is_sequential() {
            return false;
        }
        (skip_visibility || !self.config().check_visibility || self.is_visible(node))
            && (skip_accessibility || self.is_accessible(node))
    }

    /// Rendered with a box and not `visibility: hidden`
    pub fn is_visible(&self, node: NodeId) -> bool {
        let document = self.document();
        let tree = self.tree();
        if tree.element(node).is_none() {
            return false;
        }

        // Render box: connected, projected, no display:none on the way up
        let mut top = node;
        for current in ancestors(tree, node, ParentMode::Composed) {
            if tree.inline_style(current).display == Display::None
                || is_unrendered_tag(tree, current)
                || is_unprojected(tree, current)
            {
                return false;
            }
            top = current;
        }
        if tree.parent(top) != Some(tree.root()) {
            return false;
        }

        // Zero-sized body, e.g. inside a hidden iframe
        if document.body_rect().is_empty() {
            return false;
        }

        let visibility = ancestors(tree, node, ParentMode::Composed)
            .find_map(|current| tree.inline_style(current).visibility)
            .unwrap_or(Visibility::Visible);
        visibility != Visibility::Hidden
    }

    /// No `aria-hidden` or `disabled` on the node or its ancestors
    pub fn is_accessible(&self, node: NodeId) -> bool {
        let tree = self.tree();
        for current in ancestors(tree, node, self.config().parent_mode) {
            if is_aria_hidden(tree, current)
                && !self.modalizer().is_some_and(|m| m.is_augmented(current))
            {
                return false;
            }

            let ignore_disabled = self
                .resolver()
                .config(current)
                .is_some_and(|c| c.focusable.ignore_aria_disabled);
            if !ignore_disabled && tree.has_attr(current, "disabled") {
                return false;
            }
        }
        true
    }

    /// Focusable props from the side table
    pub fn props(&self, node: NodeId) -> FocusableProps {
        self.resolver()
            .config(node)
            .map(|c| c.focusable.clone())
            .unwrap_or_default()
    }
}
