//! Document - High-level document API

use crate::{DOMRect, DomTree, NodeId};

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    /// Bounding box of <body>
    body_rect: DOMRect,
}

impl Document {
    /// Create a document with html/head/body
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
            body_rect: Self::default_body_rect(),
        }
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            body_rect: Self::default_body_rect(),
        }
    }

    fn default_body_rect() -> DOMRect {
        DOMRect::from_xywh(0.0, 0.0, 1024.0, 768.0)
    }

    /// Locate html/head/body after the tree was built externally
    pub fn finalize(&mut self) {
        let root = self.tree.root();
        self.html_element = self
            .tree
            .element_children(root)
            .find(|&c| self.tree.is_tag(c, "html"))
            .unwrap_or(NodeId::NONE);
        if !self.html_element.is_valid() {
            return;
        }
        for child in self.tree.element_children(self.html_element) {
            match self.tree.tag(child) {
                Some("head") => self.head_element = child,
                Some("body") => self.body_element = child,
                _ => {}
            }
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get <html> element
    pub fn document_element(&self) -> Option<NodeId> {
        self.html_element.to_option()
    }

    /// Get <head> element
    pub fn head(&self) -> Option<NodeId> {
        self.head_element.to_option()
    }

    /// Get <body> element
    pub fn body(&self) -> Option<NodeId> {
        self.body_element.to_option()
    }

    /// Bounding box of <body>
    pub fn body_rect(&self) -> DOMRect {
        self.body_rect
    }

    /// Override the body box (zero-sized for a hidden iframe)
    pub fn set_body_rect(&mut self, rect: DOMRect) {
        self.body_rect = rect;
    }

    /// Get element by ID, looking into shadow trees as well
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_element_with_id(self.tree.root(), id)
    }

    fn find_element_with_id(&self, start: NodeId, target: &str) -> Option<NodeId> {
        if let Some(shadow) = self.tree.shadow_root(start) {
            if let Some(found) = self.find_element_with_id(shadow, target) {
                return Some(found);
            }
        }
        for node_id in self.tree.children(start) {
            if self.tree.element(node_id).and_then(|e| e.id()) == Some(target) {
                return Some(node_id);
            }
            if let Some(found) = self.find_element_with_id(node_id, target) {
                return Some(found);
            }
        }
        None
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
