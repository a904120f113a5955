use std::collections::HashSet;
use std::fmt;

use tabnav_dom::NodeId;

use crate::context::FocusContext;
use crate::find::Navigator;
use crate::state::TraversalState;
use crate::walker::FilterResult;

/// Modal scoping
pub trait ModalizerPolicy: fmt::Debug {
    /// Id of the modal currently holding focus
    fn active_id(&self) -> Option<&str>;

    /// `aria-hidden` was set on `node` by the modalizer, not by the page
    fn is_augmented(&self, node: NodeId) -> bool;

    /// Veto for `node`, `None` when the modal scope has no objection
    fn accept_element(
        &self,
        nav: &Navigator<'_>,
        node: NodeId,
        ctx: &FocusContext<'_>,
        state: &mut TraversalState<'_>,
    ) -> Option<FilterResult>;
}

/// Default modal state: one active modal id and the nodes it hid
#[derive(Debug, Default, Clone)]
pub struct Modalizers {
    active_id: Option<String>,
    augmented: HashSet<NodeId>,
}

impl Modalizers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activate(&mut self, id: impl Into<String>) {
        let id = id.into();
        tracing::debug!("Modalizer activated: {}", id);
        self.active_id = Some(id);
    }

    pub fn deactivate(&mut self) {
        self.active_id = None;
    }

    /// Record that `node` was hidden by the modalizer
    pub fn augment(&mut self, node: NodeId) {
        self.augmented.insert(node);
    }

    pub fn restore(&mut self, node: NodeId) -> bool {
        self.augmented.remove(&node)
    }
}

impl ModalizerPolicy for Modalizers {
    fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    fn is_augmented(&self, node: NodeId) -> bool {
        self.augmented.contains(&node)
    }

    fn accept_element(
        &self,
        nav: &Navigator<'_>,
        node: NodeId,
        ctx: &FocusContext<'_>,
        state: &mut TraversalState<'_>,
    ) -> Option<FilterResult> {
        let requested = state.modalizer_id.as_deref();
        let current = ctx.modalizer;

        // Descend into wrappers of other parts of the same modal
        if requested.is_some() {
            if let Some(info) = current {
                let wraps_part = nav
                    .resolver()
                    .modalizer_elements(info.id())
                    .into_iter()
                    .any(|e| e != node && nav.contains(node, e));
                if wraps_part {
                    return Some(FilterResult::Skip);
                }
            }
        }

        let always_accessible = current.is_some_and(|m| m.props.is_always_accessible);
        if requested == ctx.modalizer_id() || (requested.is_none() && always_accessible) {
            None
        } else {
            Some(FilterResult::Skip)
        }
    }
}
