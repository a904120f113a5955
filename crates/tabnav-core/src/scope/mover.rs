use tabnav_dom::NodeId;

use super::ScopeBehavior;
use crate::context::MoverProps;
use crate::find::{FindOptions, Navigator};
use crate::state::TraversalState;
use crate::walker::FilterResult;

/// A region navigated with arrow keys, entered through a single item
#[derive(Debug, Clone)]
pub struct Mover {
    element: NodeId,
    props: MoverProps,
    current: Option<NodeId>,
}

impl Mover {
    pub fn new(element: NodeId, props: MoverProps) -> Self {
        Self {
            element,
            props,
            current: None,
        }
    }

    pub fn props(&self) -> MoverProps {
        self.props
    }

    pub(crate) fn set_props(&mut self, props: MoverProps) {
        self.props = props;
    }

    /// Last focused item
    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    pub(crate) fn memorize(&mut self, node: NodeId) {
        self.current = Some(node);
    }

    /// Item Tab lands on when entering from outside
    fn entry_target(&self, nav: &Navigator<'_>, state: &TraversalState<'_>) -> Option<NodeId> {
        if self.props.memorize_current {
            if let Some(current) = self.current.filter(|&c| nav.accepts(state, c)) {
                return Some(current);
            }
        }
        if self.props.has_default {
            return nav.find_default(FindOptions::new(self.element).use_active_modalizer(true));
        }
        None
    }
}

impl ScopeBehavior for Mover {
    fn element(&self) -> NodeId {
        self.element
    }

    fn accept_element(
        &self,
        nav: &Navigator<'_>,
        node: NodeId,
        state: &mut TraversalState<'_>,
    ) -> Option<FilterResult> {
        let element = self.element;
        let from = state.from;

        if !nav.contains(element, from) || nav.is_dummy(from) {
            let target = self.entry_target(nav, state)?;
            state.found = true;
            state.found_element = Some(target);
            state.last_to_ignore = Some(element);
            state.skipped_focusable = true;
            return Some(FilterResult::Accept);
        }

        // Leaving a non-tabbable mover skips its remaining items
        if !self.props.tabbable
            && from != element
            && state.container != element
            && node != element
            && nav.contains(element, node)
        {
            state.skipped_focusable = true;
            return Some(FilterResult::Reject);
        }

        None
    }
}
