use tabnav_dom::NodeId;

use super::ScopeBehavior;
use crate::context::{GroupperProps, Tabbability};
use crate::find::{FindOptions, Navigator};
use crate::state::TraversalState;
use crate::walker::FilterResult;

/// A region that can collapse into a single tab stop
#[derive(Debug, Clone)]
pub struct Groupper {
    element: NodeId,
    props: GroupperProps,
}

impl Groupper {
    pub fn new(element: NodeId, props: GroupperProps) -> Self {
        Self { element, props }
    }

    pub fn props(&self) -> GroupperProps {
        self.props
    }

    pub(crate) fn set_props(&mut self, props: GroupperProps) {
        self.props = props;
    }

    /// Focus is inside, or the content is freely tabbable
    pub fn is_active(&self, nav: &Navigator<'_>, from: NodeId) -> bool {
        self.props.tabbability == Tabbability::Unlimited
            || (from != self.element && nav.contains(self.element, from))
    }
}

impl ScopeBehavior for Groupper {
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
        let active = state
            .groupper_cache(element)
            .is_active
            .unwrap_or_else(|| self.is_active(nav, from));
        state.groupper_cache(element).is_active = Some(active);

        if active {
            return None;
        }

        if node != element {
            state.skipped_focusable = true;
            return Some(FilterResult::Reject);
        }

        let stop = if nav.accepts(state, element) {
            Some(element)
        } else {
            let include_programmatic = state.include_programmatically_focusable;
            *state.groupper_cache(element).first.get_or_insert_with(|| {
                nav.find_first(
                    FindOptions::new(element).programmatic(include_programmatic),
                )
                .element()
            })
        };

        state.last_to_ignore = Some(element);
        state.skipped_focusable = true;
        match stop {
            Some(target) if target != from => {
                state.found = true;
                state.found_element = Some(target);
                Some(FilterResult::Accept)
            }
            _ => Some(FilterResult::Reject),
        }
    }
}
