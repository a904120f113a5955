//! Accept/reject policy chain
//!
//! Every node the find walker visits is classified here. The first rule
//! that applies decides; side effects on [`TraversalState`] tell the
//! orchestrator what was found, skipped or left to native behavior.

use tabnav_dom::NodeId;

use crate::context::FocusContext;
use crate::find::Navigator;
use crate::parent::composed_children;
use crate::state::TraversalState;
use crate::walker::{is_pass_through, FilterResult};

impl<'a> Navigator<'a> {
    /// Classify `node` for the current find operation
    pub fn accept_element<'s>(&self, node: NodeId, state: &mut TraversalState<'s>) -> FilterResult
    where
        'a: 's,
    {
        let result = self.classify(node, state);
        tracing::trace!("policy: {} -> {:?}", node, result);
        result
    }

    fn classify<'s>(&self, node: NodeId, state: &mut TraversalState<'s>) -> FilterResult
    where
        'a: 's,
    {
        if state.found {
            return FilterResult::Accept;
        }

        let container = state.container;
        if node == container {
            return FilterResult::Skip;
        }
        if !self.contains(container, node) {
            return FilterResult::Reject;
        }
        if self.is_dummy(node) {
            return FilterResult::Reject;
        }

        if let Some(ignored) = state.last_to_ignore {
            if self.contains(ignored, node) {
                return FilterResult::Reject;
            }
            state.last_to_ignore = None;
        }

        // Opt-in: nodes outside any root are invisible to the engine
        let Some(ctx) = self.context(node) else {
            return FilterResult::Skip;
        };
        state.current_ctx = Some(ctx);

        let in_active_modal = ctx.modalizer_id() == self.modalizer().and_then(|m| m.active_id());

        if state.ignore_uncontrolled {
            if self.resolver().config(node).is_some_and(|c| c.ignore_focus) {
                return FilterResult::Skip;
            }
        } else if let Some(region) = ctx.uncontrolled {
            if state.next_uncontrolled.is_none()
                && ctx.groupper.is_none()
                && ctx.mover.is_none()
                && in_active_modal
                && self.is_focusable(node, false, true, true)
            {
                if self.is_visible(region) {
                    tracing::debug!("policy: uncontrolled region {} at {}", region, node);
                    state.next_uncontrolled = Some(region);
                }
                state.skipped_focusable = true;
                return FilterResult::Reject;
            }
        }

        // Native Tab would go inside, so frames count as focusable
        let tree = self.tree();
        if tree.is_tag(node, "iframe") || tree.is_tag(node, "webview") {
            if in_active_modal {
                state.found = true;
                state.found_element = Some(node);
                state.last_to_ignore = Some(node);
                return FilterResult::Accept;
            }
            return FilterResult::Reject;
        }

        if !state.ignore_accessibility && !self.is_accessible(node) {
            if self.is_focusable(node, false, true, true) || self.hides_focusable(node) {
                state.skipped_focusable = true;
            }
            return FilterResult::Reject;
        }

        let mut result = self
            .modalizer()
            .and_then(|m| m.accept_element(self, node, &ctx, state));
        if result.is_some() {
            state.skipped_focusable = true;
        }

        if result.is_none() {
            result = self.scope_verdict(node, &ctx, state);
        }

        let result = result.unwrap_or_else(|| {
            if self.accepts(state, node) {
                FilterResult::Accept
            } else {
                if self.is_focusable(node, false, true, true) {
                    state.skipped_focusable = true;
                }
                FilterResult::Skip
            }
        });

        if result == FilterResult::Accept && !state.found {
            state.found = true;
            state.found_element = Some(node);
        }

        // Keep descending into delegating hosts and filled slots
        if result != FilterResult::Accept && is_pass_through(tree, node) {
            return FilterResult::Accept;
        }

        result
    }

    /// A composed descendant of `node` would be focusable on its own
    fn hides_focusable(&self, node: NodeId) -> bool {
        composed_children(self.tree(), node)
            .into_iter()
            .any(|child| self.is_focusable(child, false, true, true) || self.hides_focusable(child))
    }

    /// Pick the groupper or mover that governs `node` and ask it
    fn scope_verdict<'s>(
        &self,
        node: NodeId,
        ctx: &FocusContext<'a>,
        state: &mut TraversalState<'s>,
    ) -> Option<FilterResult>
    where
        'a: 's,
    {
        let from_ctx = match state.from_ctx {
            Some(cached) => cached,
            None => {
                let resolved = self.context(state.from);
                state.from_ctx = Some(resolved);
                resolved
            }
        };
        let from_mover = from_ctx.and_then(|c| c.mover);

        let mut groupper = ctx.groupper;
        let mut mover = ctx.mover;
        if groupper.is_none() && mover.is_none() && from_mover.is_none() {
            return None;
        }

        let container = state.container;
        let groupper_element = groupper.map(|g| g.element());
        let from_mover_element = from_mover.map(|m| m.element());
        let mut mover_element = mover.map(|m| m.element());

        // The reference point's mover wins when it encloses the node's own
        if let (Some(own), Some(inherited)) = (mover_element, from_mover_element) {
            if self.contains(inherited, own)
                && self.contains(container, inherited)
                && groupper_element.map_or(true, |g| self.contains(inherited, g))
            {
                mover = from_mover;
                mover_element = from_mover_element;
            }
        }

        if let Some(element) = groupper_element {
            if element == container || !self.contains(container, element) {
                groupper = None;
            }
        }
        if let Some(element) = mover_element {
            if !self.contains(container, element) {
                mover = None;
            }
        }

        // Both apply: the inner one decides
        if groupper.is_some() && mover.is_some() {
            match (groupper_element, mover_element) {
                (Some(g), Some(m)) if !self.contains(g, m) => mover = None,
                _ => groupper = None,
            }
        }

        let mut result = None;
        if let Some(groupper) = groupper {
            result = groupper.accept_element(self, node, state);
        }
        if let Some(mover) = mover {
            result = mover.accept_element(self, node, state);
        }
        result
    }
}
