//! Find-element orchestrator
//!
//! Sets up a [`TraversalState`], drives a composed walker from the
//! reference element and collects what the policy chain accepts.

use tabnav_dom::{Document, DomTree, NodeId};

use crate::config::NavigatorConfig;
use crate::context::{ContextResolver, FocusContext};
use crate::parent::{element_contains, last_composed_descendant, resolve_parent};
use crate::scope::ModalizerPolicy;
use crate::state::{Acceptance, TraversalState};
use crate::walker::{ComposedWalker, FilterResult, NodeFilter, WhatToShow};

/// Outcome of a single-element search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Found {
    Element(NodeId),
    /// Nothing to move to; the caller picks an explicit fallback
    NotFound,
    /// An uncontrolled region lies ahead and a controlled element after it;
    /// let the native Tab action happen
    DefaultAction,
}

impl Found {
    pub fn element(self) -> Option<NodeId> {
        match self {
            Self::Element(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_default_action(self) -> bool {
        self == Self::DefaultAction
    }
}

/// Extra facts reported by a search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindOutput {
    /// The result is not plain document order (no anchor, or policy skipped
    /// a focusable node)
    pub out_of_dom_order: bool,
}

/// Search parameters
#[derive(Default)]
pub struct FindOptions<'o> {
    container: Option<NodeId>,
    current_element: Option<NodeId>,
    is_backward: bool,
    acceptance: Option<Acceptance<'o>>,
    include_programmatically_focusable: bool,
    use_active_modalizer: bool,
    modalizer_id: Option<String>,
    ignore_uncontrolled: bool,
    ignore_accessibility: bool,
    on_uncontrolled: Option<Box<dyn FnMut(NodeId) + 'o>>,
    on_element: Option<Box<dyn FnMut(NodeId) -> bool + 'o>>,
}

impl<'o> FindOptions<'o> {
    /// Search inside `container`
    pub fn new(container: NodeId) -> Self {
        Self {
            container: Some(container),
            ..Default::default()
        }
    }

    pub fn container(&self) -> Option<NodeId> {
        self.container
    }

    /// Start from `element` instead of the container edge
    pub fn current(mut self, element: NodeId) -> Self {
        self.current_element = Some(element);
        self
    }

    pub fn backward(mut self, is_backward: bool) -> Self {
        self.is_backward = is_backward;
        self
    }

    /// Replace the focusability test
    pub fn accept(mut self, condition: impl Fn(NodeId) -> bool + 'o) -> Self {
        self.acceptance = Some(Acceptance::Custom(Box::new(condition)));
        self
    }

    /// Accept `tabindex="-1"` elements
    pub fn programmatic(mut self, include: bool) -> Self {
        self.include_programmatically_focusable = include;
        self
    }

    pub fn use_active_modalizer(mut self, enabled: bool) -> Self {
        self.use_active_modalizer = enabled;
        self
    }

    pub fn modalizer(mut self, id: impl Into<String>) -> Self {
        self.modalizer_id = Some(id.into());
        self
    }

    pub fn ignore_uncontrolled(mut self, ignore: bool) -> Self {
        self.ignore_uncontrolled = ignore;
        self
    }

    pub fn ignore_accessibility(mut self, ignore: bool) -> Self {
        self.ignore_accessibility = ignore;
        self
    }

    /// Called with the uncontrolled region met by a single-element search
    pub fn on_uncontrolled(mut self, f: impl FnMut(NodeId) + 'o) -> Self {
        self.on_uncontrolled = Some(Box::new(f));
        self
    }

    /// Called for every element of `find_all`; returning false stops the pass
    pub fn on_element(mut self, f: impl FnMut(NodeId) -> bool + 'o) -> Self {
        self.on_element = Some(Box::new(f));
        self
    }
}

enum Search {
    Found(Vec<NodeId>),
    NotFound,
    DefaultAction,
}

/// Wraps a filter so internal focus sentinels are never visited
pub struct ElementFilter<'r, F> {
    resolver: &'r dyn ContextResolver,
    inner: F,
}

impl<F> ElementFilter<'_, F> {
    pub fn inner(&self) -> &F {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut F {
        &mut self.inner
    }
}

impl<F: NodeFilter> NodeFilter for ElementFilter<'_, F> {
    fn accept_node(&mut self, node: NodeId) -> FilterResult {
        if self.resolver.config(node).is_some_and(|c| c.dummy) {
            return FilterResult::Reject;
        }
        self.inner.accept_node(node)
    }
}

struct PolicyFilter<'n, 'a, 's> {
    nav: &'n Navigator<'a>,
    state: TraversalState<'s>,
}

impl<'a: 's, 's> NodeFilter for PolicyFilter<'_, 'a, 's> {
    fn accept_node(&mut self, node: NodeId) -> FilterResult {
        self.nav.accept_element(node, &mut self.state)
    }
}

/// Focus navigation over one document
pub struct Navigator<'a> {
    document: &'a Document,
    resolver: &'a dyn ContextResolver,
    modalizer: Option<&'a dyn ModalizerPolicy>,
    config: NavigatorConfig,
}

impl<'a> Navigator<'a> {
    pub fn new(document: &'a Document, resolver: &'a dyn ContextResolver) -> Self {
        Self {
            document,
            resolver,
            modalizer: None,
            config: NavigatorConfig::default(),
        }
    }

    pub fn with_modalizer(mut self, modalizer: &'a dyn ModalizerPolicy) -> Self {
        self.modalizer = Some(modalizer);
        self
    }

    pub fn with_config(mut self, config: NavigatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn document(&self) -> &'a Document {
        self.document
    }

    pub fn tree(&self) -> &'a DomTree {
        self.document.tree()
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    pub fn resolver(&self) -> &'a dyn ContextResolver {
        self.resolver
    }

    pub fn modalizer(&self) -> Option<&'a dyn ModalizerPolicy> {
        self.modalizer
    }

    /// Logical parent under the configured parent mode
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        resolve_parent(self.tree(), node, self.config.parent_mode)
    }

    /// Inclusive containment under the configured parent mode
    pub fn contains(&self, container: NodeId, node: NodeId) -> bool {
        element_contains(self.tree(), container, node, self.config.parent_mode)
    }

    pub fn context(&self, node: NodeId) -> Option<FocusContext<'a>> {
        self.resolver
            .context(self.document, node, self.config.parent_mode)
    }

    pub fn is_dummy(&self, node: NodeId) -> bool {
        self.resolver.config(node).is_some_and(|c| c.dummy)
    }

    /// Element walker over `container` that never visits focus sentinels
    pub fn create_element_walker<F: NodeFilter>(
        &self,
        container: NodeId,
        filter: F,
    ) -> ComposedWalker<'a, ElementFilter<'a, F>> {
        ComposedWalker::new(
            self.tree(),
            container,
            WhatToShow::ELEMENT,
            ElementFilter {
                resolver: self.resolver,
                inner: filter,
            },
        )
    }

    /// Run the operation's acceptance test on `node`
    pub fn accepts(&self, state: &TraversalState<'_>, node: NodeId) -> bool {
        match &state.acceptance {
            Acceptance::Focusable => self.is_focusable(
                node,
                state.include_programmatically_focusable,
                false,
                state.ignore_accessibility,
            ),
            Acceptance::DefaultTarget => {
                self.is_focusable(node, state.include_programmatically_focusable, false, false)
                    && self.props(node).is_default
            }
            Acceptance::Custom(condition) => condition(node),
        }
    }

    pub fn find_first(&self, options: FindOptions<'_>) -> Found {
        self.find_element(options, &mut FindOutput::default())
    }

    pub fn find_last(&self, options: FindOptions<'_>) -> Found {
        self.find_element(options.backward(true), &mut FindOutput::default())
    }

    pub fn find_next(&self, options: FindOptions<'_>, out: &mut FindOutput) -> Found {
        self.find_element(options, out)
    }

    pub fn find_prev(&self, options: FindOptions<'_>, out: &mut FindOutput) -> Found {
        self.find_element(options.backward(true), out)
    }

    /// First focusable element marked as the default target
    pub fn find_default(&self, mut options: FindOptions<'_>) -> Option<NodeId> {
        options.acceptance = Some(Acceptance::DefaultTarget);
        self.find_element(options, &mut FindOutput::default())
            .element()
    }

    /// Every accepted element in traversal order
    pub fn find_all(&self, options: FindOptions<'_>) -> Vec<NodeId> {
        match self.find_elements(true, options, &mut FindOutput::default()) {
            Search::Found(elements) => elements,
            Search::NotFound | Search::DefaultAction => Vec::new(),
        }
    }

    pub fn find_element(&self, options: FindOptions<'_>, out: &mut FindOutput) -> Found {
        match self.find_elements(false, options, out) {
            Search::Found(elements) => elements
                .first()
                .map_or(Found::NotFound, |&e| Found::Element(e)),
            Search::NotFound => Found::NotFound,
            Search::DefaultAction => Found::DefaultAction,
        }
    }

    fn find_elements(
        &self,
        find_all: bool,
        options: FindOptions<'_>,
        out: &mut FindOutput,
    ) -> Search {
        let FindOptions {
            container,
            current_element,
            is_backward,
            acceptance,
            include_programmatically_focusable,
            use_active_modalizer,
            modalizer_id,
            ignore_uncontrolled,
            ignore_accessibility,
            mut on_uncontrolled,
            mut on_element,
        } = options;

        let Some(container) = container.filter(|&c| self.tree().element(c).is_some()) else {
            tracing::debug!("find: no container");
            return Search::NotFound;
        };

        let modalizer_id = match modalizer_id {
            None if use_active_modalizer => {
                self.modalizer.and_then(|m| m.active_id()).map(String::from)
            }
            Some(id) => Some(id),
            None => self
                .context(container)
                .and_then(|ctx| ctx.modalizer_id())
                .map(String::from),
        };

        let mut state = TraversalState::new(
            container,
            current_element.unwrap_or(container),
            acceptance.unwrap_or(Acceptance::Focusable),
        );
        state.is_backward = is_backward;
        state.modalizer_id = modalizer_id;
        state.include_programmatically_focusable = include_programmatically_focusable;
        state.ignore_uncontrolled = ignore_uncontrolled;
        state.ignore_accessibility = ignore_accessibility;

        tracing::debug!(
            "find: container={} from={} backward={} all={}",
            container,
            state.from,
            is_backward,
            find_all
        );

        let mut walker =
            self.create_element_walker(container, PolicyFilter { nav: self, state });
        let mut elements = Vec::new();

        if current_element.is_none() {
            out.out_of_dom_order = true;
        }

        if let Some(current) = current_element {
            walker.set_current_node(current);
        } else if is_backward {
            let Some(last) = last_composed_descendant(self.tree(), container) else {
                return Search::NotFound;
            };

            let state = &mut walker.filter_mut().inner_mut().state;
            if self.accept_element(last, state) == FilterResult::Accept
                && !prepare_for_next(state, &mut elements, find_all, &mut on_element, true)
            {
                if state.skipped_focusable {
                    out.out_of_dom_order = true;
                }
                return Search::Found(elements);
            }

            walker.set_current_node(last);
        }

        let mut step;
        loop {
            step = if is_backward {
                walker.previous_node()
            } else {
                walker.next_node()
            };
            let state = &mut walker.filter_mut().inner_mut().state;
            if !prepare_for_next(state, &mut elements, find_all, &mut on_element, false) {
                break;
            }
        }

        let state = &walker.filter().inner().state;

        if !find_all {
            if let Some(region) = state.next_uncontrolled {
                tracing::debug!(
                    "find: uncontrolled region {} ahead, controlled after it: {}",
                    region,
                    step.is_some()
                );
                if let Some(callback) = on_uncontrolled.as_mut() {
                    callback(region);
                }
                return if step.is_some() {
                    Search::DefaultAction
                } else {
                    Search::NotFound
                };
            }
        }

        if state.skipped_focusable {
            out.out_of_dom_order = true;
        }

        tracing::debug!(
            "find: {} element(s), out of DOM order: {}",
            elements.len(),
            out.out_of_dom_order
        );

        if elements.is_empty() {
            Search::NotFound
        } else {
            Search::Found(elements)
        }
    }
}

/// Collect the element found by the last step and decide whether to go on
fn prepare_for_next(
    state: &mut TraversalState<'_>,
    elements: &mut Vec<NodeId>,
    find_all: bool,
    on_element: &mut Option<Box<dyn FnMut(NodeId) -> bool + '_>>,
    continue_if_not_found: bool,
) -> bool {
    let found = state.found_element;

    if let Some(element) = found {
        elements.push(element);
    }

    if !find_all {
        return continue_if_not_found && found.is_none();
    }

    if let Some(element) = found {
        state.resume_from(element);
        if let Some(callback) = on_element.as_mut() {
            if !callback(element) {
                return false;
            }
        }
    }

    found.is_some() || continue_if_not_found
}
