//! Working memory of one find operation

use std::collections::HashMap;
use std::fmt;

use tabnav_dom::NodeId;

use crate::context::FocusContext;

/// Test a candidate must pass to be returned
pub enum Acceptance<'a> {
    /// `is_focusable` with the operation's flags
    Focusable,
    /// Focusable and marked `isDefault`
    DefaultTarget,
    /// Caller-supplied predicate
    Custom(Box<dyn Fn(NodeId) -> bool + 'a>),
}

impl fmt::Debug for Acceptance<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Focusable => write!(f, "Focusable"),
            Self::DefaultTarget => write!(f, "DefaultTarget"),
            Self::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// Per-operation groupper facts
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupperCache {
    pub is_active: Option<bool>,
    /// First focusable descendant, resolved on demand
    pub first: Option<Option<NodeId>>,
}

/// State threaded through the policy chain for a single find call
#[derive(Debug)]
pub struct TraversalState<'a> {
    pub container: NodeId,
    /// Reference element, the container when none was given
    pub from: NodeId,
    pub is_backward: bool,
    /// Modal the search is restricted to
    pub modalizer_id: Option<String>,
    pub acceptance: Acceptance<'a>,
    pub include_programmatically_focusable: bool,
    pub ignore_uncontrolled: bool,
    pub ignore_accessibility: bool,

    pub found: bool,
    pub found_element: Option<NodeId>,
    /// A focusable node was passed over by policy
    pub skipped_focusable: bool,
    /// First uncontrolled region met on the way
    pub next_uncontrolled: Option<NodeId>,
    /// Subtree rejected until the walker leaves it
    pub last_to_ignore: Option<NodeId>,

    pub current_ctx: Option<FocusContext<'a>>,
    /// Context of `from`, `Some(None)` once resolved to nothing
    pub from_ctx: Option<Option<FocusContext<'a>>>,
    pub cached_grouppers: HashMap<NodeId, GroupperCache>,
}

impl<'a> TraversalState<'a> {
    pub fn new(container: NodeId, from: NodeId, acceptance: Acceptance<'a>) -> Self {
        Self {
            container,
            from,
            is_backward: false,
            modalizer_id: None,
            acceptance,
            include_programmatically_focusable: false,
            ignore_uncontrolled: false,
            ignore_accessibility: false,
            found: false,
            found_element: None,
            skipped_focusable: false,
            next_uncontrolled: None,
            last_to_ignore: None,
            current_ctx: None,
            from_ctx: None,
            cached_grouppers: HashMap::new(),
        }
    }

    pub fn groupper_cache(&mut self, groupper: NodeId) -> &mut GroupperCache {
        self.cached_grouppers.entry(groupper).or_default()
    }

    /// Continue a find-all pass from the element just found
    pub fn resume_from(&mut self, element: NodeId) {
        self.found = false;
        self.found_element = None;
        self.from_ctx = None;
        self.from = element;
    }
}
