//! Scoping strategies consulted by the policy chain
//!
//! Grouppers and movers decide how Tab enters and leaves a region. A
//! modalizer restricts traversal to the requested modal.

mod groupper;
mod modalizer;
mod mover;

pub use groupper::Groupper;
pub use modalizer::{ModalizerPolicy, Modalizers};
pub use mover::Mover;

use std::fmt;

use tabnav_dom::NodeId;

use crate::find::Navigator;
use crate::state::TraversalState;
use crate::walker::FilterResult;

/// A region with its own Tab rules
pub trait ScopeBehavior: fmt::Debug {
    /// Element the scope is attached to
    fn element(&self) -> NodeId;

    /// Verdict for `node`, `None` to let the chain continue
    fn accept_element(
        &self,
        nav: &Navigator<'_>,
        node: NodeId,
        state: &mut TraversalState<'_>,
    ) -> Option<FilterResult>;
}
