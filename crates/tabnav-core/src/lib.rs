//! tabnav core - keyboard focus navigation over composed DOM trees
//!
//! Given a container and an optional reference element, the [`Navigator`]
//! finds the element Tab or Shift+Tab should move to. Traversal follows the
//! composed tree (shadow trees and slotted content in rendered order) and
//! each visited node goes through a chain of scoping policies: modal
//! regions, grouppers, movers and uncontrolled regions.

mod config;
mod context;
mod find;
mod focusable;
mod parent;
mod policy;
mod scope;
mod state;
mod walker;

pub use config::{ConfigError, NavigatorConfig, ParentMode};
pub use context::{
    ContextResolver, FocusContext, FocusableProps, GroupperProps, ModalizerInfo, ModalizerProps,
    MoverProps, NodeConfig, ScopeRegistry, Tabbability, CONFIG_ATTRIBUTE,
};
pub use find::{ElementFilter, FindOptions, FindOutput, Found, Navigator};
pub use focusable::{matches_focusable_selector, TabIndex};
pub use parent::{
    ancestors, composed_children, element_contains, last_composed_descendant, resolve_parent,
    Ancestors,
};
pub use scope::{Groupper, ModalizerPolicy, Modalizers, Mover, ScopeBehavior};
pub use state::{Acceptance, GroupperCache, TraversalState};
pub use walker::{
    is_pass_through, AcceptAllFilter, ComposedWalker, FilterResult, Frame, FrameKind, NodeFilter,
    WhatToShow,
};
