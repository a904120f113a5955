//! Per-node scoping configuration and context resolution
//!
//! Every node the engine can manage belongs to a root. Between the node and
//! its root there may be a modalizer, a groupper, a mover and an
//! uncontrolled region; the nearest of each forms the node's context.

use std::collections::HashMap;

use serde::Deserialize;
use tabnav_dom::{Document, NodeId};

use crate::config::{ConfigError, ParentMode};
use crate::parent::ancestors;
use crate::scope::{Groupper, Mover, ScopeBehavior};

/// Attribute carrying a JSON [`NodeConfig`]
pub const CONFIG_ATTRIBUTE: &str = "data-tabnav";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FocusableProps {
    /// Default focus target of its scope
    pub is_default: bool,
    /// Keep the node accessible when it (or an ancestor) is `disabled`
    pub ignore_aria_disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalizerProps {
    pub id: String,
    /// Reachable even when no modal id is requested
    #[serde(default)]
    pub is_always_accessible: bool,
}

/// How Tab treats a groupper that focus is not inside of
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tabbability {
    /// Tab walks through the content like ordinary DOM
    #[default]
    Unlimited,
    /// The groupper is a single tab stop until focus is moved inside
    Limited,
    /// As `Limited`, and focus stays inside once entered
    LimitedTrapFocus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GroupperProps {
    pub tabbability: Tabbability,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MoverProps {
    /// Tab moves between the items instead of leaving the mover
    pub tabbable: bool,
    /// Entering lands on the last focused item
    pub memorize_current: bool,
    /// Entering lands on the item marked `isDefault`
    pub has_default: bool,
}

impl Default for MoverProps {
    fn default() -> Self {
        Self {
            tabbable: false,
            memorize_current: false,
            has_default: true,
        }
    }
}

/// Side-table record for one node
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct NodeConfig {
    pub root: bool,
    pub focusable: FocusableProps,
    pub modalizer: Option<ModalizerProps>,
    pub groupper: Option<GroupperProps>,
    pub mover: Option<MoverProps>,
    pub uncontrolled: bool,
    pub ignore_focus: bool,
    /// Internal focus sentinel, never configured from markup
    #[serde(skip)]
    pub dummy: bool,
}

impl NodeConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Nearest modalizer of a context
#[derive(Debug, Clone, Copy)]
pub struct ModalizerInfo<'a> {
    pub element: NodeId,
    pub props: &'a ModalizerProps,
}

impl<'a> ModalizerInfo<'a> {
    pub fn id(&self) -> &'a str {
        &self.props.id
    }
}

/// Scoping context of a node
#[derive(Debug, Clone, Copy)]
pub struct FocusContext<'a> {
    pub root: NodeId,
    pub modalizer: Option<ModalizerInfo<'a>>,
    pub groupper: Option<&'a dyn ScopeBehavior>,
    pub mover: Option<&'a dyn ScopeBehavior>,
    pub uncontrolled: Option<NodeId>,
}

impl<'a> FocusContext<'a> {
    pub fn modalizer_id(&self) -> Option<&'a str> {
        self.modalizer.map(|m| m.id())
    }
}

/// Source of per-node configuration and scoping contexts
pub trait ContextResolver {
    /// Side-table record of `node`
    fn config(&self, node: NodeId) -> Option<&NodeConfig>;

    /// Context of `node`, `None` when no root encloses it
    fn context(
        &self,
        document: &Document,
        node: NodeId,
        mode: ParentMode,
    ) -> Option<FocusContext<'_>>;

    /// Every element carrying the modalizer `id`
    fn modalizer_elements(&self, id: &str) -> Vec<NodeId>;
}

/// Default resolver owning the configuration side table
#[derive(Debug, Default)]
pub struct ScopeRegistry {
    configs: HashMap<NodeId, NodeConfig>,
    grouppers: HashMap<NodeId, Groupper>,
    movers: HashMap<NodeId, Mover>,
}

impl ScopeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the side table from `data-tabnav` attributes
    ///
    /// The attribute holds a JSON [`NodeConfig`]. The shorthands
    /// `data-tabnav-root`, `data-tabnav-uncontrolled` and
    /// `data-tabnav-default` set the matching flags.
    pub fn from_document(document: &Document) -> Result<Self, ConfigError> {
        let tree = document.tree();
        let mut registry = Self::new();

        for node in tree.shadow_including_descendants(tree.root()) {
            let mut config = match tree.attr(node, CONFIG_ATTRIBUTE) {
                Some(json) => NodeConfig::from_json(json)
                    .map_err(|source| ConfigError::NodeAttribute { node, source })?,
                None => NodeConfig::default(),
            };
            config.root |= tree.has_attr(node, "data-tabnav-root");
            config.uncontrolled |= tree.has_attr(node, "data-tabnav-uncontrolled");
            config.focusable.is_default |= tree.has_attr(node, "data-tabnav-default");

            if config != NodeConfig::default() {
                registry.set(node, config);
            }
        }

        tracing::debug!("Scope registry: {} configured nodes", registry.len());
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Replace the record of `node`
    pub fn set(&mut self, node: NodeId, config: NodeConfig) {
        self.configs.insert(node, config);
        self.sync(node);
    }

    /// Edit the record of `node`, creating it if needed
    pub fn update(&mut self, node: NodeId, f: impl FnOnce(&mut NodeConfig)) {
        f(self.configs.entry(node).or_default());
        self.sync(node);
    }

    /// Drop the record of `node`
    pub fn remove(&mut self, node: NodeId) -> Option<NodeConfig> {
        self.grouppers.remove(&node);
        self.movers.remove(&node);
        self.configs.remove(&node)
    }

    pub fn add_root(&mut self, node: NodeId) {
        self.update(node, |c| c.root = true);
    }

    pub fn add_uncontrolled(&mut self, node: NodeId) {
        self.update(node, |c| c.uncontrolled = true);
    }

    pub fn add_modalizer(&mut self, node: NodeId, props: ModalizerProps) {
        self.update(node, |c| c.modalizer = Some(props));
    }

    pub fn add_groupper(&mut self, node: NodeId, tabbability: Tabbability) {
        self.update(node, |c| c.groupper = Some(GroupperProps { tabbability }));
    }

    pub fn add_mover(&mut self, node: NodeId, props: MoverProps) {
        self.update(node, |c| c.mover = Some(props));
    }

    pub fn mark_default(&mut self, node: NodeId) {
        self.update(node, |c| c.focusable.is_default = true);
    }

    pub fn mark_dummy(&mut self, node: NodeId) {
        self.update(node, |c| c.dummy = true);
    }

    /// Record `node` as the current item of its nearest memorizing mover
    pub fn memorize(&mut self, document: &Document, node: NodeId, mode: ParentMode) {
        let tree = document.tree();
        let mover = ancestors(tree, node, mode)
            .skip(1)
            .find(|a| self.movers.contains_key(a));
        if let Some(mover) = mover.and_then(|m| self.movers.get_mut(&m)) {
            mover.memorize(node);
        }
    }

    fn sync(&mut self, node: NodeId) {
        let Some(config) = self.configs.get(&node) else {
            return;
        };

        match config.groupper {
            Some(props) => {
                self.grouppers
                    .entry(node)
                    .and_modify(|g| g.set_props(props))
                    .or_insert_with(|| Groupper::new(node, props));
            }
            None => {
                self.grouppers.remove(&node);
            }
        }

        match config.mover {
            Some(props) => {
                self.movers
                    .entry(node)
                    .and_modify(|m| m.set_props(props))
                    .or_insert_with(|| Mover::new(node, props));
            }
            None => {
                self.movers.remove(&node);
            }
        }
    }
}

impl ContextResolver for ScopeRegistry {
    fn config(&self, node: NodeId) -> Option<&NodeConfig> {
        self.configs.get(&node)
    }

    fn context(
        &self,
        document: &Document,
        node: NodeId,
        mode: ParentMode,
    ) -> Option<FocusContext<'_>> {
        let mut modalizer = None;
        let mut groupper: Option<&dyn ScopeBehavior> = None;
        let mut mover: Option<&dyn ScopeBehavior> = None;
        let mut uncontrolled = None;

        for current in ancestors(document.tree(), node, mode) {
            let Some(config) = self.configs.get(&current) else {
                continue;
            };

            // Only counts while no groupper/mover sits in between
            if config.uncontrolled && uncontrolled.is_none() && groupper.is_none() && mover.is_none()
            {
                uncontrolled = Some(current);
            }
            if modalizer.is_none() {
                modalizer = config.modalizer.as_ref().map(|props| ModalizerInfo {
                    element: current,
                    props,
                });
            }
            if groupper.is_none() {
                groupper = self.grouppers.get(&current).map(|g| g as &dyn ScopeBehavior);
            }
            if mover.is_none() {
                mover = self.movers.get(&current).map(|m| m as &dyn ScopeBehavior);
            }

            if config.root {
                return Some(FocusContext {
                    root: current,
                    modalizer,
                    groupper,
                    mover,
                    uncontrolled,
                });
            }
        }
        None
    }

    fn modalizer_elements(&self, id: &str) -> Vec<NodeId> {
        let mut elements: Vec<NodeId> = self
            .configs
            .iter()
            .filter(|(_, c)| c.modalizer.as_ref().is_some_and(|m| m.id == id))
            .map(|(&node, _)| node)
            .collect();
        elements.sort();
        elements
    }
}
