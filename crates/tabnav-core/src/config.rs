//! Navigator configuration

use serde::Deserialize;
use tabnav_dom::NodeId;

/// How "parent" is computed for containment and ancestry checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParentMode {
    /// Slotted nodes belong to their slot, shadow content to its host
    #[default]
    Composed,
    /// Plain `parentElement`, shadow trees end at their root
    Light,
}

/// Navigator configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigatorConfig {
    /// Parent resolution used by every containment check
    pub parent_mode: ParentMode,
    /// Run the render box / visibility checks in `is_focusable`
    pub check_visibility: bool,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            parent_mode: ParentMode::Composed,
            check_visibility: true,
        }
    }
}

impl NavigatorConfig {
    /// Load configuration from JSON, missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        tracing::debug!("Loaded navigator config: {:?}", config);
        Ok(config)
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid navigator config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid data-tabnav attribute on {node}: {source}")]
    NodeAttribute {
        node: NodeId,
        source: serde_json::Error,
    },
}
