//! Configuration options for the tree engine.
//!
//! This module provides the `EngineOptions` struct which controls the
//! defaults applied to newly created nodes and the completion policy the
//! engine enforces.

use serde::{Deserialize, Serialize};

use crate::tree::{IconData, Weight};

/// Configuration options for a [`TreeEngine`](crate::TreeEngine).
///
/// Options can be built in code or deserialized from a settings document;
/// missing fields fall back to their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineOptions {
    /// Weight given to a newly created root.
    pub root_weight: Weight,

    /// Weight given to a newly created child.
    pub child_weight: Weight,

    /// Label used when starting a new tree without an explicit label.
    pub root_label: String,

    /// Label given to children created through `add_child_node`.
    pub child_label: String,

    /// Icon given to a new root when the caller supplies none.
    pub root_icon: Option<IconData>,

    /// Whether the engine refuses to complete locked or header nodes.
    pub enforce_completion_gate: bool,

    /// Prefix of generated node ids.
    pub id_prefix: String,

    /// Name of the tree document for a fresh engine.
    pub tree_name: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            root_weight: Weight::new(5),
            child_weight: Weight::new(1),
            root_label: "Root Skill".to_string(),
            child_label: "New Skill".to_string(),
            root_icon: Some(IconData::emoji("").with_color("#8b5cf6")),
            enforce_completion_gate: true,
            id_prefix: "node".to_string(),
            tree_name: "Skill Tree".to_string(),
        }
    }
}

impl EngineOptions {
    /// Create new engine options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the weight of new roots.
    pub fn root_weight(mut self, weight: i64) -> Self {
        self.root_weight = Weight::new(weight);
        self
    }

    /// Set the weight of new children.
    pub fn child_weight(mut self, weight: i64) -> Self {
        self.child_weight = Weight::new(weight);
        self
    }

    /// Set the default root label.
    pub fn root_label(mut self, label: impl Into<String>) -> Self {
        self.root_label = label.into();
        self
    }

    /// Set the default child label.
    pub fn child_label(mut self, label: impl Into<String>) -> Self {
        self.child_label = label.into();
        self
    }

    /// Set the default root icon, `None` to create plain roots.
    pub fn root_icon(mut self, icon: Option<IconData>) -> Self {
        self.root_icon = icon;
        self
    }

    /// Enable or disable the completion gate.
    pub fn enforce_completion_gate(mut self, enforce: bool) -> Self {
        self.enforce_completion_gate = enforce;
        self
    }

    /// Set the prefix of generated ids.
    pub fn id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    /// Set the name of a fresh tree document.
    pub fn tree_name(mut self, name: impl Into<String>) -> Self {
        self.tree_name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = EngineOptions::default();
        assert_eq!(options.root_weight.get(), 5);
        assert_eq!(options.child_weight.get(), 1);
        assert_eq!(options.child_label, "New Skill");
        assert!(options.enforce_completion_gate);
        assert_eq!(
            options.root_icon.as_ref().and_then(|icon| icon.color()),
            Some("#8b5cf6")
        );
    }

    #[test]
    fn test_builder_clamps_weights() {
        let options = EngineOptions::new().root_weight(50).child_weight(0);
        assert_eq!(options.root_weight, Weight::MAX);
        assert_eq!(options.child_weight, Weight::MIN);
    }

    #[test]
    fn test_partial_deserialize() {
        let options: EngineOptions =
            serde_json::from_str(r#"{"childLabel": "Todo", "enforceCompletionGate": false}"#)
                .unwrap();
        assert_eq!(options.child_label, "Todo");
        assert!(!options.enforce_completion_gate);
        assert_eq!(options.root_label, "Root Skill");
    }
}
