//! Partial node updates

use serde::{Deserialize, Serialize};

use crate::error::{Result, TreeError, ValidationError};
use crate::serde_helpers::double_option;
use crate::tree::{IconData, Metadata, NodeId, Weight};

/// A partial update of a node's user-editable fields
///
/// Only fields that are `Some` are applied. `icon_data` distinguishes
/// "leave alone" (`None`) from "clear" (`Some(None)`).
///
/// Deserializing a patch rejects keys that are not user-editable, such as
/// `locked` or `parentId`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NodeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub icon_data: Option<Option<IconData>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Weight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_header: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerequisites: Option<Vec<NodeId>>,
}

impl NodeUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a patch from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|err| TreeError::Validation(ValidationError::Malformed(err.to_string())))
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Set the icon, `None` clears it
    pub fn icon_data(mut self, icon: Option<IconData>) -> Self {
        self.icon_data = Some(icon);
        self
    }

    /// Set the weight, clamped into range
    pub fn weight(mut self, weight: i64) -> Self {
        self.weight = Some(Weight::new(weight));
        self
    }

    pub fn is_header(mut self, is_header: bool) -> Self {
        self.is_header = Some(is_header);
        self
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn prerequisites(mut self, prerequisites: impl IntoIterator<Item = NodeId>) -> Self {
        self.prerequisites = Some(prerequisites.into_iter().collect());
        self
    }

    /// Returns true if applying this update can change lock state or
    /// completion aggregates
    pub fn affects_progress(&self) -> bool {
        self.completed.is_some()
            || self.icon_data.is_some()
            || self.weight.is_some()
            || self.is_header.is_some()
            || self.prerequisites.is_some()
    }

    /// Returns true if no field is set
    pub fn is_empty(&self) -> bool {
        self.label.is_none()
            && self.description.is_none()
            && self.metadata.is_none()
            && !self.affects_progress()
    }
}
