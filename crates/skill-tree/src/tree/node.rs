//! Core node types for the skill tree

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::serde_helpers::null_as_default;

/// Caller-defined extension data attached to a node or a tree document.
///
/// The engine never interprets the contents.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Unique identifier for a node within a tree
///
/// Opaque string, generated by the engine when a node is created and stable
/// for the node's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a new NodeId from any string
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    /// Get the string representation of this ID
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        NodeId(id)
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// How a node icon is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconType {
    /// An emoji character
    #[default]
    #[display(fmt = "emoji")]
    Emoji,
    /// An image URL
    #[display(fmt = "image")]
    Image,
    /// Inline SVG markup
    #[display(fmt = "svg")]
    Svg,
}

/// Presentational icon attached to a node
///
/// The engine carries this through unchanged, except that new children
/// inherit their parent's icon and a color edit cascades down the subtree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconData {
    /// Encoding of `icon`
    #[serde(rename = "type", default)]
    pub kind: IconType,
    /// Emoji character, image URL or SVG content
    #[serde(default, deserialize_with = "null_as_default")]
    pub icon: String,
    /// Hex color code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl IconData {
    /// Create an emoji icon without a color
    pub fn emoji(icon: impl Into<String>) -> Self {
        Self {
            kind: IconType::Emoji,
            icon: icon.into(),
            color: None,
            background_color: None,
        }
    }

    /// Set the color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Get the color, if any
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }
}

/// Effort weight of a node, always within `Weight::MIN..=Weight::MAX`
///
/// Construction clamps out-of-range values instead of failing, so both
/// user edits and persisted documents end up in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[serde(from = "f64", into = "u8")]
#[display(fmt = "{}", _0)]
pub struct Weight(u8);

impl Weight {
    pub const MIN: Weight = Weight(1);
    pub const MAX: Weight = Weight(10);

    /// Create a weight, clamping into range
    pub fn new(value: i64) -> Self {
        Weight(value.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as u8)
    }

    /// Get the inner value
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for Weight {
    fn default() -> Self {
        Self::MIN
    }
}

impl From<i64> for Weight {
    fn from(value: i64) -> Self {
        Weight::new(value)
    }
}

impl From<f64> for Weight {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            Weight::new(value.round() as i64)
        } else {
            Weight::MIN
        }
    }
}

impl From<Weight> for u8 {
    fn from(weight: Weight) -> Self {
        weight.0
    }
}

/// Weight sums behind a node's subtree completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[display(fmt = "{}/{}", completed, total)]
pub struct SubtreeProgress {
    /// Sum of weights of completed nodes in the subtree
    pub completed: u32,
    /// Sum of weights of all nodes in the subtree
    pub total: u32,
}

impl SubtreeProgress {
    pub fn new(completed: u32, total: u32) -> Self {
        Self { completed, total }
    }

    /// Progress contributed by a single node
    pub fn of_node(weight: Weight, completed: bool) -> Self {
        let weight = u32::from(weight.get());
        Self {
            completed: if completed { weight } else { 0 },
            total: weight,
        }
    }

    /// Weighted completion fraction in `[0, 1]`, 0 for an empty total
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.completed) / f64::from(self.total)
        }
    }
}

impl std::ops::Add for SubtreeProgress {
    type Output = SubtreeProgress;

    fn add(self, rhs: Self) -> Self::Output {
        SubtreeProgress {
            completed: self.completed + rhs.completed,
            total: self.total + rhs.total,
        }
    }
}

impl std::iter::Sum for SubtreeProgress {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(SubtreeProgress::default(), |acc, p| acc + p)
    }
}

/// A single skill in the tree
///
/// `locked`, `subtree_completion` and `subtree_progress` are derived by the
/// engine. Values read from a document are replaced on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub id: NodeId,
    /// Display name, may be empty for placeholder nodes
    pub label: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub locked: bool,
    /// Structural parent, `None` only for the root
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    /// Nodes that must be completed before this one unlocks
    #[serde(default, deserialize_with = "null_as_default")]
    pub prerequisites: Vec<NodeId>,
    #[serde(default)]
    pub icon_data: Option<IconData>,
    #[serde(default)]
    pub weight: Weight,
    #[serde(default)]
    pub subtree_completion: f64,
    #[serde(default)]
    pub subtree_progress: SubtreeProgress,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Metadata,
    /// Header nodes group their children and can never be completed
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_header: bool,
}

impl NodeData {
    /// Create a bare node with the given id and label
    ///
    /// Lock state follows the parent: roots start unlocked, children locked
    /// behind their parent.
    pub fn new(id: NodeId, label: impl Into<String>, parent_id: Option<NodeId>) -> Self {
        let prerequisites = parent_id.iter().cloned().collect();
        Self {
            id,
            label: label.into(),
            description: String::new(),
            completed: false,
            locked: parent_id.is_some(),
            parent_id,
            prerequisites,
            icon_data: None,
            weight: Weight::default(),
            subtree_completion: 0.0,
            subtree_progress: SubtreeProgress::default(),
            metadata: Metadata::new(),
            is_header: false,
        }
    }

    /// Returns true if this node has no structural parent
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// This node's own contribution to subtree progress
    pub fn own_progress(&self) -> SubtreeProgress {
        SubtreeProgress::of_node(self.weight, self.completed)
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) - {}", self.label, self.id, self.subtree_progress)
    }
}
