//! The serialized tree document
//!
//! A [`TreeData`] is the envelope persisted and shared by callers: ordered
//! node and edge elements plus the document name, version and metadata.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TreeError, ValidationError};
use crate::tree::{Edge, Metadata, NodeData, NodeId};

/// Document version written by this crate
pub const FORMAT_VERSION: &str = "1.0";

fn default_version() -> String {
    FORMAT_VERSION.to_string()
}

/// Element group tag of a node entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeGroup {
    #[default]
    Nodes,
}

/// Element group tag of an edge entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeGroup {
    #[default]
    Edges,
}

/// A node entry of the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeElement {
    #[serde(default)]
    pub group: NodeGroup,
    pub data: NodeData,
}

impl From<NodeData> for NodeElement {
    fn from(data: NodeData) -> Self {
        Self {
            group: NodeGroup::Nodes,
            data,
        }
    }
}

/// An edge entry of the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeElement {
    #[serde(default)]
    pub group: EdgeGroup,
    pub data: Edge,
}

impl From<Edge> for EdgeElement {
    fn from(data: Edge) -> Self {
        Self {
            group: EdgeGroup::Edges,
            data,
        }
    }
}

/// A complete serialized tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeData {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub nodes: Vec<NodeElement>,
    pub edges: Vec<EdgeElement>,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl TreeData {
    /// An empty document with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: default_version(),
            name: name.into(),
            description: None,
            nodes: Vec::new(),
            edges: Vec::new(),
            metadata: Metadata::new(),
        }
    }

    /// Build a document from node and edge records
    pub fn from_parts(
        name: impl Into<String>,
        nodes: impl IntoIterator<Item = NodeData>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Self {
        Self {
            nodes: nodes.into_iter().map(NodeElement::from).collect(),
            edges: edges.into_iter().map(EdgeElement::from).collect(),
            ..Self::new(name)
        }
    }

    /// Parse a document from JSON
    ///
    /// Shape errors are reported as [`ValidationError::Malformed`]; the
    /// structural checks run when the document is loaded.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|err| TreeError::Validation(ValidationError::Malformed(err.to_string())))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|err| TreeError::Validation(ValidationError::Malformed(err.to_string())))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| TreeError::Validation(ValidationError::Malformed(err.to_string())))
    }

    /// Id of the first node without a parent
    pub fn root_id(&self) -> Option<&NodeId> {
        self.nodes
            .iter()
            .find(|element| element.data.is_root())
            .map(|element| &element.data.id)
    }

    /// Iterate over the node records
    pub fn node_data(&self) -> impl Iterator<Item = &NodeData> {
        self.nodes.iter().map(|element| &element.data)
    }

    /// Mutable iteration over the node records
    pub fn node_data_mut(&mut self) -> impl Iterator<Item = &mut NodeData> {
        self.nodes.iter_mut().map(|element| &mut element.data)
    }

    /// Iterate over the edge records
    pub fn edge_data(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().map(|element| &element.data)
    }

    pub fn edge_data_mut(&mut self) -> impl Iterator<Item = &mut Edge> {
        self.edges.iter_mut().map(|element| &mut element.data)
    }

    pub fn node(&self, id: &NodeId) -> Option<&NodeData> {
        self.node_data().find(|node| &node.id == id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for TreeData {
    fn default() -> Self {
        Self::new("")
    }
}
