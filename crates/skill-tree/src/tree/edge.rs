//! Structural parent -> child edges

use serde::{Deserialize, Serialize};

use crate::tree::NodeId;

/// A directed parent -> child edge of the display hierarchy
///
/// An edge `(a, b)` exists exactly when `b.parent_id == a`. Prerequisites
/// that differ from the parent are not represented as edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Edge id, `edge_<source>_<target>` unless the document says otherwise
    #[serde(default)]
    pub id: String,
    /// Parent node
    pub source: NodeId,
    /// Child node
    pub target: NodeId,
}

impl Edge {
    /// Create an edge with the conventional id
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            id: Self::conventional_id(&source, &target),
            source,
            target,
        }
    }

    pub fn conventional_id(source: &NodeId, target: &NodeId) -> String {
        format!("edge_{}_{}", source, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_id_convention() {
        let edge = Edge::new(NodeId::new("a"), NodeId::new("b"));
        assert_eq!(edge.id, "edge_a_b");
        assert_eq!(edge.source, NodeId::new("a"));
        assert_eq!(edge.target, NodeId::new("b"));
    }

    #[test]
    fn test_edge_id_optional_on_input() {
        let edge: Edge = serde_json::from_str(r#"{"source": "a", "target": "b"}"#).unwrap();
        assert!(edge.id.is_empty());
    }
}
