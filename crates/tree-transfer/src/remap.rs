//! Fresh ids for imported documents

use serde_json::Value;
use skill_tree::ids::IdGenerator;
use skill_tree::tree::{Edge, NodeId};
use skill_tree::TreeData;
use std::collections::HashMap;

/// Old -> new id substitution produced by an import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdMap {
    map: HashMap<NodeId, NodeId>,
}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, old: NodeId, new: NodeId) {
        self.map.insert(old, new);
    }

    pub fn get(&self, old: &NodeId) -> Option<&NodeId> {
        self.map.get(old)
    }

    /// Map an id, leaving ids outside the map untouched
    pub fn translate(&self, id: &NodeId) -> NodeId {
        self.map.get(id).cloned().unwrap_or_else(|| id.clone())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &NodeId)> {
        self.map.iter()
    }
}

/// Give every node of a document a fresh id
///
/// Parent links, prerequisites and edge endpoints are rewritten through the
/// substitution; edge ids follow the new endpoints, and so does a `rootId`
/// metadata entry. References to ids that are not part of the document stay
/// as they are.
pub fn remap_ids(data: &TreeData, ids: &IdGenerator) -> (TreeData, IdMap) {
    let mut map = IdMap::new();
    for node in data.node_data() {
        let fresh = ids.next_unused(|candidate| data.node(candidate).is_some());
        map.insert(node.id.clone(), fresh);
    }

    let mut remapped = data.clone();
    for node in remapped.node_data_mut() {
        node.id = map.translate(&node.id);
        node.parent_id = node.parent_id.as_ref().map(|parent| map.translate(parent));
        for prerequisite in &mut node.prerequisites {
            *prerequisite = map.translate(prerequisite);
        }
    }
    for edge in remapped.edge_data_mut() {
        edge.source = map.translate(&edge.source);
        edge.target = map.translate(&edge.target);
        edge.id = Edge::conventional_id(&edge.source, &edge.target);
    }
    if let Some(Value::String(root)) = remapped.metadata.get_mut("rootId") {
        *root = map.translate(&NodeId::new(root.as_str())).as_str().to_string();
    }

    (remapped, map)
}

/// Clear `completed` on every node of a document
pub fn reset_completion(data: &mut TreeData) {
    for node in data.node_data_mut() {
        node.completed = false;
    }
}
