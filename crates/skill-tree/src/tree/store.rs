//! Indexed node storage backing the engine

use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

use crate::tree::{Edge, NodeData, NodeId, Tree};

type ChildList = SmallVec<[NodeId; 4]>;

/// Insertion-ordered node and edge storage with id and child indexes
///
/// The store keeps the structural indexes consistent with `parent_id`; it
/// does not know about lock state or completion, which the engine derives
/// on top of it.
#[derive(Debug, Clone, Default)]
pub struct NodeStore {
    /// Nodes in insertion order
    nodes: Vec<NodeData>,
    /// Position of each node in `nodes`
    index: HashMap<NodeId, usize>,
    /// Children of each parent, in insertion order
    children: HashMap<NodeId, ChildList>,
    /// Structural edges in insertion order
    edges: Vec<Edge>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already validated nodes and edges
    pub fn from_parts(nodes: Vec<NodeData>, edges: Vec<Edge>) -> Self {
        let mut store = Self {
            nodes,
            index: HashMap::new(),
            children: HashMap::new(),
            edges,
        };
        store.reindex();
        store
    }

    fn reindex(&mut self) {
        self.index.clear();
        self.children.clear();
        for (position, node) in self.nodes.iter().enumerate() {
            self.index.insert(node.id.clone(), position);
            if let Some(parent) = &node.parent_id {
                self.children
                    .entry(parent.clone())
                    .or_default()
                    .push(node.id.clone());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[NodeData] {
        &self.nodes
    }

    /// Mutable access to node records
    ///
    /// Callers must not change `id` or `parent_id` through this; use
    /// [`NodeStore::set_parent`] for structural changes.
    pub fn nodes_mut(&mut self) -> &mut [NodeData] {
        &mut self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn get_mut(&mut self, id: &NodeId) -> Option<&mut NodeData> {
        let position = *self.index.get(id)?;
        self.nodes.get_mut(position)
    }

    /// Append a node, linking it under its parent
    pub fn insert(&mut self, node: NodeData) {
        if let Some(parent) = &node.parent_id {
            self.children
                .entry(parent.clone())
                .or_default()
                .push(node.id.clone());
            self.edges.push(Edge::new(parent.clone(), node.id.clone()));
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }

    /// Remove a set of nodes along with every edge touching them
    ///
    /// Removed ids are also pruned from the prerequisites of the nodes that
    /// remain. Returns the removed ids in storage order.
    pub fn remove(&mut self, ids: &HashSet<NodeId>) -> Vec<NodeId> {
        let removed: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|n| ids.contains(&n.id))
            .map(|n| n.id.clone())
            .collect();
        if removed.is_empty() {
            return removed;
        }

        self.nodes.retain(|n| !ids.contains(&n.id));
        for node in &mut self.nodes {
            node.prerequisites.retain(|p| !ids.contains(p));
        }
        self.edges
            .retain(|e| !ids.contains(&e.source) && !ids.contains(&e.target));
        self.reindex();

        removed
    }

    /// Move a node under a new parent
    ///
    /// Replaces the old structural edge and resets the prerequisites to the
    /// new parent. Both ids must exist; the caller rules out cycles.
    pub fn set_parent(&mut self, id: &NodeId, new_parent: &NodeId) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        let old_parent = node.parent_id.replace(new_parent.clone());
        node.prerequisites = vec![new_parent.clone()];

        if let Some(old_parent) = old_parent {
            if let Some(siblings) = self.children.get_mut(&old_parent) {
                siblings.retain(|child| child != id);
            }
            self.edges
                .retain(|e| !(e.source == old_parent && &e.target == id));
        }

        self.children
            .entry(new_parent.clone())
            .or_default()
            .push(id.clone());
        self.edges.push(Edge::new(new_parent.clone(), id.clone()));
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
        self.children.clear();
        self.edges.clear();
    }
}

impl Tree for NodeStore {
    fn root(&self) -> Option<&NodeId> {
        self.nodes.iter().find(|n| n.is_root()).map(|n| &n.id)
    }

    fn get(&self, id: &NodeId) -> Option<&NodeData> {
        self.index.get(id).and_then(|&position| self.nodes.get(position))
    }

    fn children(&self, id: &NodeId) -> Box<dyn Iterator<Item = &NodeId> + '_> {
        match self.children.get(id) {
            Some(children) => Box::new(children.iter()),
            None => Box::new(std::iter::empty()),
        }
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{TraversalOrder, TreeTraversal};

    fn node(id: &str, parent: Option<&str>) -> NodeData {
        NodeData::new(NodeId::new(id), id, parent.map(NodeId::new))
    }

    fn create_test_store() -> NodeStore {
        // r
        //   a
        //     c
        //   b
        let mut store = NodeStore::new();
        store.insert(node("r", None));
        store.insert(node("a", Some("r")));
        store.insert(node("b", Some("r")));
        store.insert(node("c", Some("a")));
        store
    }

    fn ids(list: &[&str]) -> Vec<NodeId> {
        list.iter().map(|id| NodeId::new(*id)).collect()
    }

    #[test]
    fn test_insert_links_parent() {
        let store = create_test_store();
        assert_eq!(store.len(), 4);
        assert_eq!(store.root(), Some(&NodeId::new("r")));
        let children: Vec<_> = store.children(&NodeId::new("r")).cloned().collect();
        assert_eq!(children, ids(&["a", "b"]));
        assert_eq!(store.edges().len(), 3);
        assert_eq!(store.edges()[2].id, "edge_a_c");
    }

    #[test]
    fn test_remove_drops_edges_and_prerequisites() {
        let mut store = create_test_store();
        store
            .get_mut(&NodeId::new("b"))
            .unwrap()
            .prerequisites
            .push(NodeId::new("c"));

        let doomed: HashSet<_> = ids(&["a", "c"]).into_iter().collect();
        let removed = store.remove(&doomed);

        assert_eq!(removed, ids(&["a", "c"]));
        assert_eq!(store.len(), 2);
        assert!(store.get(&NodeId::new("a")).is_none());
        assert!(store.edges().iter().all(|e| !doomed.contains(&e.target)));
        assert_eq!(
            store.get(&NodeId::new("b")).unwrap().prerequisites,
            ids(&["r"])
        );
        assert_eq!(store.child_count(&NodeId::new("r")), 1);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut store = create_test_store();
        let doomed: HashSet<_> = ids(&["zzz"]).into_iter().collect();
        assert!(store.remove(&doomed).is_empty());
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_set_parent_moves_edge() {
        let mut store = create_test_store();
        store.set_parent(&NodeId::new("c"), &NodeId::new("b"));

        let c = store.get(&NodeId::new("c")).unwrap();
        assert_eq!(c.parent_id, Some(NodeId::new("b")));
        assert_eq!(c.prerequisites, ids(&["b"]));
        assert_eq!(store.child_count(&NodeId::new("a")), 0);
        assert_eq!(store.child_count(&NodeId::new("b")), 1);
        assert!(store.edges().iter().any(|e| e.id == "edge_b_c"));
        assert!(!store.edges().iter().any(|e| e.id == "edge_a_c"));

        let order: Vec<_> = store.walk(TraversalOrder::PreOrder).cloned().collect();
        assert_eq!(order, ids(&["r", "a", "b", "c"]));
    }

    #[test]
    fn test_from_parts_rebuilds_indexes() {
        let original = create_test_store();
        let rebuilt =
            NodeStore::from_parts(original.nodes().to_vec(), original.edges().to_vec());
        assert_eq!(rebuilt.descendants(&NodeId::new("r")), ids(&["a", "b", "c"]));
        assert_eq!(rebuilt.get(&NodeId::new("c")).unwrap().label, "c");
    }
}
