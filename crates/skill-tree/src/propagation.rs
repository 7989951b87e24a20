//! Derived state: prerequisite locks and weighted subtree completion
//!
//! Both passes are pure functions over any [`Tree`]; the engine applies
//! their results after every structural or completion change.

use std::collections::HashMap;

use crate::tree::{NodeData, NodeId, SubtreeProgress, TraversalOrder, Tree, TreeTraversal};

/// Returns true when every direct prerequisite of `node` is completed
///
/// Only one hop is considered. A prerequisite that is not in the tree counts
/// as not completed.
pub fn prerequisites_met<T: Tree>(tree: &T, node: &NodeData) -> bool {
    node.prerequisites
        .iter()
        .all(|id| tree.get(id).map(|p| p.completed).unwrap_or(false))
}

/// Returns true when `prerequisites` no longer block completing a node
///
/// Like [`prerequisites_met`], except that a header prerequisite counts as
/// satisfied. Headers can never be completed, so children grouped under one
/// stay completable.
pub fn prerequisites_cleared<T: Tree>(tree: &T, prerequisites: &[NodeId]) -> bool {
    prerequisites
        .iter()
        .all(|id| tree.get(id).is_some_and(|p| p.completed || p.is_header))
}

/// Weighted progress of the subtree rooted at `id`, `None` if unknown
///
/// Walks the single subtree; use [`all_subtree_progress`] to compute every
/// node at once.
pub fn subtree_progress<T: Tree>(tree: &T, id: &NodeId) -> Option<SubtreeProgress> {
    tree.get(id)?;
    Some(
        tree.walk_from(id, TraversalOrder::PreOrder)
            .filter_map(|id| tree.get(id))
            .map(NodeData::own_progress)
            .sum(),
    )
}

/// Weighted progress of every subtree reachable from the root
///
/// One post-order pass: each node's total is its own weight plus the totals
/// already computed for its children.
pub fn all_subtree_progress<T: Tree>(tree: &T) -> HashMap<NodeId, SubtreeProgress> {
    let mut totals: HashMap<NodeId, SubtreeProgress> =
        HashMap::with_capacity(tree.node_count());

    for id in tree.walk(TraversalOrder::PostOrder) {
        let Some(node) = tree.get(id) else {
            continue;
        };
        let children: SubtreeProgress = tree
            .children(id)
            .filter_map(|child| totals.get(child).copied())
            .sum();
        totals.insert(id.clone(), node.own_progress() + children);
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{NodeStore, Weight};

    fn node(id: &str, parent: Option<&str>, weight: i64, completed: bool) -> NodeData {
        let mut node = NodeData::new(NodeId::new(id), id, parent.map(NodeId::new));
        node.weight = Weight::new(weight);
        node.completed = completed;
        node
    }

    fn create_test_store() -> NodeStore {
        // r(5, done)
        //   a(1)
        //     c(3, done)
        //   b(2, done)
        let mut store = NodeStore::new();
        store.insert(node("r", None, 5, true));
        store.insert(node("a", Some("r"), 1, false));
        store.insert(node("b", Some("r"), 2, true));
        store.insert(node("c", Some("a"), 3, true));
        store
    }

    #[test]
    fn test_lock_is_one_hop() {
        let store = create_test_store();
        let get = |id: &str| store.get(&NodeId::new(id)).unwrap();
        assert!(prerequisites_met(&store, get("r")));
        assert!(prerequisites_met(&store, get("a")));
        assert!(prerequisites_met(&store, get("b")));
        // a is not completed, so c stays locked even though r is
        assert!(!prerequisites_met(&store, get("c")));
    }

    #[test]
    fn test_missing_prerequisite_locks() {
        let store = create_test_store();
        let mut orphan_gate = node("x", Some("r"), 1, false);
        orphan_gate.prerequisites.push(NodeId::new("ghost"));
        assert!(!prerequisites_met(&store, &orphan_gate));
    }

    #[test]
    fn test_header_prerequisite_clears_gate() {
        let mut store = create_test_store();
        let a = NodeId::new("a");
        assert!(!prerequisites_cleared(&store, &[a.clone()]));

        store.get_mut(&a).unwrap().is_header = true;
        assert!(prerequisites_cleared(&store, &[a.clone()]));
        assert!(!prerequisites_met(&store, store.get(&NodeId::new("c")).unwrap()));
        assert!(!prerequisites_cleared(&store, &[a, NodeId::new("ghost")]));
    }

    #[test]
    fn test_single_subtree_progress() {
        let store = create_test_store();
        assert_eq!(
            subtree_progress(&store, &NodeId::new("r")),
            Some(SubtreeProgress::new(10, 11))
        );
        assert_eq!(
            subtree_progress(&store, &NodeId::new("a")),
            Some(SubtreeProgress::new(3, 4))
        );
        assert_eq!(subtree_progress(&store, &NodeId::new("missing")), None);
    }

    #[test]
    fn test_all_progress_matches_single_walks() {
        let store = create_test_store();
        let totals = all_subtree_progress(&store);
        assert_eq!(totals.len(), 4);
        for (id, progress) in &totals {
            assert_eq!(Some(*progress), subtree_progress(&store, id));
        }
        assert_eq!(totals[&NodeId::new("b")], SubtreeProgress::new(2, 2));
    }
}
