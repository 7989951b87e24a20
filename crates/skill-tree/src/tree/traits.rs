//! Core tree traits for navigating a skill hierarchy

use std::collections::{HashSet, VecDeque};

use crate::tree::{NodeData, NodeId};

/// A rooted hierarchy of skill nodes linked by `parent_id`
///
/// Implementations provide the basic lookups; the provided methods build
/// ancestor/depth queries on top of them.
///
/// # Example
///
/// ```ignore
/// fn print_tree<T: Tree>(tree: &T) {
///     for id in tree.walk(TraversalOrder::PreOrder) {
///         let depth = tree.depth(id);
///         println!("{:indent$}{}", "", tree.label(id).unwrap_or(""), indent = depth * 2);
///     }
/// }
/// ```
pub trait Tree {
    /// Get the root node ID, `None` for an empty tree
    fn root(&self) -> Option<&NodeId>;

    /// Get a node by its ID
    ///
    /// Returns `None` if the ID is unknown.
    fn get(&self, id: &NodeId) -> Option<&NodeData>;

    /// Iterate over the structural children of a node, in insertion order
    ///
    /// Returns an empty iterator for leaves or unknown IDs.
    fn children(&self, id: &NodeId) -> Box<dyn Iterator<Item = &NodeId> + '_>;

    /// Count total nodes in the tree
    fn node_count(&self) -> usize;

    /// Get the structural parent of a node
    ///
    /// Returns `None` for the root or unknown IDs.
    fn parent(&self, id: &NodeId) -> Option<&NodeId> {
        self.get(id)?.parent_id.as_ref()
    }

    /// Check whether a node exists
    fn contains(&self, id: &NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Get the label of a node
    fn label(&self, id: &NodeId) -> Option<&str> {
        self.get(id).map(|n| n.label.as_str())
    }

    /// Count children of a node
    fn child_count(&self, id: &NodeId) -> usize {
        self.children(id).count()
    }

    /// Get all ancestors of a node, closest first
    ///
    /// Returns an empty vector for the root or unknown IDs.
    fn ancestors(&self, id: &NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = self.parent(id);
        // a well-formed tree never needs more steps than it has nodes
        while let Some(parent_id) = current {
            if ancestors.len() >= self.node_count() {
                break;
            }
            ancestors.push(parent_id.clone());
            current = self.parent(parent_id);
        }
        ancestors
    }

    /// Get the depth of a node (root = 0)
    fn depth(&self, id: &NodeId) -> usize {
        self.ancestors(id).len()
    }

    /// Check if a node is an ancestor of another
    fn is_ancestor_of(&self, ancestor: &NodeId, descendant: &NodeId) -> bool {
        self.ancestors(descendant).iter().any(|id| id == ancestor)
    }
}

/// Traversal order for walking the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalOrder {
    /// Visit parent before children (top-down)
    PreOrder,
    /// Visit children before parent (bottom-up)
    PostOrder,
    /// Visit level by level
    BreadthFirst,
}

/// Extension trait providing traversal and search utilities
///
/// Automatically implemented for all types that implement `Tree`.
pub trait TreeTraversal: Tree {
    /// Walk the whole tree from the root in the specified order
    fn walk(&self, order: TraversalOrder) -> TreeWalker<'_, Self>
    where
        Self: Sized,
    {
        TreeWalker::new(self, self.root(), order)
    }

    /// Walk the subtree rooted at `start`
    fn walk_from<'a>(&'a self, start: &'a NodeId, order: TraversalOrder) -> TreeWalker<'a, Self>
    where
        Self: Sized,
    {
        TreeWalker::new(self, Some(start), order)
    }

    /// All descendants of a node, breadth-first, excluding the node itself
    fn descendants(&self, id: &NodeId) -> Vec<NodeId>
    where
        Self: Sized,
    {
        self.walk_from(id, TraversalOrder::BreadthFirst)
            .skip(1)
            .cloned()
            .collect()
    }

    /// Nodes without children
    fn leaves(&self) -> Vec<NodeId>
    where
        Self: Sized,
    {
        self.walk(TraversalOrder::PreOrder)
            .filter(|id| self.child_count(id) == 0)
            .cloned()
            .collect()
    }

    /// Find nodes matching a predicate, in pre-order
    fn find<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&NodeData) -> bool,
        Self: Sized,
    {
        self.walk(TraversalOrder::PreOrder)
            .filter(|id| self.get(id).map(&predicate).unwrap_or(false))
            .cloned()
            .collect()
    }

    /// Find a node by label (first match in pre-order)
    fn find_by_label(&self, label: &str) -> Option<NodeId>
    where
        Self: Sized,
    {
        self.walk(TraversalOrder::PreOrder)
            .find(|id| self.label(id) == Some(label))
            .cloned()
    }
}

// Blanket implementation for all Tree types
impl<T: Tree> TreeTraversal for T {}

/// Iterator for traversing a tree in different orders
pub struct TreeWalker<'a, T: Tree + ?Sized> {
    tree: &'a T,
    order: TraversalOrder,
    stack: Vec<&'a NodeId>,
    queue: VecDeque<&'a NodeId>,
    visited: HashSet<&'a NodeId>,
}

impl<'a, T: Tree + ?Sized> TreeWalker<'a, T> {
    /// Create a new walker starting from the given node
    ///
    /// Yields nothing when `start` is `None` or not part of the tree.
    pub fn new(tree: &'a T, start: Option<&'a NodeId>, order: TraversalOrder) -> Self {
        let start = start.filter(|id| tree.contains(id));
        let mut walker = Self {
            tree,
            order,
            stack: Vec::new(),
            queue: VecDeque::new(),
            visited: HashSet::new(),
        };

        if let Some(start) = start {
            match order {
                TraversalOrder::BreadthFirst => walker.queue.push_back(start),
                _ => walker.stack.push(start),
            }
        }

        walker
    }
}

impl<'a, T: Tree + ?Sized> Iterator for TreeWalker<'a, T> {
    type Item = &'a NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        match self.order {
            TraversalOrder::PreOrder => self.next_preorder(),
            TraversalOrder::PostOrder => self.next_postorder(),
            TraversalOrder::BreadthFirst => self.next_breadthfirst(),
        }
    }
}

impl<'a, T: Tree + ?Sized> TreeWalker<'a, T> {
    fn next_preorder(&mut self) -> Option<&'a NodeId> {
        let current = self.stack.pop()?;

        // Add children in reverse order so they're popped in correct order
        let tree = self.tree;
        let children: Vec<_> = tree.children(current).collect();
        for child in children.into_iter().rev() {
            self.stack.push(child);
        }

        Some(current)
    }

    fn next_postorder(&mut self) -> Option<&'a NodeId> {
        while let Some(&current) = self.stack.last() {
            if self.visited.contains(current) {
                self.stack.pop();
                return Some(current);
            }

            self.visited.insert(current);

            let tree = self.tree;
            let children: Vec<_> = tree.children(current).collect();
            for child in children.into_iter().rev() {
                self.stack.push(child);
            }
        }
        None
    }

    fn next_breadthfirst(&mut self) -> Option<&'a NodeId> {
        let current = self.queue.pop_front()?;
        let tree = self.tree;
        self.queue.extend(tree.children(current));
        Some(current)
    }
}
