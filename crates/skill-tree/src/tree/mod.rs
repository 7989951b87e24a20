//! Core tree abstraction for skill hierarchies
//!
//! This module provides the node and edge records, the generic [`Tree`] trait
//! with its traversal extension, and the indexed [`NodeStore`] the engine
//! keeps its state in.

mod edge;
mod node;
mod store;
mod traits;

pub use edge::Edge;
pub use node::{IconData, IconType, Metadata, NodeData, NodeId, SubtreeProgress, Weight};
pub use store::NodeStore;
pub use traits::{TraversalOrder, Tree, TreeTraversal, TreeWalker};

/// Re-export common types for convenience
pub mod prelude {
    pub use super::{
        Edge, IconData, IconType, NodeData, NodeId, SubtreeProgress, TraversalOrder, Tree,
        TreeTraversal, Weight,
    };
}
