//! Skill Tree Engine
//!
//! An in-memory model of a skill tree: a rooted hierarchy of skills where
//! each node unlocks once its prerequisites are completed and reports the
//! weighted completion of its whole subtree.
//!
//! # Core Concepts
//!
//! - **TreeEngine**: owns one tree and keeps its derived state consistent
//! - **NodeData**: a single skill with completion, lock state and weight
//! - **TreeData**: the serialized document used for persistence and sharing
//! - **Tree**: generic trait for navigating the hierarchy
//!
//! # Example
//!
//! ```
//! use skill_tree::prelude::*;
//!
//! let mut engine = TreeEngine::new();
//! let root = engine.create_root("Guitar").unwrap();
//! let chords = engine.add_child_node_with_label(&root.id, "Open chords").unwrap();
//! engine.add_child_node_with_label(&chords.id, "Barre chords").unwrap();
//!
//! engine.set_completed(&root.id, true).unwrap();
//!
//! for id in engine.walk(TraversalOrder::PreOrder) {
//!     let node = engine.node(id).unwrap();
//!     println!("{:indent$}{}", "", node, indent = engine.depth(id) * 2);
//! }
//!
//! let json = engine.tree_data().to_json_pretty().unwrap();
//! let data = TreeData::from_json(&json).unwrap();
//! let restored = TreeEngine::from_tree_data(data, EngineOptions::default()).unwrap();
//! assert_eq!(restored.nodes(), engine.nodes());
//! ```

pub mod data;
pub mod engine;
pub mod error;
pub mod events;
pub mod ids;
pub mod options;
pub mod propagation;
mod serde_helpers;
pub mod tree;
pub mod update;
pub mod validation;

pub use data::TreeData;
pub use engine::{TreeEngine, TreeProgress};
pub use error::{InvalidOperation, Result, TreeError, ValidationError};
pub use events::{ListenerId, TreeEvent};
pub use options::EngineOptions;
pub use update::NodeUpdate;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::tree::prelude::*;
    pub use crate::{
        EngineOptions, InvalidOperation, NodeUpdate, TreeData, TreeEngine, TreeError, TreeEvent,
        TreeProgress, ValidationError,
    };
}
