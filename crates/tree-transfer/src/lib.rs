//! Moving skill trees in and out of a [`TreeEngine`](skill_tree::TreeEngine)
//!
//! This crate provides the import/merge and generation flows that sit on top
//! of the engine's public API:
//!
//! - **TransferDocument**: parse, read and write exported tree documents
//! - **remap_ids**: give an imported document fresh ids
//! - **import**: replace the tree, attach a document under a node, or merge
//! - **copy_subtree**: copy a skillset from one tree into another
//! - **GeneratedTree**: graft a generator's candidate tree with local ids
//!
//! # Example
//!
//! ```
//! use skill_tree::TreeEngine;
//! use tree_transfer::{copy_subtree, export_document};
//!
//! let mut shared = TreeEngine::new();
//! let root = shared.create_root("Chess").unwrap().id;
//! let openings = shared.add_child_node_with_label(&root, "Openings").unwrap().id;
//!
//! let mut mine = TreeEngine::new();
//! let my_root = mine.create_root("My skills").unwrap().id;
//! let report = copy_subtree(&shared, &openings, &mut mine, &my_root).unwrap();
//! assert_eq!(report.imported, 1);
//! assert_eq!(mine.len(), 2);
//!
//! let json = export_document(&mine, None).to_json_pretty().unwrap();
//! assert!(json.contains("exportedAt"));
//! ```

mod copy;
mod document;
mod generate;
mod import;
mod remap;

pub use copy::copy_subtree;
pub use document::{export_document, export_document_at, ExportFormat, TransferDocument};
pub use generate::{GeneratedNode, GeneratedTree};
pub use import::{import, ImportMode, ImportOptions, ImportReport};
pub use remap::{remap_ids, reset_completion, IdMap};
