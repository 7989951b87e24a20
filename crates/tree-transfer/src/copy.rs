use anyhow::{Context, Result};
use skill_tree::tree::NodeId;
use skill_tree::TreeEngine;

use crate::import::{import, ImportOptions, ImportReport};

/// Copy a node and its subtree from one engine under a node of another
///
/// The copies get fresh ids; completion state is carried over. Source and
/// target may hold the same tree as long as they are separate engines.
pub fn copy_subtree(
    source: &TreeEngine,
    node: &NodeId,
    target: &mut TreeEngine,
    parent: &NodeId,
) -> Result<ImportReport> {
    let subtree = source
        .subtree_data(node)
        .with_context(|| format!("Failed to extract subtree at {}", node))?;
    import(target, subtree, &ImportOptions::attach(parent.clone()))
        .with_context(|| format!("Failed to copy subtree {} under {}", node, parent))
}
