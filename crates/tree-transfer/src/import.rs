//! Loading external documents into an engine

use anyhow::{bail, Context, Result};
use log::{debug, info};
use skill_tree::ids::IdGenerator;
use skill_tree::tree::{Edge, NodeId, Tree};
use skill_tree::{validation, TreeData, TreeEngine, TreeError};
use std::collections::HashSet;

use crate::remap::{remap_ids, reset_completion, IdMap};

/// Where an imported document ends up
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Replace the engine's tree with the document, ids unchanged
    #[default]
    Replace,
    /// Hang the document's top node under an existing node, with fresh ids
    Attach { parent: NodeId },
    /// Attach under the engine's root, or load into an empty engine
    Merge,
}

/// Options for [`import`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOptions {
    pub mode: ImportMode,
    /// Clear `completed` on every imported node
    pub reset_completion: bool,
}

impl ImportOptions {
    pub fn replace() -> Self {
        Self::default()
    }

    pub fn attach(parent: NodeId) -> Self {
        Self {
            mode: ImportMode::Attach { parent },
            ..Self::default()
        }
    }

    pub fn merge() -> Self {
        Self {
            mode: ImportMode::Merge,
            ..Self::default()
        }
    }

    pub fn reset_completion(mut self, reset: bool) -> Self {
        self.reset_completion = reset;
        self
    }
}

/// Outcome of an import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Id of the imported top node in the engine
    pub root: Option<NodeId>,
    /// Number of imported nodes
    pub imported: usize,
    /// Substitution applied to the document ids, empty for `Replace`
    pub id_map: IdMap,
}

/// Import a document into an engine
///
/// The document is checked before the engine is touched; a failed import
/// leaves the engine unchanged.
pub fn import(
    engine: &mut TreeEngine,
    mut data: TreeData,
    options: &ImportOptions,
) -> Result<ImportReport> {
    if options.reset_completion {
        reset_completion(&mut data);
    }

    match &options.mode {
        ImportMode::Replace => replace(engine, data),
        ImportMode::Attach { parent } => attach(engine, data, Some(parent.clone())),
        ImportMode::Merge => {
            let parent = engine.root().cloned();
            attach(engine, data, parent)
        }
    }
}

fn replace(engine: &mut TreeEngine, data: TreeData) -> Result<ImportReport> {
    validation::validate(&data).context("Imported document is not a valid tree")?;
    let root = data.root_id().cloned();
    let imported = data.len();
    engine
        .load_tree(data)
        .context("Failed to load imported document")?;
    info!("replaced tree with {} imported nodes", imported);
    Ok(ImportReport {
        root,
        imported,
        id_map: IdMap::new(),
    })
}

fn attach(
    engine: &mut TreeEngine,
    mut data: TreeData,
    parent: Option<NodeId>,
) -> Result<ImportReport> {
    if let Some(parent) = &parent {
        if !engine.contains(parent) {
            return Err(TreeError::NotFound(parent.clone()))
                .context("Import target does not exist");
        }
    }

    let Some(top) = detach_top(&mut data)? else {
        debug!("nothing to import");
        return Ok(ImportReport::default());
    };
    validation::validate(&data).context("Imported document is not a valid tree")?;

    let generator = IdGenerator::new(engine.options().id_prefix.clone());
    let (mut remapped, id_map) = remap_ids(&data, &generator);
    let new_top = id_map.translate(&top);
    let imported = remapped.len();

    let merged = match parent {
        Some(parent) => {
            if let Some(node) = remapped.node_data_mut().find(|node| node.id == new_top) {
                node.parent_id = Some(parent.clone());
                node.prerequisites = vec![parent.clone()];
            }
            let mut merged = engine.tree_data();
            merged.nodes.extend(remapped.nodes);
            merged.edges.extend(remapped.edges);
            merged.edges.push(Edge::new(parent.clone(), new_top.clone()).into());
            debug!("attaching {} imported nodes under {}", imported, parent);
            merged
        }
        None => {
            let mut merged = engine.tree_data();
            merged.nodes = remapped.nodes;
            merged.edges = remapped.edges;
            merged
        }
    };

    engine
        .load_tree(merged)
        .context("Failed to load merged tree")?;
    info!("imported {} nodes as {}", imported, new_top);

    Ok(ImportReport {
        root: Some(new_top),
        imported,
        id_map,
    })
}

/// Turn the document's single top node into a root
///
/// The top node is the one whose parent is missing from the document, which
/// covers both full trees and extracted subtrees. References that leave the
/// document are dropped. Returns the top node's id, `None` for an empty
/// document.
fn detach_top(data: &mut TreeData) -> Result<Option<NodeId>> {
    let members: HashSet<NodeId> = data.node_data().map(|node| node.id.clone()).collect();
    let tops: Vec<NodeId> = data
        .node_data()
        .filter(|node| {
            node.parent_id
                .as_ref()
                .map_or(true, |parent| !members.contains(parent))
        })
        .map(|node| node.id.clone())
        .collect();

    let top = match tops.as_slice() {
        [] if members.is_empty() => return Ok(None),
        [top] => top.clone(),
        _ => bail!(
            "Imported document must have exactly one top-level node, found {}",
            tops.len()
        ),
    };

    for node in data.node_data_mut() {
        if node.id == top {
            node.parent_id = None;
        }
        node.prerequisites.retain(|id| members.contains(id));
    }
    data.edges.retain(|edge| {
        members.contains(&edge.data.source) && members.contains(&edge.data.target)
    });

    Ok(Some(top))
}

#[cfg(test)]
mod tests {
    use super::*;
    use skill_tree::tree::NodeData;

    #[test]
    fn test_detach_top_of_subtree() {
        let mut top = NodeData::new(NodeId::new("a"), "A", Some(NodeId::new("outside")));
        top.prerequisites.push(NodeId::new("b"));
        let child = NodeData::new(NodeId::new("b"), "B", Some(NodeId::new("a")));
        let mut data = TreeData::from_parts(
            "Subtree",
            [top, child],
            [
                Edge::new(NodeId::new("outside"), NodeId::new("a")),
                Edge::new(NodeId::new("a"), NodeId::new("b")),
            ],
        );

        assert_eq!(detach_top(&mut data).unwrap(), Some(NodeId::new("a")));
        let top = data.node(&NodeId::new("a")).unwrap();
        assert!(top.is_root());
        assert_eq!(top.prerequisites, vec![NodeId::new("b")]);
        assert_eq!(data.edges.len(), 1);
    }

    #[test]
    fn test_detach_top_rejects_forests() {
        let mut data = TreeData::from_parts(
            "forest",
            [
                NodeData::new(NodeId::new("a"), "A", None),
                NodeData::new(NodeId::new("b"), "B", None),
            ],
            [],
        );
        let err = detach_top(&mut data).unwrap_err();
        assert!(err.to_string().contains("exactly one top-level node"));
    }

    #[test]
    fn test_detach_top_of_empty_document() {
        let mut data = TreeData::new("empty");
        assert_eq!(detach_top(&mut data).unwrap(), None);
    }
}
