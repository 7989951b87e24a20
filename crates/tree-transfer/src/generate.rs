//! Grafting generated candidate trees into an engine
//!
//! A content generator proposes nodes with its own local ids. Grafting
//! creates real nodes through the engine, so every node gets an engine id,
//! default lock state and recomputed completion.

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use skill_tree::tree::{IconData, NodeId, Tree, Weight};
use skill_tree::{NodeUpdate, TreeEngine};
use std::collections::{HashMap, HashSet, VecDeque};

use crate::remap::IdMap;

/// A node proposed by a generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedNode {
    /// Local id, only meaningful within the candidate tree
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Local id of the parent, `None` for the candidate root
    #[serde(default, alias = "parentId")]
    pub parent: Option<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub weight: Option<Weight>,
    #[serde(default)]
    pub icon_data: Option<IconData>,
}

impl GeneratedNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, parent: Option<&str>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            parent: parent.map(str::to_string),
            prerequisites: Vec::new(),
            weight: None,
            icon_data: None,
        }
    }

    fn update(&self) -> NodeUpdate {
        let mut update = NodeUpdate::new();
        update.description = self.description.clone();
        update.weight = self.weight;
        if let Some(icon) = &self.icon_data {
            update = update.icon_data(Some(icon.clone()));
        }
        update
    }
}

/// A candidate tree with local ids
///
/// Extra fields such as `edges` or derived progress are ignored; structure
/// comes from each node's `parent`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedTree {
    pub nodes: Vec<GeneratedNode>,
}

impl GeneratedTree {
    pub fn new(nodes: Vec<GeneratedNode>) -> Self {
        Self { nodes }
    }

    /// Parse a candidate tree from a generator response
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse generated tree")
    }

    /// Check the candidate structure and return local ids parents-first
    ///
    /// Requires unique local ids, exactly one root, known parents and no
    /// parent cycles.
    pub fn check(&self) -> Result<Vec<&GeneratedNode>> {
        let mut by_id: HashMap<&str, &GeneratedNode> = HashMap::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if by_id.insert(node.id.as_str(), node).is_some() {
                bail!("Generated tree repeats local id {}", node.id);
            }
        }

        let mut root = None;
        let mut children: HashMap<&str, Vec<&GeneratedNode>> = HashMap::new();
        for node in &self.nodes {
            match node.parent.as_deref() {
                None if root.is_some() => bail!("Generated tree has more than one root"),
                None => root = Some(node),
                Some(parent) if !by_id.contains_key(parent) => {
                    bail!("Generated node {} has unknown parent {}", node.id, parent)
                }
                Some(parent) => children.entry(parent).or_default().push(node),
            }
        }
        let root = root.ok_or_else(|| anyhow!("Generated tree has no root"))?;

        let mut ordered = Vec::with_capacity(self.nodes.len());
        let mut queue = VecDeque::from([root]);
        while let Some(node) = queue.pop_front() {
            ordered.push(node);
            if let Some(kids) = children.get(node.id.as_str()) {
                queue.extend(kids.iter().copied());
            }
        }
        if ordered.len() != self.nodes.len() {
            let reached: HashSet<&str> = ordered.iter().map(|node| node.id.as_str()).collect();
            let stuck = self
                .nodes
                .iter()
                .find(|node| !reached.contains(node.id.as_str()))
                .map(|node| node.id.as_str())
                .unwrap_or_default();
            bail!("Generated node {} is part of a parent cycle", stuck);
        }

        Ok(ordered)
    }

    /// Create the candidate nodes in an engine
    ///
    /// With a `parent` the candidate root becomes its child. Without one the
    /// candidate root becomes the root of an empty engine, or a child of the
    /// existing root. Returns the local -> engine id map.
    pub fn graft(&self, engine: &mut TreeEngine, parent: Option<&NodeId>) -> Result<IdMap> {
        let ordered = self.check()?;
        let anchor = match parent {
            Some(parent) if !engine.contains(parent) => {
                bail!("Graft target {} does not exist", parent)
            }
            Some(parent) => Some(parent.clone()),
            None => engine.root().cloned(),
        };

        let mut ids = IdMap::new();
        for node in ordered {
            let local = NodeId::new(node.id.as_str());
            let created = match node.parent.as_deref() {
                Some(local_parent) => {
                    let parent = ids.translate(&NodeId::new(local_parent));
                    engine.add_child_node_with_label(&parent, node.label.as_str())?
                }
                None => match &anchor {
                    Some(anchor) => engine.add_child_node_with_label(anchor, node.label.as_str())?,
                    None => engine.create_root(node.label.as_str())?,
                },
            };
            engine
                .update_node(&created.id, node.update())
                .with_context(|| format!("Failed to apply generated fields of {}", node.id))?;
            ids.insert(local, created.id);
        }

        self.link_prerequisites(engine, &ids)?;
        debug!("grafted {} generated nodes", ids.len());
        Ok(ids)
    }

    /// Add prerequisites beyond the parent link, translated to engine ids
    fn link_prerequisites(&self, engine: &mut TreeEngine, ids: &IdMap) -> Result<()> {
        for node in &self.nodes {
            let Some(id) = ids.get(&NodeId::new(node.id.as_str())) else {
                continue;
            };
            let Some(current) = engine.node(id) else {
                continue;
            };

            let mut prerequisites = current.prerequisites.clone();
            for local in &node.prerequisites {
                match ids.get(&NodeId::new(local.as_str())) {
                    Some(extra) if extra != id && !prerequisites.contains(extra) => {
                        prerequisites.push(extra.clone());
                    }
                    Some(_) => {}
                    None => warn!("dropping unknown generated prerequisite {}", local),
                }
            }

            if prerequisites != current.prerequisites {
                engine.update_node(id, NodeUpdate::new().prerequisites(prerequisites))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_orders_parents_first() {
        let tree = GeneratedTree::new(vec![
            GeneratedNode::new("b", "B", Some("a")),
            GeneratedNode::new("a", "A", Some("root")),
            GeneratedNode::new("root", "Root", None),
        ]);
        let order: Vec<_> = tree.check().unwrap().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(order, vec!["root", "a", "b"]);
    }

    #[test]
    fn test_check_rejects_bad_candidates() {
        let duplicate = GeneratedTree::new(vec![
            GeneratedNode::new("a", "A", None),
            GeneratedNode::new("a", "A2", None),
        ]);
        assert!(duplicate.check().unwrap_err().to_string().contains("repeats"));

        let unknown = GeneratedTree::new(vec![
            GeneratedNode::new("a", "A", None),
            GeneratedNode::new("b", "B", Some("ghost")),
        ]);
        assert!(unknown.check().unwrap_err().to_string().contains("unknown parent"));

        let cycle = GeneratedTree::new(vec![
            GeneratedNode::new("r", "R", None),
            GeneratedNode::new("a", "A", Some("b")),
            GeneratedNode::new("b", "B", Some("a")),
        ]);
        assert_eq!(
            cycle.check().unwrap_err().to_string(),
            "Generated node a is part of a parent cycle"
        );

        let rootless = GeneratedTree::new(vec![GeneratedNode::new("a", "A", Some("a"))]);
        assert_eq!(
            rootless.check().unwrap_err().to_string(),
            "Generated tree has no root"
        );
    }

    #[test]
    fn test_parse_generator_response() {
        let tree = GeneratedTree::parse(
            r##"{
                "nodes": [
                    {"id": "1", "label": "Chess", "parent": null, "weight": 5, "locked": false},
                    {"id": "2", "label": "Openings", "parentId": "1", "prerequisites": ["1"],
                     "iconData": {"type": "emoji", "icon": "♟", "color": "#6366f1"}}
                ],
                "edges": [{"group": "edges", "data": {"id": "e", "source": "1", "target": "2"}}]
            }"##,
        )
        .unwrap();
        assert_eq!(tree.nodes.len(), 2);
        assert_eq!(tree.nodes[0].weight, Some(Weight::new(5)));
        assert_eq!(tree.nodes[1].parent.as_deref(), Some("1"));
    }
}
