//! Reading and writing transfer documents

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skill_tree::tree::Tree;
use skill_tree::{TreeData, TreeEngine};
use std::fs;
use std::path::Path;

/// Encoding of an exported document
///
/// Only plain JSON is written or read; any other tag fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
}

/// A tree document as exchanged between users
///
/// Plain tree documents parse as well; the export fields are then `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferDocument {
    #[serde(flatten)]
    pub tree: TreeData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_format: Option<ExportFormat>,
}

impl TransferDocument {
    /// Parse a document from JSON
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse tree document")
    }

    /// Read and parse a document file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read tree document {}", path.display()))?;
        Self::parse(&json).with_context(|| format!("Invalid tree document {}", path.display()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize tree document")
    }

    /// Write the document as pretty JSON
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json_pretty()?)
            .with_context(|| format!("Failed to write tree document {}", path.display()))
    }

    pub fn into_tree_data(self) -> TreeData {
        self.tree
    }
}

impl From<TreeData> for TransferDocument {
    fn from(tree: TreeData) -> Self {
        Self {
            tree,
            exported_at: None,
            export_format: None,
        }
    }
}

/// Export an engine's tree stamped with the current time
pub fn export_document(engine: &TreeEngine, name: Option<&str>) -> TransferDocument {
    export_document_at(engine, name, Utc::now())
}

/// Export an engine's tree with an explicit export time
///
/// The root id is recorded under `rootId` in the document metadata.
pub fn export_document_at(
    engine: &TreeEngine,
    name: Option<&str>,
    exported_at: DateTime<Utc>,
) -> TransferDocument {
    let mut tree = engine.tree_data();
    if let Some(name) = name {
        tree.name = name.to_string();
    }
    if let Some(root) = engine.root() {
        tree.metadata
            .insert("rootId".to_string(), root.as_str().into());
    }

    TransferDocument {
        tree,
        exported_at: Some(exported_at),
        export_format: Some(ExportFormat::Json),
    }
}
