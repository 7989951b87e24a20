use pretty_assertions::assert_eq;
use skill_tree::prelude::*;
use std::collections::HashSet;
use tree_transfer::{
    copy_subtree, export_document, import, remap_ids, ImportOptions, TransferDocument,
};

fn shared_tree() -> (TreeEngine, NodeId, NodeId) {
    let mut engine = TreeEngine::new();
    let root = engine.create_root("Chess").unwrap().id;
    let openings = engine
        .add_child_node_with_label(&root, "Openings")
        .unwrap()
        .id;
    engine
        .add_child_node_with_label(&openings, "Sicilian")
        .unwrap();
    engine.add_child_node_with_label(&root, "Endgames").unwrap();
    engine.set_completed(&root, true).unwrap();
    engine.set_completed(&openings, true).unwrap();
    (engine, root, openings)
}

fn labels(engine: &TreeEngine) -> Vec<String> {
    engine
        .walk(TraversalOrder::PreOrder)
        .map(|id| format!("{}{}", "  ".repeat(engine.depth(id)), engine.label(id).unwrap_or("")))
        .collect()
}

#[test]
fn test_replace_keeps_ids() {
    let (source, root, _) = shared_tree();
    let mut target = TreeEngine::new();
    target.create_root("Old").unwrap();

    let report = import(&mut target, source.tree_data(), &ImportOptions::replace()).unwrap();

    assert_eq!(report.root, Some(root));
    assert_eq!(report.imported, 4);
    assert!(report.id_map.is_empty());
    assert_eq!(target.tree_data(), source.tree_data());
}

#[test]
fn test_attach_remaps_and_relocks() {
    let (source, source_root, _) = shared_tree();
    let mut target = TreeEngine::new();
    let my_root = target.create_root("Me").unwrap().id;

    let report = import(
        &mut target,
        source.tree_data(),
        &ImportOptions::attach(my_root.clone()).reset_completion(true),
    )
    .unwrap();

    let attached = report.root.clone().unwrap();
    assert_eq!(report.imported, 4);
    assert_eq!(report.id_map.get(&source_root), Some(&attached));
    assert_eq!(target.len(), 5);

    let node = target.node(&attached).unwrap();
    assert_eq!(node.parent_id, Some(my_root.clone()));
    assert_eq!(node.prerequisites, vec![my_root.clone()]);
    assert!(node.locked);
    assert!(target.nodes().iter().all(|n| !n.completed));

    let source_ids: HashSet<_> = source.nodes().iter().map(|n| n.id.clone()).collect();
    assert!(target.nodes().iter().all(|n| !source_ids.contains(&n.id)));

    assert_eq!(
        labels(&target),
        vec!["Me", "  Chess", "    Openings", "      Sicilian", "    Endgames"]
    );
}

#[test]
fn test_merge_into_empty_engine() {
    let (source, _, _) = shared_tree();
    let mut target = TreeEngine::new();

    let report = import(&mut target, source.tree_data(), &ImportOptions::merge()).unwrap();

    assert_eq!(target.len(), 4);
    assert_eq!(target.root(), report.root.as_ref());
    assert_eq!(labels(&target), labels(&source));
    assert_eq!(target.progress(), source.progress());
}

#[test]
fn test_merge_under_existing_root() {
    let (source, _, _) = shared_tree();
    let mut target = TreeEngine::new();
    let my_root = target.create_root("Me").unwrap().id;

    import(&mut target, source.tree_data(), &ImportOptions::merge()).unwrap();
    import(&mut target, source.tree_data(), &ImportOptions::merge()).unwrap();

    assert_eq!(target.len(), 9);
    assert_eq!(target.child_count(&my_root), 2);
}

#[test]
fn test_validation_reason_survives_context() {
    use anyhow::Context;

    let err = TreeData::from_json(r#"{"nodes": 3}"#)
        .context("Failed to read shared tree")
        .unwrap_err();
    assert_eq!(err.chain().count(), 3);
    assert!(err
        .chain()
        .any(|cause| matches!(
            cause.downcast_ref::<ValidationError>(),
            Some(ValidationError::Malformed(_))
        )));
}

#[test]
fn test_failed_import_leaves_engine_alone() {
    let (source, _, _) = shared_tree();
    let mut target = TreeEngine::new();
    target.create_root("Me").unwrap();
    let before = target.tree_data();

    let err = import(
        &mut target,
        source.tree_data(),
        &ImportOptions::attach(NodeId::new("missing")),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Import target does not exist");
    assert_eq!(target.tree_data(), before);

    let mut broken = source.tree_data();
    broken.nodes[1].data.parent_id = Some(NodeId::new("ghost"));
    assert!(import(&mut target, broken, &ImportOptions::merge()).is_err());
    assert_eq!(target.tree_data(), before);
}

#[test]
fn test_copy_subtree_keeps_progress() {
    let (source, _, openings) = shared_tree();
    let mut target = TreeEngine::new();
    let my_root = target.create_root("Me").unwrap().id;
    target.set_completed(&my_root, true).unwrap();

    let report = copy_subtree(&source, &openings, &mut target, &my_root).unwrap();

    assert_eq!(report.imported, 2);
    let copied = target.node(report.root.as_ref().unwrap()).unwrap();
    assert_eq!(copied.label, "Openings");
    assert!(copied.completed);
    assert!(!copied.locked);
    assert_eq!(copied.subtree_progress, SubtreeProgress::new(1, 2));
    assert_eq!(source.len(), 4);

    assert!(copy_subtree(&source, &NodeId::new("nope"), &mut target, &my_root).is_err());
}

#[test]
fn test_remap_twice_gives_distinct_ids() {
    let (source, _, _) = shared_tree();
    let generator = skill_tree::ids::IdGenerator::default();
    let (first, _) = remap_ids(&source.tree_data(), &generator);
    let (second, _) = remap_ids(&source.tree_data(), &generator);

    let first_ids: HashSet<_> = first.node_data().map(|n| n.id.clone()).collect();
    assert!(second.node_data().all(|n| !first_ids.contains(&n.id)));
}

#[test]
fn test_document_file_round_trip() {
    let (source, root, _) = shared_tree();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chess.json");

    export_document(&source, Some("Chess export"))
        .write_to(&path)
        .unwrap();
    let doc = TransferDocument::from_path(&path).unwrap();

    assert!(doc.exported_at.is_some());
    assert_eq!(doc.tree.name, "Chess export");
    assert_eq!(doc.tree.metadata["rootId"], root.as_str());

    let mut restored = TreeEngine::new();
    import(&mut restored, doc.into_tree_data(), &ImportOptions::replace()).unwrap();
    assert_eq!(restored.nodes(), source.nodes());
}

#[test]
fn test_missing_file_has_context() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");
    let err = TransferDocument::from_path(&path).unwrap_err();
    assert!(err.to_string().starts_with("Failed to read tree document"));
}
