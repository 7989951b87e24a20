use pretty_assertions::assert_eq;
use skill_tree::prelude::*;
use tree_transfer::{GeneratedNode, GeneratedTree};

const RESPONSE: &str = r##"{
    "nodes": [
        {"id": "root", "label": "Photography", "description": "Taking better pictures", "parent": null, "weight": 5,
         "iconData": {"type": "emoji", "icon": "📷", "color": "#6366f1"}},
        {"id": "exposure", "label": "Exposure", "parent": "root", "prerequisites": ["root"], "weight": 3},
        {"id": "composition", "label": "Composition", "parent": "root", "prerequisites": ["root"], "weight": 2},
        {"id": "night", "label": "Night shots", "parent": "exposure", "prerequisites": ["exposure", "composition", "tripod"], "weight": 8}
    ],
    "edges": []
}"##;

fn outline(engine: &TreeEngine) -> String {
    engine
        .walk(TraversalOrder::PreOrder)
        .filter_map(|id| engine.node(id).map(|node| (id, node)))
        .map(|(id, node)| {
            format!(
                "{:indent$}{} w{} {}{}",
                "",
                node.label,
                node.weight,
                node.subtree_progress,
                if node.locked { " locked" } else { "" },
                indent = engine.depth(id) * 2
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_graft_into_empty_engine() {
    let generated = GeneratedTree::parse(RESPONSE).unwrap();
    let mut engine = TreeEngine::new();

    let ids = generated.graft(&mut engine, None).unwrap();

    assert_eq!(ids.len(), 4);
    insta::assert_snapshot!(outline(&engine), @r###"
    Photography w5 0/18
      Exposure w3 0/11 locked
        Night shots w8 0/8 locked
      Composition w2 0/2 locked
    "###);

    let root = engine.node(ids.get(&NodeId::new("root")).unwrap()).unwrap();
    assert_eq!(root.description, "Taking better pictures");
    assert_eq!(root.icon_data.as_ref().map(|icon| icon.icon.as_str()), Some("📷"));

    let night = engine.node(ids.get(&NodeId::new("night")).unwrap()).unwrap();
    assert_eq!(
        night.prerequisites,
        vec![
            ids.get(&NodeId::new("exposure")).unwrap().clone(),
            ids.get(&NodeId::new("composition")).unwrap().clone(),
        ]
    );
    assert_eq!(
        night.icon_data.as_ref().and_then(|icon| icon.color()),
        Some("#6366f1")
    );
}

#[test]
fn test_graft_under_existing_node() {
    let generated = GeneratedTree::parse(RESPONSE).unwrap();
    let mut engine = TreeEngine::new();
    let hobbies = engine.create_root("Hobbies").unwrap().id;
    engine.set_completed(&hobbies, true).unwrap();

    let ids = generated.graft(&mut engine, Some(&hobbies)).unwrap();

    let photography = ids.get(&NodeId::new("root")).unwrap();
    assert_eq!(engine.parent(photography), Some(&hobbies));
    assert!(!engine.node(photography).unwrap().locked);
    assert_eq!(engine.len(), 5);
    assert_eq!(
        engine.node(&hobbies).unwrap().subtree_progress,
        SubtreeProgress::new(5, 23)
    );
}

#[test]
fn test_graft_rejects_invalid_candidates_before_touching_engine() {
    let generated = GeneratedTree::new(vec![
        GeneratedNode::new("a", "A", None),
        GeneratedNode::new("b", "B", Some("missing")),
    ]);
    let mut engine = TreeEngine::new();
    engine.create_root("Root").unwrap();
    let before = engine.tree_data();

    assert!(generated.graft(&mut engine, None).is_err());
    assert_eq!(engine.tree_data(), before);

    let valid = GeneratedTree::new(vec![GeneratedNode::new("a", "A", None)]);
    let err = valid
        .graft(&mut engine, Some(&NodeId::new("nope")))
        .unwrap_err();
    assert_eq!(err.to_string(), "Graft target nope does not exist");
    assert_eq!(engine.tree_data(), before);
}
