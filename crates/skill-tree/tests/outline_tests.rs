use skill_tree::prelude::*;

/// Render the tree as an indented outline without ids
fn outline(engine: &TreeEngine) -> String {
    engine
        .walk(TraversalOrder::PreOrder)
        .filter_map(|id| {
            let node = engine.node(id)?;
            let state = if node.is_header {
                "-"
            } else if node.completed {
                "x"
            } else if node.locked {
                "#"
            } else {
                " "
            };
            Some(format!(
                "{:indent$}[{}] {} w{} {}",
                "",
                state,
                node.label,
                node.weight,
                node.subtree_progress,
                indent = engine.depth(id) * 2
            ))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn language_tree() -> (TreeEngine, NodeId, NodeId, NodeId) {
    let mut engine = TreeEngine::new();
    let root = engine.create_root("Languages").unwrap().id;
    let rust = engine.add_child_node_with_label(&root, "Rust").unwrap().id;
    let ownership = engine
        .add_child_node_with_label(&rust, "Ownership")
        .unwrap()
        .id;
    engine.add_child_node_with_label(&rust, "Traits").unwrap();
    let tooling = engine.add_child_node_with_label(&root, "Tooling").unwrap().id;
    engine.add_child_node_with_label(&tooling, "Cargo").unwrap();
    (engine, root, rust, ownership)
}

#[test]
fn test_fresh_tree_outline() {
    let (engine, _, _, _) = language_tree();
    insta::assert_snapshot!(outline(&engine), @r###"
    [ ] Languages w5 0/10
      [#] Rust w1 0/3
        [#] Ownership w1 0/1
        [#] Traits w1 0/1
      [#] Tooling w1 0/2
        [#] Cargo w1 0/1
    "###);
}

#[test]
fn test_progress_outline() {
    let (mut engine, root, rust, ownership) = language_tree();
    engine.set_completed(&root, true).unwrap();
    engine
        .update_node(&rust, NodeUpdate::new().completed(true).weight(3))
        .unwrap();
    engine.set_completed(&ownership, true).unwrap();

    insta::assert_snapshot!(outline(&engine), @r###"
    [x] Languages w5 9/12
      [x] Rust w3 4/5
        [x] Ownership w1 1/1
        [ ] Traits w1 0/1
      [ ] Tooling w1 0/2
        [#] Cargo w1 0/1
    "###);
}

#[test]
fn test_reparent_and_header_outline() {
    let (mut engine, root, rust, ownership) = language_tree();
    let tooling = engine.find_by_label("Tooling").unwrap();
    engine.reparent_node(&ownership, &tooling).unwrap();
    engine
        .update_node(&rust, NodeUpdate::new().is_header(true))
        .unwrap();
    engine.set_completed(&root, true).unwrap();

    insta::assert_snapshot!(outline(&engine), @r###"
    [x] Languages w5 5/10
      [-] Rust w1 0/2
        [#] Traits w1 0/1
      [ ] Tooling w1 0/3
        [#] Cargo w1 0/1
        [#] Ownership w1 0/1
    "###);
}
