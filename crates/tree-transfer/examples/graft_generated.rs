use anyhow::Result;
use skill_tree::prelude::*;
use tree_transfer::{GeneratedNode, GeneratedTree};

fn main() -> Result<()> {
    env_logger::init();

    let mut engine = TreeEngine::new();
    let root = engine.create_root("Hobbies")?.id;

    let mut baking = GeneratedNode::new("1", "Baking", None);
    baking.weight = Some(Weight::new(4));
    baking.icon_data = Some(IconData::emoji("🍞").with_color("#f59e0b"));
    let mut sourdough = GeneratedNode::new("3", "Sourdough", Some("1"));
    sourdough.prerequisites = vec!["1".to_string(), "2".to_string()];
    sourdough.weight = Some(Weight::new(7));

    let candidate = GeneratedTree::new(vec![
        baking,
        GeneratedNode::new("2", "Kneading", Some("1")),
        sourdough,
    ]);

    let ids = candidate.graft(&mut engine, Some(&root))?;
    for (local, id) in ids.iter() {
        println!("{} -> {}", local, id);
    }

    for id in engine.walk(TraversalOrder::PreOrder) {
        if let Some(node) = engine.node(id) {
            println!(
                "{:indent$}{} {}",
                "",
                node.label,
                node.subtree_progress,
                indent = engine.depth(id) * 2
            );
        }
    }
    Ok(())
}
