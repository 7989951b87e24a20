use anyhow::{Context, Result};
use skill_tree::prelude::*;
use std::env;
use std::fs;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("Usage: load_document <tree.json>");
        return Ok(());
    }

    let path = &args[1];
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let data = TreeData::from_json(&json).with_context(|| format!("Failed to parse {}", path))?;
    let engine = TreeEngine::from_tree_data(data, EngineOptions::default())
        .with_context(|| format!("Invalid tree in {}", path))?;

    println!("{} ({} nodes)", engine.name(), engine.len());
    for id in engine.walk(TraversalOrder::PreOrder) {
        if let Some(node) = engine.node(id) {
            println!(
                "{:indent$}{} {:.0}%{}",
                "",
                node.label,
                node.subtree_completion * 100.0,
                if node.locked { " (locked)" } else { "" },
                indent = engine.depth(id) * 2
            );
        }
    }

    let unlocked: Vec<_> = engine
        .find(|node| !node.locked && !node.completed && !node.is_header)
        .into_iter()
        .filter_map(|id| engine.label(&id).map(str::to_string))
        .collect();
    println!("\nReady to learn: {}", unlocked.join(", "));
    Ok(())
}
