use anyhow::Result;
use skill_tree::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    let mut engine = TreeEngine::new();
    engine.set_name("Guitar");

    let root = engine.create_root("Guitar")?;
    let chords = engine.add_child_node_with_label(&root.id, "Open chords")?;
    let rhythm = engine.add_child_node_with_label(&root.id, "Rhythm")?;
    engine.add_child_node_with_label(&chords.id, "Barre chords")?;
    engine.add_child_node_with_label(&rhythm.id, "Strumming patterns")?;

    engine.update_node(&chords.id, NodeUpdate::new().weight(3))?;
    engine.set_completed(&root.id, true)?;
    engine.set_completed(&chords.id, true)?;

    println!("Tree: {}", engine.name());
    for id in engine.walk(TraversalOrder::PreOrder) {
        if let Some(node) = engine.node(id) {
            let marker = match (node.completed, node.locked) {
                (true, _) => "x",
                (false, true) => "#",
                (false, false) => " ",
            };
            println!(
                "{:indent$}[{}] {} {}",
                "",
                marker,
                node.label,
                node.subtree_progress,
                indent = engine.depth(id) * 2
            );
        }
    }

    let progress = engine.progress();
    println!(
        "\n{}/{} skills done ({}%), weighted {:.0}%",
        progress.completed_nodes,
        progress.total_nodes,
        progress.percentage,
        progress.weighted * 100.0
    );

    println!("\n{}", engine.tree_data().to_json_pretty()?);
    Ok(())
}
