use anyhow::Result;
use skill_tree::prelude::*;
use std::env;
use tree_transfer::{export_document, import, ImportOptions, TransferDocument};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        println!("Usage: merge_documents <base.json> <other.json> [--reset]");
        println!("Merges the tree in <other.json> under the root of <base.json>");
        return Ok(());
    }

    let reset = args[3..].iter().any(|arg| arg == "--reset");

    let base = TransferDocument::from_path(&args[1])?;
    let other = TransferDocument::from_path(&args[2])?;

    let mut engine = TreeEngine::new();
    import(&mut engine, base.into_tree_data(), &ImportOptions::replace())?;
    let report = import(
        &mut engine,
        other.into_tree_data(),
        &ImportOptions::merge().reset_completion(reset),
    )?;

    eprintln!(
        "Merged {} nodes, new top node {}",
        report.imported,
        report
            .root
            .as_ref()
            .map(NodeId::to_string)
            .unwrap_or_default()
    );

    println!("{}", export_document(&engine, None).to_json_pretty()?);
    Ok(())
}
