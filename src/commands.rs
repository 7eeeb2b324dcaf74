//! CLI command implementations

use refgraph_core::{Graph, GraphAdapter, GraphResult, ValueAdapter, ValueKind};
use refgraph_loader::{DocumentFormat, load_document, load_document_as};
use std::path::Path;

fn load(file: &Path, format: Option<DocumentFormat>) -> anyhow::Result<Graph> {
    tracing::info!("Loading document: {}", file.display());
    match format {
        Some(format) => load_document_as(file, format),
        None => load_document(file),
    }
}

pub fn check(file: &Path, format: Option<DocumentFormat>, json: bool) -> anyhow::Result<()> {
    let graph = load(file, format)?;
    let stats = graph.stats();

    tracing::info!(
        "Resolved {} concrete nodes, {} references",
        stats.concrete_nodes(),
        stats.references
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("root: {}", graph.adapter().kind()?);
        println!("concrete nodes: {}", stats.concrete_nodes());
        println!("  objects: {}", stats.objects);
        println!("  arrays: {}", stats.arrays);
        println!("  strings: {}", stats.strings);
        println!("  integers: {}", stats.integers);
        println!("  doubles: {}", stats.doubles);
        println!("  bools: {}", stats.bools);
        println!("  nulls: {}", stats.nulls);
        println!("references: {}", stats.references);
        println!("shared nodes: {}", stats.shared_nodes);
    }

    Ok(())
}

pub fn get(file: &Path, format: Option<DocumentFormat>, pointer: &str) -> anyhow::Result<()> {
    let graph = load(file, format)?;
    let value = graph.adapter().pointer(pointer)?;

    println!("{}", describe(&value)?);
    Ok(())
}

/// One-line description of a resolved value.
fn describe(value: &GraphAdapter) -> GraphResult<String> {
    Ok(match value.kind()? {
        ValueKind::Null => "null".to_string(),
        ValueKind::Bool => format!("bool {}", value.get_bool()?),
        ValueKind::Integer => format!("integer {}", value.get_integer()?),
        ValueKind::Double => format!("double {}", value.get_double()?),
        ValueKind::String => format!("string {:?}", value.get_string()?),
        ValueKind::Array => format!("array of {} elements", value.array()?.len()),
        ValueKind::Object => {
            let object = value.object()?;
            let names: Vec<&str> = object.iter().map(|(name, _)| name).collect();
            format!("object with {} members: {}", object.len(), names.join(", "))
        }
    })
}
