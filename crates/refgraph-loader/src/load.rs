//! Load documents from disk and parse them into reference graphs

use std::path::Path;

use anyhow::Context;
use refgraph_core::{Graph, GraphParser};

use crate::json::SerdeJsonAdapter;
use crate::yaml::SerdeYamlAdapter;

/// Text format of a document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Detect format from file extension. Unknown extensions are read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }
}

/// Parse document text and resolve its references.
pub fn parse_str(text: &str, format: DocumentFormat) -> anyhow::Result<Graph> {
    let parser = GraphParser::new();
    let graph = match format {
        DocumentFormat::Json => {
            let value: serde_json::Value =
                serde_json::from_str(text).context("Failed to parse JSON document")?;
            parser.parse(&SerdeJsonAdapter::new(&value))?
        }
        DocumentFormat::Yaml => {
            let value: serde_yaml::Value =
                serde_yaml::from_str(text).context("Failed to parse YAML document")?;
            parser.parse(&SerdeYamlAdapter::new(&value))?
        }
    };
    Ok(graph)
}

/// Load a document, choosing the format from the file extension.
pub fn load_document(path: &Path) -> anyhow::Result<Graph> {
    load_document_as(path, DocumentFormat::from_path(path))
}

pub fn load_document_as(path: &Path, format: DocumentFormat) -> anyhow::Result<Graph> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to load document from file '{}'", path.display()))?;

    tracing::debug!("Loaded {} bytes from {} as {:?}", text.len(), path.display(), format);

    parse_str(&text, format)
        .with_context(|| format!("Failed to build graph from '{}'", path.display()))
}
