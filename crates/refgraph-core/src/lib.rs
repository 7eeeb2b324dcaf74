//! Refgraph Core: JSON-like documents with resolved `$ref` links
//!
//! A document is parsed into a graph of shared nodes in which every JSON
//! Reference becomes a weak link to the node it names, and is then read back
//! through the same capability set the document was read with.

pub mod adapter;
pub mod document;
pub mod error;
pub mod graph;
pub mod model;
pub mod parser;
pub mod pointer;
pub mod stats;


#[cfg(test)]
pub mod test_utils;

pub use adapter::{FrozenGraphValue, GraphAdapter, GraphArray, GraphArrayIter, GraphObject, GraphObjectIter};
pub use document::ValueAdapter;
pub use error::{GraphError, GraphResult};
pub use graph::Graph;
pub use model::{Array, GraphNode, NodeRef, NodeValue, Object, Reference, Resolvable, ValueKind};
pub use parser::GraphParser;
pub use pointer::{JsonPointer, JsonReference, escape_segment};
pub use stats::GraphStats;
