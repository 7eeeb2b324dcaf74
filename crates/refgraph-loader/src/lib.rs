//! Document providers and file loading for refgraph
//!
//! Wraps `serde_json` and `serde_yaml` values in the read-only capability
//! set that the graph parser consumes, and loads documents from disk.

pub mod json;
pub mod load;
pub mod yaml;


pub use json::SerdeJsonAdapter;
pub use load::{DocumentFormat, load_document, load_document_as, parse_str};
pub use yaml::SerdeYamlAdapter;
