//! Error types for graph construction and resolution

use crate::model::ValueKind;
use thiserror::Error;

/// Faults raised while parsing a document into a graph or while resolving
/// references through a parsed graph. None of them are retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("found '$ref' property at '{path}' but it did not have a string value")]
    MalformedReference { path: String },

    #[error("reference chain starting at '{path}' never reaches a concrete value: {}", .chain.join(" -> "))]
    UnresolvedReferenceCycle { path: String, chain: Vec<String> },

    #[error("referenced node no longer exists")]
    DanglingReference,

    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("object at '{path}' has more than one member named '{name}'")]
    DuplicateMember { path: String, name: String },

    #[error("invalid JSON pointer '{pointer}': {reason}")]
    InvalidPointer { pointer: String, reason: String },

    #[error("JSON pointer '{pointer}' does not address a value in the document")]
    UnresolvedPointer { pointer: String },

    #[error("expected {expected} value but found {found}")]
    TypeMismatch { expected: ValueKind, found: ValueKind },

    #[error("graph node has already been populated")]
    AlreadyPopulated,
}

pub type GraphResult<T> = Result<T, GraphError>;
