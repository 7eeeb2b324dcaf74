//! Core data structures for the reference graph

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use serde::Serialize;

use crate::error::{GraphError, GraphResult};

/// Shared, owning handle to a node. A node lives as long as its longest-lived owner.
pub type NodeRef = Arc<GraphNode>;

/// Ordered sequence of owned child handles.
pub type Array = Vec<NodeRef>;

/// Member name to owned child handle. Iterates in key order.
pub type Object = BTreeMap<String, NodeRef>;

/// Non-owning link to another node.
pub type Reference = Weak<GraphNode>;

/// The kinds of concrete value a node can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    Bool,
    Integer,
    Double,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Integer => "integer",
            ValueKind::Double => "double",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value held by a populated node.
#[derive(Debug, Clone)]
pub enum NodeValue {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Array(Array),
    Object(Object),
    Reference(Reference),
}

impl NodeValue {
    /// Kind of a concrete value; `None` for a reference.
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            NodeValue::Null => Some(ValueKind::Null),
            NodeValue::Bool(_) => Some(ValueKind::Bool),
            NodeValue::Integer(_) => Some(ValueKind::Integer),
            NodeValue::Double(_) => Some(ValueKind::Double),
            NodeValue::String(_) => Some(ValueKind::String),
            NodeValue::Array(_) => Some(ValueKind::Array),
            NodeValue::Object(_) => Some(ValueKind::Object),
            NodeValue::Reference(_) => None,
        }
    }
}

static NULL: NodeValue = NodeValue::Null;

/// A single cell in the graph.
///
/// The cell is written at most once. An unpopulated cell is a placeholder
/// created by the parser before its children are known, and reads as null.
/// Reference cells are followed transparently by every `resolve*` call.
#[derive(Debug, Default)]
pub struct GraphNode {
    value: OnceLock<NodeValue>,
}

impl GraphNode {
    /// An unpopulated placeholder.
    pub fn empty() -> Self {
        GraphNode {
            value: OnceLock::new(),
        }
    }

    pub fn new(value: NodeValue) -> Self {
        GraphNode {
            value: OnceLock::from(value),
        }
    }

    /// A node holding a weak link to `target`.
    pub fn reference(target: &NodeRef) -> Self {
        Self::new(NodeValue::Reference(Arc::downgrade(target)))
    }

    /// The raw value without following references.
    pub fn value(&self) -> Option<&NodeValue> {
        self.value.get()
    }

    /// True for placeholders and explicit nulls. Does not follow references.
    pub fn is_empty(&self) -> bool {
        matches!(self.value.get(), None | Some(NodeValue::Null))
    }

    pub fn is_populated(&self) -> bool {
        self.value.get().is_some()
    }

    pub fn is_reference(&self) -> bool {
        matches!(self.value.get(), Some(NodeValue::Reference(_)))
    }

    /// Discard the held value, turning the node back into a placeholder.
    pub fn reset(&mut self) {
        self.value.take();
    }

    // ── In-place population ─────────────────────────────────

    /// Write the node's value. Fails if the node was already populated.
    pub fn populate(&self, value: NodeValue) -> GraphResult<()> {
        self.value
            .set(value)
            .map_err(|_| GraphError::AlreadyPopulated)
    }

    pub fn set_array(&self, value: Array) -> GraphResult<()> {
        self.populate(NodeValue::Array(value))
    }

    pub fn set_bool(&self, value: bool) -> GraphResult<()> {
        self.populate(NodeValue::Bool(value))
    }

    pub fn set_double(&self, value: f64) -> GraphResult<()> {
        self.populate(NodeValue::Double(value))
    }

    pub fn set_integer(&self, value: i64) -> GraphResult<()> {
        self.populate(NodeValue::Integer(value))
    }

    pub fn set_null(&self) -> GraphResult<()> {
        self.populate(NodeValue::Null)
    }

    pub fn set_object(&self, value: Object) -> GraphResult<()> {
        self.populate(NodeValue::Object(value))
    }

    pub fn set_reference(&self, target: &NodeRef) -> GraphResult<()> {
        self.populate(NodeValue::Reference(Arc::downgrade(target)))
    }

    pub fn set_string(&self, value: impl Into<String>) -> GraphResult<()> {
        self.populate(NodeValue::String(value.into()))
    }

    // ── Resolution ──────────────────────────────────────────

    /// Run `f` on the first concrete value along the reference chain.
    pub(crate) fn with_resolved<R>(&self, f: impl FnOnce(&NodeValue) -> R) -> GraphResult<R> {
        match self.value.get() {
            Some(NodeValue::Reference(target)) => {
                let target = target.upgrade().ok_or(GraphError::DanglingReference)?;
                target.with_resolved(f)
            }
            Some(value) => Ok(f(value)),
            None => Ok(f(&NULL)),
        }
    }

    /// The concrete node at the end of the reference chain starting at `self`.
    pub fn resolved_node(self: &Arc<Self>) -> GraphResult<NodeRef> {
        let mut current = Arc::clone(self);
        loop {
            let next = match current.value.get() {
                Some(NodeValue::Reference(target)) => {
                    target.upgrade().ok_or(GraphError::DanglingReference)?
                }
                _ => return Ok(current),
            };
            current = next;
        }
    }

    pub fn resolved_kind(&self) -> GraphResult<ValueKind> {
        self.with_resolved(|value| value.kind().unwrap_or(ValueKind::Null))
    }

    pub fn resolves_to<T: Resolvable>(&self) -> GraphResult<bool> {
        self.with_resolved(|value| value.kind() == Some(T::KIND))
    }

    pub fn resolve_to<T: Resolvable>(&self) -> GraphResult<Option<T>> {
        self.with_resolved(T::extract)
    }

    /// Fill `out` with the resolved value. Returns false, leaving `out`
    /// untouched, when the node resolves to a different kind.
    pub fn resolve_into<T: Resolvable>(&self, out: &mut T) -> GraphResult<bool> {
        Ok(match self.resolve_to::<T>()? {
            Some(value) => {
                *out = value;
                true
            }
            None => false,
        })
    }

    pub fn resolves_to_array(&self) -> GraphResult<bool> {
        self.resolves_to::<Array>()
    }

    pub fn resolves_to_bool(&self) -> GraphResult<bool> {
        self.resolves_to::<bool>()
    }

    pub fn resolves_to_double(&self) -> GraphResult<bool> {
        self.resolves_to::<f64>()
    }

    pub fn resolves_to_integer(&self) -> GraphResult<bool> {
        self.resolves_to::<i64>()
    }

    pub fn resolves_to_null(&self) -> GraphResult<bool> {
        self.with_resolved(|value| matches!(value, NodeValue::Null))
    }

    pub fn resolves_to_object(&self) -> GraphResult<bool> {
        self.resolves_to::<Object>()
    }

    pub fn resolves_to_string(&self) -> GraphResult<bool> {
        self.resolves_to::<String>()
    }

    pub fn resolve_to_array(&self) -> GraphResult<Option<Array>> {
        self.resolve_to()
    }

    pub fn resolve_to_bool(&self) -> GraphResult<Option<bool>> {
        self.resolve_to()
    }

    pub fn resolve_to_double(&self) -> GraphResult<Option<f64>> {
        self.resolve_to()
    }

    pub fn resolve_to_integer(&self) -> GraphResult<Option<i64>> {
        self.resolve_to()
    }

    pub fn resolve_to_object(&self) -> GraphResult<Option<Object>> {
        self.resolve_to()
    }

    pub fn resolve_to_string(&self) -> GraphResult<Option<String>> {
        self.resolve_to()
    }

    /// Element count of the resolved array, `None` if it is not an array.
    pub fn size_of_resolved_array(&self) -> GraphResult<Option<usize>> {
        self.with_resolved(|value| match value {
            NodeValue::Array(items) => Some(items.len()),
            _ => None,
        })
    }

    /// Member count of the resolved object, `None` if it is not an object.
    pub fn size_of_resolved_object(&self) -> GraphResult<Option<usize>> {
        self.with_resolved(|value| match value {
            NodeValue::Object(members) => Some(members.len()),
            _ => None,
        })
    }
}

impl From<NodeValue> for GraphNode {
    fn from(value: NodeValue) -> Self {
        GraphNode::new(value)
    }
}

impl From<bool> for GraphNode {
    fn from(value: bool) -> Self {
        GraphNode::new(NodeValue::Bool(value))
    }
}

impl From<i64> for GraphNode {
    fn from(value: i64) -> Self {
        GraphNode::new(NodeValue::Integer(value))
    }
}

impl From<f64> for GraphNode {
    fn from(value: f64) -> Self {
        GraphNode::new(NodeValue::Double(value))
    }
}

impl From<String> for GraphNode {
    fn from(value: String) -> Self {
        GraphNode::new(NodeValue::String(value))
    }
}

impl From<&str> for GraphNode {
    fn from(value: &str) -> Self {
        GraphNode::new(NodeValue::String(value.to_string()))
    }
}

impl From<Array> for GraphNode {
    fn from(value: Array) -> Self {
        GraphNode::new(NodeValue::Array(value))
    }
}

impl From<Object> for GraphNode {
    fn from(value: Object) -> Self {
        GraphNode::new(NodeValue::Object(value))
    }
}

/// A concrete value type that can be extracted from a resolved node.
pub trait Resolvable: Sized {
    const KIND: ValueKind;

    fn extract(value: &NodeValue) -> Option<Self>;
}

impl Resolvable for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn extract(value: &NodeValue) -> Option<Self> {
        match value {
            NodeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl Resolvable for i64 {
    const KIND: ValueKind = ValueKind::Integer;

    fn extract(value: &NodeValue) -> Option<Self> {
        match value {
            NodeValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl Resolvable for f64 {
    const KIND: ValueKind = ValueKind::Double;

    fn extract(value: &NodeValue) -> Option<Self> {
        match value {
            NodeValue::Double(d) => Some(*d),
            _ => None,
        }
    }
}

impl Resolvable for String {
    const KIND: ValueKind = ValueKind::String;

    fn extract(value: &NodeValue) -> Option<Self> {
        match value {
            NodeValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl Resolvable for Array {
    const KIND: ValueKind = ValueKind::Array;

    fn extract(value: &NodeValue) -> Option<Self> {
        match value {
            NodeValue::Array(items) => Some(items.clone()),
            _ => None,
        }
    }
}

impl Resolvable for Object {
    const KIND: ValueKind = ValueKind::Object;

    fn extract(value: &NodeValue) -> Option<Self> {
        match value {
            NodeValue::Object(members) => Some(members.clone()),
            _ => None,
        }
    }
}
