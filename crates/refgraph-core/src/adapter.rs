//! Read-only view of a reference graph
//!
//! [`GraphAdapter`] implements [`ValueAdapter`], so a validator written
//! against the capability set cannot tell a parsed graph from a document
//! read straight from a JSON library. Every accessor follows reference
//! chains to the concrete node before answering.

use std::collections::{HashMap, btree_map};
use std::iter::FusedIterator;
use std::slice;
use std::sync::{Arc, Weak};

use crate::document::ValueAdapter;
use crate::error::{GraphError, GraphResult};
use crate::graph::Graph;
use crate::model::{Array, GraphNode, NodeRef, NodeValue, Object, ValueKind};
use crate::pointer::JsonPointer;

#[derive(Debug, Clone)]
pub struct GraphAdapter {
    node: NodeRef,
}

impl GraphAdapter {
    pub fn new(node: NodeRef) -> Self {
        GraphAdapter { node }
    }

    pub fn from_graph(graph: &Graph) -> Self {
        GraphAdapter::new(graph.root_node())
    }

    /// The wrapped node, which may be a reference.
    pub fn node(&self) -> &NodeRef {
        &self.node
    }

    /// Resolved array, or `TypeMismatch` if this is not an array.
    pub fn array(&self) -> GraphResult<GraphArray> {
        self.maybe_array()?.ok_or_else(|| self.mismatch(ValueKind::Array))
    }

    pub fn maybe_array(&self) -> GraphResult<Option<GraphArray>> {
        Ok(self.node.resolve_to_array()?.map(|items| GraphArray { items }))
    }

    /// Resolved object, or `TypeMismatch` if this is not an object.
    pub fn object(&self) -> GraphResult<GraphObject> {
        self.maybe_object()?.ok_or_else(|| self.mismatch(ValueKind::Object))
    }

    pub fn maybe_object(&self) -> GraphResult<Option<GraphObject>> {
        Ok(self
            .node
            .resolve_to_object()?
            .map(|members| GraphObject { members }))
    }

    /// Navigate by JSON Pointer, following references along the way.
    pub fn pointer(&self, pointer: &str) -> GraphResult<GraphAdapter> {
        JsonPointer::parse(pointer)?.resolve(self)
    }

    /// True when both views resolve to the very same node.
    pub fn same_node(&self, other: &GraphAdapter) -> GraphResult<bool> {
        Ok(Arc::ptr_eq(
            &self.node.resolved_node()?,
            &other.node.resolved_node()?,
        ))
    }

    /// Snapshot the resolved value so it outlives a re-parse of its graph.
    pub fn freeze(&self) -> GraphResult<FrozenGraphValue> {
        FrozenGraphValue::new(&self.node)
    }

    fn mismatch(&self, expected: ValueKind) -> GraphError {
        match self.node.resolved_kind() {
            Ok(found) => GraphError::TypeMismatch { expected, found },
            Err(err) => err,
        }
    }
}

impl Default for GraphAdapter {
    /// An empty object.
    fn default() -> Self {
        GraphAdapter::new(Arc::new(GraphNode::from(Object::new())))
    }
}

impl From<&Graph> for GraphAdapter {
    fn from(graph: &Graph) -> Self {
        GraphAdapter::from_graph(graph)
    }
}

impl ValueAdapter for GraphAdapter {
    fn kind(&self) -> GraphResult<ValueKind> {
        self.node.resolved_kind()
    }

    fn elements(&self) -> GraphResult<Option<Vec<Self>>> {
        self.node.with_resolved(|value| match value {
            NodeValue::Array(items) => Some(items.iter().cloned().map(GraphAdapter::new).collect()),
            _ => None,
        })
    }

    fn members(&self) -> GraphResult<Option<Vec<(String, Self)>>> {
        self.node.with_resolved(|value| match value {
            NodeValue::Object(members) => Some(
                members
                    .iter()
                    .map(|(name, node)| (name.clone(), GraphAdapter::new(Arc::clone(node))))
                    .collect(),
            ),
            _ => None,
        })
    }

    fn bool_value(&self) -> GraphResult<Option<bool>> {
        self.node.resolve_to_bool()
    }

    fn integer_value(&self) -> GraphResult<Option<i64>> {
        self.node.resolve_to_integer()
    }

    fn double_value(&self) -> GraphResult<Option<f64>> {
        self.node.resolve_to_double()
    }

    fn string_value(&self) -> GraphResult<Option<String>> {
        self.node.resolve_to_string()
    }

    fn array_size(&self) -> GraphResult<Option<usize>> {
        self.node.size_of_resolved_array()
    }

    fn object_size(&self) -> GraphResult<Option<usize>> {
        self.node.size_of_resolved_object()
    }

    fn find_member(&self, name: &str) -> GraphResult<Option<Self>> {
        self.node.with_resolved(|value| match value {
            NodeValue::Object(members) => members.get(name).cloned().map(GraphAdapter::new),
            _ => None,
        })
    }

    fn element(&self, index: usize) -> GraphResult<Option<Self>> {
        self.node.with_resolved(|value| match value {
            NodeValue::Array(items) => items.get(index).cloned().map(GraphAdapter::new),
            _ => None,
        })
    }
}

/// The elements of a resolved array.
#[derive(Debug, Clone, Default)]
pub struct GraphArray {
    items: Array,
}

impl GraphArray {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<GraphAdapter> {
        self.items.get(index).cloned().map(GraphAdapter::new)
    }

    pub fn iter(&self) -> GraphArrayIter<'_> {
        GraphArrayIter {
            inner: self.items.iter(),
        }
    }
}

impl<'a> IntoIterator for &'a GraphArray {
    type Item = GraphAdapter;
    type IntoIter = GraphArrayIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Yields an adapter per element, in insertion order.
#[derive(Debug, Clone)]
pub struct GraphArrayIter<'a> {
    inner: slice::Iter<'a, NodeRef>,
}

impl Iterator for GraphArrayIter<'_> {
    type Item = GraphAdapter;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().cloned().map(GraphAdapter::new)
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.inner.nth(n).cloned().map(GraphAdapter::new)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for GraphArrayIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().cloned().map(GraphAdapter::new)
    }

    fn nth_back(&mut self, n: usize) -> Option<Self::Item> {
        self.inner.nth_back(n).cloned().map(GraphAdapter::new)
    }
}

impl ExactSizeIterator for GraphArrayIter<'_> {}

impl FusedIterator for GraphArrayIter<'_> {}

/// The members of a resolved object.
#[derive(Debug, Clone, Default)]
pub struct GraphObject {
    members: Object,
}

impl GraphObject {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<GraphAdapter> {
        self.members.get(name).cloned().map(GraphAdapter::new)
    }

    pub fn iter(&self) -> GraphObjectIter<'_> {
        GraphObjectIter {
            inner: self.members.iter(),
        }
    }
}

impl<'a> IntoIterator for &'a GraphObject {
    type Item = (&'a str, GraphAdapter);
    type IntoIter = GraphObjectIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Yields `(name, adapter)` pairs in stored key order.
#[derive(Debug, Clone)]
pub struct GraphObjectIter<'a> {
    inner: btree_map::Iter<'a, String, NodeRef>,
}

fn member<'a>((name, node): (&'a String, &'a NodeRef)) -> (&'a str, GraphAdapter) {
    (name.as_str(), GraphAdapter::new(Arc::clone(node)))
}

impl<'a> Iterator for GraphObjectIter<'a> {
    type Item = (&'a str, GraphAdapter);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(member)
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.inner.nth(n).map(member)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for GraphObjectIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(member)
    }

    fn nth_back(&mut self, n: usize) -> Option<Self::Item> {
        self.inner.nth_back(n).map(member)
    }
}

impl ExactSizeIterator for GraphObjectIter<'_> {}

impl FusedIterator for GraphObjectIter<'_> {}

/// An immutable snapshot of a graph value.
///
/// The snapshot owns a private copy of every node reachable from the
/// resolved value, through owning and reference edges alike. References
/// inside the copy point at copies, so the snapshot stays whole after the
/// source graph is re-parsed or dropped.
#[derive(Debug, Clone)]
pub struct FrozenGraphValue {
    node: NodeRef,
    /// Copies of reference targets. Targets outside the frozen value have no
    /// other owner in the snapshot.
    _retained: Vec<NodeRef>,
}

impl FrozenGraphValue {
    pub fn new(source: &NodeRef) -> GraphResult<Self> {
        let resolved = source.resolved_node()?;

        // Placeholders first, so copies can link to each other in any order.
        let mut copies: HashMap<*const GraphNode, NodeRef> = HashMap::new();
        let mut originals: Vec<NodeRef> = Vec::new();
        let mut to_visit = vec![Arc::clone(&resolved)];

        while let Some(node) = to_visit.pop() {
            if copies.contains_key(&Arc::as_ptr(&node)) {
                continue;
            }
            copies.insert(Arc::as_ptr(&node), Arc::new(GraphNode::empty()));

            match node.value() {
                Some(NodeValue::Array(items)) => to_visit.extend(items.iter().cloned()),
                Some(NodeValue::Object(members)) => to_visit.extend(members.values().cloned()),
                Some(NodeValue::Reference(target)) => to_visit.extend(target.upgrade()),
                _ => {}
            }
            originals.push(node);
        }

        // Every node reached above has an entry in `copies`.
        let copy_of = |node: &NodeRef| Arc::clone(&copies[&Arc::as_ptr(node)]);
        let mut retained: HashMap<*const GraphNode, NodeRef> = HashMap::new();

        for original in &originals {
            let value = match original.value() {
                None => continue,
                Some(NodeValue::Array(items)) => {
                    NodeValue::Array(items.iter().map(copy_of).collect())
                }
                Some(NodeValue::Object(members)) => NodeValue::Object(
                    members
                        .iter()
                        .map(|(name, member)| (name.clone(), copy_of(member)))
                        .collect(),
                ),
                Some(NodeValue::Reference(target)) => match target.upgrade() {
                    Some(target) => {
                        let target = copy_of(&target);
                        let link = Arc::downgrade(&target);
                        retained.insert(Arc::as_ptr(&target), target);
                        NodeValue::Reference(link)
                    }
                    None => NodeValue::Reference(Weak::new()),
                },
                Some(scalar) => scalar.clone(),
            };
            copy_of(original).populate(value)?;
        }

        tracing::trace!(
            "Froze {} nodes, retaining {} reference targets",
            originals.len(),
            retained.len()
        );

        Ok(FrozenGraphValue {
            node: copy_of(&resolved),
            _retained: retained.into_values().collect(),
        })
    }

    pub fn adapter(&self) -> GraphAdapter {
        GraphAdapter::new(Arc::clone(&self.node))
    }

    /// Deep equality against another value.
    ///
    /// Whether two cyclic graphs should compare by structure or by identity
    /// is undecided, so this always fails rather than guess.
    pub fn equal_to<A: ValueAdapter>(&self, _other: &A, _strict: bool) -> GraphResult<bool> {
        Err(GraphError::NotImplemented(
            "equality comparison for frozen graph values".to_string(),
        ))
    }
}
