//! Build a reference graph from any document provider
//!
//! A JSON Reference is an object with a string-valued `$ref` member naming a
//! fragment of the document. In the finished graph that object is replaced
//! by a link to the node parsed for the referenced fragment.
//!
//! Circular references are supported when at least one concrete value sits
//! between two references that form a loop:
//!
//! ```json
//! { "a": { "b": { "$ref": "#/a" } } }
//! ```
//!
//! The node for `/a` is registered before its members are parsed, so the
//! reference at `/a/b` becomes a weak link back to it. A loop made only of
//! references, such as `{"a": {"$ref": "#/a"}}`, gives no concrete value to
//! anchor the chain and is rejected.

use std::collections::HashMap;
use std::sync::Arc;

use crate::document::ValueAdapter;
use crate::error::{GraphError, GraphResult};
use crate::graph::Graph;
use crate::model::{Array, GraphNode, NodeRef, NodeValue, Object, ValueKind};
use crate::pointer::{JsonReference, escape_segment};

const REF_MEMBER: &str = "$ref";

/// Canonical path to the node already created for it. One per parse.
type ResolvedNodes = HashMap<String, NodeRef>;

#[derive(Debug, Default, Clone, Copy)]
pub struct GraphParser;

impl GraphParser {
    pub fn new() -> Self {
        GraphParser
    }

    /// Parse `root` into a new graph.
    pub fn parse<A: ValueAdapter>(&self, root: &A) -> GraphResult<Graph> {
        let mut resolved = ResolvedNodes::new();
        tracing::debug!("Parsing document into reference graph");

        let node = self.parse_node(root, root.clone(), String::new(), &mut resolved)?;

        tracing::debug!("Resolved {} canonical paths", resolved.len());
        Ok(Graph::with_root(node))
    }

    /// Parse `root` and install it as the root of `graph`. On failure the
    /// graph is left as it was.
    pub fn parse_into<A: ValueAdapter>(&self, root: &A, graph: &mut Graph) -> GraphResult<()> {
        let parsed = self.parse(root)?;
        graph.set_root(parsed.root_node());
        Ok(())
    }

    fn parse_node<A: ValueAdapter>(
        &self,
        root: &A,
        start: A,
        path: String,
        resolved: &mut ResolvedNodes,
    ) -> GraphResult<NodeRef> {
        if let Some(existing) = resolved.get(&path) {
            return Ok(share(existing));
        }

        // Paths visited while chasing a chain of references, before a
        // concrete value was found. They all end up naming the same node.
        let mut untyped: Vec<String> = Vec::new();
        let mut current = start;
        let mut current_path = path;

        while let Some(uri) = json_reference(&current, &current_path)? {
            let reference = JsonReference::parse(&uri)?;
            let target_path = reference.pointer().to_string();
            tracing::trace!("Following reference '{}' from '{}'", uri, current_path);

            untyped.push(current_path);
            if untyped.contains(&target_path) {
                untyped.push(target_path);
                return Err(GraphError::UnresolvedReferenceCycle {
                    path: untyped[0].clone(),
                    chain: untyped,
                });
            }

            if let Some(existing) = resolved.get(&target_path).cloned() {
                for alias in untyped {
                    resolved.insert(alias, Arc::clone(&existing));
                }
                return Ok(Arc::new(GraphNode::reference(&existing)));
            }

            current = reference.pointer().resolve(root)?;
            current_path = target_path;
        }

        // Register the placeholder before descending so that references back
        // to this path find it.
        let node = Arc::new(GraphNode::empty());
        resolved.insert(current_path.clone(), Arc::clone(&node));

        self.populate(&node, root, &current, &current_path, resolved)?;

        for alias in untyped {
            resolved.insert(alias, Arc::clone(&node));
        }

        Ok(node)
    }

    fn populate<A: ValueAdapter>(
        &self,
        node: &GraphNode,
        root: &A,
        current: &A,
        path: &str,
        resolved: &mut ResolvedNodes,
    ) -> GraphResult<()> {
        let value = match current.kind()? {
            ValueKind::Object => {
                let mut object = Object::new();
                for (name, member) in current.get_object().map_err(|err| located(err, path))? {
                    // A repeated name would share a canonical path with the
                    // first occurrence and silently take over its node.
                    if object.contains_key(&name) {
                        return Err(GraphError::DuplicateMember {
                            path: path.to_string(),
                            name,
                        });
                    }
                    let member_path = format!("{}/{}", path, escape_segment(&name));
                    let child = self.parse_node(root, member, member_path, resolved)?;
                    object.insert(name, child);
                }
                NodeValue::Object(object)
            }
            ValueKind::Array => {
                let items = current.get_array()?;
                let mut array = Array::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    let item_path = format!("{}/{}", path, index);
                    array.push(self.parse_node(root, item, item_path, resolved)?);
                }
                NodeValue::Array(array)
            }
            ValueKind::String => NodeValue::String(current.get_string()?),
            ValueKind::Bool => NodeValue::Bool(current.get_bool()?),
            ValueKind::Integer => NodeValue::Integer(current.get_integer()?),
            ValueKind::Double => NodeValue::Double(current.get_double()?),
            ValueKind::Null => NodeValue::Null,
        };

        node.populate(value)
    }
}

/// Hand out an already-registered node. A node that is still being populated
/// is an ancestor of the caller, so it is linked weakly to keep strong
/// ownership acyclic.
fn share(existing: &NodeRef) -> NodeRef {
    if existing.is_populated() {
        Arc::clone(existing)
    } else {
        Arc::new(GraphNode::reference(existing))
    }
}

/// The `$ref` URI carried by `node`, if it is a JSON Reference object.
fn json_reference<A: ValueAdapter>(node: &A, path: &str) -> GraphResult<Option<String>> {
    if !node.is_object()? {
        return Ok(None);
    }

    match node.find_member(REF_MEMBER).map_err(|err| located(err, path))? {
        Some(value) => match value.string_value()? {
            Some(uri) => Ok(Some(uri)),
            None => Err(GraphError::MalformedReference {
                path: path.to_string(),
            }),
        },
        None => Ok(None),
    }
}

/// Attach `path` to a duplicate-member error raised by a provider, which
/// does not know where in the document it is.
fn located(err: GraphError, path: &str) -> GraphError {
    match err {
        GraphError::DuplicateMember { path: at, name } if at.is_empty() => {
            GraphError::DuplicateMember {
                path: path.to_string(),
                name,
            }
        }
        other => other,
    }
}
