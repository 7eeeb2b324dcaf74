//! Test utilities for refgraph-core

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;

use crate::adapter::GraphAdapter;
use crate::document::ValueAdapter;
use crate::error::GraphResult;
use crate::graph::Graph;
use crate::model::{GraphNode, ValueKind};
use crate::parser::GraphParser;

/// Minimal document provider over `serde_json::Value` for fixtures.
#[derive(Debug, Clone, Copy)]
pub struct JsonDoc<'a>(pub &'a Value);

impl ValueAdapter for JsonDoc<'_> {
    fn kind(&self) -> GraphResult<ValueKind> {
        Ok(match self.0 {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(n) if n.is_i64() => ValueKind::Integer,
            Value::Number(_) => ValueKind::Double,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        })
    }

    fn elements(&self) -> GraphResult<Option<Vec<Self>>> {
        Ok(self.0.as_array().map(|items| items.iter().map(JsonDoc).collect()))
    }

    fn members(&self) -> GraphResult<Option<Vec<(String, Self)>>> {
        Ok(self.0.as_object().map(|members| {
            members
                .iter()
                .map(|(name, value)| (name.clone(), JsonDoc(value)))
                .collect()
        }))
    }

    fn bool_value(&self) -> GraphResult<Option<bool>> {
        Ok(self.0.as_bool())
    }

    fn integer_value(&self) -> GraphResult<Option<i64>> {
        Ok(self.0.as_i64())
    }

    fn double_value(&self) -> GraphResult<Option<f64>> {
        Ok(match self.0 {
            Value::Number(n) if !n.is_i64() => n.as_f64(),
            _ => None,
        })
    }

    fn string_value(&self) -> GraphResult<Option<String>> {
        Ok(self.0.as_str().map(str::to_string))
    }
}

/// Parse a `json!` fixture.
pub fn parse_json(value: &Value) -> GraphResult<Graph> {
    GraphParser::new().parse(&JsonDoc(value))
}

/// Compare two graph views value by value. Pairs of nodes already under
/// comparison are assumed equal, which makes cyclic graphs terminate.
pub fn structurally_equal(a: &GraphAdapter, b: &GraphAdapter) -> GraphResult<bool> {
    let mut assumed = HashSet::new();
    equal_nodes(a, b, &mut assumed)
}

fn equal_nodes(
    a: &GraphAdapter,
    b: &GraphAdapter,
    assumed: &mut HashSet<(*const GraphNode, *const GraphNode)>,
) -> GraphResult<bool> {
    let left = a.node().resolved_node()?;
    let right = b.node().resolved_node()?;
    if !assumed.insert((Arc::as_ptr(&left), Arc::as_ptr(&right))) {
        return Ok(true);
    }

    let kind = a.kind()?;
    if kind != b.kind()? {
        return Ok(false);
    }

    match kind {
        ValueKind::Null => Ok(true),
        ValueKind::Bool => Ok(a.get_bool()? == b.get_bool()?),
        ValueKind::Integer => Ok(a.get_integer()? == b.get_integer()?),
        ValueKind::Double => Ok(a.get_double()? == b.get_double()?),
        ValueKind::String => Ok(a.get_string()? == b.get_string()?),
        ValueKind::Array => {
            let (left, right) = (a.get_array()?, b.get_array()?);
            if left.len() != right.len() {
                return Ok(false);
            }
            for (x, y) in left.iter().zip(&right) {
                if !equal_nodes(x, y, assumed)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        ValueKind::Object => {
            let (left, right) = (a.get_object()?, b.get_object()?);
            if left.len() != right.len() {
                return Ok(false);
            }
            for ((kx, x), (ky, y)) in left.iter().zip(&right) {
                if kx != ky || !equal_nodes(x, y, assumed)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
    }
}

/// True when `graph` reproduces the reference-free document `doc` exactly:
/// same kinds, same values, same order.
pub fn mirrors<A: ValueAdapter>(graph: &GraphAdapter, doc: &A) -> GraphResult<bool> {
    let kind = doc.kind()?;
    if graph.kind()? != kind {
        return Ok(false);
    }

    match kind {
        ValueKind::Null => Ok(true),
        ValueKind::Bool => Ok(graph.get_bool()? == doc.get_bool()?),
        ValueKind::Integer => Ok(graph.get_integer()? == doc.get_integer()?),
        ValueKind::Double => Ok(graph.get_double()? == doc.get_double()?),
        ValueKind::String => Ok(graph.get_string()? == doc.get_string()?),
        ValueKind::Array => {
            let (left, right) = (graph.get_array()?, doc.get_array()?);
            if left.len() != right.len() {
                return Ok(false);
            }
            for (x, y) in left.iter().zip(&right) {
                if !mirrors(x, y)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        ValueKind::Object => {
            let (left, right) = (graph.get_object()?, doc.get_object()?);
            if left.len() != right.len() {
                return Ok(false);
            }
            for ((kx, x), (ky, y)) in left.iter().zip(&right) {
                if kx != ky || !mirrors(x, y)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_doc_kinds() {
        let value = json!([1, 1.5, "s", true, null, {}, []]);
        let kinds: Vec<ValueKind> = JsonDoc(&value)
            .get_array()
            .unwrap()
            .iter()
            .map(|item| item.kind().unwrap())
            .collect();

        assert_eq!(
            kinds,
            vec![
                ValueKind::Integer,
                ValueKind::Double,
                ValueKind::String,
                ValueKind::Bool,
                ValueKind::Null,
                ValueKind::Object,
                ValueKind::Array,
            ]
        );
    }
}
