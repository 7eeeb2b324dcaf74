//! `serde_json::Value` document provider

use refgraph_core::{GraphResult, ValueAdapter, ValueKind};
use serde_json::Value;

/// Borrowing view of a `serde_json` value.
///
/// Numbers representable as `i64` are integers; every other number,
/// including `u64` values above `i64::MAX`, is a double.
#[derive(Debug, Clone, Copy)]
pub struct SerdeJsonAdapter<'a> {
    value: &'a Value,
}

impl<'a> SerdeJsonAdapter<'a> {
    pub fn new(value: &'a Value) -> Self {
        SerdeJsonAdapter { value }
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }
}

impl ValueAdapter for SerdeJsonAdapter<'_> {
    fn kind(&self) -> GraphResult<ValueKind> {
        Ok(match self.value {
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
        Ok(self
            .value
            .as_array()
            .map(|items| items.iter().map(SerdeJsonAdapter::new).collect()))
    }

    fn members(&self) -> GraphResult<Option<Vec<(String, Self)>>> {
        Ok(self.value.as_object().map(|members| {
            members
                .iter()
                .map(|(name, value)| (name.clone(), SerdeJsonAdapter::new(value)))
                .collect()
        }))
    }

    fn bool_value(&self) -> GraphResult<Option<bool>> {
        Ok(self.value.as_bool())
    }

    fn integer_value(&self) -> GraphResult<Option<i64>> {
        Ok(self.value.as_i64())
    }

    fn double_value(&self) -> GraphResult<Option<f64>> {
        Ok(match self.value {
            Value::Number(n) if !n.is_i64() => n.as_f64(),
            _ => None,
        })
    }

    fn string_value(&self) -> GraphResult<Option<String>> {
        Ok(self.value.as_str().map(str::to_string))
    }

    fn find_member(&self, name: &str) -> GraphResult<Option<Self>> {
        Ok(self
            .value
            .as_object()
            .and_then(|members| members.get(name))
            .map(SerdeJsonAdapter::new))
    }
}
