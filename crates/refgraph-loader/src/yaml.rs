//! `serde_yaml::Value` document provider

use std::collections::HashSet;

use refgraph_core::{GraphError, GraphResult, ValueAdapter, ValueKind};
use serde_yaml::Value;

/// Borrowing view of a `serde_yaml` value.
///
/// Tags are ignored. Mapping keys that are strings, numbers or bools become
/// member names; any other key is skipped. Two keys that map to the same
/// member name make the mapping unreadable as an object.
#[derive(Debug, Clone, Copy)]
pub struct SerdeYamlAdapter<'a> {
    value: &'a Value,
}

impl<'a> SerdeYamlAdapter<'a> {
    pub fn new(value: &'a Value) -> Self {
        SerdeYamlAdapter {
            value: untagged(value),
        }
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }
}

fn untagged(mut value: &Value) -> &Value {
    while let Value::Tagged(tagged) = value {
        value = &tagged.value;
    }
    value
}

fn member_name(key: &Value) -> Option<String> {
    match untagged(key) {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => {
            tracing::warn!("Skipping YAML mapping entry with non-scalar key: {:?}", other);
            None
        }
    }
}

impl ValueAdapter for SerdeYamlAdapter<'_> {
    fn kind(&self) -> GraphResult<ValueKind> {
        Ok(match self.value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(n) if n.is_i64() => ValueKind::Integer,
            Value::Number(_) => ValueKind::Double,
            Value::String(_) => ValueKind::String,
            Value::Sequence(_) => ValueKind::Array,
            Value::Mapping(_) => ValueKind::Object,
            Value::Tagged(tagged) => SerdeYamlAdapter::new(&tagged.value).kind()?,
        })
    }

    fn elements(&self) -> GraphResult<Option<Vec<Self>>> {
        Ok(self
            .value
            .as_sequence()
            .map(|items| items.iter().map(SerdeYamlAdapter::new).collect()))
    }

    fn members(&self) -> GraphResult<Option<Vec<(String, Self)>>> {
        let Some(mapping) = self.value.as_mapping() else {
            return Ok(None);
        };

        let mut seen = HashSet::new();
        let mut members = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let Some(name) = member_name(key) else {
                continue;
            };
            // `1` and `'1'` are distinct YAML keys but the same member name.
            if !seen.insert(name.clone()) {
                return Err(GraphError::DuplicateMember {
                    path: String::new(),
                    name,
                });
            }
            members.push((name, SerdeYamlAdapter::new(value)));
        }
        Ok(Some(members))
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
}
