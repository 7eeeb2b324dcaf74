//! Read-only value capability set shared by document providers and graphs
//!
//! Parsing backends implement [`ValueAdapter`] once per value type, and the
//! graph parser and the graph adapter only ever talk to this trait. Every
//! accessor is fallible so that graph-backed values can report a dangling
//! reference at the point it is touched.

use crate::error::{GraphError, GraphResult};
use crate::model::ValueKind;

pub trait ValueAdapter: Clone + Sized {
    /// Kind of the value, after following any references.
    fn kind(&self) -> GraphResult<ValueKind>;

    /// Array elements in order, or `None` if the value is not an array.
    fn elements(&self) -> GraphResult<Option<Vec<Self>>>;

    /// Object members in the backend's iteration order, or `None` if the
    /// value is not an object.
    fn members(&self) -> GraphResult<Option<Vec<(String, Self)>>>;

    fn bool_value(&self) -> GraphResult<Option<bool>>;

    fn integer_value(&self) -> GraphResult<Option<i64>>;

    fn double_value(&self) -> GraphResult<Option<f64>>;

    fn string_value(&self) -> GraphResult<Option<String>>;

    /// Whether kinds are kept apart strictly (no numeric strings, no
    /// integer/double coercion).
    fn has_strict_types() -> bool {
        true
    }

    fn is_array(&self) -> GraphResult<bool> {
        Ok(self.kind()? == ValueKind::Array)
    }

    fn is_bool(&self) -> GraphResult<bool> {
        Ok(self.kind()? == ValueKind::Bool)
    }

    fn is_double(&self) -> GraphResult<bool> {
        Ok(self.kind()? == ValueKind::Double)
    }

    fn is_integer(&self) -> GraphResult<bool> {
        Ok(self.kind()? == ValueKind::Integer)
    }

    fn is_null(&self) -> GraphResult<bool> {
        Ok(self.kind()? == ValueKind::Null)
    }

    fn is_number(&self) -> GraphResult<bool> {
        Ok(matches!(self.kind()?, ValueKind::Integer | ValueKind::Double))
    }

    fn is_object(&self) -> GraphResult<bool> {
        Ok(self.kind()? == ValueKind::Object)
    }

    fn is_string(&self) -> GraphResult<bool> {
        Ok(self.kind()? == ValueKind::String)
    }

    fn get_array(&self) -> GraphResult<Vec<Self>> {
        self.elements()?
            .ok_or_else(|| type_mismatch(self, ValueKind::Array))
    }

    fn get_object(&self) -> GraphResult<Vec<(String, Self)>> {
        self.members()?
            .ok_or_else(|| type_mismatch(self, ValueKind::Object))
    }

    fn get_bool(&self) -> GraphResult<bool> {
        self.bool_value()?
            .ok_or_else(|| type_mismatch(self, ValueKind::Bool))
    }

    fn get_integer(&self) -> GraphResult<i64> {
        self.integer_value()?
            .ok_or_else(|| type_mismatch(self, ValueKind::Integer))
    }

    fn get_double(&self) -> GraphResult<f64> {
        self.double_value()?
            .ok_or_else(|| type_mismatch(self, ValueKind::Double))
    }

    fn get_string(&self) -> GraphResult<String> {
        self.string_value()?
            .ok_or_else(|| type_mismatch(self, ValueKind::String))
    }

    fn array_size(&self) -> GraphResult<Option<usize>> {
        Ok(self.elements()?.map(|items| items.len()))
    }

    fn object_size(&self) -> GraphResult<Option<usize>> {
        Ok(self.members()?.map(|members| members.len()))
    }

    /// Element at `index`, if this is an array long enough to have one.
    fn element(&self, index: usize) -> GraphResult<Option<Self>> {
        Ok(self.elements()?.and_then(|items| items.into_iter().nth(index)))
    }

    /// Value of the member called `name`, if this is an object that has one.
    fn find_member(&self, name: &str) -> GraphResult<Option<Self>> {
        Ok(self.members()?.and_then(|members| {
            members
                .into_iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value)
        }))
    }
}

fn type_mismatch<A: ValueAdapter>(adapter: &A, expected: ValueKind) -> GraphError {
    match adapter.kind() {
        Ok(found) => GraphError::TypeMismatch { expected, found },
        Err(err) => err,
    }
}
