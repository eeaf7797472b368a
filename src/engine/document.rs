use serde_json::Value;

/// A field looked up on a JSON node.
///
/// An absent key and an explicit `null` are both `Missing`. Falsy-but-present
/// values (`0`, `false`, `""`, `[]`) are `Present`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field<'a> {
    Missing,
    Present(&'a Value),
}

impl<'a> Field<'a> {
    pub fn from_option(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => Field::Missing,
            Some(v) => Field::Present(v),
        }
    }

    pub fn value(self) -> Option<&'a Value> {
        match self {
            Field::Missing => None,
            Field::Present(v) => Some(v),
        }
    }

    pub fn is_missing(self) -> bool {
        matches!(self, Field::Missing)
    }

    /// JSON text of the value, or `undefined` when missing.
    pub fn describe(self) -> String {
        match self {
            Field::Missing => "undefined".to_string(),
            Field::Present(v) => v.to_string(),
        }
    }

    /// Short JSON type name used in failure details.
    pub fn type_name(self) -> &'static str {
        match self {
            Field::Missing => "undefined",
            Field::Present(Value::Null) => "null",
            Field::Present(Value::Bool(_)) => "boolean",
            Field::Present(Value::Number(_)) => "number",
            Field::Present(Value::String(_)) => "string",
            Field::Present(Value::Array(_)) => "array",
            Field::Present(Value::Object(_)) => "object",
        }
    }

    pub fn as_node(self) -> Option<Node<'a>> {
        self.value().map(Node::new)
    }
}

/// Read-only view over a JSON value with presence-aware field access.
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    value: &'a Value,
}

impl<'a> Node<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// Look up `name`. A non-object node has no fields.
    pub fn field(&self, name: &str) -> Field<'a> {
        Field::from_option(self.value.as_object().and_then(|map| map.get(name)))
    }

    /// Elements of `name` when it is an array, in index order.
    pub fn elements(&self, name: &str) -> Option<&'a [Value]> {
        self.field(name).value().and_then(Value::as_array).map(Vec::as_slice)
    }

    /// Length of the array stored at `name`, if it is one.
    pub fn len_of(&self, name: &str) -> Option<usize> {
        self.elements(name).map(<[Value]>::len)
    }
}
