//! Dynamic values accepted by the declaration surface.
//!
//! Declarations arrive loosely typed: labels, sequences, nested tables of
//! fields. [`Value`] models that input; the builder narrows it into the typed
//! resource graph.

use crate::id::CommentedId;
use crate::tag::Metadata;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A dynamically typed declaration value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Nil,
    Boolean(bool),
    Integer(i64),
    Number(f64),
    String(String),
    /// An id produced by `hash`, carrying its label
    Id(CommentedId),
    Table(Table),
}

impl Value {
    /// Name of this value's type, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Id(_) => "id",
            Self::Table(_) => "table",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_id(&self) -> Option<&CommentedId> {
        match self {
            Self::Id(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<CommentedId> for Value {
    fn from(id: CommentedId) -> Self {
        Self::Id(id)
    }
}

impl From<Table> for Value {
    fn from(t: Table) -> Self {
        Self::Table(t)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Nil,
            serde_json::Value::Bool(b) => Self::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Table(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                let mut table = Table::new();
                for (key, value) in map {
                    table.set(key, Value::from(value));
                }
                Self::Table(table)
            }
        }
    }
}

/// A composite value: a sequence part, a keyed part, and attached metadata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    sequence: Vec<Value>,
    fields: BTreeMap<String, Value>,
    metadata: Option<Arc<Metadata>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a keyed field, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a keyed field. Setting `Nil` removes the field.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        match value.into() {
            Value::Nil => {
                self.fields.remove(&key);
            }
            value => {
                self.fields.insert(key, value);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Append to the sequence part.
    pub fn push(&mut self, value: impl Into<Value>) {
        self.sequence.push(value.into());
    }

    /// Length of the sequence part.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty() && self.fields.is_empty()
    }

    pub fn sequence(&self) -> &[Value] {
        &self.sequence
    }

    /// Keyed fields in key order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_deref()
    }

    pub fn set_metadata(&mut self, metadata: Arc<Metadata>) {
        self.metadata = Some(metadata);
    }

    pub fn take_metadata(&mut self) -> Option<Arc<Metadata>> {
        self.metadata.take()
    }
}

impl<V: Into<Value>> FromIterator<V> for Table {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            sequence: iter.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Nil.type_name(), "nil");
        assert_eq!(Value::from(1i64).type_name(), "integer");
        assert_eq!(Value::from(1.5).type_name(), "number");
        assert_eq!(Value::from("x").type_name(), "string");
        assert_eq!(Value::from(Table::new()).type_name(), "table");
    }

    #[test]
    fn test_table_parts() {
        let mut table: Table = ["a", "b"].into_iter().collect();
        table.set("path", "/etc/hosts");
        assert_eq!(table.len(), 2);
        assert_eq!(table.sequence()[1], Value::from("b"));
        assert_eq!(table.get("path"), Some(&Value::from("/etc/hosts")));

        table.set("path", Value::Nil);
        assert_eq!(table.get("path"), None);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_from_json() {
        let value = Value::from(json!({
            "path": "/etc/passwd",
            "size": 12,
            "ratio": 0.5,
            "tags": ["a", "b"],
            "missing": null,
        }));

        let table = value.as_table().unwrap();
        assert_eq!(table.get("path"), Some(&Value::from("/etc/passwd")));
        assert_eq!(table.get("size"), Some(&Value::Integer(12)));
        assert_eq!(table.get("ratio"), Some(&Value::Number(0.5)));
        assert_eq!(table.get("missing"), None);
        assert_eq!(table.get("tags").and_then(Value::as_table).unwrap().len(), 2);
        assert!(table.metadata().is_none());
    }
}
