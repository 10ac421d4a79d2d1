//! Resource-kind tags attached to tables.
//!
//! A table becomes a resource spec by carrying a [`TypeTag`] in its
//! [`Metadata`]. Tagging never discards metadata the table already had: the
//! new tag is pushed as a layer whose `base` is the previous metadata, and
//! lookups walk from the nearest layer outwards.

use crate::value::{Table, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A resource-kind marker.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeTag(u64);

impl TypeTag {
    /// No-op resource
    pub const NOOP: TypeTag = TypeTag(0);
    /// File resource
    pub const FILE: TypeTag = TypeTag(0x8dc4_ac52_b296_2163);
    /// Command execution resource
    pub const EXEC: TypeTag = TypeTag(0x984c_9731_1006_f1ca);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// The resource kind name for built-in tags.
    pub fn kind_name(self) -> Option<&'static str> {
        match self {
            Self::NOOP => Some("noop"),
            Self::FILE => Some("file"),
            Self::EXEC => Some("exec"),
            _ => None,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind_name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{:#018x}", self.0),
        }
    }
}

/// Metadata attached to a table, with an optional fallback layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    resource_type: Option<TypeTag>,
    entries: BTreeMap<String, Value>,
    base: Option<Arc<Metadata>>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry to this layer.
    pub fn with_entry(mut self, key: impl Into<String>, value: Value) -> Self {
        self.entries.insert(key.into(), value);
        self
    }

    /// Set an entry on this layer.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    /// Look up `key`, falling back through base layers.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.layers().find_map(|layer| layer.entries.get(key))
    }

    /// The nearest resource tag in the chain.
    pub fn resource_type(&self) -> Option<TypeTag> {
        self.layers().find_map(|layer| layer.resource_type)
    }

    /// The layer this one falls back to.
    pub fn base(&self) -> Option<&Metadata> {
        self.base.as_deref()
    }

    /// Number of layers in the chain, this one included.
    pub fn depth(&self) -> usize {
        self.layers().count()
    }

    fn layers(&self) -> impl Iterator<Item = &Metadata> {
        std::iter::successors(Some(self), |layer| layer.base())
    }
}

/// Attach `tag` to `table` as its nearest resource kind.
///
/// Existing metadata is kept as the fallback of the new layer.
pub fn tag_type(table: &mut Table, tag: TypeTag) {
    let base = table.take_metadata();
    log::trace!(
        "tagging table as {tag} ({} existing layer(s))",
        base.as_ref().map_or(0, |m| m.depth())
    );
    table.set_metadata(Arc::new(Metadata {
        resource_type: Some(tag),
        entries: BTreeMap::new(),
        base,
    }));
}

/// Look up the resource kind of `value`, if it is a tagged table.
pub fn query_type(value: &Value) -> Option<TypeTag> {
    value.as_table()?.metadata()?.resource_type()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_tags() {
        assert_eq!(TypeTag::NOOP.get(), 0);
        assert_ne!(TypeTag::FILE, TypeTag::EXEC);
        assert_ne!(TypeTag::FILE, TypeTag::NOOP);
        assert_eq!(TypeTag::FILE.to_string(), "file");
        assert_eq!(TypeTag::new(42).to_string(), "0x000000000000002a");
        assert_eq!(TypeTag::new(42).kind_name(), None);
    }

    #[test]
    fn test_untagged_values() {
        assert_eq!(query_type(&Value::Nil), None);
        assert_eq!(query_type(&Value::from("file")), None);
        assert_eq!(query_type(&Value::Table(Table::new())), None);

        let mut table = Table::new();
        table.set_metadata(Arc::new(Metadata::new().with_entry("name", Value::from("x"))));
        assert_eq!(query_type(&Value::Table(table)), None);
    }

    #[test]
    fn test_tag_type() {
        let mut table = Table::new();
        tag_type(&mut table, TypeTag::FILE);
        assert_eq!(query_type(&Value::Table(table)), Some(TypeTag::FILE));
    }

    #[test]
    fn test_retag_masks_previous_tag() {
        let mut table = Table::new();
        tag_type(&mut table, TypeTag::FILE);
        tag_type(&mut table, TypeTag::EXEC);

        let meta = table.metadata().unwrap();
        assert_eq!(meta.depth(), 2);
        assert_eq!(meta.resource_type(), Some(TypeTag::EXEC));
        assert_eq!(meta.base().unwrap().resource_type(), Some(TypeTag::FILE));
    }

    #[test]
    fn test_tag_preserves_existing_metadata() {
        let mut table = Table::new();
        table.set_metadata(Arc::new(
            Metadata::new()
                .with_entry("owner", Value::from("ops"))
                .with_entry("priority", Value::Integer(3)),
        ));

        tag_type(&mut table, TypeTag::EXEC);

        let meta = table.metadata().unwrap();
        assert_eq!(meta.resource_type(), Some(TypeTag::EXEC));
        assert_eq!(meta.get("owner"), Some(&Value::from("ops")));
        assert_eq!(meta.get("priority"), Some(&Value::Integer(3)));
        assert_eq!(meta.get("missing"), None);
    }

    #[test]
    fn test_nearest_tag_found_through_untagged_layer() {
        let mut table = Table::new();
        tag_type(&mut table, TypeTag::FILE);

        // An untagged layer on top still resolves the inherited tag.
        let inherited = table.take_metadata();
        let mut layer = Metadata::new().with_entry("note", Value::Boolean(true));
        layer.base = inherited;
        table.set_metadata(Arc::new(layer));

        assert_eq!(query_type(&Value::Table(table)), Some(TypeTag::FILE));
    }
}
