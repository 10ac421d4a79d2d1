//! Resource graph builder - validates declarations and commits nodes

use crate::arena::ResourceArena;
use crate::convert::{copy_exec, copy_file};
use crate::error::{Error, FieldError, Result};
use crate::id::{CommentedId, Id, IdHasher};
use crate::tag::{TypeTag, query_type};
use crate::types::{Payload, ResourceNode};
use crate::value::Value;

/// Name of the resource declaration entry point, as shown in errors.
pub const RESOURCE_FN: &str = "mcm.resource";

/// Builds the resource graph of one declaration pass.
///
/// A failed declaration leaves the graph untouched: every argument is
/// resolved and the payload fully copied before anything is committed.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    hasher: IdHasher,
    arena: ResourceArena,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hasher(hasher: IdHasher) -> Self {
        Self {
            hasher,
            arena: ResourceArena::new(),
        }
    }

    pub fn hasher(&self) -> &IdHasher {
        &self.hasher
    }

    /// Declare one resource.
    ///
    /// # Arguments
    /// * `id` - an id from `hash`, or a label string to hash
    /// * `deps` - a table whose sequence entries are ids or label strings
    /// * `spec` - a table tagged as a resource kind
    pub fn declare_resource(
        &mut self,
        id: &Value,
        deps: &Value,
        spec: &Value,
    ) -> Result<&ResourceNode> {
        let CommentedId { id, comment } = self
            .resolve_id(id)
            .ok_or_else(|| Error::argument(RESOURCE_FN, 1, "expect mcm.hash or string"))?;
        let dependencies = self.resolve_dependencies(deps)?;
        let payload = resolve_payload(spec)?;

        log::debug!(
            "declared {} resource {:?} (id={id}) with {} dependencies",
            payload.kind_name(),
            comment,
            dependencies.len()
        );

        Ok(self
            .arena
            .alloc(ResourceNode::new(id, comment, dependencies, payload)))
    }

    fn resolve_id(&self, value: &Value) -> Option<CommentedId> {
        match value {
            Value::Id(id) => Some(id.clone()),
            Value::String(label) => Some(self.hasher.hash(label)),
            _ => None,
        }
    }

    // Order is kept as declared; duplicates are not collapsed.
    fn resolve_dependencies(&self, deps: &Value) -> Result<Vec<Id>> {
        let table = deps
            .as_table()
            .ok_or_else(|| Error::argument(RESOURCE_FN, 2, "must be a table"))?;

        let mut ids = Vec::with_capacity(table.len());
        for (i, entry) in table.sequence().iter().enumerate() {
            let id = match entry {
                Value::Id(id) => id.id,
                Value::String(label) => self.hasher.derive(label),
                other => {
                    return Err(Error::argument(
                        RESOURCE_FN,
                        2,
                        format!(
                            "expect deps to contain only mcm.hash or strings; entry {} is a {}",
                            i + 1,
                            other.type_name()
                        ),
                    ));
                }
            };
            ids.push(id);
        }
        Ok(ids)
    }

    /// Nodes committed so far, in declaration order.
    pub fn nodes(&self) -> &[ResourceNode] {
        self.arena.nodes()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Consume the builder and release its nodes.
    pub fn into_nodes(self) -> Vec<ResourceNode> {
        self.arena.into_nodes()
    }
}

fn resolve_payload(spec: &Value) -> Result<Payload> {
    let table = spec
        .as_table()
        .ok_or_else(|| Error::argument(RESOURCE_FN, 3, "must be a table"))?;
    let tag = query_type(spec)
        .ok_or_else(|| Error::argument(RESOURCE_FN, 3, "expect resource table"))?;

    match tag {
        TypeTag::NOOP => Ok(Payload::Noop),
        TypeTag::FILE => copy_file(table)
            .map(Payload::File)
            .map_err(|source| invalid("file", source)),
        TypeTag::EXEC => copy_exec(table)
            .map(Payload::Exec)
            .map_err(|source| invalid("exec", source)),
        tag => Err(Error::UnknownType {
            function: RESOURCE_FN,
            position: 3,
            tag,
        }),
    }
}

fn invalid(resource_kind: &'static str, source: FieldError) -> Error {
    Error::Validation {
        function: RESOURCE_FN,
        position: 3,
        resource_kind,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::id::derive_id;
    use crate::tag::tag_type;
    use crate::types::FileKind;
    use crate::value::Table;

    fn tagged(mut table: Table, tag: TypeTag) -> Value {
        tag_type(&mut table, tag);
        Value::Table(table)
    }

    fn labels(items: &[&str]) -> Value {
        Value::Table(items.iter().copied().collect())
    }

    fn noop() -> Value {
        tagged(Table::new(), TypeTag::NOOP)
    }

    #[test]
    fn test_declare_file_resource() {
        let mut builder = GraphBuilder::new();
        let id = Value::Id(builder.hasher().hash("f1"));
        let table = Table::new()
            .with("path", "/etc/passwd")
            .with("mode", "0644");
        let spec = tagged(table, TypeTag::FILE);

        let node = builder.declare_resource(&id, &labels(&[]), &spec).unwrap();
        assert_eq!(node.id(), derive_id("f1"));
        assert_eq!(node.comment(), "f1");
        assert!(node.dependencies().is_empty());
        match node.payload() {
            Payload::File(file) => {
                assert_eq!(file.path, "/etc/passwd");
                assert_eq!(file.mode.as_deref(), Some("0644"));
                assert_eq!(file.kind, FileKind::Plain { content: None });
            }
            other => panic!("expected file payload, got {other:?}"),
        }
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_dependencies_keep_order_and_duplicates() {
        let mut builder = GraphBuilder::new();
        let mut deps: Table = ["z", "y"].into_iter().collect();
        deps.push(builder.hasher().hash("z"));

        let node = builder
            .declare_resource(&Value::from("x"), &Value::Table(deps), &noop())
            .unwrap();

        assert_eq!(
            node.dependencies(),
            &[derive_id("z"), derive_id("y"), derive_id("z")]
        );
    }

    #[test]
    fn test_dependency_count_ignores_keyed_fields() {
        let mut builder = GraphBuilder::new();
        let deps: Table = ["a", "b"].into_iter().collect();
        let deps = deps.with("after", "c");

        let node = builder
            .declare_resource(&Value::from("x"), &Value::Table(deps), &noop())
            .unwrap();
        assert_eq!(node.dependencies().len(), 2);
        assert_eq!(node.dependencies(), &[derive_id("a"), derive_id("b")]);
    }

    #[test]
    fn test_bad_id_argument() {
        let mut builder = GraphBuilder::new();
        let err = builder
            .declare_resource(&Value::Integer(5), &labels(&[]), &noop())
            .unwrap_err();
        assert_eq!(err.position(), Some(1));
        assert_eq!(
            err.to_string(),
            "bad argument #1 to 'mcm.resource' (expect mcm.hash or string)"
        );
        assert!(builder.is_empty());
    }

    #[test]
    fn test_bad_dependency_entry_rolls_back() {
        let mut builder = GraphBuilder::new();
        let mut deps: Table = ["a"].into_iter().collect();
        deps.push(true);

        let err = builder
            .declare_resource(&Value::from("x"), &Value::Table(deps), &noop())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentType);
        assert_eq!(err.position(), Some(2));
        assert!(err.to_string().contains("entry 2 is a boolean"));
        assert!(builder.is_empty());
    }

    #[test]
    fn test_deps_must_be_table() {
        let mut builder = GraphBuilder::new();
        let err = builder
            .declare_resource(&Value::from("x"), &Value::from("y"), &noop())
            .unwrap_err();
        assert_eq!(err.position(), Some(2));
    }

    #[test]
    fn test_untagged_spec() {
        let mut builder = GraphBuilder::new();
        let spec = Value::Table(Table::new().with("path", "/etc/passwd"));
        let err = builder
            .declare_resource(&Value::from("x"), &labels(&[]), &spec)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "bad argument #3 to 'mcm.resource' (expect resource table)"
        );
        assert!(builder.is_empty());
    }

    #[test]
    fn test_spec_must_be_table() {
        let mut builder = GraphBuilder::new();
        let err = builder
            .declare_resource(&Value::from("x"), &labels(&[]), &Value::Nil)
            .unwrap_err();
        assert_eq!(err.position(), Some(3));
        assert_eq!(err.kind(), ErrorKind::ArgumentType);
    }

    #[test]
    fn test_unknown_tag() {
        let mut builder = GraphBuilder::new();
        let spec = tagged(Table::new(), TypeTag::new(2));
        let err = builder
            .declare_resource(&Value::from("x"), &labels(&[]), &spec)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownType);
        assert!(err.to_string().contains("unknown resource type"));
        assert!(builder.is_empty());
    }

    #[test]
    fn test_validation_failure_rolls_back() {
        let mut builder = GraphBuilder::new();
        builder
            .declare_resource(&Value::from("ok"), &labels(&[]), &noop())
            .unwrap();

        let spec = tagged(Table::new().with("path", false), TypeTag::FILE);
        let err = builder
            .declare_resource(&Value::from("bad"), &labels(&["ok"]), &spec)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(builder.len(), 1);
        assert_eq!(builder.nodes()[0].comment(), "ok");
    }

    #[test]
    fn test_custom_hasher_is_used_for_ids_and_deps() {
        let hasher = crate::id::HashAlgorithm::Blake3.hasher();
        let mut builder = GraphBuilder::with_hasher(hasher.clone());
        let node = builder
            .declare_resource(&Value::from("x"), &labels(&["y"]), &noop())
            .unwrap();
        assert_eq!(node.id(), hasher.derive("x"));
        assert_eq!(node.dependencies(), &[hasher.derive("y")]);
    }
}
