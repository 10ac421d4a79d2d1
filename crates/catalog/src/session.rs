//! Declaration session - the entry points a declaration pass calls
//!
//! A [`Session`] owns the graph for exactly one pass. Each entry point takes
//! its arguments as a slice of dynamic values, checks the count, then the
//! types, and reports failures by name and position.

use crate::builder::{GraphBuilder, RESOURCE_FN};
use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::id::IdHasher;
use crate::tag::{TypeTag, tag_type};
use crate::value::{Table, Value};

const HASH_FN: &str = "mcm.hash";
const FILE_FN: &str = "mcm.file";
const EXEC_FN: &str = "mcm.exec";

/// One declaration pass.
#[derive(Debug)]
pub struct Session {
    builder: GraphBuilder,
    noop: Value,
}

impl Session {
    /// Start a pass using the default (SHA-1) id hasher.
    pub fn new() -> Self {
        Self::with_hasher(IdHasher::default())
    }

    pub fn with_hasher(hasher: IdHasher) -> Self {
        let mut noop = Table::new();
        tag_type(&mut noop, TypeTag::NOOP);
        Self {
            builder: GraphBuilder::with_hasher(hasher),
            noop: Value::Table(noop),
        }
    }

    /// `hash(label)`: derive an id, keeping the label as its comment.
    pub fn hash(&self, args: &[Value]) -> Result<Value> {
        check_arity(HASH_FN, args.len(), 1)?;
        let label = args[0]
            .as_str()
            .ok_or_else(|| Error::argument(HASH_FN, 1, "must be a string"))?;
        Ok(Value::Id(self.builder.hasher().hash(label)))
    }

    /// `file(table)`: a copy of the table, tagged as a file spec.
    pub fn file(&self, args: &[Value]) -> Result<Value> {
        tag_argument(FILE_FN, args, TypeTag::FILE)
    }

    /// `exec(table)`: a copy of the table, tagged as an exec spec.
    pub fn exec(&self, args: &[Value]) -> Result<Value> {
        tag_argument(EXEC_FN, args, TypeTag::EXEC)
    }

    /// `resource(id, deps, spec)`: commit one node to the graph.
    pub fn resource(&mut self, args: &[Value]) -> Result<()> {
        check_arity(RESOURCE_FN, args.len(), 3)?;
        self.builder.declare_resource(&args[0], &args[1], &args[2])?;
        Ok(())
    }

    /// The pre-tagged no-op spec.
    pub fn noop(&self) -> Value {
        self.noop.clone()
    }

    pub fn builder(&self) -> &GraphBuilder {
        &self.builder
    }

    /// Number of resources declared so far.
    pub fn len(&self) -> usize {
        self.builder.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builder.is_empty()
    }

    /// End the pass, handing the graph over as a [`Catalog`].
    pub fn finish(self) -> Catalog {
        log::info!(
            "declaration pass finished with {} resource(s) ({} ids)",
            self.builder.len(),
            self.builder.hasher().algorithm()
        );
        Catalog::new(self.builder.into_nodes())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn check_arity(function: &'static str, got: usize, expected: usize) -> Result<()> {
    if got == expected {
        Ok(())
    } else {
        Err(Error::ArgumentCount {
            function,
            expected,
            got,
        })
    }
}

fn tag_argument(function: &'static str, args: &[Value], tag: TypeTag) -> Result<Value> {
    check_arity(function, args.len(), 1)?;
    let mut table = args[0]
        .as_table()
        .cloned()
        .ok_or_else(|| Error::argument(function, 1, "must be a table"))?;
    tag_type(&mut table, tag);
    Ok(Value::Table(table))
}
