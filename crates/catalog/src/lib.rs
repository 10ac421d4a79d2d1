//! # Catalog
//!
//! Compiles resource declarations into a strictly typed resource graph.
//!
//! A declaration pass describes desired machine state as resources: files to
//! place, commands to run, and the order between them. This crate turns those
//! loosely typed declarations into a [`Catalog`] that a convergence engine can
//! apply.
//!
//! ## Core Concepts
//!
//! - **Id**: a stable 64-bit identity derived from a label ([`derive_id`])
//! - **TypeTag**: marks a table as a resource kind (noop, file, exec)
//! - **Session**: the entry points of one declaration pass
//!   (`hash`, `file`, `exec`, `resource`, `noop`)
//! - **Catalog**: the finished node list, serializable as JSON
//!
//! ## Example
//!
//! ```
//! use catalog::{Session, Table, Value};
//!
//! let mut session = Session::new();
//!
//! let id = session.hash(&[Value::from("passwd")])?;
//! let table = Table::new()
//!     .with("path", "/etc/passwd")
//!     .with("mode", "0644");
//! let spec = session.file(&[Value::Table(table)])?;
//! session.resource(&[id, Value::Table(Table::new()), spec])?;
//!
//! let noop = session.noop();
//! let deps: Table = ["passwd"].into_iter().collect();
//! session.resource(&[Value::from("users"), Value::Table(deps), noop])?;
//!
//! let compiled = session.finish();
//! assert_eq!(compiled.len(), 2);
//! assert_eq!(compiled.resources()[1].dependencies(), &[catalog::derive_id("passwd")]);
//! # Ok::<(), catalog::Error>(())
//! ```
//!
//! ## Identifier Strategies
//!
//! Ids are derived through a [`LabelDigest`] strategy. [`Sha1Digest`] is the
//! default; [`Blake3Digest`] can be selected with [`HashAlgorithm`]. Whatever
//! the strategy, derived ids are odd, so they never collide with
//! [`TypeTag::NOOP`].

pub mod arena;
pub mod builder;
pub mod catalog;
pub mod convert;
pub mod error;
pub mod id;
pub mod session;
pub mod tag;
pub mod types;
pub mod value;

// Re-export main types at crate root
pub use arena::ResourceArena;
pub use builder::GraphBuilder;
pub use catalog::Catalog;
pub use error::{Error, ErrorKind, FieldError, Result};
pub use id::{
    Blake3Digest, CommentedId, HashAlgorithm, ID_HASH_PREFIX, Id, IdHasher, LabelDigest,
    Sha1Digest, derive_id,
};
pub use session::Session;
pub use tag::{Metadata, TypeTag, query_type, tag_type};
pub use types::{Command, Condition, EnvVar, Exec, File, FileKind, Payload, ResourceNode};
pub use value::{Table, Value};
