//! Core types of the compiled resource graph

use crate::id::Id;
use crate::tag::TypeTag;
use serde::{Deserialize, Serialize};

/// One declared resource: identity, dependencies, and what to converge.
///
/// Nodes are only created by the arena during a declaration pass. Once
/// created, the id, the length and order of the dependency list, and the
/// payload kind never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNode {
    id: Id,
    #[serde(default)]
    comment: String,
    #[serde(default)]
    dependencies: Vec<Id>,
    payload: Payload,
}

impl ResourceNode {
    pub(crate) fn new(id: Id, comment: String, dependencies: Vec<Id>, payload: Payload) -> Self {
        Self {
            id,
            comment,
            dependencies,
            payload,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    /// The label the id was derived from (may be empty)
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Dependencies in declaration order
    pub fn dependencies(&self) -> &[Id] {
        &self.dependencies
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Tag matching this node's payload
    pub fn tag(&self) -> TypeTag {
        self.payload.tag()
    }

    /// `comment (id=N)`, or `id=N` for uncommented nodes
    pub fn display_name(&self) -> String {
        if self.comment.is_empty() {
            format!("id={}", self.id)
        } else {
            format!("{} (id={})", self.comment, self.id)
        }
    }
}

/// What a resource converges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    /// Does nothing; useful as a grouping point for dependencies
    Noop,
    File(File),
    Exec(Exec),
}

impl Payload {
    pub fn tag(&self) -> TypeTag {
        match self {
            Self::Noop => TypeTag::NOOP,
            Self::File(_) => TypeTag::FILE,
            Self::Exec(_) => TypeTag::EXEC,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::File(_) => "file",
            Self::Exec(_) => "exec",
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Self::Noop)
    }
}

/// Desired state of a filesystem path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub path: String,
    /// Octal permission bits as written, e.g. `"0644"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default)]
    pub kind: FileKind,
}

impl File {
    /// Permission bits parsed from `mode`.
    pub fn mode_bits(&self) -> Option<u32> {
        self.mode
            .as_deref()
            .and_then(|m| u32::from_str_radix(m, 8).ok())
    }
}

/// What should exist at a file resource's path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// A regular file, with its content when managed
    Plain { content: Option<String> },
    Directory,
    Symlink { target: String },
    /// Nothing should exist at the path
    Absent,
}

impl Default for FileKind {
    fn default() -> Self {
        Self::Plain { content: None }
    }
}

/// A command to run, optionally guarded by a condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exec {
    pub command: Command,
    #[serde(default)]
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Command {
    pub argv: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environment: Vec<EnvVar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// When an exec resource's command should run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    #[default]
    Always,
    /// Run only if this command succeeds
    OnlyIf(Command),
    /// Run only if this command fails
    Unless(Command),
    /// Run only if nothing exists at this path
    FileAbsent(String),
}
