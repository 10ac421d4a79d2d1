//! Declaration documents
//!
//! A TOML or JSON file listing resources under a top-level `resource` array.
//! Each entry is fed through a [`Session`] the same way a declaration script
//! would, with the spec tagged according to the entry's `type`.

use anyhow::{Context, Result, bail};
use catalog::{Catalog, IdHasher, Session, Table, Value};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Supported document formats, picked by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => bail!(
                "Unsupported declaration format: {} (expected .toml or .json)",
                path.display()
            ),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
    #[serde(default)]
    pub resource: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Entry {
    pub id: IdRef,

    #[serde(default)]
    pub deps: Vec<IdRef>,

    /// Resource type; an entry without one passes its spec untagged
    #[serde(rename = "type")]
    pub kind: Option<ResourceKind>,

    pub spec: Option<serde_json::Value>,
}

/// A resource reference: a bare label, or `{ hash = "label" }`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IdRef {
    Label(String),
    Hash { hash: String },
}

impl IdRef {
    fn to_value(&self, session: &Session) -> catalog::Result<Value> {
        match self {
            Self::Label(label) => Ok(Value::from(label.as_str())),
            Self::Hash { hash } => session.hash(&[Value::from(hash.as_str())]),
        }
    }
}

impl fmt::Display for IdRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(label) => write!(f, "{label:?}"),
            Self::Hash { hash } => write!(f, "hash {hash:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    File,
    Exec,
    Noop,
}

impl Document {
    /// Load a document, detecting the format from the extension
    pub fn load(path: &Path) -> Result<Self> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        Self::parse(&content, format)
            .with_context(|| format!("Invalid declarations in {}", path.display()))
    }

    pub fn parse(content: &str, format: Format) -> Result<Self> {
        let doc = match format {
            Format::Toml => toml::from_str(content)?,
            Format::Json => serde_json::from_str(content)?,
        };
        Ok(doc)
    }
}

/// Run one declaration pass over the document
pub fn compile(doc: &Document, hasher: IdHasher) -> Result<Catalog> {
    let mut session = Session::with_hasher(hasher);
    for (i, entry) in doc.resource.iter().enumerate() {
        declare(&mut session, entry)
            .with_context(|| format!("resource #{} ({})", i + 1, entry.id))?;
    }
    Ok(session.finish())
}

fn declare(session: &mut Session, entry: &Entry) -> Result<()> {
    let id = entry.id.to_value(session)?;
    let deps = entry
        .deps
        .iter()
        .map(|dep| dep.to_value(session))
        .collect::<catalog::Result<Table>>()?;

    let spec = entry.spec.clone().map_or(Value::Nil, Value::from);
    let spec = match entry.kind {
        Some(ResourceKind::File) => session.file(&[spec])?,
        Some(ResourceKind::Exec) => session.exec(&[spec])?,
        Some(ResourceKind::Noop) => {
            if !spec.is_nil() {
                bail!("a noop resource takes no spec");
            }
            session.noop()
        }
        None => spec,
    };

    session.resource(&[id, Value::Table(deps), spec])?;
    Ok(())
}
