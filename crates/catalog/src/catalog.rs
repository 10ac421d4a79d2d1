//! The finished resource graph of a declaration pass.
//!
//! A [`Catalog`] is what the convergence engine consumes. It serializes to
//! JSON as `{"resources": [...]}` with nodes in declaration order, and can be
//! rendered as a Graphviz digraph for inspection.

use crate::error::Result;
use crate::id::Id;
use crate::types::ResourceNode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

/// An ordered list of resource nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    resources: Vec<ResourceNode>,
}

impl Catalog {
    pub(crate) fn new(resources: Vec<ResourceNode>) -> Self {
        Self { resources }
    }

    pub fn resources(&self) -> &[ResourceNode] {
        &self.resources
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResourceNode> {
        self.resources.iter()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// First resource declared with `id`.
    pub fn get(&self, id: Id) -> Option<&ResourceNode> {
        self.resources.iter().find(|r| r.id() == id)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a catalog from a JSON file.
    pub fn read_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Write the catalog as JSON, creating parent directories as needed.
    pub fn write_to(&self, path: &Path, pretty: bool) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut content = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        content.push('\n');
        fs::write(path, content)?;
        log::debug!("wrote {} resource(s) to {}", self.len(), path.display());
        Ok(())
    }

    /// Render the dependency graph in Graphviz dot syntax.
    ///
    /// Commented nodes get a label; every dependency becomes an edge from
    /// the dependent resource to the one it depends on.
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph catalog {\n");
        for resource in &self.resources {
            let id = resource.id();
            if !resource.comment().is_empty() {
                let label = quote_label(resource.comment());
                dot.push_str(&format!("  {id} [label={label}];\n"));
            }
            for dep in resource.dependencies() {
                dot.push_str(&format!("  {id} -> {dep};\n"));
            }
            dot.push('\n');
        }
        dot.push_str("}\n");
        dot
    }

    pub fn write_dot(&self, out: &mut impl Write) -> io::Result<()> {
        out.write_all(self.to_dot().as_bytes())
    }
}

/// Quote a label the way Go's `%q` verb does.
fn quote_label(label: &str) -> String {
    let mut quoted = String::with_capacity(label.len() + 2);
    quoted.push('"');
    for c in label.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\u{7}' => quoted.push_str("\\a"),
            '\u{8}' => quoted.push_str("\\b"),
            '\u{c}' => quoted.push_str("\\f"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            '\u{b}' => quoted.push_str("\\v"),
            c if c < ' ' || c == '\u{7f}' => {
                quoted.push_str(&format!("\\x{:02x}", u32::from(c)));
            }
            c if c.is_control() || (c.is_whitespace() && c != ' ') => {
                quoted.push_str(&format!("\\u{:04x}", u32::from(c)));
            }
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a ResourceNode;
    type IntoIter = std::slice::Iter<'a, ResourceNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}
