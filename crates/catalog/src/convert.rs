//! Structural copy of spec tables into typed payloads.
//!
//! Field names follow the catalog schema (`workingDirectory`, `onlyIf`,
//! `fileAbsent`). Union groups such as a file's kind or an exec's condition
//! accept at most one member; a member set to `false` counts as absent.
//! Unknown keys are rejected so that typos surface at declaration time.

use crate::error::FieldError;
use crate::types::{Command, Condition, EnvVar, Exec, File, FileKind};
use crate::value::{Table, Value};

type Result<T> = std::result::Result<T, FieldError>;

/// Copy a `file` spec into a [`File`] payload.
pub fn copy_file(spec: &Table) -> Result<File> {
    let mut fields = Fields::new(spec, String::new())?;

    let path = fields.required_str("path")?;
    let mode = match fields.take("mode") {
        None => None,
        Some(value) => Some(parse_mode(value, &fields.child("mode"))?),
    };

    let kind = match fields.union(&["plain", "directory", "symlink", "absent"])? {
        None => FileKind::default(),
        Some(("plain", value)) => {
            let path = fields.child("plain");
            if matches!(value, Value::Boolean(true)) {
                FileKind::Plain { content: None }
            } else {
                let mut plain = Fields::new(expect_table(value, &path)?, path)?;
                let content = plain.optional_str("content")?;
                plain.finish()?;
                FileKind::Plain { content }
            }
        }
        Some(("directory", value)) => {
            expect_void(value, &fields.child("directory"))?;
            FileKind::Directory
        }
        Some(("symlink", value)) => {
            let path = fields.child("symlink");
            let mut symlink = Fields::new(expect_table(value, &path)?, path)?;
            let target = symlink.required_str("target")?;
            symlink.finish()?;
            FileKind::Symlink { target }
        }
        Some((_, value)) => {
            expect_void(value, &fields.child("absent"))?;
            FileKind::Absent
        }
    };

    fields.finish()?;
    Ok(File { path, mode, kind })
}

/// Copy an `exec` spec into an [`Exec`] payload.
pub fn copy_exec(spec: &Table) -> Result<Exec> {
    let mut fields = Fields::new(spec, String::new())?;

    let command = match fields.take("command") {
        Some(value) => copy_command(value, fields.child("command"))?,
        None => return Err(FieldError::new("command", "missing required field")),
    };

    let condition = match fields.take("condition") {
        None => Condition::Always,
        Some(value) => {
            let path = fields.child("condition");
            let mut group = Fields::new(expect_table(value, &path)?, path)?;
            let condition = match group.union(&["always", "onlyIf", "unless", "fileAbsent"])? {
                None => Condition::Always,
                Some(("always", value)) => {
                    expect_void(value, &group.child("always"))?;
                    Condition::Always
                }
                Some(("onlyIf", value)) => {
                    Condition::OnlyIf(copy_command(value, group.child("onlyIf"))?)
                }
                Some(("unless", value)) => {
                    Condition::Unless(copy_command(value, group.child("unless"))?)
                }
                Some((_, value)) => {
                    Condition::FileAbsent(expect_str(value, &group.child("fileAbsent"))?)
                }
            };
            group.finish()?;
            condition
        }
    };

    fields.finish()?;
    Ok(Exec { command, condition })
}

fn copy_command(value: &Value, path: String) -> Result<Command> {
    let mut fields = Fields::new(expect_table(value, &path)?, path)?;

    let argv = match fields.take("argv") {
        Some(value) => {
            let path = fields.child("argv");
            expect_sequence(value, &path)?
                .iter()
                .enumerate()
                .map(|(i, arg)| expect_str(arg, &index(&path, i)))
                .collect::<Result<Vec<_>>>()?
        }
        None => {
            let path = fields.child("argv");
            return Err(FieldError::new(path, "missing required field"));
        }
    };

    let environment = match fields.take("environment") {
        None => Vec::new(),
        Some(value) => {
            let path = fields.child("environment");
            expect_sequence(value, &path)?
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    let path = index(&path, i);
                    let mut var = Fields::new(expect_table(entry, &path)?, path)?;
                    let name = var.required_str("name")?;
                    let value = var.optional_str("value")?.unwrap_or_default();
                    var.finish()?;
                    Ok(EnvVar { name, value })
                })
                .collect::<Result<Vec<_>>>()?
        }
    };

    let working_directory = fields.optional_str("workingDirectory")?;

    fields.finish()?;
    Ok(Command {
        argv,
        environment,
        working_directory,
    })
}

/// Keyed fields of one record table, tracking which keys were consumed.
struct Fields<'a> {
    table: &'a Table,
    path: String,
    seen: Vec<&'static str>,
}

impl<'a> Fields<'a> {
    fn new(table: &'a Table, path: String) -> Result<Self> {
        if table.len() > 0 {
            let message = "expected record, got sequence entries";
            return Err(FieldError::new(path, message));
        }
        Ok(Self {
            table,
            path,
            seen: Vec::new(),
        })
    }

    fn child(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    fn take(&mut self, key: &'static str) -> Option<&'a Value> {
        self.seen.push(key);
        self.table.get(key)
    }

    fn required_str(&mut self, key: &'static str) -> Result<String> {
        match self.take(key) {
            Some(value) => expect_str(value, &self.child(key)),
            None => Err(FieldError::new(self.child(key), "missing required field")),
        }
    }

    fn optional_str(&mut self, key: &'static str) -> Result<Option<String>> {
        self.take(key)
            .map(|value| expect_str(value, &self.child(key)))
            .transpose()
    }

    /// Pick the single selected member of a union group.
    fn union(&mut self, members: &[&'static str]) -> Result<Option<(&'static str, &'a Value)>> {
        let mut chosen: Option<(&'static str, &'a Value)> = None;
        for &member in members {
            let Some(value) = self.take(member) else {
                continue;
            };
            if matches!(value, Value::Boolean(false)) {
                continue;
            }
            if let Some((previous, _)) = chosen {
                return Err(FieldError::new(
                    self.path.clone(),
                    format!("'{previous}' and '{member}' are mutually exclusive"),
                ));
            }
            chosen = Some((member, value));
        }
        Ok(chosen)
    }

    fn finish(self) -> Result<()> {
        for (key, _) in self.table.fields() {
            if !self.seen.iter().any(|seen| *seen == key) {
                return Err(FieldError::new(self.child(key), "unknown field"));
            }
        }
        Ok(())
    }
}

fn index(path: &str, i: usize) -> String {
    format!("{path}[{}]", i + 1)
}

fn mismatch(path: &str, expected: &str, value: &Value) -> FieldError {
    FieldError::new(path, format!("expected {expected}, got {}", value.type_name()))
}

fn expect_str(value: &Value, path: &str) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| mismatch(path, "string", value))
}

fn expect_table<'a>(value: &'a Value, path: &str) -> Result<&'a Table> {
    value.as_table().ok_or_else(|| mismatch(path, "table", value))
}

fn expect_sequence<'a>(value: &'a Value, path: &str) -> Result<&'a [Value]> {
    match value.as_table() {
        Some(table) if table.fields().next().is_none() => Ok(table.sequence()),
        Some(_) => Err(FieldError::new(path, "expected sequence, got keyed fields")),
        None => Err(mismatch(path, "sequence", value)),
    }
}

fn expect_void(value: &Value, path: &str) -> Result<()> {
    match value {
        Value::Boolean(true) => Ok(()),
        Value::Table(t) if t.is_empty() => Ok(()),
        other => Err(mismatch(path, "true or an empty table", other)),
    }
}

fn parse_mode(value: &Value, path: &str) -> Result<String> {
    let mode = expect_str(value, path)?;
    let valid = (1..=4).contains(&mode.len())
        && mode.bytes().all(|b| (b'0'..=b'7').contains(&b));
    if valid {
        Ok(mode)
    } else {
        Err(FieldError::new(
            path,
            format!("expected octal permission string such as \"0644\", got {mode:?}"),
        ))
    }
}
