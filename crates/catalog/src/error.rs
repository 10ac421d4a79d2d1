//! Error types for declaration and catalog operations.
//!
//! Declaration errors are positional: each one names the entry point that
//! rejected the call and, where it applies, the 1-based argument that caused
//! it. They are meant to be shown verbatim to whoever wrote the declarations.

use crate::tag::TypeTag;
use std::fmt;
use thiserror::Error;

/// Categories of catalog errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong number of arguments to an entry point
    ArgumentCount,
    /// An argument had the wrong type or shape
    ArgumentType,
    /// A spec carried a resource tag outside the known set
    UnknownType,
    /// A spec's fields did not match the payload shape
    Validation,
    /// Reading or writing a serialized catalog failed
    Io,
}

impl ErrorKind {
    /// Get a user-friendly description of this error kind.
    pub fn description(&self) -> &'static str {
        match self {
            Self::ArgumentCount => "Wrong number of arguments",
            Self::ArgumentType => "Bad argument",
            Self::UnknownType => "Unknown resource type",
            Self::Validation => "Invalid resource fields",
            Self::Io => "Catalog I/O failure",
        }
    }

    /// Whether the error comes from the declarations themselves (as opposed
    /// to the environment).
    pub fn is_usage(&self) -> bool {
        !matches!(self, Self::Io)
    }
}

/// A field-level mismatch found while copying a spec into a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Dotted path to the offending field, e.g. `command.argv[2]`
    pub path: String,
    /// What was wrong with it
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

impl std::error::Error for FieldError {}

/// Errors raised by the declaration surface and catalog I/O.
#[derive(Debug, Error)]
pub enum Error {
    /// An entry point was called with the wrong number of arguments
    #[error("'{function}' takes {expected} {}, got {got}", arguments(.expected))]
    ArgumentCount {
        function: &'static str,
        expected: usize,
        got: usize,
    },

    /// An argument had the wrong type
    #[error("bad argument #{position} to '{function}' ({message})")]
    ArgumentType {
        function: &'static str,
        /// 1-based argument position
        position: usize,
        message: String,
    },

    /// The spec argument carried a tag that is not a known resource kind
    #[error("bad argument #{position} to '{function}' (unknown resource type {tag})")]
    UnknownType {
        function: &'static str,
        position: usize,
        tag: TypeTag,
    },

    /// The spec's fields did not fit the payload shape
    #[error("bad argument #{position} to '{function}' (invalid {resource_kind}: {source})")]
    Validation {
        function: &'static str,
        position: usize,
        resource_kind: &'static str,
        #[source]
        source: FieldError,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Get the error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ArgumentCount { .. } => ErrorKind::ArgumentCount,
            Error::ArgumentType { .. } => ErrorKind::ArgumentType,
            Error::UnknownType { .. } => ErrorKind::UnknownType,
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Io(_) | Error::Json(_) => ErrorKind::Io,
        }
    }

    /// The 1-based argument position this error refers to, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            Error::ArgumentType { position, .. }
            | Error::UnknownType { position, .. }
            | Error::Validation { position, .. } => Some(*position),
            _ => None,
        }
    }

    pub(crate) fn argument(
        function: &'static str,
        position: usize,
        message: impl Into<String>,
    ) -> Self {
        Error::ArgumentType {
            function,
            position,
            message: message.into(),
        }
    }
}

fn arguments(n: &usize) -> &'static str {
    if *n == 1 { "argument" } else { "arguments" }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_count_message() {
        let err = Error::ArgumentCount {
            function: "mcm.resource",
            expected: 3,
            got: 2,
        };
        assert_eq!(err.to_string(), "'mcm.resource' takes 3 arguments, got 2");
        assert_eq!(err.kind(), ErrorKind::ArgumentCount);
        assert_eq!(err.position(), None);

        let err = Error::ArgumentCount {
            function: "mcm.hash",
            expected: 1,
            got: 0,
        };
        assert_eq!(err.to_string(), "'mcm.hash' takes 1 argument, got 0");
    }

    #[test]
    fn test_argument_type_message() {
        let err = Error::argument("mcm.resource", 3, "expect resource table");
        assert_eq!(
            err.to_string(),
            "bad argument #3 to 'mcm.resource' (expect resource table)"
        );
        assert_eq!(err.position(), Some(3));
    }

    #[test]
    fn test_validation_message_includes_field_path() {
        let err = Error::Validation {
            function: "mcm.resource",
            position: 3,
            resource_kind: "file",
            source: FieldError::new("path", "expected string, got integer"),
        };
        assert_eq!(
            err.to_string(),
            "bad argument #3 to 'mcm.resource' (invalid file: path: expected string, got integer)"
        );
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_kind_is_usage() {
        assert!(ErrorKind::ArgumentType.is_usage());
        assert!(ErrorKind::Validation.is_usage());
        assert!(!ErrorKind::Io.is_usage());
    }

    #[test]
    fn test_field_error_without_path() {
        let err = FieldError::new("", "expected table");
        assert_eq!(err.to_string(), "expected table");
    }
}
