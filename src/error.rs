//! Error and diagnostic types.
//!
//! `RepairError` covers the extraction/repair/parse stage (analogous to the
//! teacher's `RepairError`); `Diagnostic` is the schema/stream/SQL-stage domain
//! error, carried as ordinary data rather than propagated with `?` past the
//! validator boundary.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepairError {
    #[error("unexpected end of input at position {0}")]
    UnexpectedEnd(usize),
    #[error("unexpected character {0:?} at position {1}")]
    UnexpectedChar(char, usize),
    #[error("object key expected at position {0}")]
    ObjectKeyExpected(usize),
    #[error("colon expected at position {0}")]
    ColonExpected(usize),
    #[error("duplicate key {0:?} at position {1}")]
    DuplicateKey(String, usize),
    #[error("no JSON found")]
    NoCandidateFound,
    #[error("{0} at position {1}")]
    Parse(String, usize),
}

impl RepairError {
    pub fn position(&self) -> usize {
        match self {
            RepairError::UnexpectedEnd(p)
            | RepairError::UnexpectedChar(_, p)
            | RepairError::ObjectKeyExpected(p)
            | RepairError::ColonExpected(p)
            | RepairError::DuplicateKey(_, p)
            | RepairError::Parse(_, p) => *p,
            RepairError::NoCandidateFound => 0,
        }
    }
}

/// The four error kinds recognized across the whole system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Parse,
    Schema,
    Type,
    Limit,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiagnosticKind::Parse => "parse",
            DiagnosticKind::Schema => "schema",
            DiagnosticKind::Type => "type",
            DiagnosticKind::Limit => "limit",
        };
        write!(f, "{}", s)
    }
}

/// A single path-addressable error: `{ message, path, kind, jsonPointer }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub path: String,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: path.into(),
            kind,
        }
    }

    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Parse, path, message)
    }

    pub fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Schema, path, message)
    }

    pub fn type_mismatch(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Type, path, message)
    }

    pub fn limit(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Limit, path, message)
    }

    /// RFC-6901-derived JSON Pointer equivalent of `self.path`.
    pub fn json_pointer(&self) -> String {
        crate::schema::pointer::json_pointer_from_path(&self.path)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) at {}", self.message, self.kind, self.path)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_display_includes_path_and_kind() {
        let d = Diagnostic::schema("$.age", "missing required property: age");
        let s = format!("{d}");
        assert!(s.contains("$.age"));
        assert!(s.contains("schema"));
    }
}
