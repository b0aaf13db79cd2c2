//! Diagnostics returned to the orchestrator.
//!
//! Every lifecycle call reports its outcome as a list of diagnostics instead
//! of a `Result`: an empty list is success, any error-severity entry is a
//! failed operation.

use std::fmt;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic: a short summary plus optional detail text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: String::new(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    /// Render an error value verbatim as an error diagnostic.
    pub fn from_err(err: &dyn std::error::Error) -> Self {
        Self::error(err.to_string())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        if self.detail.is_empty() {
            write!(f, "{}: {}", level, self.summary)
        } else {
            write!(f, "{}: {}: {}", level, self.summary, self.detail)
        }
    }
}

/// Collected diagnostics for one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single error diagnostic with the given summary.
    pub fn error(summary: impl Into<String>) -> Self {
        Self(vec![Diagnostic::error(summary)])
    }

    /// Single error diagnostic carrying the error's text.
    pub fn from_err(err: &dyn std::error::Error) -> Self {
        Self(vec![Diagnostic::from_err(err)])
    }

    pub fn has_error(&self) -> bool {
        self.0.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    /// Summary of the first error, if any.
    pub fn first_error(&self) -> Option<&str> {
        self.0
            .iter()
            .find(|d| d.severity == Severity::Error)
            .map(|d| d.summary.as_str())
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diag: Diagnostic) -> Self {
        Self(vec![diag])
    }
}
