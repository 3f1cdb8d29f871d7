//! Diagnostics — per-document analysis reporting.
//!
//! Document-level failures (invalid JSON, failed meta-schema validation,
//! malformed references) are recovered locally: the document is skipped with
//! a diagnostic and the run continues. The collector makes those skips
//! explicit result values for the caller instead of log-only side effects.

use std::path::{Path, PathBuf};
use std::sync::Arc;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// A diagnostic message, optionally tied to a corpus file.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Diagnostic code (e.g. "W0001").
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
    /// The document this diagnostic refers to, when it arose from a file.
    pub path: Option<PathBuf>,
}

impl Diagnostic {
    pub fn error(message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Error,
            code: None,
            message: message.into(),
            path: None,
        }
    }

    pub fn warning(message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Warning,
            code: None,
            message: message.into(),
            path: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Standard diagnostic codes for analysis errors and warnings.
pub mod codes {
    /// An `id`/`$ref` string had no usable segments; the document was skipped.
    pub const MALFORMED_REFERENCE: &str = "E0001";
    /// Internal invariant violation: a reference was registered twice.
    pub const DUPLICATE_CONCEPT: &str = "E0002";
    /// A document failed JSON parsing or meta-schema validation.
    pub const INVALID_DOCUMENT: &str = "W0001";
    /// A pending edge could not be resolved and was bound to Unknown.
    pub const UNRESOLVED_REFERENCE: &str = "W0002";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during an analysis run.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Record a skipped document (unparsable JSON or failed validation).
    pub fn invalid_document(&mut self, path: &Path, reason: &str) {
        tracing::warn!("skipping {}: {reason}", path.display());
        self.add(
            Diagnostic::warning(format!(
                "{} is not a valid JSON Schema document: {reason}",
                path.display()
            ))
            .with_code(codes::INVALID_DOCUMENT)
            .with_path(path),
        );
    }

    /// Record a document abandoned over a malformed `id`/`$ref` string.
    pub fn malformed_reference(&mut self, path: Option<&Path>, detail: &str) {
        let mut diagnostic = Diagnostic::error(detail.to_string())
            .with_code(codes::MALFORMED_REFERENCE);
        if let Some(path) = path {
            tracing::warn!("abandoning {}: {detail}", path.display());
            diagnostic = diagnostic.with_path(path);
        }
        self.add(diagnostic);
    }

    /// Record a pending edge that resolved to the Unknown placeholder.
    pub fn unresolved_reference(&mut self, owner: &str, reference: &str) {
        self.add(
            Diagnostic::warning(format!(
                "unresolved reference '{reference}' on '{owner}' bound to Unknown"
            ))
            .with_code(codes::UNRESOLVED_REFERENCE),
        );
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}
