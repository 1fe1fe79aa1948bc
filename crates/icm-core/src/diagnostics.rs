//! Diagnostics for ICM documents
//!
//! This module provides the structures used to report structural and
//! semantic problems found in a document. Spans are byte offsets into the
//! analyzed text; converting them to line/column is the caller's job
//! (see [`crate::line_index::LineIndex`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A diagnostic message produced by analysis
///
/// # Example
///
/// ```
/// use icm_core::diagnostics::{Diagnostic, DiagnosticCode, Span};
///
/// let diag = Diagnostic::error("unknown keyword 'Recrods'", Span::new(1, 8))
///     .with_code(DiagnosticCode::UnknownKeyword)
///     .with_help("check the keyword list of the schema");
/// assert!(diag.is_error());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level of the diagnostic
    pub severity: Severity,

    /// The diagnostic message
    pub message: String,

    /// Stable code used for quick-fix dispatch; generic errors carry none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<DiagnosticCode>,

    /// Source location where the issue occurred
    pub span: Span,

    /// Optional file path where the issue occurred
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Additional help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Warning, indicates a recommendation that is not followed
    Warning,

    /// Error, indicates a defect that should be fixed
    Error,
}

/// Stable diagnostic codes
///
/// The wire form (`ICM001`...) is what editors see; quick fixes are keyed
/// on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// A keyword that should carry a `Format` parameter does not
    #[serde(rename = "ICM001")]
    MissingFormat,
    /// Block header names no keyword of the schema
    #[serde(rename = "ICM002")]
    UnknownKeyword,
    /// Field key names no field of the schema
    #[serde(rename = "ICM003")]
    UnknownField,
    /// Unmatched `[` or `]`
    #[serde(rename = "ICM004")]
    InvalidBrackets,
    /// The same key appears twice in one block
    #[serde(rename = "ICM005")]
    DuplicateField,
}

impl DiagnosticCode {
    /// All codes, in numeric order
    pub const ALL: [DiagnosticCode; 5] = [
        DiagnosticCode::MissingFormat,
        DiagnosticCode::UnknownKeyword,
        DiagnosticCode::UnknownField,
        DiagnosticCode::InvalidBrackets,
        DiagnosticCode::DuplicateField,
    ];

    /// Wire form of the code
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::MissingFormat => "ICM001",
            DiagnosticCode::UnknownKeyword => "ICM002",
            DiagnosticCode::UnknownField => "ICM003",
            DiagnosticCode::InvalidBrackets => "ICM004",
            DiagnosticCode::DuplicateField => "ICM005",
        }
    }

    /// Symbolic name of the code
    pub fn name(self) -> &'static str {
        match self {
            DiagnosticCode::MissingFormat => "MISSING_FORMAT",
            DiagnosticCode::UnknownKeyword => "UNKNOWN_KEYWORD",
            DiagnosticCode::UnknownField => "UNKNOWN_FIELD",
            DiagnosticCode::InvalidBrackets => "INVALID_BRACKETS",
            DiagnosticCode::DuplicateField => "DUPLICATE_FIELD",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagnosticCode {
    type Err = ();

    /// Accepts either the wire form or the symbolic name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == s || code.name() == s)
            .ok_or(())
    }
}

/// A source location span
///
/// Half-open byte range `[start, end)` into the analyzed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: usize,

    /// End offset (exclusive)
    pub end: usize,

    /// Optional line number (1-indexed), filled in for display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,

    /// Optional column number (1-indexed), filled in for display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: Severity, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity,
            message: message.into(),
            code: None,
            span,
            file: None,
            help: None,
        }
    }

    /// Create an error diagnostic
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Error, message, span)
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Warning, message, span)
    }

    /// Set the diagnostic code
    pub fn with_code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Set the file path
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Check if this is an error-level diagnostic
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Check if this is a warning-level diagnostic
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl Span {
    /// Create a new span from start and end offsets
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            line: None,
            column: None,
        }
    }

    /// Set both line and column
    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Get the length of the span
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this span contains an offset
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: severity[code]: message
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)?;

        if let Some(ref file) = self.file {
            write!(f, "\n  --> {}", file)?;
            if let (Some(line), Some(col)) = (self.span.line, self.span.column) {
                write!(f, ":{}:{}", line, col)?;
            }
        }

        if let Some(ref help) = self.help {
            write!(f, "\n  = help: {}", help)?;
        }

        Ok(())
    }
}
