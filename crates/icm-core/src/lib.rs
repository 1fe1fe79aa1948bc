//! icm-core - analysis primitives for the ICM query DSL
//!
//! An ICM document is a sequence of bracket-delimited blocks:
//!
//! ```text
//! [Records: Format=!({})\CR; Range=NOW-3d...NOW]
//! ```
//!
//! This crate holds everything that does not depend on an editor or on the
//! validation engine:
//! - `schema`: the schema model and name lookups
//! - `value`: normalization of raw field values
//! - `parser`: tolerant block and field scanning with absolute offsets
//! - `range`: the `Range` field micro-grammar
//! - `context`: cursor-context classification for completion
//! - `suggest`: "did you mean" edit-distance search
//! - `format`: the line formatter
//! - `diagnostics` and `line_index`: reporting and offset conversion
//!
//! # Example
//!
//! ```
//! use icm_core::context::classify;
//! use icm_core::schema::Schema;
//!
//! let schema = Schema::default();
//! let ctx = classify("[Rec", &schema);
//! assert!(ctx.expect_keyword);
//! ```

pub mod context;
pub mod diagnostics;
pub mod format;
pub mod line_index;
pub mod parser;
pub mod range;
pub mod schema;
pub mod suggest;
pub mod value;

// Re-export main types and functions
pub use context::{classify, CursorContext};
pub use diagnostics::{Diagnostic, DiagnosticCode, Severity, Span};
pub use line_index::LineIndex;
pub use parser::{scan_blocks, split_fields, Block, FieldOccurrence, Segment};
pub use range::is_valid_range;
pub use schema::{FieldSpec, FunctionSpec, KeywordSpec, Schema, SchemaError, SchemaRef};
pub use suggest::{levenshtein, suggest, DEFAULT_THRESHOLD};
pub use value::normalize_value;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
