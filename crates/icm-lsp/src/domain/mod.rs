//! Domain intelligence engine for the ICM language server
//!
//! Provides schema-aware assistance:
//! - Validation (bracket, keyword, field and value checks)
//! - Completion (keywords, fields, enum values, functions, examples)
//! - Hover documentation
//! - Code actions (quick fixes)
//! - Formatting
//!
//! Every provider is a function of the document text and a schema
//! snapshot. The engine only carries configuration, never a schema.

pub mod actions;
pub mod completion;
pub mod convert;
pub mod formatting;
pub mod hover;

#[cfg(test)]
mod tests;

use tower_lsp::lsp_types::{
    CodeAction, CompletionItem, Diagnostic, Hover, HoverContents, MarkupContent, MarkupKind,
    Position, TextEdit, Url,
};

use icm_core::line_index::LineIndex;
use icm_core::schema::Schema;
use icm_validate::ValidationEngine;

use crate::config::Settings;

/// Main domain engine coordinating all domain intelligence
pub struct DomainEngine {
    settings: Settings,
    validation_engine: ValidationEngine,
}

impl DomainEngine {
    /// Create a new domain engine with default configuration
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Create a domain engine honouring `settings`
    pub fn with_settings(settings: Settings) -> Self {
        let validation_engine = settings.build_engine();
        Self {
            settings,
            validation_engine,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Validate the document and convert the findings to LSP diagnostics
    pub fn validate_document(&self, text: &str, schema: &Schema) -> Vec<Diagnostic> {
        let index = LineIndex::new(text);
        self.validation_engine
            .validate(text, schema)
            .iter()
            .map(|d| convert::to_lsp_diagnostic(d, &index))
            .collect()
    }

    /// Get completions at the given position
    pub fn get_completions(
        &self,
        text: &str,
        position: Position,
        schema: &Schema,
    ) -> Vec<CompletionItem> {
        let index = LineIndex::new(text);
        let offset = convert::to_offset(&index, position);
        completion::complete(text, offset, schema, &self.settings.completion)
    }

    /// Get hover documentation for the identifier at the given position
    pub fn get_hover(&self, text: &str, position: Position, schema: &Schema) -> Option<Hover> {
        let index = LineIndex::new(text);
        let offset = convert::to_offset(&index, position);
        let (word, span) = hover::word_at(text, offset)?;
        let value = hover::hover_markdown(word, schema)?;

        Some(Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value,
            }),
            range: Some(convert::to_range(&index, span)),
        })
    }

    /// Get quick fixes for the diagnostics of a code action request
    pub fn get_code_actions(
        &self,
        uri: &Url,
        text: &str,
        diagnostics: &[Diagnostic],
        schema: &Schema,
    ) -> Vec<CodeAction> {
        actions::code_actions(
            uri,
            text,
            diagnostics,
            schema,
            &self.settings.formatting.format_snippet,
        )
    }

    /// Get formatting edits for the whole document
    pub fn get_formatting(&self, text: &str) -> Vec<TextEdit> {
        formatting::formatting_edits(text)
    }
}

impl Default for DomainEngine {
    fn default() -> Self {
        Self::new()
    }
}
