//! ICM Language Server Protocol implementation
//!
//! This library provides LSP support for ICM query files, including:
//! - Diagnostics from the ICM validation engine
//! - Completion for keywords, fields, enum values, functions and examples
//! - Hover documentation from the schema
//! - Quick fixes for missing `Format` parameters and misspelled names
//! - Document formatting
//! - The `icm.reloadSchema` command
//!
//! # Library Usage
//!
//! ```ignore
//! use icm_lsp::{run_server, domain::DomainEngine};
//!
//! // Run the LSP server
//! run_server().await;
//!
//! // Or use the domain engine directly
//! let engine = DomainEngine::new();
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Start the language server (typically called by an editor)
//! icm-lsp
//!
//! # With debug logging
//! RUST_LOG=debug icm-lsp
//! ```

pub mod config;
pub mod domain;
pub mod server;

// Re-export main entry point
pub use server::{run_server, Backend, RELOAD_SCHEMA_COMMAND};

// Re-export commonly used types
pub use config::Settings;
pub use domain::DomainEngine;
