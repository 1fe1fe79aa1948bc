//! icm CLI - Command-line interface library
//!
//! This library provides the CLI functionality for ICM queries:
//! - Check: Validate ICM files against a schema
//! - Fmt: Apply the line formatter
//!
//! # Library Usage
//!
//! ```ignore
//! use icm_cli::{run_cli, check_files, OutputFormat};
//!
//! // Run the full CLI
//! run_cli();
//!
//! // Or use individual commands programmatically
//! let diagnostics = check_files(&paths, &schema, &engine)?;
//! check_command(&inputs, None, None, OutputFormat::Json)?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Check every query in a directory
//! icm check "queries/**/*.icm"
//!
//! # Check with an explicit schema, JSON output
//! icm check query.icm --schema schemas/dsl_icm.json --format json
//!
//! # Format a query in place
//! icm fmt query.icm --write
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{
    check_command, check_files, expand_inputs, fmt_command, load_schema, load_settings, run_cli,
    OutputFormat,
};
