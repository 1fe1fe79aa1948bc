//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glob::glob;
use tracing::{debug, info, warn};

use icm_core::diagnostics::Diagnostic;
use icm_core::format::format_text;
use icm_core::line_index::LineIndex;
use icm_core::schema::Schema;
use icm_lsp::config::{self, Settings, CONFIG_FILE_NAME};
use icm_validate::ValidationEngine;

/// Output format for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

#[derive(Parser)]
#[command(name = "icm")]
#[command(author, version, about = "Check and format ICM queries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate ICM files against the schema
    Check {
        /// Input files or glob patterns
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Schema file (defaults to the configured or workspace schema)
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Format an ICM file
    Fmt {
        /// Input ICM file
        input: PathBuf,

        /// Write the result back instead of printing it
        #[arg(short, long)]
        write: bool,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    // Ignore a second install when embedded in another tracing setup
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            inputs,
            schema,
            config,
            format,
        } => {
            check_command(&inputs, schema.as_deref(), config.as_deref(), format)?;
        }
        Commands::Fmt { input, write } => {
            fmt_command(&input, write)?;
        }
    }

    Ok(())
}

/// Execute the check command
///
/// Exits the process with status 1 when any error-severity diagnostic is
/// found.
pub fn check_command(
    inputs: &[String],
    schema_path: Option<&Path>,
    config_path: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let settings = load_settings(config_path)?;
    let schema = load_schema(&settings, schema_path)?;
    let engine = settings.build_engine();
    let paths = expand_inputs(inputs)?;

    let diagnostics = check_files(&paths, &schema, &engine)?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&diagnostics)
                .context("Failed to serialize diagnostics to JSON")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            if diagnostics.is_empty() {
                println!("✓ No issues found in {} file(s)", paths.len());
            } else {
                for diag in &diagnostics {
                    println!("{}", diag);
                    println!();
                }
                let error_count = diagnostics.iter().filter(|d| d.is_error()).count();
                let warning_count = diagnostics.iter().filter(|d| d.is_warning()).count();
                println!(
                    "Found {} error(s) and {} warning(s)",
                    error_count, warning_count
                );
            }
        }
    }

    // Exit with error code if there are errors
    if diagnostics.iter().any(|d| d.is_error()) {
        std::process::exit(1);
    }

    Ok(())
}

/// Validate each file, tagging diagnostics with file name and 1-based position
pub fn check_files(
    paths: &[PathBuf],
    schema: &Schema,
    engine: &ValidationEngine,
) -> Result<Vec<Diagnostic>> {
    let mut diagnostics = Vec::new();

    for path in paths {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?;
        let index = LineIndex::new(&content);

        let found = engine.validate(&content, schema);
        debug!("{}: {} diagnostic(s)", path.display(), found.len());

        diagnostics.extend(found.into_iter().map(|mut diag| {
            let (line, column) = index.line_col(diag.span.start);
            diag.span = diag.span.with_position(line, column);
            diag.with_file(path.display().to_string())
        }));
    }

    Ok(diagnostics)
}

/// Execute the fmt command
pub fn fmt_command(input: &Path, write: bool) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    let formatted = format_text(&content);

    if write {
        if formatted != content {
            fs::write(input, &formatted)
                .with_context(|| format!("Failed to write file: {}", input.display()))?;
            info!("Formatted {}", input.display());
        }
    } else {
        print!("{}", formatted);
    }

    Ok(())
}

/// Expand input arguments, treating any argument with glob syntax as a pattern
pub fn expand_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for input in inputs {
        if input.contains(['*', '?', '[']) {
            let entries =
                glob(input).with_context(|| format!("Invalid glob pattern: {}", input))?;
            for entry in entries.flatten() {
                if entry.is_file() {
                    paths.push(entry);
                }
            }
        } else {
            let path = PathBuf::from(input);
            if !path.exists() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            paths.push(path);
        }
    }

    if paths.is_empty() {
        anyhow::bail!("No input files matched");
    }

    Ok(paths)
}

/// Load settings from a config file or use defaults
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            Settings::from_toml_str(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))
        }
        None => discover_settings(Path::new(".")),
    }
}

/// Read `icm.toml` from `dir`; a broken file is logged and ignored
fn discover_settings(dir: &Path) -> Result<Settings> {
    let candidate = dir.join(CONFIG_FILE_NAME);
    if !candidate.exists() {
        return Ok(Settings::default());
    }

    let content = fs::read_to_string(&candidate)
        .with_context(|| format!("Failed to read config: {}", candidate.display()))?;
    match Settings::from_toml_str(&content) {
        Ok(settings) => Ok(settings),
        Err(e) => {
            warn!("Invalid {}: {}, using defaults", candidate.display(), e);
            Ok(Settings::default())
        }
    }
}

/// Load the schema named on the command line, or the workspace schema
///
/// An explicit schema must load; the workspace schema falls back to an
/// empty one like the language server does.
pub fn load_schema(settings: &Settings, schema_path: Option<&Path>) -> Result<Schema> {
    match schema_path {
        Some(path) => Schema::from_path(path)
            .with_context(|| format!("Failed to load schema: {}", path.display())),
        None => {
            let root = std::env::current_dir().context("Failed to read current directory")?;
            Ok(config::load_schema(settings, Some(root.as_path())))
        }
    }
}
