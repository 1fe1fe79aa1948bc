//! Configuration engine
//!
//! Settings are loaded from `icm.toml` in the workspace root and can be
//! replaced by the editor's `initializationOptions`:
//!
//! ```toml
//! [schema]
//! path = "schemas/dsl_icm.json"
//!
//! [rules]
//! missing_format = "warning"   # error | warning | ignore
//! required_params = "warning"
//! format_keywords = ["records", "codes", "orders"]
//!
//! [completion]
//! functions = true
//! examples = true
//!
//! [formatting]
//! format_snippet = " Format=!({})\\CR; "
//! ```

mod loader;
mod settings;


pub use loader::{
    load_schema, load_workspace_settings, resolve_schema_path, CONFIG_FILE_NAME,
    DEFAULT_SCHEMA_PATH,
};
pub use settings::{
    CompletionSettings, FormattingSettings, RuleSettings, RuleSeverity, SchemaSettings, Settings,
    DEFAULT_FORMAT_SNIPPET,
};
