//! Loading settings and the schema from disk
//!
//! Neither loader fails: a missing or broken file is logged and replaced
//! by defaults (settings) or an empty schema.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use icm_core::schema::Schema;

use super::Settings;

/// Settings file looked up in the workspace root
pub const CONFIG_FILE_NAME: &str = "icm.toml";

/// Schema location used when none is configured, relative to the root
pub const DEFAULT_SCHEMA_PATH: &str = "schemas/dsl_icm.json";

/// Read `icm.toml` from the workspace root, falling back to defaults
pub fn load_workspace_settings(root: Option<&Path>) -> Settings {
    let Some(root) = root else {
        return Settings::default();
    };

    let path = root.join(CONFIG_FILE_NAME);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => {
            debug!("No {} in {}, using defaults", CONFIG_FILE_NAME, root.display());
            return Settings::default();
        }
    };

    match Settings::from_toml_str(&content) {
        Ok(settings) => {
            info!("Loaded settings from {}", path.display());
            settings
        }
        Err(e) => {
            warn!("Invalid {}: {}, using defaults", path.display(), e);
            Settings::default()
        }
    }
}

/// Decide which schema file to load.
///
/// The configured path wins when it exists; otherwise the default location
/// under the root is tried. A configured but missing path is still
/// returned so the failure gets logged by [`load_schema`].
pub fn resolve_schema_path(settings: &Settings, root: Option<&Path>) -> Option<PathBuf> {
    let configured = settings.schema.path.as_deref().map(|p| {
        let path = PathBuf::from(p);
        match root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path,
        }
    });

    if let Some(path) = &configured {
        if path.is_file() {
            return configured;
        }
    }

    let fallback = root.map(|root| root.join(DEFAULT_SCHEMA_PATH));
    match fallback {
        Some(path) if path.is_file() => Some(path),
        _ => configured,
    }
}

/// Load the schema, yielding an empty schema on any failure
pub fn load_schema(settings: &Settings, root: Option<&Path>) -> Schema {
    let Some(path) = resolve_schema_path(settings, root) else {
        info!("No schema configured, starting with an empty schema");
        return Schema::default();
    };

    match Schema::from_path(&path) {
        Ok(schema) => {
            info!(
                "Loaded schema from {} ({} keywords, {} fields)",
                path.display(),
                schema.keywords.len(),
                schema.fields.len()
            );
            schema
        }
        Err(e) => {
            warn!("Failed to load schema: {}", e);
            Schema::default()
        }
    }
}
