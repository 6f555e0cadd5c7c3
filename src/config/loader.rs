//! Settings file loading.

use crate::config::schema::HarnessConfig;
use crate::error::{HarnessError, Result};
use std::fs;
use std::path::Path;

/// Load a settings file and parse it into [`HarnessConfig`].
///
/// # Errors
///
/// Returns `Io` if the file can't be read.
/// Returns `ConfigParse` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<HarnessConfig> {
    let content = fs::read_to_string(path)?;
    parse_config(&content, path)
}

/// Parse YAML content into [`HarnessConfig`].
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_config(content: &str, source_path: &Path) -> Result<HarnessConfig> {
    if content.trim().is_empty() {
        return Ok(HarnessConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| HarnessError::ConfigParse {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load the settings file if one was given, otherwise use defaults.
pub fn load_config(path: Option<&Path>) -> Result<HarnessConfig> {
    match path {
        Some(path) => load_config_file(path),
        None => Ok(HarnessConfig::default()),
    }
}
