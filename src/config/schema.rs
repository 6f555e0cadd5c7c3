//! Settings file schema.
//!
//! These structs map to the optional YAML settings file passed with
//! `--config`. Every field is optional so a file only needs to mention
//! the values it wants to pin.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::HarnessError;

/// Root of the harness settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Diagnostics logging settings.
    pub logging: LoggingSettings,
}

/// The `logging:` section of the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Verbosity level, 0 (quiet) to 4 (debug).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<u8>,

    /// Color mode: `true`, `false` or `fabulous`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Buffer every log line and write it to disk if a job fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dump_logs: Option<bool>,

    /// Directory the failure dump is written to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dump_dir: Option<PathBuf>,
}

/// How the primary log sink renders lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Pass lines through untouched (`--color false`).
    Plain,
    /// Wrap each line in its severity color (`--color true`).
    #[default]
    Colorized,
    /// Rainbow rendering (`--color fabulous`).
    Decorative,
}

impl ColorMode {
    /// The flag value that selects this mode.
    pub fn as_flag(&self) -> &'static str {
        match self {
            Self::Plain => "false",
            Self::Colorized => "true",
            Self::Decorative => "fabulous",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_flag())
    }
}

impl FromStr for ColorMode {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "true" => Ok(Self::Colorized),
            "false" => Ok(Self::Plain),
            "fabulous" => Ok(Self::Decorative),
            _ => Err(HarnessError::Configuration {
                setting: "color".to_string(),
                value: s.to_string(),
                message: "valid options are true, false, fabulous".to_string(),
            }),
        }
    }
}
