//! Resolved diagnostics logging configuration.
//!
//! [`LoggerConfig`] is built once per process from command-line flags and
//! the optional settings file, then used to construct the shared
//! [`Logger`](crate::diagnostics::Logger).

use std::path::PathBuf;

use super::schema::{ColorMode, LoggingSettings};
use crate::error::Result;

/// Verbosity used when neither a flag nor the settings file sets one.
pub const DEFAULT_VERBOSITY: u8 = 3;

/// Highest verbosity tier with its own meaning; anything above enables
/// every severity as well.
pub const MAX_VERBOSITY: u8 = 4;

/// Process-wide logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Verbosity level; maps to a severity threshold.
    pub verbosity: u8,
    /// Primary sink rendering.
    pub color: ColorMode,
    /// Capture lines in memory for a dump on failure.
    pub dump_logs: bool,
    /// Where failure dumps go.
    pub dump_dir: PathBuf,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            verbosity: DEFAULT_VERBOSITY,
            color: ColorMode::default(),
            dump_logs: false,
            dump_dir: PathBuf::from("."),
        }
    }
}

/// Logging values given on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct LoggingFlags {
    pub verbose: Option<u8>,
    pub color: Option<String>,
    pub dump_logs: Option<bool>,
}

impl LoggerConfig {
    /// Resolve the configuration: flag, then settings file, then default.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the chosen color value is not one of
    /// `true`, `false` or `fabulous`.
    pub fn resolve(flags: &LoggingFlags, file: &LoggingSettings) -> Result<Self> {
        let defaults = Self::default();

        let color = match flags.color.as_deref().or(file.color.as_deref()) {
            Some(value) => value.parse::<ColorMode>()?,
            None => defaults.color,
        };

        Ok(Self {
            verbosity: flags
                .verbose
                .or(file.verbose)
                .unwrap_or(defaults.verbosity),
            color,
            dump_logs: flags
                .dump_logs
                .or(file.dump_logs)
                .unwrap_or(defaults.dump_logs),
            dump_dir: file.dump_dir.clone().unwrap_or(defaults.dump_dir),
        })
    }

    /// Whether the verbosity asks for debug output.
    pub fn is_debug(&self) -> bool {
        self.verbosity >= MAX_VERBOSITY
    }

    /// Level for internal tracing events at this verbosity.
    pub fn tracing_level(&self) -> &'static str {
        if self.is_debug() {
            "debug"
        } else if self.verbosity >= DEFAULT_VERBOSITY {
            "info"
        } else {
            "warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarnessError;

    #[test]
    fn defaults_match_cli_defaults() {
        let config = LoggerConfig::resolve(&LoggingFlags::default(), &LoggingSettings::default())
            .unwrap();
        assert_eq!(config.verbosity, 3);
        assert_eq!(config.color, ColorMode::Colorized);
        assert!(!config.dump_logs);
        assert_eq!(config.dump_dir, PathBuf::from("."));
    }

    #[test]
    fn flags_override_settings_file() {
        let flags = LoggingFlags {
            verbose: Some(0),
            color: Some("false".to_string()),
            dump_logs: Some(false),
        };
        let file = LoggingSettings {
            verbose: Some(4),
            color: Some("fabulous".to_string()),
            dump_logs: Some(true),
            dump_dir: Some(PathBuf::from("/var/log/e2e")),
        };

        let config = LoggerConfig::resolve(&flags, &file).unwrap();
        assert_eq!(config.verbosity, 0);
        assert_eq!(config.color, ColorMode::Plain);
        assert!(!config.dump_logs);
        assert_eq!(config.dump_dir, PathBuf::from("/var/log/e2e"));
    }

    #[test]
    fn settings_file_fills_unset_flags() {
        let file = LoggingSettings {
            verbose: Some(1),
            color: Some("fabulous".to_string()),
            dump_logs: Some(true),
            dump_dir: None,
        };

        let config = LoggerConfig::resolve(&LoggingFlags::default(), &file).unwrap();
        assert_eq!(config.verbosity, 1);
        assert_eq!(config.color, ColorMode::Decorative);
        assert!(config.dump_logs);
    }

    #[test]
    fn invalid_color_is_configuration_error() {
        let flags = LoggingFlags {
            color: Some("sometimes".to_string()),
            ..Default::default()
        };
        let err = LoggerConfig::resolve(&flags, &LoggingSettings::default()).unwrap_err();
        assert!(matches!(err, HarnessError::Configuration { .. }));
    }

    #[test]
    fn invalid_color_in_settings_file_names_the_setting() {
        let file = LoggingSettings {
            color: Some("blue".to_string()),
            ..Default::default()
        };
        let err = LoggerConfig::resolve(&LoggingFlags::default(), &file).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value \"blue\" for color: valid options are true, false, fabulous"
        );
    }

    #[test]
    fn tracing_level_follows_verbosity() {
        let level = |verbosity| {
            LoggerConfig {
                verbosity,
                ..LoggerConfig::default()
            }
            .tracing_level()
        };
        assert_eq!(level(0), "warn");
        assert_eq!(level(2), "warn");
        assert_eq!(level(3), "info");
        assert_eq!(level(4), "debug");
        assert_eq!(level(9), "debug");
    }

    #[test]
    fn debug_starts_at_max_verbosity() {
        let mut config = LoggerConfig::default();
        assert!(!config.is_debug());
        config.verbosity = 4;
        assert!(config.is_debug());
        config.verbosity = 9;
        assert!(config.is_debug());
    }
}
