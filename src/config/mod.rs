//! Harness configuration.
//!
//! - Settings file schema in [`schema`]
//! - Settings file loading in [`loader`]
//! - Flag/file/default resolution for diagnostics in [`logging`]
//!
//! # Example
//!
//! ```
//! use e2e_harness::config::{ColorMode, LoggerConfig, LoggingFlags, LoggingSettings};
//!
//! let flags = LoggingFlags {
//!     color: Some("fabulous".to_string()),
//!     ..Default::default()
//! };
//! let config = LoggerConfig::resolve(&flags, &LoggingSettings::default()).unwrap();
//! assert_eq!(config.color, ColorMode::Decorative);
//! assert_eq!(config.verbosity, 3);
//! ```

pub mod loader;
pub mod logging;
pub mod schema;

pub use loader::{load_config, load_config_file, parse_config};
pub use logging::{LoggerConfig, LoggingFlags, DEFAULT_VERBOSITY, MAX_VERBOSITY};
pub use schema::{ColorMode, HarnessConfig, LoggingSettings};
