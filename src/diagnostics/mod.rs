//! Diagnostics logging for jobs and steps.
//!
//! - [`Severity`] - severities, verbosity tiers, icons and colors
//! - [`Logger`] - the leveled logger handed to every job run
//! - [`LogSink`] / [`SinkFactory`] - primary output selection by color mode
//! - [`LogBuffer`] - in-memory capture used for failure dumps
//!
//! # Example
//!
//! ```
//! use e2e_harness::config::{ColorMode, LoggerConfig};
//! use e2e_harness::diagnostics::{LogBuffer, Logger};
//!
//! let config = LoggerConfig {
//!     verbosity: 0,
//!     color: ColorMode::Plain,
//!     dump_logs: true,
//!     ..Default::default()
//! };
//! let logger = Logger::with_sink(&config, Box::new(LogBuffer::new()));
//! logger.success("cluster created");
//! logger.info("hidden at verbosity 0");
//!
//! assert_eq!(logger.buffer().unwrap().len(), 1);
//! ```

pub mod logger;
pub mod severity;
pub mod sink;

pub use logger::{dump_file_name, format_line, Logger, TIMESTAMP_LAYOUT};
pub use severity::{threshold_enables, Severity};
pub use sink::{
    select_primary, ColorSink, LogBuffer, LogSink, PlainSink, RainbowSink, SinkFactory,
    TerminalSinks,
};
