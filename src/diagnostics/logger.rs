//! The diagnostics logger shared by jobs and steps.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local};

use super::severity::Severity;
use super::sink::{select_primary, LogBuffer, LogSink, SinkFactory, TerminalSinks};
use crate::config::{ColorMode, LoggerConfig};

/// Timestamp layout at the start of every line.
pub const TIMESTAMP_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

/// Leveled, optionally colorized logger with an optional capture buffer.
///
/// One `Logger` is built per process from a [`LoggerConfig`] and handed to
/// every job run (usually as `Arc<Logger>`). It is `Send + Sync`: steps may
/// log from their own worker threads, and each line reaches the sinks whole.
pub struct Logger {
    verbosity: u8,
    color: ColorMode,
    primary: Mutex<Box<dyn LogSink>>,
    buffer: Option<LogBuffer>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("verbosity", &self.verbosity)
            .field("color", &self.color)
            .field("buffered", &self.buffer.is_some())
            .finish()
    }
}

impl Logger {
    /// Build a logger that writes to stdout.
    pub fn new(config: &LoggerConfig) -> Self {
        Self::with_factory(config, &TerminalSinks)
    }

    /// Build a logger whose primary sink comes from `factory`.
    pub fn with_factory(config: &LoggerConfig, factory: &dyn SinkFactory) -> Self {
        Self::with_sink(config, select_primary(config.color, factory))
    }

    /// Build a logger around an explicit primary sink.
    pub fn with_sink(config: &LoggerConfig, primary: Box<dyn LogSink>) -> Self {
        Self {
            verbosity: config.verbosity,
            color: config.color,
            primary: Mutex::new(primary),
            buffer: config.dump_logs.then(LogBuffer::new),
        }
    }

    /// A logger that drops everything. Handy for tests and library callers
    /// that don't care about output.
    pub fn silent() -> Self {
        let config = LoggerConfig {
            color: ColorMode::Plain,
            ..LoggerConfig::default()
        };
        Self::with_sink(&config, Box::new(PlainDiscard))
    }

    pub fn verbosity(&self) -> u8 {
        self.verbosity
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color
    }

    /// The capture buffer, present when dumping is enabled.
    pub fn buffer(&self) -> Option<&LogBuffer> {
        self.buffer.as_ref()
    }

    /// Whether lines of `severity` are emitted.
    pub fn enabled(&self, severity: Severity) -> bool {
        severity.is_enabled_at(self.verbosity)
    }

    /// Emit `msg` at `severity` if the threshold allows it.
    pub fn log(&self, severity: Severity, msg: impl fmt::Display) {
        if !self.enabled(severity) {
            return;
        }
        let line = format_line(severity, &msg.to_string(), Local::now());
        self.emit(severity, &line);
    }

    fn emit(&self, severity: Severity, line: &str) {
        let rendered = if self.color == ColorMode::Colorized {
            severity.style().apply_to(line).to_string()
        } else {
            line.to_string()
        };

        let mut primary = self.primary_guard();
        // Losing a terminal line must not fail the step that logged it.
        let _ = primary.write_line(&rendered);
        if let Some(buffer) = &self.buffer {
            buffer.push_line(line);
        }
    }

    fn primary_guard(&self) -> MutexGuard<'_, Box<dyn LogSink>> {
        self.primary
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn always(&self, msg: impl fmt::Display) {
        self.log(Severity::Always, msg);
    }

    pub fn success(&self, msg: impl fmt::Display) {
        self.log(Severity::Success, msg);
    }

    pub fn deprecated(&self, msg: impl fmt::Display) {
        self.log(Severity::Deprecated, msg);
    }

    pub fn critical(&self, msg: impl fmt::Display) {
        self.log(Severity::Critical, msg);
    }

    pub fn warning(&self, msg: impl fmt::Display) {
        self.log(Severity::Warning, msg);
    }

    pub fn info(&self, msg: impl fmt::Display) {
        self.log(Severity::Info, msg);
    }

    pub fn debug(&self, msg: impl fmt::Display) {
        self.log(Severity::Debug, msg);
    }

    /// Write the capture buffer to a timestamped file under `dir`.
    ///
    /// Returns the file path, or `None` when dumping is disabled.
    pub fn dump(&self, dir: &Path) -> io::Result<Option<PathBuf>> {
        let Some(buffer) = &self.buffer else {
            return Ok(None);
        };
        let path = dir.join(dump_file_name(Local::now()));
        buffer.write_to(&path)?;
        Ok(Some(path))
    }
}

/// Format one line: timestamp, icon, message.
pub fn format_line(severity: Severity, msg: &str, now: DateTime<Local>) -> String {
    format!(
        "{} [{}]  {}",
        now.format(TIMESTAMP_LAYOUT),
        severity.icon(),
        msg.trim_end_matches('\n')
    )
}

/// File name used for a failure dump taken at `now`.
pub fn dump_file_name(now: DateTime<Local>) -> String {
    format!("e2e-{}.log", now.format("%Y%m%d-%H%M%S"))
}

struct PlainDiscard;

impl LogSink for PlainDiscard {
    fn write_line(&mut self, _line: &str) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    fn config(verbosity: u8, color: ColorMode, dump_logs: bool) -> LoggerConfig {
        LoggerConfig {
            verbosity,
            color,
            dump_logs,
            ..LoggerConfig::default()
        }
    }

    /// Logger whose primary sink is an inspectable buffer.
    fn captured(verbosity: u8, color: ColorMode) -> (Logger, LogBuffer) {
        let primary = LogBuffer::new();
        let logger = Logger::with_sink(&config(verbosity, color, false), Box::new(primary.clone()));
        (logger, primary)
    }

    fn log_every_severity(logger: &Logger) {
        logger.always("always");
        logger.success("success");
        logger.deprecated("deprecated");
        logger.critical("critical");
        logger.warning("warning");
        logger.info("info");
        logger.debug("debug");
    }

    fn messages(buffer: &LogBuffer) -> Vec<String> {
        buffer
            .lines()
            .iter()
            .map(|l| l.rsplit("  ").next().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn format_line_has_timestamp_icon_and_message() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let line = format_line(Severity::Success, "cluster ready\n", now);
        assert_eq!(line, "2024-03-09 07:05:01 [✔]  cluster ready");
    }

    #[test]
    fn verbosity_zero_keeps_announcements_only() {
        let (logger, primary) = captured(0, ColorMode::Plain);
        log_every_severity(&logger);
        assert_eq!(messages(&primary), vec!["always", "success", "deprecated"]);
    }

    #[test]
    fn verbosity_three_drops_debug() {
        let (logger, primary) = captured(3, ColorMode::Plain);
        log_every_severity(&logger);
        let got = messages(&primary);
        assert_eq!(got.len(), 6);
        assert!(!got.contains(&"debug".to_string()));
    }

    #[test]
    fn verbosity_four_and_above_emit_everything() {
        for level in [4u8, 7] {
            let (logger, primary) = captured(level, ColorMode::Plain);
            log_every_severity(&logger);
            assert_eq!(messages(&primary).len(), 7);
        }
    }

    #[test]
    fn lines_carry_icons() {
        let (logger, primary) = captured(4, ColorMode::Plain);
        logger.critical("boom");
        logger.deprecated("old flag");
        let lines = primary.lines();
        assert!(lines[0].contains("[✖]  boom"));
        assert!(lines[1].contains("[ℹ]  old flag"));
    }

    #[test]
    fn plain_mode_never_adds_escape_codes() {
        let (logger, primary) = captured(4, ColorMode::Plain);
        logger.info("plain");
        assert!(!primary.lines()[0].contains('\u{1b}'));
    }

    #[test]
    fn buffer_only_exists_when_dumping() {
        let plain = config(3, ColorMode::Plain, false);
        let without = Logger::with_sink(&plain, Box::new(LogBuffer::new()));
        assert!(without.buffer().is_none());

        let dumping = config(3, ColorMode::Plain, true);
        let with = Logger::with_sink(&dumping, Box::new(LogBuffer::new()));
        assert!(with.buffer().is_some());
    }

    #[test]
    fn buffer_receives_uncolored_copy() {
        let primary = LogBuffer::new();
        let logger = Logger::with_sink(
            &config(3, ColorMode::Colorized, true),
            Box::new(primary.clone()),
        );
        logger.warning("disk almost full");
        logger.debug("suppressed");

        let buffer = logger.buffer().unwrap();
        assert_eq!(buffer.len(), 1);
        assert!(buffer.lines()[0].ends_with("[!]  disk almost full"));
        assert_eq!(primary.len(), 1);
    }

    #[test]
    fn concurrent_logging_keeps_lines_whole() {
        let primary = LogBuffer::new();
        let logger = Arc::new(Logger::with_sink(
            &config(4, ColorMode::Plain, true),
            Box::new(primary.clone()),
        ));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let logger = Arc::clone(&logger);
                thread::spawn(move || {
                    for i in 0..25 {
                        logger.info(format!("worker {} poll {}", t, i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(primary.len(), 100);
        assert_eq!(logger.buffer().unwrap().len(), 100);
        assert!(primary.lines().iter().all(|l| l.contains("[ℹ]  worker ")));
    }

    #[test]
    fn dump_writes_buffer_to_dir() {
        let temp = TempDir::new().unwrap();
        let dumping = config(3, ColorMode::Plain, true);
        let logger = Logger::with_sink(&dumping, Box::new(LogBuffer::new()));
        logger.critical("step failed");

        let path = logger.dump(temp.path()).unwrap().unwrap();
        assert!(path.starts_with(temp.path()));
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.contains("step failed"));
    }

    #[test]
    fn dump_without_buffer_is_noop() {
        let temp = TempDir::new().unwrap();
        let logger = Logger::silent();
        assert!(logger.dump(temp.path()).unwrap().is_none());
    }

    #[test]
    fn dump_file_name_is_timestamped() {
        let now = Local.with_ymd_and_hms(2024, 12, 31, 23, 59, 58).unwrap();
        assert_eq!(dump_file_name(now), "e2e-20241231-235958.log");
    }
}
