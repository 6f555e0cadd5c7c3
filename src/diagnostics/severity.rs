//! Log severities, their verbosity tiers, and how they look.

use console::Style;
use std::fmt;

/// Icon used for severities without a dedicated one.
const FALLBACK_ICON: &str = "ℹ";

/// Severity of a diagnostics line.
///
/// Severities are grouped into tiers. A line is emitted when its tier is
/// at or below the configured verbosity, so raising the verbosity only
/// ever adds output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Always announced (job and step boundaries).
    Always,
    /// Something finished successfully.
    Success,
    /// Use of a deprecated option or behavior.
    Deprecated,
    /// A failure that stops the job.
    Critical,
    /// Something worth a second look.
    Warning,
    /// Progress detail.
    Info,
    /// Everything else.
    Debug,
}

impl Severity {
    /// Every severity, most important first.
    pub const ALL: [Severity; 7] = [
        Severity::Always,
        Severity::Success,
        Severity::Deprecated,
        Severity::Critical,
        Severity::Warning,
        Severity::Info,
        Severity::Debug,
    ];

    /// Verbosity tier at which this severity starts being emitted.
    pub fn tier(self) -> u8 {
        match self {
            Self::Always | Self::Success | Self::Deprecated => 0,
            Self::Critical => 1,
            Self::Warning => 2,
            Self::Info => 3,
            Self::Debug => 4,
        }
    }

    /// Whether a logger at `verbosity` emits this severity.
    pub fn is_enabled_at(self, verbosity: u8) -> bool {
        self.tier() <= verbosity
    }

    /// Icon shown in the line prefix.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Always => "✿",
            Self::Critical => "✖",
            Self::Info => "ℹ",
            Self::Debug => "▶",
            Self::Success => "✔",
            Self::Warning => "!",
            _ => FALLBACK_ICON,
        }
    }

    /// Color a whole line is wrapped in when the colorized sink is active.
    pub fn style(self) -> Style {
        match self {
            Self::Always | Self::Debug | Self::Warning => Style::new().green(),
            Self::Critical => Style::new().red(),
            Self::Info | Self::Success => Style::new().cyan(),
            _ => Style::new().cyan(),
        }
    }

    /// Lowercase name, used in dumps and tracing fields.
    pub fn label(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Success => "success",
            Self::Deprecated => "deprecated",
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether a logger at verbosity `level` emits `severity`.
///
/// Any level at or above the debug tier enables everything.
pub fn threshold_enables(level: u8, severity: Severity) -> bool {
    severity.is_enabled_at(level)
}
