//! Per-step outcome records.

use std::fmt;
use std::time::Duration;

/// Status of a step within a job run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Step is waiting to run.
    Pending,

    /// Step is currently executing.
    Running,

    /// Step completed successfully.
    Succeeded,

    /// Step failed.
    Failed,

    /// Step never ran because an earlier step failed or the job was cancelled.
    Skipped,
}

impl StepStatus {
    /// Check if this is a terminal state (no more changes expected).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StepStatus::Succeeded | StepStatus::Failed | StepStatus::Skipped
        )
    }

    /// Get a display character for this status.
    pub fn display_char(&self) -> char {
        match self {
            StepStatus::Pending => '○',
            StepStatus::Running => '◉',
            StepStatus::Succeeded => '✓',
            StepStatus::Failed => '✗',
            StepStatus::Skipped => '⊘',
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepStatus::Pending => "pending",
            StepStatus::Running => "running",
            StepStatus::Succeeded => "succeeded",
            StepStatus::Failed => "failed",
            StepStatus::Skipped => "skipped",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of one step in a job run.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// Zero-based position in the job.
    pub index: usize,

    /// Step name.
    pub name: String,

    /// Scenario the step was spliced from, if any.
    pub scenario: Option<String>,

    pub status: StepStatus,

    /// Time spent wiring and running the step.
    pub duration: Duration,

    /// Error message (if failed or skipped for a reason).
    pub error: Option<String>,
}

impl StepReport {
    pub fn pending(index: usize, name: &str, scenario: Option<&str>) -> Self {
        Self {
            index,
            name: name.to_string(),
            scenario: scenario.map(str::to_string),
            status: StepStatus::Pending,
            duration: Duration::ZERO,
            error: None,
        }
    }

    /// Name qualified with its scenario, e.g. `dns/resolve-ingress`.
    pub fn qualified_name(&self) -> String {
        match &self.scenario {
            Some(scenario) => format!("{}/{}", scenario, self.name),
            None => self.name.clone(),
        }
    }

    /// Generate a summary line for display.
    pub fn summary_line(&self) -> String {
        let name = self.qualified_name();
        let ch = self.status.display_char();

        match self.status {
            StepStatus::Succeeded => {
                format!("{} {} ({})", ch, name, format_duration(self.duration))
            }
            StepStatus::Failed => {
                let error = self.error.as_deref().unwrap_or("unknown error");
                format!("{} {} - {}", ch, name, error)
            }
            StepStatus::Skipped => match &self.error {
                Some(reason) => format!("{} {} (skipped: {})", ch, name, reason),
                None => format!("{} {} (skipped)", ch, name),
            },
            _ => format!("{} {}", ch, name),
        }
    }
}

/// Format a duration for summary lines.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs == 0 {
        format!("{}ms", millis)
    } else if secs < 60 {
        format!("{}.{}s", secs, millis / 100)
    } else {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    }
}
