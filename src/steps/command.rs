//! Steps that run an external program.

use std::collections::HashMap;
use std::path::PathBuf;

use serde_json::Value;
use anyhow::bail;
use tracing::debug;

use super::step::{Outputs, Step, StepContext};
use crate::error::HarnessError;
use crate::shell::{command_line, execute_streaming, CommandOptions, OutputLine};

/// Runs a program (typically the wrapped cluster tool) as a step.
///
/// Output is streamed into the diagnostics logger as it arrives: stdout
/// lines at `Info`, stderr lines at `Warning`. A non-zero exit fails the
/// step with [`HarnessError::CommandFailed`]. The program is killed if the
/// run's cancellation token trips while it is running.
#[derive(Debug, Clone)]
pub struct CommandStep {
    name: String,
    program: String,
    args: Vec<String>,
    options: CommandOptions,
    capture_stdout_as: Option<String>,
    exports: Vec<(String, Value)>,
}

impl CommandStep {
    pub fn new(name: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: Vec::new(),
            options: CommandOptions::default(),
            capture_stdout_as: None,
            exports: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.env.insert(key.into(), value.into());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options.cwd = Some(dir.into());
        self
    }

    /// Publish the program's trimmed stdout under `key` on success.
    pub fn capture_stdout_as(mut self, key: impl Into<String>) -> Self {
        self.capture_stdout_as = Some(key.into());
        self
    }

    /// Publish a fixed value under `key` on success.
    pub fn export(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.exports.push((key.into(), value.into()));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn environment(&self) -> &HashMap<String, String> {
        &self.options.env
    }

    /// The full invocation as one display string.
    pub fn command_line(&self) -> String {
        command_line(&self.program, &self.args)
    }
}

impl Step for CommandStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, ctx: &StepContext<'_>) -> anyhow::Result<Outputs> {
        let logger = ctx.logger();
        let command = self.command_line();
        logger.info(format!("running: {}", command));
        debug!(step = %self.name, command = %command, "Spawning command");

        let mut options = self.options.clone();
        options.cancel = Some(ctx.cancellation().clone());

        let result = execute_streaming(&self.program, &self.args, &options, |line| match line {
            OutputLine::Stdout(text) => logger.info(text),
            OutputLine::Stderr(text) => logger.warning(text),
        })?;

        if result.cancelled {
            bail!("cancelled while running {}", command);
        }

        if !result.success {
            return Err(HarnessError::CommandFailed {
                command,
                code: result.exit_code,
            }
            .into());
        }

        let mut outputs: Outputs = self.exports.iter().cloned().collect();
        if let Some(key) = &self.capture_stdout_as {
            outputs.insert(key.clone(), result.stdout.trim());
        }
        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColorMode, LoggerConfig};
    use crate::diagnostics::{LogBuffer, Logger};
    use crate::runner::{Cancellation, ExecutionContext};
    use serde_json::json;
    use std::time::{Duration, Instant};

    fn capturing_logger() -> (Logger, LogBuffer) {
        let primary = LogBuffer::new();
        let config = LoggerConfig {
            verbosity: 4,
            color: ColorMode::Plain,
            ..LoggerConfig::default()
        };
        (Logger::with_sink(&config, Box::new(primary.clone())), primary)
    }

    fn run_step(step: &mut CommandStep, logger: &Logger) -> anyhow::Result<Outputs> {
        run_step_until(step, logger, &Cancellation::new())
    }

    fn run_step_until(
        step: &mut CommandStep,
        logger: &Logger,
        cancel: &Cancellation,
    ) -> anyhow::Result<Outputs> {
        let values = ExecutionContext::new();
        let ctx = StepContext::new(&values, logger, cancel, 0, "test");
        step.run(&ctx)
    }

    #[test]
    fn builder_collects_invocation() {
        let step = CommandStep::new("create", "eksctl")
            .args(["create", "cluster"])
            .arg("--name")
            .arg("e2e")
            .env("AWS_PROFILE", "ci");
        assert_eq!(step.program(), "eksctl");
        assert_eq!(step.arguments().len(), 4);
        assert_eq!(step.command_line(), "eksctl create cluster --name e2e");
        assert_eq!(
            step.environment().get("AWS_PROFILE").map(String::as_str),
            Some("ci")
        );
    }

    #[cfg(unix)]
    #[test]
    fn streams_output_into_logger() {
        let (logger, primary) = capturing_logger();
        let mut step = CommandStep::new("echo", "sh").args(["-c", "echo up; echo warn 1>&2"]);
        run_step(&mut step, &logger).unwrap();

        let lines = primary.lines();
        assert!(lines.iter().any(|l| l.contains("[ℹ]  running: sh -c")));
        assert!(lines.iter().any(|l| l.ends_with("[ℹ]  up")));
        assert!(lines.iter().any(|l| l.ends_with("[!]  warn")));
    }

    #[cfg(unix)]
    #[test]
    fn captures_stdout_and_exports() {
        let logger = Logger::silent();
        let mut step = CommandStep::new("name", "echo")
            .arg("  e2e-cluster  ")
            .capture_stdout_as("cluster_name")
            .export("region", "us-west-2");
        let outputs = run_step(&mut step, &logger).unwrap();
        assert_eq!(outputs.get("cluster_name"), Some(&json!("e2e-cluster")));
        assert_eq!(outputs.get("region"), Some(&json!("us-west-2")));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_fails() {
        let logger = Logger::silent();
        let mut step = CommandStep::new("fail", "sh")
            .args(["-c", "exit 4"])
            .export("never", true);
        let err = run_step(&mut step, &logger).unwrap_err();
        match err.downcast_ref::<HarnessError>() {
            Some(HarnessError::CommandFailed { code, command }) => {
                assert_eq!(*code, Some(4));
                assert_eq!(command, "sh -c exit 4");
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn invalid_utf8_output_is_logged_and_run_continues() {
        let (logger, primary) = capturing_logger();
        let mut step = CommandStep::new("bytes", "sh")
            .args(["-c", "printf 'caf\\351\\n'; echo after-bad-byte"]);
        run_step(&mut step, &logger).unwrap();

        let lines = primary.lines();
        assert!(lines.iter().any(|l| l.ends_with("[ℹ]  caf\u{FFFD}")));
        assert!(lines.iter().any(|l| l.ends_with("[ℹ]  after-bad-byte")));
    }

    #[cfg(unix)]
    #[test]
    fn cancellation_stops_running_program() {
        let logger = Logger::silent();
        let cancel = Cancellation::with_timeout(Duration::from_millis(200));
        let mut step = CommandStep::new("hang", "sleep").arg("30").export("never", true);

        let start = Instant::now();
        let err = run_step_until(&mut step, &logger, &cancel).unwrap_err();

        assert!(start.elapsed() < Duration::from_secs(10));
        assert!(err.to_string().contains("cancelled while running sleep 30"));
    }

    #[test]
    fn missing_program_fails() {
        let logger = Logger::silent();
        let mut step = CommandStep::new("missing", "no-such-cluster-tool-e2e");
        let err = run_step(&mut step, &logger).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HarnessError>(),
            Some(HarnessError::CommandSpawn { .. })
        ));
    }
}
