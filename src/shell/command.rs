//! External program execution.
//!
//! Programs are started directly (no intermediate shell) so arguments reach
//! the wrapped tool exactly as given.

use crate::error::{HarnessError, Result};
use crate::runner::Cancellation;
use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

/// How often a running program is checked against its cancellation token.
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Result of executing a program.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether the program succeeded (exit code 0).
    pub success: bool,

    /// Whether the program was killed because its token was cancelled.
    pub cancelled: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
            cancelled: false,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
            cancelled: false,
        }
    }
}

/// Options for program execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with the process environment).
    pub env: HashMap<String, String>,

    /// Kill the program once this token is cancelled.
    pub cancel: Option<Cancellation>,
}

/// Output line from program execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Render a program and its arguments as one display string.
pub fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

fn build(program: &str, args: &[String], options: &CommandOptions) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    cmd
}

fn spawn_failed(program: &str, args: &[String], source: io::Error) -> HarnessError {
    HarnessError::CommandSpawn {
        command: command_line(program, args),
        source,
    }
}

/// Read `pipe` to EOF, forwarding each line and returning the whole output.
///
/// Bytes that are not valid UTF-8 are replaced rather than ending the read,
/// so the child never sees its pipe close early.
fn drain<R: Read>(pipe: R, tx: Sender<OutputLine>, wrap: fn(String) -> OutputLine) -> String {
    let mut reader = BufReader::new(pipe);
    let mut output = String::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                let text = String::from_utf8_lossy(&buf);
                let line = text.trim_end_matches(['\n', '\r']).to_string();
                output.push_str(&line);
                output.push('\n');
                let _ = tx.send(wrap(line));
            }
        }
    }

    output
}

/// Execute a program, handing each output line to `on_line` as it arrives.
///
/// `on_line` runs on the calling thread; stdout and stderr are drained by
/// two reader threads so neither pipe can fill up and stall the child. When
/// `options.cancel` trips, the child is killed and the result is marked
/// `cancelled`.
pub fn execute_streaming(
    program: &str,
    args: &[String],
    options: &CommandOptions,
    mut on_line: impl FnMut(OutputLine),
) -> Result<CommandResult> {
    let start = Instant::now();

    let mut child = build(program, args, options)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| spawn_failed(program, args, e))?;

    let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
        (Some(stdout), Some(stderr)) => (stdout, stderr),
        _ => {
            let _ = child.kill();
            let _ = child.wait();
            let err = io::Error::other("output pipes were not captured");
            return Err(spawn_failed(program, args, err));
        }
    };

    let (tx, rx) = mpsc::channel();
    let tx_stdout = tx.clone();
    let tx_stderr = tx;

    let stdout_handle = thread::spawn(move || drain(stdout, tx_stdout, OutputLine::Stdout));
    let stderr_handle = thread::spawn(move || drain(stderr, tx_stderr, OutputLine::Stderr));

    let mut cancelled = false;
    loop {
        match rx.recv_timeout(CANCEL_POLL_INTERVAL) {
            Ok(line) => on_line(line),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if !cancelled && options.cancel.as_ref().is_some_and(Cancellation::is_cancelled) {
            cancelled = true;
            let _ = child.kill();
        }
    }

    let stdout_output = stdout_handle.join().unwrap_or_default();
    let stderr_output = stderr_handle.join().unwrap_or_default();

    let status = child.wait().map_err(|e| spawn_failed(program, args, e))?;

    let duration = start.elapsed();

    if status.success() && !cancelled {
        Ok(CommandResult::success(
            stdout_output,
            stderr_output,
            duration,
        ))
    } else {
        let mut result =
            CommandResult::failure(status.code(), stdout_output, stderr_output, duration);
        result.cancelled = cancelled;
        Ok(result)
    }
}
