//! e2e-harness CLI entry point.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use e2e_harness::cli::{initialize, Cli, CommandDispatcher};
use e2e_harness::config::{ColorMode, LoggerConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for internal events.
///
/// Log level is controlled by:
/// 1. Verbosity 4 or higher sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Otherwise INFO at verbosity 3 and WARN below it
///
/// Events go to stderr so they never mix with step output on stdout. ANSI
/// styling is off when logging color is `false`.
fn init_tracing(config: &LoggerConfig) {
    let level = config.tracing_level();
    let filter = if config.is_debug() {
        EnvFilter::new(format!("e2e_harness={}", level))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("e2e_harness={}", level)))
    };

    let layer = fmt::layer()
        .with_target(false)
        .with_ansi(config.color != ColorMode::Plain)
        .with_writer(io::stderr);

    tracing_subscriber::registry().with(layer).with(filter).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, harness) = match initialize(&cli) {
        Ok(initialized) => initialized,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(1);
        }
    };
    init_tracing(&config);

    tracing::debug!("e2e-harness starting with args: {:?}", cli);

    let dispatcher = CommandDispatcher::new(harness);
    let mut stdout = io::stdout();

    match dispatcher.dispatch(&cli, &mut stdout) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) if e.is_usage_error() => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}
