//! e2e-harness - End-to-end test orchestration.
//!
//! Provisions test infrastructure, installs the product under test and runs
//! validation scenarios as fail-fast sequences of steps, with leveled
//! diagnostics that can be dumped to disk when a run fails.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Settings file loading and logging configuration
//! - [`diagnostics`] - Leveled, colorized logging with failure dumps
//! - [`error`] - Error types and result aliases
//! - [`harness`] - Running jobs with the shared logger
//! - [`jobs`] - Cluster create/delete jobs
//! - [`runner`] - Jobs, scenarios, the execution context and the executor
//! - [`shell`] - External program execution
//! - [`steps`] - The step capability and built-in steps
//!
//! # Example
//!
//! ```
//! use e2e_harness::diagnostics::Logger;
//! use e2e_harness::runner::{Cancellation, Job};
//! use e2e_harness::steps::{FnStep, Outputs, StepContext};
//!
//! let mut job = Job::new("smoke");
//! job.add_step(
//!     FnStep::new("hello", |ctx: &StepContext<'_>| {
//!         ctx.logger().info("hello from a step");
//!         Ok(Outputs::new().with("greeted", true))
//!     }),
//!     None,
//! );
//!
//! let report = job.run(&Logger::silent(), &Cancellation::new());
//! assert!(report.success());
//! ```

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod harness;
pub mod jobs;
pub mod runner;
pub mod shell;
pub mod steps;

pub use error::{HarnessError, Result};
