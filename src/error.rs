//! Error types for harness operations.
//!
//! This module defines [`HarnessError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `HarnessError` for failures the engine or CLI handles distinctly
//! - Step bodies return `anyhow::Result`; the executor wraps their failures
//!   in [`HarnessError::StepExecution`] together with the step's position
//! - CLI input errors are printed with usage and turned into a non-zero exit
//!   code rather than aborting the process

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for harness operations.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A flag or settings value is outside its accepted set.
    #[error("Invalid value {value:?} for {setting}: {message}")]
    Configuration {
        setting: String,
        value: String,
        message: String,
    },

    /// Failed to parse the harness settings file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// A resource verb (`create`, `delete`) was invoked without a resource.
    #[error("please provide a valid resource for \"{verb}\"")]
    MissingResourceVerb { verb: String },

    /// A resource verb was invoked with a resource nobody registered.
    #[error("unknown resource type \"{resource}\"")]
    UnknownResourceVerb { resource: String },

    /// A step (or its wiring function) failed while a job was running.
    #[error("Step {index} '{name}' failed: {source:#}")]
    StepExecution {
        index: usize,
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// A context lookup named a key no earlier step produced.
    #[error("Context key '{key}' has not been produced by any earlier step")]
    MissingKey { key: String },

    /// A step produced a key that is already present in the context.
    #[error("Step '{step}' re-declared context key '{key}'")]
    DuplicateKey { key: String, step: String },

    /// The job was cancelled, or ran past its deadline, before a step started.
    #[error("Job cancelled before step {index} '{name}' started")]
    Cancelled { index: usize, name: String },

    /// An external command exited unsuccessfully.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// An external command could not be started or waited on.
    #[error("Failed to run {command}: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HarnessError {
    /// Whether this error came from a resource verb given a missing or
    /// unknown resource.
    ///
    /// These are reported on the spot together with the verb's usage text,
    /// so callers only need to turn them into a failing exit code.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::MissingResourceVerb { .. } | Self::UnknownResourceVerb { .. }
        )
    }
}

/// Result type alias for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;
