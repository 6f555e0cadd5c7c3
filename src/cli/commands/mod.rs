//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes each
//! verb and resource (`create cluster`, `delete cluster`) to its
//! implementation. A verb with a missing or unrecognised resource is handled
//! by [`resource_fallback`] for every verb alike.

pub mod cluster;
pub mod dispatcher;
pub mod fallback;

pub use cluster::{ClusterAction, ClusterCommand};
pub use dispatcher::{Command, CommandDispatcher, CommandResult};
pub use fallback::{resource_fallback, verb_help};
