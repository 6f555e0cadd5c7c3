//! External program execution.

pub mod command;

pub use command::{command_line, execute_streaming, CommandOptions, CommandResult, OutputLine};
