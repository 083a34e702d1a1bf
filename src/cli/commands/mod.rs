//! Command implementations.

pub mod completions;
pub mod dispatcher;
pub mod gate;
pub mod report;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
