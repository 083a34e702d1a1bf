//! Scripted runner for tests.
//!
//! Replays canned responses keyed by the full command line and records
//! every invocation, so tests can assert both outcomes and call counts
//! (e.g. that a bypassed run never touched the system).

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::time::Duration;

use super::CommandRunner;

/// Canned response for one command line.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    /// Command succeeds with the given stdout.
    Output(String),
    /// Command fails with the given message.
    Failure(String),
    /// Deadline-aware invocations time out; plain ones fail.
    TimesOut,
}

/// A [`CommandRunner`] that never touches the system.
///
/// Unscripted command lines fall back to the default behavior chosen at
/// construction: [`ScriptedRunner::failing`] rejects everything,
/// [`ScriptedRunner::succeeding`] answers everything with `ok`.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    responses: HashMap<String, ScriptedResponse>,
    default_succeeds: bool,
    calls: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    /// Every unscripted invocation fails.
    pub fn failing() -> Self {
        Self::default()
    }

    /// Every unscripted invocation succeeds with stdout `ok`.
    pub fn succeeding() -> Self {
        Self {
            default_succeeds: true,
            ..Self::default()
        }
    }

    /// Script a response for an exact command line, e.g. `docker --version`.
    pub fn on(mut self, command_line: &str, response: ScriptedResponse) -> Self {
        self.responses.insert(command_line.to_string(), response);
        self
    }

    /// Shorthand: script a success with the given stdout.
    pub fn ok(self, command_line: &str, stdout: &str) -> Self {
        self.on(command_line, ScriptedResponse::Output(stdout.to_string()))
    }

    /// Shorthand: script a failure.
    pub fn fail(self, command_line: &str) -> Self {
        self.on(
            command_line,
            ScriptedResponse::Failure("scripted failure".to_string()),
        )
    }

    /// Every command line this runner has been asked to execute, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Number of invocations so far.
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn record(&self, name: &str, args: &[&str]) -> String {
        let line = command_line(name, args);
        self.calls.borrow_mut().push(line.clone());
        line
    }

    fn respond(&self, line: &str) -> io::Result<Vec<u8>> {
        match self.responses.get(line) {
            Some(ScriptedResponse::Output(stdout)) => Ok(stdout.clone().into_bytes()),
            Some(ScriptedResponse::Failure(msg)) => Err(io::Error::other(msg.clone())),
            Some(ScriptedResponse::TimesOut) => {
                Err(io::Error::other(format!("scripted failure: {}", line)))
            }
            None if self.default_succeeds => Ok(b"ok".to_vec()),
            None => Err(io::Error::other(format!("not scripted: {}", line))),
        }
    }
}

fn command_line(name: &str, args: &[&str]) -> String {
    if args.is_empty() {
        name.to_string()
    } else {
        format!("{} {}", name, args.join(" "))
    }
}

impl CommandRunner for ScriptedRunner {
    fn output(&self, name: &str, args: &[&str]) -> io::Result<Vec<u8>> {
        let line = self.record(name, args);
        self.respond(&line)
    }

    fn run(&self, name: &str, args: &[&str]) -> io::Result<()> {
        let line = self.record(name, args);
        self.respond(&line).map(|_| ())
    }

    fn output_within(&self, name: &str, args: &[&str], timeout: Duration) -> io::Result<Vec<u8>> {
        let line = self.record(name, args);
        if matches!(self.responses.get(&line), Some(ScriptedResponse::TimesOut)) {
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("{} did not complete within {:?}", name, timeout),
            ));
        }
        self.respond(&line)
    }
}
