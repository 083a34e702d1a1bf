//! Child process execution.
//!
//! Every component that runs a process receives a [`CommandRunner`] through
//! its constructor or call arguments. There is no process-wide runner, so
//! tests can inject a [`ScriptedRunner`] without ordering hazards.

pub mod mock;

pub use mock::{ScriptedResponse, ScriptedRunner};

use std::io::{self, Read};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Poll interval while waiting on a deadline-bounded child.
const WAIT_POLL: Duration = Duration::from_millis(25);

/// Executes commands on behalf of the probes.
///
/// `output` and `run` treat a non-zero exit status as an error, matching
/// the semantics the probes rely on (a tool that exits non-zero on
/// `--version` is as good as absent).
pub trait CommandRunner {
    /// Run a command and capture its stdout. Non-zero exit is an error.
    fn output(&self, name: &str, args: &[&str]) -> io::Result<Vec<u8>>;

    /// Run a command for its exit status only.
    fn run(&self, name: &str, args: &[&str]) -> io::Result<()>;

    /// Run a command with a deadline, capturing stdout.
    ///
    /// The default implementation degrades to [`CommandRunner::output`]
    /// without cancellation: the child may outlive the deadline. Runners
    /// that can kill the child should override this.
    fn output_within(&self, name: &str, args: &[&str], _timeout: Duration) -> io::Result<Vec<u8>> {
        self.output(name, args)
    }
}

/// Runner backed by `std::process::Command`.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn output(&self, name: &str, args: &[&str]) -> io::Result<Vec<u8>> {
        let output = Command::new(name)
            .args(args)
            .stdin(Stdio::null())
            .output()?;
        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(io::Error::other(format!(
                "{} exited with {}",
                name, output.status
            )))
        }
    }

    fn run(&self, name: &str, args: &[&str]) -> io::Result<()> {
        let status = Command::new(name)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!("{} exited with {}", name, status)))
        }
    }

    fn output_within(&self, name: &str, args: &[&str], timeout: Duration) -> io::Result<Vec<u8>> {
        let mut child = Command::new(name)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let Some(mut stdout) = child.stdout.take() else {
            return Err(io::Error::other("child stdout was not captured"));
        };

        // Drain stdout on a separate thread so the child never blocks on a
        // full pipe while we poll for exit.
        let reader = thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = stdout.read_to_end(&mut buf);
            buf
        });

        let start = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                let buf = reader.join().unwrap_or_default();
                if status.success() {
                    return Ok(buf);
                }
                return Err(io::Error::other(format!(
                    "{} exited with {}",
                    name, status
                )));
            }

            if start.elapsed() >= timeout {
                let _ = child.kill();
                let _ = child.wait();
                let _ = reader.join();
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("{} did not complete within {:?}", name, timeout),
                ));
            }

            thread::sleep(WAIT_POLL);
        }
    }
}
