//! Daemon liveness probing for daemon-backed tools.

use crate::checks::FailureKind;
use crate::exec::CommandRunner;

/// Probes whether a detected tool's background daemon is reachable.
///
/// Only meaningful after a tool probe reported the binary installed. The
/// probe must be handed the concrete binary the tool probe resolved
/// (`docker` vs `podman`), never the family label: runtime family members
/// are not interchangeable at the daemon level.
pub struct DaemonProbe<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> DaemonProbe<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Run the liveness subcommand against the concrete binary.
    pub fn probe(&self, concrete_binary: &str) -> (bool, Option<FailureKind>) {
        match self.runner.run(concrete_binary, &["info"]) {
            Ok(()) => (true, None),
            Err(e) => {
                tracing::debug!(binary = concrete_binary, error = %e, "daemon probe failed");
                (false, Some(FailureKind::DaemonUnreachable))
            }
        }
    }
}
