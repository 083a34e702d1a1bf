//! Authentication status probing.

use crate::checks::{CheckResult, FailureKind};
use crate::exec::CommandRunner;
use std::io;
use std::time::Duration;

/// Default deadline for the auth status check.
pub const DEFAULT_AUTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Subject name used for auth results.
const AUTH_SUBJECT: &str = "azd auth";

/// Checks login status with a caller-supplied deadline.
///
/// The check shells out to `azd auth login --check-status`, which can hang
/// on broken credential helpers, so it always runs through the runner's
/// deadline-aware variant. When the runner cannot cancel, the child may
/// outlive the deadline even though this probe returns on time.
pub struct AuthProbe<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> AuthProbe<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Probe login status. Expiry or a non-zero exit both mean
    /// authentication is required; neither hangs past the deadline.
    pub fn probe(&self, timeout: Duration) -> CheckResult {
        let outcome =
            self.runner
                .output_within("azd", &["auth", "login", "--check-status"], timeout);

        match outcome {
            Ok(out) => {
                let status = String::from_utf8_lossy(&out).trim().to_string();
                let detail = if status.is_empty() {
                    "Logged in".to_string()
                } else {
                    status
                };
                CheckResult::installed(AUTH_SUBJECT, detail)
            }
            Err(e) => {
                let detail = if e.kind() == io::ErrorKind::TimedOut {
                    format!("status check timed out after {:?}", timeout)
                } else {
                    "Not logged in".to_string()
                };
                // The CLI itself exists (its absence fails the earlier core
                // tool requirement); only the login judgment failed here.
                CheckResult::installed(AUTH_SUBJECT, detail)
                    .with_failure(FailureKind::AuthRequired)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{ScriptedResponse, ScriptedRunner};

    #[test]
    fn logged_in_passes_with_status_detail() {
        let runner = ScriptedRunner::failing().ok(
            "azd auth login --check-status",
            "Logged in to Azure as dev@example.com\n",
        );
        let probe = AuthProbe::new(&runner);

        let res = probe.probe(DEFAULT_AUTH_TIMEOUT);
        assert!(res.passed());
        assert_eq!(res.version, "Logged in to Azure as dev@example.com");
    }

    #[test]
    fn empty_output_becomes_logged_in() {
        let runner = ScriptedRunner::failing().ok("azd auth login --check-status", "");
        let probe = AuthProbe::new(&runner);

        let res = probe.probe(DEFAULT_AUTH_TIMEOUT);
        assert!(res.passed());
        assert_eq!(res.version, "Logged in");
    }

    #[test]
    fn failed_check_requires_auth() {
        let runner = ScriptedRunner::failing();
        let probe = AuthProbe::new(&runner);

        let res = probe.probe(DEFAULT_AUTH_TIMEOUT);
        assert!(!res.passed());
        assert_eq!(res.failure, Some(FailureKind::AuthRequired));
        assert_eq!(res.subject, "azd auth");
    }

    #[test]
    fn timeout_returns_instead_of_hanging() {
        let runner = ScriptedRunner::succeeding().on(
            "azd auth login --check-status",
            ScriptedResponse::TimesOut,
        );
        let probe = AuthProbe::new(&runner);

        let res = probe.probe(Duration::from_millis(100));
        assert!(!res.passed());
        assert_eq!(res.failure, Some(FailureKind::AuthRequired));
        assert!(res.version.contains("timed out"));
    }
}
