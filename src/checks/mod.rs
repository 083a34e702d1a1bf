//! Requirement probes and their result types.
//!
//! Each probe answers one question about the real environment: is a tool
//! present (and which binary replied), is its daemon reachable, does an
//! installed extension satisfy its range, is the user authenticated. All
//! probes receive the command runner by injection and none retries: a
//! failed detection is final for the run.

pub mod auth;
pub mod daemon;
pub mod extension;
pub mod tool;

pub use auth::{AuthProbe, DEFAULT_AUTH_TIMEOUT};
pub use daemon::DaemonProbe;
pub use extension::{AzdExtension, CliExtensionLister, ExtensionLister};
pub use tool::{OsKind, ProbeOutcome, Tool, ToolProbe};

/// Why a requirement check failed.
///
/// Distinct kinds drive different remediation (install vs. start the
/// daemon vs. upgrade), so they are never collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    ToolAbsent,
    DaemonUnreachable,
    ConstraintUnsatisfied,
    VersionUnparseable,
    RangeUnparseable,
    ExtensionMissing,
    AuthRequired,
}

impl FailureKind {
    /// Short human-readable label for status lines.
    pub fn describe(self) -> &'static str {
        match self {
            FailureKind::ToolAbsent => "not found",
            FailureKind::DaemonUnreachable => "daemon not running",
            FailureKind::ConstraintUnsatisfied => "version mismatch",
            FailureKind::VersionUnparseable => "invalid version format",
            FailureKind::RangeUnparseable => "invalid version range",
            FailureKind::ExtensionMissing => "not installed",
            FailureKind::AuthRequired => "not logged in",
        }
    }
}

/// The outcome of evaluating a single requirement.
///
/// Produced once per requirement per run and immutable afterwards.
/// `daemon_running` is only meaningful when `daemon_applicable` is true.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// What was checked. For tools, the concrete binary that replied (or
    /// the combined candidate label when nothing did).
    pub subject: String,
    /// Whether the subject exists at all.
    pub installed: bool,
    /// Reported version or status detail, trimmed.
    pub version: String,
    /// Whether the subject has a background daemon.
    pub daemon_applicable: bool,
    /// Whether the daemon answered. Meaningless unless applicable.
    pub daemon_running: bool,
    /// The failure, if the check did not pass.
    pub failure: Option<FailureKind>,
}

impl CheckResult {
    /// A passing result for an installed subject.
    pub fn installed(subject: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            installed: true,
            version: version.into(),
            daemon_applicable: false,
            daemon_running: false,
            failure: None,
        }
    }

    /// A subject that was not found.
    pub fn absent(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            installed: false,
            version: String::new(),
            daemon_applicable: false,
            daemon_running: false,
            failure: Some(FailureKind::ToolAbsent),
        }
    }

    /// Attach a failure to an otherwise-built result.
    pub fn with_failure(mut self, failure: FailureKind) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Whether the check passed outright.
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installed_result_passes() {
        let res = CheckResult::installed("git", "git version 2.43.0");
        assert!(res.passed());
        assert!(res.installed);
        assert!(!res.daemon_applicable);
    }

    #[test]
    fn absent_result_carries_tool_absent() {
        let res = CheckResult::absent("docker/podman");
        assert!(!res.passed());
        assert!(!res.installed);
        assert_eq!(res.failure, Some(FailureKind::ToolAbsent));
    }

    #[test]
    fn with_failure_marks_not_passed() {
        let res = CheckResult::installed("extension azure.ai", "0.5.0")
            .with_failure(FailureKind::ConstraintUnsatisfied);
        assert!(!res.passed());
        assert!(res.installed);
    }

    #[test]
    fn failure_kind_labels_are_distinct() {
        let kinds = [
            FailureKind::ToolAbsent,
            FailureKind::DaemonUnreachable,
            FailureKind::ConstraintUnsatisfied,
            FailureKind::VersionUnparseable,
            FailureKind::RangeUnparseable,
            FailureKind::ExtensionMissing,
            FailureKind::AuthRequired,
        ];
        let labels: std::collections::HashSet<&str> =
            kinds.iter().map(|k| k.describe()).collect();
        assert_eq!(labels.len(), kinds.len());
    }
}
