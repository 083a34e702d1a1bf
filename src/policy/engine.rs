//! Requirement evaluation under a policy mode.
//!
//! The evaluator walks a planned requirement sequence and dispatches each
//! kind to its probe. Advisory evaluation accumulates every result; strict
//! evaluation converts the first failure into a typed error and stops.

use crate::checks::{
    extension, AuthProbe, CheckResult, DaemonProbe, ExtensionLister, FailureKind, OsKind,
    ProbeOutcome, Tool, ToolProbe,
};
use crate::error::{PreflightError, Result};
use crate::exec::CommandRunner;
use crate::plan::{Requirement, RequirementKind};
use crate::policy::Mode;
use crate::version::{self, VersionError};
use std::time::Duration;

/// Evaluates planned requirements against the real environment.
///
/// Holds no probe state beyond the lazily fetched extension list, which is
/// retrieved at most once per run.
pub struct Evaluator<'a> {
    runner: &'a dyn CommandRunner,
    lister: &'a dyn ExtensionLister,
    os: OsKind,
    auth_timeout: Duration,
    extensions: Option<Vec<crate::checks::AzdExtension>>,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        lister: &'a dyn ExtensionLister,
        os: OsKind,
        auth_timeout: Duration,
    ) -> Self {
        Self {
            runner,
            lister,
            os,
            auth_timeout,
            extensions: None,
        }
    }

    /// Evaluate a plan under the given mode.
    ///
    /// Advisory evaluation always returns `Ok` with every result; strict
    /// evaluation errors on the first failure.
    pub fn evaluate(&mut self, mode: Mode, plan: &[Requirement]) -> Result<Vec<CheckResult>> {
        match mode {
            Mode::Advisory => Ok(self.evaluate_advisory(plan)),
            Mode::Strict => self.evaluate_strict(plan),
        }
    }

    /// Evaluate every requirement, never aborting. One result per
    /// requirement, in plan order.
    pub fn evaluate_advisory(&mut self, plan: &[Requirement]) -> Vec<CheckResult> {
        plan.iter().map(|req| self.evaluate_one(req)).collect()
    }

    /// Evaluate until the first failure, which is returned as a typed
    /// error annotated with the failing subject. Passing results up to
    /// that point are returned on success.
    pub fn evaluate_strict(&mut self, plan: &[Requirement]) -> Result<Vec<CheckResult>> {
        let mut results = Vec::with_capacity(plan.len());

        for req in plan {
            let result = self.evaluate_one(req);
            if let Some(kind) = result.failure {
                return Err(failure_to_error(req, &result, kind));
            }
            results.push(result);
        }

        Ok(results)
    }

    fn evaluate_one(&mut self, req: &Requirement) -> CheckResult {
        tracing::debug!(subject = %req.subject, kind = ?req.kind, "evaluating requirement");

        match req.kind {
            RequirementKind::ToolPresence(tool)
            | RequirementKind::LanguageRuntime(tool)
            | RequirementKind::InfraProvider(tool) => self.check_tool(tool, req.constraint.as_deref()),
            RequirementKind::ToolWithDaemon(tool) => self.check_tool_with_daemon(tool),
            RequirementKind::ExtensionVersion => self.check_extension(req),
            RequirementKind::AuthenticationStatus => {
                AuthProbe::new(self.runner).probe(self.auth_timeout)
            }
        }
    }

    fn check_tool(&self, tool: Tool, constraint: Option<&str>) -> CheckResult {
        let result = ToolProbe::new(self.runner, self.os).probe_result(tool);
        match constraint {
            Some(range) if result.installed => enforce_constraint(result, range),
            _ => result,
        }
    }

    fn check_tool_with_daemon(&self, tool: Tool) -> CheckResult {
        let outcome = ToolProbe::new(self.runner, self.os).probe(tool);

        match outcome {
            ProbeOutcome::Found { candidate, version } => {
                // The daemon probe needs the binary that actually replied
                let (running, failure) = DaemonProbe::new(self.runner).probe(&candidate);
                let mut result = CheckResult::installed(candidate, version);
                result.daemon_applicable = true;
                result.daemon_running = running;
                result.failure = failure;
                result
            }
            ProbeOutcome::Absent { label } => {
                let mut result = CheckResult::absent(label);
                result.daemon_applicable = true;
                result
            }
        }
    }

    fn check_extension(&mut self, req: &Requirement) -> CheckResult {
        if self.extensions.is_none() {
            // One listing per run. A failed listing degrades to an empty
            // list, so every required extension reports as not installed.
            let listed = match self.lister.list_installed() {
                Ok(list) => list,
                Err(e) => {
                    tracing::warn!(error = %e, "extension listing failed");
                    Vec::new()
                }
            };
            self.extensions = Some(listed);
        }

        let installed = self.extensions.as_deref().unwrap_or(&[]);
        let range = req.constraint.as_deref().unwrap_or("");
        extension::resolve(installed, &req.subject, range)
    }
}

/// Enforce a version range against a tool probe's raw version output.
///
/// The raw output is rarely a bare version (`azd version 1.11.0 (commit
/// ...)`), so a dotted version is extracted first; output with no
/// recognizable version fails as unparseable rather than passing silently.
fn enforce_constraint(result: CheckResult, range: &str) -> CheckResult {
    let Some(extracted) = version::extract_version(&result.version) else {
        return result.with_failure(FailureKind::VersionUnparseable);
    };

    match version::satisfies(&extracted, range) {
        Ok(true) => result,
        Ok(false) => result.with_failure(FailureKind::ConstraintUnsatisfied),
        Err(VersionError::Unparseable(_)) => result.with_failure(FailureKind::VersionUnparseable),
        Err(VersionError::RangeUnparseable(_)) => {
            result.with_failure(FailureKind::RangeUnparseable)
        }
    }
}

/// Convert a failed check into the strict-mode error for it.
fn failure_to_error(req: &Requirement, result: &CheckResult, kind: FailureKind) -> PreflightError {
    match kind {
        FailureKind::ToolAbsent => PreflightError::ToolAbsent {
            subject: result.subject.clone(),
        },
        FailureKind::DaemonUnreachable => PreflightError::DaemonUnreachable {
            subject: result.subject.clone(),
        },
        FailureKind::ConstraintUnsatisfied => PreflightError::ConstraintUnsatisfied {
            subject: result.subject.clone(),
            version: result.version.clone(),
            range: req.constraint.clone().unwrap_or_default(),
        },
        FailureKind::VersionUnparseable => PreflightError::VersionUnparseable {
            subject: result.subject.clone(),
            value: result.version.clone(),
        },
        FailureKind::RangeUnparseable => PreflightError::RangeUnparseable {
            subject: result.subject.clone(),
            range: req.constraint.clone().unwrap_or_default(),
        },
        FailureKind::ExtensionMissing => PreflightError::ExtensionMissing {
            id: req.subject.clone(),
        },
        FailureKind::AuthRequired => PreflightError::AuthRequired {
            detail: result.version.clone(),
        },
    }
}
