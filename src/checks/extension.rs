//! Installed-extension listing and version resolution.

use crate::checks::{CheckResult, FailureKind};
use crate::error::Result;
use crate::exec::CommandRunner;
use crate::version::{self, VersionError};
use anyhow::Context;
use serde::Deserialize;

/// One installed extension, as reported by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AzdExtension {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub version: String,
}

/// Supplies the list of installed extensions.
pub trait ExtensionLister {
    fn list_installed(&self) -> Result<Vec<AzdExtension>>;
}

/// Lister backed by `azd extension list`.
pub struct CliExtensionLister<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> CliExtensionLister<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }
}

impl ExtensionLister for CliExtensionLister<'_> {
    fn list_installed(&self) -> Result<Vec<AzdExtension>> {
        let out = self
            .runner
            .output("azd", &["extension", "list", "--installed", "--output", "json"])?;
        let extensions = serde_json::from_slice(&out)
            .context("failed to parse azd extension list output")?;
        Ok(extensions)
    }
}

/// Match a required extension against the installed list.
///
/// Lookup is by exact id; the first match wins. Extension ids are expected
/// to be unique — callers passing duplicate ids get the first occurrence,
/// not a merge.
///
/// The installed flag distinguishes "extension absent" from "extension
/// present but version judgment failed": the latter keeps installed=true
/// so strict-mode messaging can say what is actually wrong.
pub fn resolve(installed: &[AzdExtension], id: &str, range: &str) -> CheckResult {
    let subject = format!("extension {}", id);

    let Some(ext) = installed.iter().find(|e| e.id == id) else {
        return CheckResult {
            subject,
            installed: false,
            version: String::new(),
            daemon_applicable: false,
            daemon_running: false,
            failure: Some(FailureKind::ExtensionMissing),
        };
    };

    let result = CheckResult::installed(subject, ext.version.clone());

    match version::satisfies(&ext.version, range) {
        Ok(true) => result,
        Ok(false) => result.with_failure(FailureKind::ConstraintUnsatisfied),
        Err(VersionError::Unparseable(_)) => result.with_failure(FailureKind::VersionUnparseable),
        Err(VersionError::RangeUnparseable(_)) => {
            result.with_failure(FailureKind::RangeUnparseable)
        }
    }
}
