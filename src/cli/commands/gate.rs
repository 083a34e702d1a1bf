//! Strict pre-deployment gate.
//!
//! `azd-preflight gate` verifies the requirements a deployment action
//! depends on and aborts on the first unmet one with a non-zero exit
//! code. The target is taken from `--command`, then the hook environment,
//! then defaults to `up`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::checks::{CliExtensionLister, OsKind};
use crate::cli::args::GateArgs;
use crate::descriptor::load_descriptor;
use crate::error::Result;
use crate::exec::SystemRunner;
use crate::plan::{PlanContext, RequirementPlanner};
use crate::policy::{self, Bypass, Evaluator, Mode};
use crate::report::Reporter;

use super::dispatcher::{Command, CommandResult};

/// The gate command implementation.
pub struct GateCommand {
    project_root: PathBuf,
    args: GateArgs,
}

impl GateCommand {
    /// Create a new gate command.
    pub fn new(project_root: &Path, args: GateArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }
}

impl Command for GateCommand {
    fn execute(&self, reporter: &Reporter) -> Result<CommandResult> {
        let hook_name = std::env::var(policy::HOOK_ENV).ok();
        let target = policy::resolve_target(self.args.command.as_deref(), hook_name.as_deref())?;

        // Bypass is decided before any planning or probing
        if Bypass::from_env().covers(target) {
            reporter.info(&format!(
                "verification of '{}' skipped ({})",
                target.as_str(),
                policy::SKIP_ENV
            ));
            return Ok(CommandResult::success());
        }

        let descriptor = load_descriptor(&self.project_root)?;
        let os = OsKind::current();
        let ctx = PlanContext::strict(os, target.provisions(), target.deploys());
        let plan = RequirementPlanner::plan(&descriptor, &ctx);

        let runner = SystemRunner::new();
        let lister = CliExtensionLister::new(&runner);
        let mut evaluator = Evaluator::new(
            &runner,
            &lister,
            os,
            Duration::from_secs(self.args.auth_timeout),
        );

        // The first failure propagates as a typed error; main renders it
        // and exits non-zero
        let results = evaluator.evaluate(Mode::Strict, &plan)?;
        reporter.print_results(&results);

        Ok(CommandResult::success())
    }
}
