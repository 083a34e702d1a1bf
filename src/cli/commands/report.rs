//! Advisory requirement report.
//!
//! `azd-preflight report` evaluates every requirement and renders every
//! status. Unmet requirements appear in the output but never change the
//! exit code: the report is advice, not a gate.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::checks::{CliExtensionLister, OsKind};
use crate::cli::args::ReportArgs;
use crate::descriptor::load_descriptor;
use crate::error::{PreflightError, Result};
use crate::exec::SystemRunner;
use crate::plan::{PlanContext, RequirementPlanner};
use crate::policy::{Evaluator, Mode};
use crate::report::Reporter;

use super::dispatcher::{Command, CommandResult};

/// The report command implementation.
pub struct ReportCommand {
    project_root: PathBuf,
    args: ReportArgs,
}

impl ReportCommand {
    /// Create a new report command.
    pub fn new(project_root: &Path, args: ReportArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }
}

impl Command for ReportCommand {
    fn execute(&self, reporter: &Reporter) -> Result<CommandResult> {
        let os = OsKind::current();
        let ctx = PlanContext::advisory(os);

        // A missing descriptor downgrades to the generic tool report; a
        // malformed one is a real error.
        let plan = match load_descriptor(&self.project_root) {
            Ok(descriptor) => RequirementPlanner::plan(&descriptor, &ctx),
            Err(PreflightError::DescriptorNotFound { .. }) => {
                reporter.info("no project descriptor found, checking common tooling");
                RequirementPlanner::plan_generic(&ctx)
            }
            Err(e) => return Err(e),
        };

        let runner = SystemRunner::new();
        let lister = CliExtensionLister::new(&runner);
        let mut evaluator = Evaluator::new(
            &runner,
            &lister,
            os,
            Duration::from_secs(self.args.auth_timeout),
        );

        let results = evaluator.evaluate(Mode::Advisory, &plan)?;
        reporter.print_results(&results);

        Ok(CommandResult::success())
    }
}
