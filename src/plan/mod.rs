//! Requirement planning.
//!
//! The planner walks a project descriptor and produces the ordered,
//! deduplicated sequence of requirements to evaluate. Order is load-bearing:
//! strict mode fails fast, so the most foundational problems (the CLI
//! itself, source control, authentication) must surface before anything
//! descriptor-specific.

use crate::checks::{OsKind, Tool};
use crate::descriptor::{HookSpec, HostKind, ProjectDescriptor};
use std::collections::HashSet;
use std::mem::{discriminant, Discriminant};

/// What kind of thing a requirement checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementKind {
    /// A tool must exist.
    ToolPresence(Tool),
    /// A tool must exist and its daemon must answer.
    ToolWithDaemon(Tool),
    /// A language runtime must exist.
    LanguageRuntime(Tool),
    /// An installed extension must satisfy a version range.
    ExtensionVersion,
    /// The user must be authenticated.
    AuthenticationStatus,
    /// The infrastructure provisioning tool must exist.
    InfraProvider(Tool),
}

/// One planned thing-to-check.
///
/// `(kind, subject)` is unique within a planned sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub kind: RequirementKind,
    pub subject: String,
    /// Version range the subject must satisfy, when one applies.
    pub constraint: Option<String>,
}

impl Requirement {
    fn tool(kind: RequirementKind, tool: Tool) -> Self {
        Self {
            kind,
            subject: tool.name().to_string(),
            constraint: None,
        }
    }
}

/// What a planning call should cover.
///
/// Advisory runs cover everything; strict runs only plan the sections the
/// target command will actually exercise (infra for provisioning targets,
/// service tooling for deploying targets).
#[derive(Debug, Clone, Copy)]
pub struct PlanContext {
    pub os: OsKind,
    /// Include nice-to-have tools (the code-hosting CLI). Advisory only.
    pub include_optional: bool,
    /// Include the infra-provider requirement.
    pub provisions: bool,
    /// Include per-service language and build tooling.
    pub deploys: bool,
}

impl PlanContext {
    /// Context for an advisory report: everything is covered.
    pub fn advisory(os: OsKind) -> Self {
        Self {
            os,
            include_optional: true,
            provisions: true,
            deploys: true,
        }
    }

    /// Context for a strict gate with the given section coverage.
    pub fn strict(os: OsKind, provisions: bool, deploys: bool) -> Self {
        Self {
            os,
            include_optional: false,
            provisions,
            deploys,
        }
    }
}

/// Derives the requirement sequence from a descriptor.
pub struct RequirementPlanner;

impl RequirementPlanner {
    /// Plan requirements for a loaded descriptor.
    pub fn plan(descriptor: &ProjectDescriptor, ctx: &PlanContext) -> Vec<Requirement> {
        let mut plan = PlanBuilder::new();

        Self::plan_core(&mut plan, ctx, descriptor);

        for (id, range) in &descriptor.required_versions.extensions {
            plan.push(Requirement {
                kind: RequirementKind::ExtensionVersion,
                subject: id.clone(),
                constraint: non_empty(range),
            });
        }

        if ctx.provisions {
            match descriptor.infra_provider() {
                "bicep" => plan.push(Requirement::tool(
                    RequirementKind::InfraProvider(Tool::Bicep),
                    Tool::Bicep,
                )),
                "terraform" => plan.push(Requirement::tool(
                    RequirementKind::InfraProvider(Tool::Terraform),
                    Tool::Terraform,
                )),
                // Unrecognized providers are accepted without a tool
                // requirement: forward compatibility, not an error.
                other => tracing::debug!(provider = other, "no tool requirement for provider"),
            }
        }

        if ctx.deploys {
            for (_, service) in &descriptor.services {
                if let Some(runtime) = language_runtime(&service.language) {
                    plan.push(Requirement::tool(
                        RequirementKind::LanguageRuntime(runtime),
                        runtime,
                    ));
                }

                let needs_local_build = service.host.is_container_host()
                    && !service.docker.remote
                    && service.image.is_empty();
                if needs_local_build {
                    plan.push(Requirement::tool(
                        RequirementKind::ToolWithDaemon(Tool::ContainerRuntime),
                        Tool::ContainerRuntime,
                    ));
                }

                if service.host == HostKind::Function {
                    plan.push(Requirement::tool(
                        RequirementKind::ToolPresence(Tool::FuncTools),
                        Tool::FuncTools,
                    ));
                }

                if service.host == HostKind::Staticwebapp {
                    plan.push(Requirement::tool(
                        RequirementKind::ToolPresence(Tool::SwaCli),
                        Tool::SwaCli,
                    ));
                }
            }
        }

        let project_hooks = descriptor.hooks.iter().map(|(_, h)| h);
        let service_hooks = descriptor
            .services
            .iter()
            .flat_map(|(_, s)| s.hooks.iter().map(|(_, h)| h));
        for hook in project_hooks.chain(service_hooks) {
            if let Some(shell) = hook_shell(hook, ctx.os) {
                plan.push(Requirement::tool(
                    RequirementKind::ToolPresence(shell),
                    shell,
                ));
            }
        }

        plan.into_vec()
    }

    /// Plan the descriptor-less advisory sequence: core tools, auth, and
    /// the common tool set.
    pub fn plan_generic(ctx: &PlanContext) -> Vec<Requirement> {
        let mut plan = PlanBuilder::new();
        Self::plan_core(&mut plan, ctx, &ProjectDescriptor::default());

        plan.push(Requirement::tool(
            RequirementKind::ToolWithDaemon(Tool::ContainerRuntime),
            Tool::ContainerRuntime,
        ));
        for tool in [
            Tool::Node,
            Tool::Python,
            Tool::DotNet,
            Tool::PosixShell,
            Tool::PowerShell,
            Tool::FuncTools,
        ] {
            plan.push(Requirement::tool(RequirementKind::ToolPresence(tool), tool));
        }

        plan.into_vec()
    }

    fn plan_core(plan: &mut PlanBuilder, ctx: &PlanContext, descriptor: &ProjectDescriptor) {
        plan.push(Requirement {
            kind: RequirementKind::ToolPresence(Tool::Azd),
            subject: Tool::Azd.name().to_string(),
            constraint: non_empty(&descriptor.required_versions.azd),
        });
        plan.push(Requirement::tool(
            RequirementKind::ToolPresence(Tool::Git),
            Tool::Git,
        ));
        if ctx.include_optional {
            plan.push(Requirement::tool(
                RequirementKind::ToolPresence(Tool::Gh),
                Tool::Gh,
            ));
        }
        plan.push(Requirement {
            kind: RequirementKind::AuthenticationStatus,
            subject: "azd auth".to_string(),
            constraint: None,
        });
    }
}

/// Map a service language to its runtime tool. Unrecognized languages
/// require nothing.
fn language_runtime(language: &str) -> Option<Tool> {
    match language {
        "js" | "ts" => Some(Tool::Node),
        "py" | "python" => Some(Tool::Python),
        "csharp" | "fsharp" | "dotnet" => Some(Tool::DotNet),
        _ => None,
    }
}

/// Resolve a hook's effective shell family.
///
/// The OS default applies when the hook does not name a shell; unrecognized
/// shell names require nothing.
fn hook_shell(hook: &HookSpec, os: OsKind) -> Option<Tool> {
    let effective = match hook.shell.as_deref() {
        Some(shell) => shell,
        None if os.is_windows() => "pwsh",
        None => "sh",
    };

    match effective {
        "sh" | "bash" => Some(Tool::PosixShell),
        "pwsh" | "powershell" => Some(Tool::PowerShell),
        _ => None,
    }
}

/// Accumulates requirements, dropping `(kind, subject)` duplicates.
///
/// The seen-set lives for one planning call only.
struct PlanBuilder {
    seen: HashSet<(Discriminant<RequirementKind>, String)>,
    items: Vec<Requirement>,
}

impl PlanBuilder {
    fn new() -> Self {
        Self {
            seen: HashSet::new(),
            items: Vec::new(),
        }
    }

    fn push(&mut self, requirement: Requirement) {
        let key = (discriminant(&requirement.kind), requirement.subject.clone());
        if self.seen.insert(key) {
            self.items.push(requirement);
        }
    }

    fn into_vec(self) -> Vec<Requirement> {
        self.items
    }
}

fn non_empty(range: &str) -> Option<String> {
    if range.trim().is_empty() {
        None
    } else {
        Some(range.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::parse_descriptor;
    use std::path::Path;

    fn parse(yaml: &str) -> ProjectDescriptor {
        parse_descriptor(yaml, Path::new("azure.yaml")).unwrap()
    }

    fn subjects(plan: &[Requirement]) -> Vec<&str> {
        plan.iter().map(|r| r.subject.as_str()).collect()
    }

    fn advisory() -> PlanContext {
        PlanContext::advisory(OsKind::Linux)
    }

    #[test]
    fn core_requirements_lead_in_fixed_order() {
        let d = parse("name: empty");
        let plan = RequirementPlanner::plan(&d, &advisory());
        assert_eq!(
            &subjects(&plan)[..5],
            &["azd", "git", "gh", "azd auth", "bicep"]
        );
    }

    #[test]
    fn strict_context_omits_gh() {
        let d = parse("name: empty");
        let plan = RequirementPlanner::plan(&d, &PlanContext::strict(OsKind::Linux, true, true));
        assert!(!subjects(&plan).contains(&"gh"));
        assert!(subjects(&plan).contains(&"git"));
    }

    #[test]
    fn shared_language_plans_one_runtime() {
        let d = parse(
            r#"
services:
  a: { language: ts, host: appservice }
  b: { language: ts, host: appservice }
  c: { language: js, host: appservice }
"#,
        );
        let plan = RequirementPlanner::plan(&d, &advisory());
        let node_count = plan
            .iter()
            .filter(|r| matches!(r.kind, RequirementKind::LanguageRuntime(Tool::Node)))
            .count();
        assert_eq!(node_count, 1);
    }

    #[test]
    fn two_containerapps_plan_one_build_tool() {
        let d = parse(
            r#"
services:
  web: { language: ts, host: containerapp }
  api: { language: python, host: containerapp }
"#,
        );
        let plan = RequirementPlanner::plan(&d, &advisory());
        let docker_count = plan
            .iter()
            .filter(|r| matches!(r.kind, RequirementKind::ToolWithDaemon(Tool::ContainerRuntime)))
            .count();
        assert_eq!(docker_count, 1);
    }

    #[test]
    fn prebuilt_image_exempts_build_tool() {
        let d = parse(
            r#"
services:
  web:
    language: ts
    host: containerapp
    image: myregistry.io/web:latest
"#,
        );
        let plan = RequirementPlanner::plan(&d, &advisory());
        assert!(!plan
            .iter()
            .any(|r| matches!(r.kind, RequirementKind::ToolWithDaemon(_))));
    }

    #[test]
    fn remote_build_exempts_build_tool() {
        let d = parse(
            r#"
services:
  web:
    host: aks
    docker: { remote: true }
"#,
        );
        let plan = RequirementPlanner::plan(&d, &advisory());
        assert!(!plan
            .iter()
            .any(|r| matches!(r.kind, RequirementKind::ToolWithDaemon(_))));
    }

    #[test]
    fn function_host_requires_func_tools() {
        let d = parse("services:\n  api: { host: function }\n");
        let plan = RequirementPlanner::plan(&d, &advisory());
        assert!(subjects(&plan).contains(&"func"));
    }

    #[test]
    fn staticwebapp_host_requires_swa_cli() {
        let d = parse("services:\n  site: { host: staticwebapp }\n");
        let plan = RequirementPlanner::plan(&d, &advisory());
        assert!(subjects(&plan).contains(&"swa"));
    }

    #[test]
    fn unrecognized_language_plans_nothing() {
        let d = parse("services:\n  svc: { language: cobol, host: appservice }\n");
        let plan = RequirementPlanner::plan(&d, &advisory());
        assert!(!plan
            .iter()
            .any(|r| matches!(r.kind, RequirementKind::LanguageRuntime(_))));
    }

    #[test]
    fn extensions_planned_in_declared_order() {
        let d = parse(
            r#"
requiredVersions:
  extensions:
    z.last: ">= 1.0.0"
    a.first: "~2.0"
"#,
        );
        let plan = RequirementPlanner::plan(&d, &advisory());
        let ext: Vec<&str> = plan
            .iter()
            .filter(|r| r.kind == RequirementKind::ExtensionVersion)
            .map(|r| r.subject.as_str())
            .collect();
        assert_eq!(ext, vec!["z.last", "a.first"]);
    }

    #[test]
    fn terraform_provider_requires_terraform() {
        let d = parse("infra:\n  provider: terraform\n");
        let plan = RequirementPlanner::plan(&d, &advisory());
        assert!(subjects(&plan).contains(&"terraform"));
        assert!(!subjects(&plan).contains(&"bicep"));
    }

    #[test]
    fn unrecognized_provider_requires_no_tool() {
        let d = parse("infra:\n  provider: pulumi\n");
        let plan = RequirementPlanner::plan(&d, &advisory());
        assert!(!plan
            .iter()
            .any(|r| matches!(r.kind, RequirementKind::InfraProvider(_))));
    }

    #[test]
    fn provisioning_skipped_when_context_says_so() {
        let d = parse("name: empty");
        let plan = RequirementPlanner::plan(&d, &PlanContext::strict(OsKind::Linux, false, true));
        assert!(!plan
            .iter()
            .any(|r| matches!(r.kind, RequirementKind::InfraProvider(_))));
    }

    #[test]
    fn services_skipped_when_context_says_so() {
        let d = parse("services:\n  web: { language: ts, host: containerapp }\n");
        let plan = RequirementPlanner::plan(&d, &PlanContext::strict(OsKind::Linux, true, false));
        assert!(!plan
            .iter()
            .any(|r| matches!(r.kind, RequirementKind::LanguageRuntime(_))));
    }

    #[test]
    fn hook_shells_dedup_across_project_and_service_hooks() {
        let d = parse(
            r#"
hooks:
  preprovision: ./a.sh
  predeploy:
    shell: bash
    run: ./b.sh
services:
  web:
    host: appservice
    hooks:
      prebuild: ./c.sh
"#,
        );
        let plan = RequirementPlanner::plan(&d, &advisory());
        // Three hooks, all resolving to the posix shell family: one requirement
        let bash_count = subjects(&plan).iter().filter(|s| **s == "bash").count();
        assert_eq!(bash_count, 1);
    }

    #[test]
    fn default_hook_shell_follows_os() {
        let d = parse("hooks:\n  preup: ./x\n");

        let linux = RequirementPlanner::plan(&d, &PlanContext::advisory(OsKind::Linux));
        assert!(subjects(&linux).contains(&"bash"));

        let windows = RequirementPlanner::plan(&d, &PlanContext::advisory(OsKind::Windows));
        assert!(subjects(&windows).contains(&"pwsh"));
        assert!(!subjects(&windows).contains(&"bash"));
    }

    #[test]
    fn unknown_hook_shell_plans_nothing() {
        let d = parse("hooks:\n  preup:\n    shell: fish\n    run: ./x\n");
        let plan = RequirementPlanner::plan(&d, &advisory());
        assert!(!subjects(&plan).contains(&"bash"));
        assert!(!subjects(&plan).contains(&"pwsh"));
        assert!(!subjects(&plan).contains(&"fish"));
    }

    #[test]
    fn azd_constraint_comes_from_descriptor() {
        let d = parse("requiredVersions:\n  azd: \">= 1.10.0\"\n");
        let plan = RequirementPlanner::plan(&d, &advisory());
        assert_eq!(plan[0].subject, "azd");
        assert_eq!(plan[0].constraint.as_deref(), Some(">= 1.10.0"));
    }

    #[test]
    fn empty_extension_range_becomes_no_constraint() {
        let d = parse("requiredVersions:\n  extensions:\n    azure.ai: \"\"\n");
        let plan = RequirementPlanner::plan(&d, &advisory());
        let ext = plan
            .iter()
            .find(|r| r.kind == RequirementKind::ExtensionVersion)
            .unwrap();
        assert_eq!(ext.constraint, None);
    }

    #[test]
    fn no_duplicate_kind_subject_pairs() {
        let d = parse(
            r#"
services:
  a: { language: py, host: containerapp }
  b: { language: python, host: containerapp }
  c: { language: ts, host: function }
  d: { language: ts, host: function }
hooks:
  preup: ./x.sh
"#,
        );
        let plan = RequirementPlanner::plan(&d, &advisory());
        let mut seen = std::collections::HashSet::new();
        for r in &plan {
            assert!(
                seen.insert((discriminant(&r.kind), r.subject.clone())),
                "duplicate requirement: {:?}",
                r
            );
        }
        // py and python collapse into a single python runtime requirement
        let python_count = plan
            .iter()
            .filter(|r| matches!(r.kind, RequirementKind::LanguageRuntime(Tool::Python)))
            .count();
        assert_eq!(python_count, 1);
    }

    #[test]
    fn generic_plan_covers_common_tools() {
        let plan = RequirementPlanner::plan_generic(&advisory());
        let s = subjects(&plan);
        for expected in ["azd", "git", "gh", "azd auth", "docker", "node", "python"] {
            assert!(s.contains(&expected), "missing {}", expected);
        }
        // No descriptor, so no extensions and no infra provider
        assert!(!plan
            .iter()
            .any(|r| r.kind == RequirementKind::ExtensionVersion));
    }
}
