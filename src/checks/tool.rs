//! Tool presence probing with OS-aware candidate selection.
//!
//! Some logical tools resolve to different binaries per platform: the
//! container runtime may be docker or podman, Python is `python3` first on
//! POSIX but `python` first on Windows, PowerShell falls back to the
//! legacy `powershell` binary only on Windows. The probe tries at most two
//! candidates and reports which concrete binary replied.

use crate::checks::CheckResult;
use crate::exec::CommandRunner;

/// Host operating system, as far as candidate selection cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsKind {
    Linux,
    MacOs,
    Windows,
    Other,
}

impl OsKind {
    /// The OS this binary was built for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            OsKind::Windows
        } else if cfg!(target_os = "macos") {
            OsKind::MacOs
        } else if cfg!(target_os = "linux") {
            OsKind::Linux
        } else {
            OsKind::Other
        }
    }

    pub fn is_windows(self) -> bool {
        self == OsKind::Windows
    }
}

/// Logical tools the planner can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// The orchestrating CLI itself.
    Azd,
    Git,
    Gh,
    /// docker or podman; daemon-backed.
    ContainerRuntime,
    Node,
    Python,
    DotNet,
    /// sh/bash family.
    PosixShell,
    /// pwsh, with legacy powershell fallback on Windows.
    PowerShell,
    /// Azure Functions Core Tools.
    FuncTools,
    /// Static Web Apps CLI.
    SwaCli,
    Bicep,
    Terraform,
}

impl Tool {
    /// Candidate binaries to try, in order. At most two.
    pub fn candidates(self, os: OsKind) -> (&'static str, Option<&'static str>) {
        match self {
            Tool::Azd => ("azd", None),
            Tool::Git => ("git", None),
            Tool::Gh => ("gh", None),
            Tool::ContainerRuntime => ("docker", Some("podman")),
            Tool::Node => ("node", None),
            Tool::Python => {
                if os.is_windows() {
                    ("python", Some("python3"))
                } else {
                    ("python3", Some("python"))
                }
            }
            Tool::DotNet => ("dotnet", None),
            Tool::PosixShell => ("bash", None),
            Tool::PowerShell => {
                if os.is_windows() {
                    ("pwsh", Some("powershell"))
                } else {
                    // PowerShell Core only; no legacy fallback off Windows
                    ("pwsh", None)
                }
            }
            Tool::FuncTools => ("func", None),
            Tool::SwaCli => ("swa", None),
            Tool::Bicep => ("bicep", None),
            Tool::Terraform => ("terraform", None),
        }
    }

    /// Arguments that make the tool report its version.
    pub fn version_args(self) -> &'static [&'static str] {
        match self {
            // azd has a `version` subcommand rather than a flag
            Tool::Azd => &["version"],
            _ => &["--version"],
        }
    }

    /// Subject label when no candidate replied: the combined candidate
    /// names when there were two, the single candidate name otherwise.
    pub fn absent_label(self, os: OsKind) -> String {
        match self.candidates(os) {
            (primary, Some(secondary)) => format!("{}/{}", primary, secondary),
            (primary, None) => primary.to_string(),
        }
    }

    /// Whether the tool has a background daemon worth probing.
    pub fn has_daemon(self) -> bool {
        matches!(self, Tool::ContainerRuntime)
    }

    /// Logical name used for planning identity and failure annotation.
    pub fn name(self) -> &'static str {
        match self {
            Tool::Azd => "azd",
            Tool::Git => "git",
            Tool::Gh => "gh",
            Tool::ContainerRuntime => "docker",
            Tool::Node => "node",
            Tool::Python => "python",
            Tool::DotNet => "dotnet",
            Tool::PosixShell => "bash",
            Tool::PowerShell => "pwsh",
            Tool::FuncTools => "func",
            Tool::SwaCli => "swa",
            Tool::Bicep => "bicep",
            Tool::Terraform => "terraform",
        }
    }
}

/// Result of a tool probe, tagged with the candidate that matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// A candidate replied to its version invocation.
    Found {
        /// The concrete binary that replied (e.g. `podman`, `python3`).
        candidate: String,
        /// Trimmed stdout of the version invocation.
        version: String,
    },
    /// No candidate replied.
    Absent {
        /// Combined candidate label (e.g. `docker/podman`).
        label: String,
    },
}

impl ProbeOutcome {
    /// Convert into a [`CheckResult`].
    pub fn into_result(self) -> CheckResult {
        match self {
            ProbeOutcome::Found { candidate, version } => {
                CheckResult::installed(candidate, version)
            }
            ProbeOutcome::Absent { label } => CheckResult::absent(label),
        }
    }
}

/// Probes logical tools through the injected runner.
pub struct ToolProbe<'a> {
    runner: &'a dyn CommandRunner,
    os: OsKind,
}

impl<'a> ToolProbe<'a> {
    pub fn new(runner: &'a dyn CommandRunner, os: OsKind) -> Self {
        Self { runner, os }
    }

    /// Try the tool's candidates in order; never more than two attempts.
    pub fn probe(&self, tool: Tool) -> ProbeOutcome {
        let (primary, secondary) = tool.candidates(self.os);
        let args = tool.version_args();

        for candidate in std::iter::once(primary).chain(secondary) {
            tracing::debug!(candidate, ?tool, "probing");
            if let Ok(out) = self.runner.output(candidate, args) {
                return ProbeOutcome::Found {
                    candidate: candidate.to_string(),
                    version: String::from_utf8_lossy(&out).trim().to_string(),
                };
            }
        }

        ProbeOutcome::Absent {
            label: tool.absent_label(self.os),
        }
    }

    /// Probe and fold straight into a [`CheckResult`].
    pub fn probe_result(&self, tool: Tool) -> CheckResult {
        self.probe(tool).into_result()
    }
}
