//! Enforcement policy: modes, targets, and bypass.
//!
//! Policy decides how requirement failures are treated (advisory vs
//! strict), which gate target is in effect, and whether the whole run is
//! bypassed before any probing happens.

pub mod engine;

pub use engine::Evaluator;

use crate::error::{PreflightError, Result};
use std::str::FromStr;

/// Environment variable that bypasses verification entirely or per target.
pub const SKIP_ENV: &str = "AZD_PREFLIGHT_SKIP";

/// Environment variable the orchestrating CLI sets when running hooks.
pub const HOOK_ENV: &str = "AZD_HOOK_NAME";

/// How requirement failures are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Evaluate everything, report everything, never abort.
    Advisory,
    /// Abort on the first unmet requirement.
    Strict,
}

/// The deployment action a strict gate protects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Up,
    Provision,
    Deploy,
}

impl Target {
    pub fn as_str(self) -> &'static str {
        match self {
            Target::Up => "up",
            Target::Provision => "provision",
            Target::Deploy => "deploy",
        }
    }

    /// Whether the target provisions infrastructure.
    pub fn provisions(self) -> bool {
        matches!(self, Target::Up | Target::Provision)
    }

    /// Whether the target deploys services.
    pub fn deploys(self) -> bool {
        matches!(self, Target::Up | Target::Deploy)
    }
}

impl FromStr for Target {
    type Err = PreflightError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "up" => Ok(Target::Up),
            "provision" => Ok(Target::Provision),
            "deploy" => Ok(Target::Deploy),
            other => Err(PreflightError::InvalidTarget {
                value: other.to_string(),
            }),
        }
    }
}

/// Resolve the effective gate target.
///
/// An explicit target always wins, and an explicit value outside the known
/// set is an error even when a hook name is present. Without an explicit
/// target the hook name decides (`predeploy` protects deploy, and so on);
/// unrecognized or absent hook names fall back to `up`, the broadest
/// target.
pub fn resolve_target(explicit: Option<&str>, hook_name: Option<&str>) -> Result<Target> {
    if let Some(value) = explicit {
        return value.parse();
    }

    Ok(match hook_name {
        Some("preup") => Target::Up,
        Some("preprovision") => Target::Provision,
        Some("predeploy") => Target::Deploy,
        _ => Target::Up,
    })
}

/// Parsed bypass directive from [`SKIP_ENV`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bypass {
    /// No bypass requested.
    None,
    /// Skip verification for every target.
    All,
    /// Skip verification for the listed targets only.
    Targets(Vec<String>),
}

impl Bypass {
    /// Parse the raw environment value. `true`/`1`/`all` (case-insensitive)
    /// bypass everything; anything else is a comma-separated target list,
    /// whitespace-tolerant. Absent or empty means no bypass.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Bypass::None;
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Bypass::None;
        }

        if trimmed.eq_ignore_ascii_case("true")
            || trimmed == "1"
            || trimmed.eq_ignore_ascii_case("all")
        {
            return Bypass::All;
        }

        Bypass::Targets(
            trimmed
                .split(',')
                .map(|t| t.trim().to_ascii_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        )
    }

    /// Read and parse [`SKIP_ENV`] from the process environment.
    pub fn from_env() -> Self {
        Self::parse(std::env::var(SKIP_ENV).ok().as_deref())
    }

    /// Whether verification of the given target is bypassed.
    pub fn covers(&self, target: Target) -> bool {
        match self {
            Bypass::None => false,
            Bypass::All => true,
            Bypass::Targets(list) => list.iter().any(|t| t == target.as_str()),
        }
    }
}
