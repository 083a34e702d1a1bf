//! Semantic version parsing and range matching.
//!
//! Extension requirements and the azd version constraint are expressed as
//! comparator ranges (`>= 1.0.0`, `~1.2`). Matching is built on the
//! `semver` crate; parse failures surface as typed errors, never panics.

use semver::{Version, VersionReq};

/// Typed failure from version/range handling.
///
/// The two cases drive different remediation (fix the installed tool vs.
/// fix the descriptor), so they stay distinct all the way to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// The version string is not a valid semantic version.
    Unparseable(String),
    /// The range expression is not a valid comparator range.
    RangeUnparseable(String),
}

impl std::fmt::Display for VersionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VersionError::Unparseable(v) => write!(f, "invalid version format: {}", v),
            VersionError::RangeUnparseable(r) => write!(f, "invalid version range: {}", r),
        }
    }
}

impl std::error::Error for VersionError {}

/// Parse a semantic version, tolerating surrounding whitespace and a
/// leading `v` (`v18.17.0` is common in tool output).
pub fn parse_version(version: &str) -> Result<Version, VersionError> {
    let cleaned = version.trim().trim_start_matches('v');
    Version::parse(cleaned).map_err(|_| VersionError::Unparseable(version.to_string()))
}

/// Evaluate whether `version` satisfies the comparator `range`.
///
/// An empty (or whitespace) range means "no constraint" and is always
/// satisfied; range parsing is never attempted for it.
pub fn satisfies(version: &str, range: &str) -> Result<bool, VersionError> {
    if range.trim().is_empty() {
        return Ok(true);
    }

    let parsed = parse_version(version)?;
    let req = VersionReq::parse(range.trim())
        .map_err(|_| VersionError::RangeUnparseable(range.to_string()))?;

    Ok(req.matches(&parsed))
}

/// Pull a dotted version number out of raw tool output.
///
/// `--version` output rarely is a bare version: `git version 2.43.0`,
/// `azd version 1.11.0 (commit 8f2c...)`, `v18.17.0`. Returns the first
/// recognizable version substring, if any.
pub fn extract_version(output: &str) -> Option<String> {
    let patterns = [r"(\d+\.\d+\.\d+)", r"version\s+(\d+\.\d+)", r"v(\d+\.\d+)"];

    for pattern in &patterns {
        if let Ok(re) = regex::Regex::new(pattern) {
            if let Some(caps) = re.captures(output) {
                if let Some(m) = caps.get(1) {
                    return Some(m.as_str().to_string());
                }
            }
        }
    }

    None
}
