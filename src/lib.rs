//! azd-preflight - Environment verification for azd projects.
//!
//! azd-preflight determines whether a local development environment
//! satisfies the tooling, authentication, and configuration prerequisites
//! declared by an azd project, and enforces that determination either as
//! an advisory report or as a strict pre-deployment gate.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`checks`] - Probes for tools, daemons, extensions, and auth status
//! - [`descriptor`] - Project descriptor (azure.yaml) loading
//! - [`error`] - Error types and result aliases
//! - [`exec`] - Command execution behind an injectable trait
//! - [`plan`] - Requirement planning from the descriptor
//! - [`policy`] - Enforcement modes, targets, bypass, and evaluation
//! - [`report`] - Terminal rendering of results
//! - [`version`] - Semantic version parsing and range matching

pub mod checks;
pub mod cli;
pub mod descriptor;
pub mod error;
pub mod exec;
pub mod plan;
pub mod policy;
pub mod report;
pub mod version;

pub use error::{PreflightError, Result};
