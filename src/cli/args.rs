//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// azd-preflight - Environment verification for azd projects.
#[derive(Debug, Parser)]
#[command(name = "azd-preflight")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the project directory (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Report the status of every requirement (default if no command specified)
    Report(ReportArgs),

    /// Verify requirements for a deployment action, failing on the first unmet one
    Gate(GateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `report` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ReportArgs {
    /// Deadline for the authentication status check, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 5)]
    pub auth_timeout: u64,
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self { auth_timeout: 5 }
    }
}

/// Arguments for the `gate` command.
#[derive(Debug, Clone, clap::Args)]
pub struct GateArgs {
    /// Deployment action to gate: up, provision, or deploy
    #[arg(short, long, value_name = "TARGET")]
    pub command: Option<String>,

    /// Deadline for the authentication status check, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 5)]
    pub auth_timeout: u64,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
