//! Error types for preflight operations.
//!
//! This module defines [`PreflightError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Requirement-level failures (tool absent, daemon down, version mismatch)
//!   live on `CheckResult` as a [`crate::checks::FailureKind`] and only
//!   become a `PreflightError` when strict evaluation converts the first one
//! - Use `PreflightError` for operation-level errors that need distinct
//!   handling (bad target, missing descriptor)
//! - Use `anyhow::Error` (via `PreflightError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for preflight operations.
#[derive(Debug, Error)]
pub enum PreflightError {
    /// A required tool was not found on the system.
    #[error("Required tool not found: {subject}")]
    ToolAbsent { subject: String },

    /// A tool is installed but its background daemon is not reachable.
    #[error("{subject} daemon is not running")]
    DaemonUnreachable { subject: String },

    /// An installed version does not satisfy the required range.
    #[error("{subject}: version {version} does not satisfy range {range}")]
    ConstraintUnsatisfied {
        subject: String,
        version: String,
        range: String,
    },

    /// A version string could not be parsed as a semantic version.
    #[error("{subject}: invalid version format: {value}")]
    VersionUnparseable { subject: String, value: String },

    /// A version range expression could not be parsed.
    #[error("{subject}: invalid version range: {range}")]
    RangeUnparseable { subject: String, range: String },

    /// A required extension is not installed.
    #[error("Extension not installed: {id}")]
    ExtensionMissing { id: String },

    /// The user is not authenticated (or the status check timed out).
    #[error("Authentication required: {detail}")]
    AuthRequired { detail: String },

    /// The gate target is not one of up, provision, deploy.
    #[error("Invalid command target: {value}. Must be one of: up, provision, deploy")]
    InvalidTarget { value: String },

    /// Neither azure.yaml nor azure.yml exists in the working directory.
    #[error("Project descriptor not found (azure.yaml/azure.yml) in {dir}")]
    DescriptorNotFound { dir: PathBuf },

    /// The project descriptor could not be parsed.
    #[error("Failed to parse descriptor at {path}: {message}")]
    DescriptorParseError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for preflight operations.
pub type Result<T> = std::result::Result<T, PreflightError>;
