//! Error types for test relocation
//!
//! Per-file errors are downgraded to outcomes by the orchestrator; only
//! configuration and root-level failures reach `main`.

use std::path::PathBuf;
use std::process::ExitCode;

use thiserror::Error;

/// Result type alias for relocation operations
pub type Result<T> = std::result::Result<T, RelocateError>;

/// Errors that can occur while relocating test blocks
#[derive(Error, Debug)]
pub enum RelocateError {
    /// Scan root or config file does not exist
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// Source file could not be opened or decoded
    #[error("cannot read {path}: {source}")]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Delimiter balance never returned to zero (or went negative)
    #[error("unbalanced block in {path} starting at line {line}")]
    UnbalancedBlock { path: PathBuf, line: usize },

    /// Two source files resolve to the same destination
    #[error("destination {destination} already claimed by {claimed_by}")]
    DestinationCollision {
        destination: PathBuf,
        claimed_by: String,
    },

    /// Destination directory or file could not be written
    #[error("cannot write {path}: {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration file or option
    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RelocateError {
    /// Process exit code for an error that aborted the whole run
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::UnbalancedBlock { .. } | Self::DestinationCollision { .. } => ExitCode::from(1),
            _ => ExitCode::from(2),
        }
    }

    /// Short machine-friendly label used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FileNotFound { .. } => "file_not_found",
            Self::UnreadableFile { .. } => "unreadable_file",
            Self::UnbalancedBlock { .. } => "unbalanced_block",
            Self::DestinationCollision { .. } => "destination_collision",
            Self::WriteFailure { .. } => "write_failure",
            Self::Config { .. } => "config",
            Self::Io(_) => "io",
        }
    }
}
