//! Error types for traversal, criteria evaluation and actions

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use thiserror::Error;

/// Failures raised while walking a tree or acting on a selected entry.
///
/// Everything except [`FindError::Output`] is recoverable: the walker reports
/// it and carries on with the next entry.
#[derive(Error, Debug)]
pub enum FindError {
    #[error("could not open directory {}: {source}", .path.display())]
    OpenDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error reading directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read metadata for {}: {source}", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not delete {}: {source}", .path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not run {program} on {}: {source}", .path.display())]
    Spawn {
        program: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} failed on {} ({status})", .path.display())]
    CommandFailed {
        program: String,
        path: PathBuf,
        status: ExitStatus,
    },

    #[error("symlink cycle at {}, not descending", .0.display())]
    SymlinkCycle(PathBuf),

    #[error("error writing output: {0}")]
    Output(#[source] std::io::Error),
}

impl FindError {
    /// The path this error occurred at, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::OpenDir { path, .. }
            | Self::ReadDir { path, .. }
            | Self::Metadata { path, .. }
            | Self::Delete { path, .. }
            | Self::Spawn { path, .. }
            | Self::CommandFailed { path, .. }
            | Self::SymlinkCycle(path) => Some(path),
            Self::Output(_) => None,
        }
    }

    /// Whether the walk can continue after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Output(_))
    }
}

/// Invalid command-line values that clap cannot reject on its own.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgError {
    #[error("invalid modification age '{0}': expected [+|-]MINUTES")]
    InvalidModAge(String),

    #[error("action 'mv' needs a destination argument")]
    MissingDestination,
}
