use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for git-versionize operations
#[derive(Error, Debug)]
pub enum VersionizeError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Invalid version descriptor {}: {reason}", .path.display())]
    InvalidDescriptor { path: PathBuf, reason: String },

    #[error("Directory {} does not exist", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Directory {} or any parent directory do not contain a git working copy", .0.display())]
    NotAWorkingCopy(PathBuf),

    #[error("Repository {} is dirty. Please commit your changes.", .0.display())]
    DirtyWorkingCopy(PathBuf),

    #[error("Could not find any versionable scopes in {}", .0.display())]
    NoVersionableScopes(PathBuf),

    #[error("Scope '{scope}' is declared by both {} and {}", .first.display(), .second.display())]
    DuplicateScope {
        scope: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Tag '{0}' already exists")]
    TagAlreadyExists(String),

    #[error("Cannot release scope '{scope}' as {requested}: current version is {current}")]
    VersionRegression {
        scope: String,
        current: semver::Version,
        requested: semver::Version,
    },
}

/// Convenience type alias for Results in git-versionize
pub type Result<T> = std::result::Result<T, VersionizeError>;

impl VersionizeError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        VersionizeError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        VersionizeError::Version(msg.into())
    }

    /// Create an invalid descriptor error for the file at `path`
    pub fn invalid_descriptor(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        VersionizeError::InvalidDescriptor {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Process exit code for this error.
    ///
    /// Benign short-circuits (no commits, no significant change) are not
    /// errors and always exit with `0`.
    pub fn exit_code(&self) -> u8 {
        match self {
            VersionizeError::DirtyWorkingCopy(_) => 1,
            VersionizeError::DirectoryNotFound(_) => 2,
            VersionizeError::NotAWorkingCopy(_) => 3,
            VersionizeError::NoVersionableScopes(_) => 4,
            VersionizeError::InvalidDescriptor { .. }
            | VersionizeError::DuplicateScope { .. }
            | VersionizeError::Config(_)
            | VersionizeError::Version(_) => 5,
            VersionizeError::TagAlreadyExists(_) | VersionizeError::VersionRegression { .. } => 6,
            VersionizeError::Git(_) | VersionizeError::Io(_) | VersionizeError::Json(_) => 7,
        }
    }
}
