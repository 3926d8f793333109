//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the Git operations a
//! release needs, allowing for multiple implementations including real Git
//! repositories and mock implementations for testing.
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation for testing
//!
//! The working copy is assumed to be used by a single process at a time.
//! No locking is done here; running two releases against the same working
//! copy concurrently is the caller's problem.

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use git2::Oid;
use std::path::Path;

/// Commit information for analysis
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    pub id: Oid,
    /// The full commit message
    pub message: String,
    pub author: String,
}

/// Common git operation trait for abstraction
///
/// All methods return [crate::error::Result<T>]. Implementations map their
/// underlying errors into [crate::error::VersionizeError].
pub trait Repository {
    /// Root of the working tree
    fn workdir(&self) -> &Path;

    /// Whether the working copy has uncommitted or untracked changes
    fn is_dirty(&self) -> Result<bool>;

    /// Name of the nearest tag reachable from HEAD (`git describe --tags`)
    ///
    /// # Returns
    /// * `Ok(Some(name))` - Tag describing HEAD
    /// * `Ok(None)` - No tag is reachable
    /// * `Err` - If describe fails for another reason
    fn describe_latest_tag(&self) -> Result<Option<String>>;

    /// Get all tag names in the repository, sorted alphabetically
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Find a tag by name and get the commit it points at
    ///
    /// Handles both lightweight and annotated tags.
    fn find_tag_oid(&self, tag_name: &str) -> Result<Option<Oid>>;

    /// Commits reachable from HEAD but not from `tag`, newest first
    ///
    /// With `tag = None` this is the full history reachable from HEAD.
    fn commits_excluding(&self, tag: Option<&str>) -> Result<Vec<CommitInfo>>;

    /// Add a file to the index
    ///
    /// # Arguments
    /// * `path` - Absolute path or path relative to [Repository::workdir]
    fn stage(&self, path: &Path) -> Result<()>;

    /// Commit the index on top of HEAD with the configured signature
    fn commit(&self, message: &str) -> Result<Oid>;

    /// Create an annotated tag pointing at `target`
    fn create_tag(&self, name: &str, target: Oid, message: &str) -> Result<()>;

    /// URL of a configured remote, if any
    fn remote_url(&self, remote: &str) -> Option<String>;
}
