//! Locating the last release and the history since it.

use crate::domain::ReleaseTag;
use crate::error::Result;
use crate::git::{CommitInfo, Repository};

/// Resolves release tags and commit ranges against a repository
pub struct ReleaseTagResolver<'r, R: Repository> {
    repo: &'r R,
}

impl<'r, R: Repository> ReleaseTagResolver<'r, R> {
    pub fn new(repo: &'r R) -> Self {
        ReleaseTagResolver { repo }
    }

    /// Nearest tag reachable from HEAD.
    ///
    /// Absence of a tag is the normal first-release case, so any failure
    /// of the underlying describe degrades to `None`.
    pub fn latest_release_tag(&self) -> Option<ReleaseTag> {
        let name = match self.repo.describe_latest_tag() {
            Ok(Some(name)) => name,
            Ok(None) => return None,
            Err(e) => {
                log::debug!("No describable tag: {}", e);
                return None;
            }
        };

        match self.repo.find_tag_oid(&name) {
            Ok(Some(target)) => Some(ReleaseTag::new(name, target)),
            Ok(None) => None,
            Err(e) => {
                log::debug!("Cannot resolve tag '{}': {}", name, e);
                None
            }
        }
    }

    /// Commits reachable from HEAD but not from `tag`; the full history
    /// when `tag` is `None`
    pub fn commits_since(&self, tag: Option<&ReleaseTag>) -> Result<Vec<CommitInfo>> {
        self.repo
            .commits_excluding(tag.map(|t| t.friendly_name.as_str()))
    }

    /// All tag names of the repository
    pub fn tag_names(&self) -> Result<Vec<String>> {
        self.repo.list_tags()
    }
}
