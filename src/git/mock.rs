use crate::error::Result;
use crate::git::{CommitInfo, Repository};
use git2::Oid;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// A tag recorded by [MockRepository]
#[derive(Debug, Clone, PartialEq)]
pub struct MockTag {
    pub target: Oid,
    /// `None` for lightweight tags
    pub message: Option<String>,
}

/// In-memory repository with linear history, for testing without git
pub struct MockRepository {
    workdir: PathBuf,
    dirty: Cell<bool>,
    fail_describe: Cell<bool>,
    next_id: Cell<u32>,
    /// Newest first
    commits: RefCell<Vec<CommitInfo>>,
    tags: RefCell<BTreeMap<String, MockTag>>,
    staged: RefCell<Vec<PathBuf>>,
    remotes: RefCell<HashMap<String, String>>,
}

impl MockRepository {
    /// Create an empty mock repository rooted at `workdir`
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        MockRepository {
            workdir: workdir.into(),
            dirty: Cell::new(false),
            fail_describe: Cell::new(false),
            next_id: Cell::new(1),
            commits: RefCell::new(Vec::new()),
            tags: RefCell::new(BTreeMap::new()),
            staged: RefCell::new(Vec::new()),
            remotes: RefCell::new(HashMap::new()),
        }
    }

    fn allocate_oid(&self) -> Oid {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let mut bytes = [0u8; 20];
        bytes[16..].copy_from_slice(&id.to_be_bytes());
        Oid::from_bytes(&bytes).unwrap_or_else(|_| Oid::zero())
    }

    /// Append a commit on top of the history and return its id
    pub fn add_commit(&self, message: impl Into<String>) -> Oid {
        let id = self.allocate_oid();
        self.commits.borrow_mut().insert(
            0,
            CommitInfo {
                id,
                message: message.into(),
                author: "Test Author".to_string(),
            },
        );
        id
    }

    /// Add a lightweight tag pointing at `target`
    pub fn add_tag(&self, name: impl Into<String>, target: Oid) {
        self.tags.borrow_mut().insert(
            name.into(),
            MockTag {
                target,
                message: None,
            },
        );
    }

    pub fn set_dirty(&self, dirty: bool) {
        self.dirty.set(dirty);
    }

    /// Make `describe_latest_tag` fail
    pub fn set_fail_describe(&self, fail: bool) {
        self.fail_describe.set(fail);
    }

    pub fn set_remote(&self, name: impl Into<String>, url: impl Into<String>) {
        self.remotes.borrow_mut().insert(name.into(), url.into());
    }

    pub fn staged_paths(&self) -> Vec<PathBuf> {
        self.staged.borrow().clone()
    }

    pub fn tag(&self, name: &str) -> Option<MockTag> {
        self.tags.borrow().get(name).cloned()
    }

    pub fn commit_count(&self) -> usize {
        self.commits.borrow().len()
    }

    /// Message of the newest commit
    pub fn head_message(&self) -> Option<String> {
        self.commits.borrow().first().map(|c| c.message.clone())
    }
}

impl Repository for MockRepository {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn is_dirty(&self) -> Result<bool> {
        Ok(self.dirty.get())
    }

    fn describe_latest_tag(&self) -> Result<Option<String>> {
        if self.fail_describe.get() {
            return Err(git2::Error::from_str("No tags can describe HEAD").into());
        }

        let tags = self.tags.borrow();
        let found = self.commits.borrow().iter().find_map(|commit| {
            tags.iter()
                .find(|(_, tag)| tag.target == commit.id)
                .map(|(name, _)| name.clone())
        });
        Ok(found)
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.tags.borrow().keys().cloned().collect())
    }

    fn find_tag_oid(&self, tag_name: &str) -> Result<Option<Oid>> {
        Ok(self.tags.borrow().get(tag_name).map(|tag| tag.target))
    }

    fn commits_excluding(&self, tag: Option<&str>) -> Result<Vec<CommitInfo>> {
        let commits = self.commits.borrow();
        let Some(tag_name) = tag else {
            return Ok(commits.clone());
        };

        let target = self
            .find_tag_oid(tag_name)?
            .ok_or_else(|| git2::Error::from_str(&format!("Cannot find tag '{}'", tag_name)))?;

        Ok(commits
            .iter()
            .take_while(|commit| commit.id != target)
            .cloned()
            .collect())
    }

    fn stage(&self, path: &Path) -> Result<()> {
        self.staged.borrow_mut().push(path.to_path_buf());
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<Oid> {
        Ok(self.add_commit(message))
    }

    fn create_tag(&self, name: &str, target: Oid, message: &str) -> Result<()> {
        let mut tags = self.tags.borrow_mut();
        if tags.contains_key(name) {
            return Err(git2::Error::from_str(&format!("tag '{}' already exists", name)).into());
        }

        tags.insert(
            name.to_string(),
            MockTag {
                target,
                message: Some(message.to_string()),
            },
        );
        Ok(())
    }

    fn remote_url(&self, remote: &str) -> Option<String> {
        self.remotes.borrow().get(remote).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_history_is_newest_first() {
        let repo = MockRepository::new("/repo");
        repo.add_commit("first commit");
        repo.add_commit("second commit");

        let commits = repo.commits_excluding(None).unwrap();
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].message, "second commit");
        assert_ne!(commits[0].id, commits[1].id);
    }

    #[test]
    fn test_mock_repository_tags() {
        let repo = MockRepository::new("/repo");
        let oid = repo.add_commit("init");

        repo.add_tag("v1.0.0", oid);

        assert_eq!(repo.find_tag_oid("v1.0.0").unwrap(), Some(oid));
        assert_eq!(repo.find_tag_oid("v2.0.0").unwrap(), None);
        assert_eq!(repo.list_tags().unwrap(), vec!["v1.0.0".to_string()]);
    }

    #[test]
    fn test_mock_commits_excluding_tag() {
        let repo = MockRepository::new("/repo");
        let tagged = repo.add_commit("chore: init");
        repo.add_tag("v1.0.0", tagged);
        repo.add_commit("fix: one");
        repo.add_commit("feat: two");

        let since = repo.commits_excluding(Some("v1.0.0")).unwrap();
        let messages: Vec<&str> = since.iter().map(|c| c.message.as_str()).collect();
        assert_eq!(messages, vec!["feat: two", "fix: one"]);
        assert!(repo.commits_excluding(Some("v9.0.0")).is_err());
    }

    #[test]
    fn test_mock_describe() {
        let repo = MockRepository::new("/repo");
        assert_eq!(repo.describe_latest_tag().unwrap(), None);

        let tagged = repo.add_commit("chore: init");
        repo.add_tag("api/v1.0.0", tagged);
        repo.add_commit("fix: later");
        assert_eq!(repo.describe_latest_tag().unwrap().as_deref(), Some("api/v1.0.0"));

        repo.set_fail_describe(true);
        assert!(repo.describe_latest_tag().is_err());
    }

    #[test]
    fn test_mock_create_tag_rejects_duplicates() {
        let repo = MockRepository::new("/repo");
        let oid = repo.add_commit("init");
        repo.create_tag("v1.0.0", oid, "1.0.0").unwrap();

        assert_eq!(repo.tag("v1.0.0").unwrap().message.as_deref(), Some("1.0.0"));
        assert!(repo.create_tag("v1.0.0", oid, "1.0.0").is_err());
    }
}
