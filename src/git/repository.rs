use crate::error::{Result, VersionizeError};
use crate::git::CommitInfo;
use git2::{
    Commit, DescribeFormatOptions, DescribeOptions, ErrorCode, Oid, Repository as Git2Repo, Sort,
    StatusOptions,
};
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    workdir: PathBuf,
}

impl Git2Repository {
    /// Discover the working copy containing `dir`, searching upward.
    ///
    /// # Returns
    /// * `Err(DirectoryNotFound)` - If `dir` does not exist
    /// * `Err(NotAWorkingCopy)` - If no repository with a working tree contains `dir`
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(VersionizeError::DirectoryNotFound(dir.to_path_buf()));
        }

        let repo = match Git2Repo::discover(dir) {
            Ok(repo) => repo,
            Err(e) if e.code() == ErrorCode::NotFound => {
                return Err(VersionizeError::NotAWorkingCopy(dir.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        };

        Self::from_git2(repo).map_err(|e| match e {
            VersionizeError::NotAWorkingCopy(_) => VersionizeError::NotAWorkingCopy(dir.to_path_buf()),
            other => other,
        })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Result<Self> {
        let workdir = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| VersionizeError::NotAWorkingCopy(repo.path().to_path_buf()))?;

        Ok(Git2Repository { repo, workdir })
    }

    fn head_commit(&self) -> Result<Option<Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e) if is_unborn(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn relative_to_workdir<'p>(&self, path: &'p Path) -> &'p Path {
        path.strip_prefix(&self.workdir).unwrap_or(path)
    }
}

fn is_unborn(e: &git2::Error) -> bool {
    matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound)
}

impl super::Repository for Git2Repository {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn is_dirty(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(!statuses.is_empty())
    }

    fn describe_latest_tag(&self) -> Result<Option<String>> {
        let mut options = DescribeOptions::new();
        options.describe_tags();

        let describe = match self.repo.describe(&options) {
            Ok(describe) => describe,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // Abbreviation size 0 renders the bare tag name, like `--abbrev=0`
        let mut format = DescribeFormatOptions::new();
        format.abbreviated_size(0);
        Ok(Some(describe.format(Some(&format))?))
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;
        let mut names: Vec<String> = tags.iter().flatten().map(|s| s.to_string()).collect();
        names.sort();
        Ok(names)
    }

    fn find_tag_oid(&self, tag_name: &str) -> Result<Option<Oid>> {
        let reference_name = format!("refs/tags/{}", tag_name);

        match self.repo.find_reference(&reference_name) {
            Ok(reference) => Ok(Some(reference.peel_to_commit()?.id())),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn commits_excluding(&self, tag: Option<&str>) -> Result<Vec<CommitInfo>> {
        if self.head_commit()?.is_none() {
            return Ok(Vec::new());
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push_head()?;

        if let Some(tag_name) = tag {
            let tag_oid = self.find_tag_oid(tag_name)?.ok_or_else(|| {
                git2::Error::from_str(&format!("Cannot find tag '{}'", tag_name))
            })?;
            revwalk.hide(tag_oid)?;
        }

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;

            commits.push(CommitInfo {
                id: oid,
                message: commit.message().unwrap_or("").to_string(),
                author: commit.author().name().unwrap_or("unknown").to_string(),
            });
        }

        Ok(commits)
    }

    fn stage(&self, path: &Path) -> Result<()> {
        let mut index = self.repo.index()?;
        index.add_path(self.relative_to_workdir(path))?;
        index.write()?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<Oid> {
        let signature = self.repo.signature()?;
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let parent = self.head_commit()?;
        let parents: Vec<&Commit> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
        Ok(oid)
    }

    fn create_tag(&self, name: &str, target: Oid, message: &str) -> Result<()> {
        let object = self.repo.find_object(target, None)?;
        let signature = self.repo.signature()?;

        self.repo.tag(name, &object, &signature, message, false)?;
        Ok(())
    }

    fn remote_url(&self, remote: &str) -> Option<String> {
        let remote = self.repo.find_remote(remote).ok()?;
        remote.url().map(String::from)
    }
}
