use crate::config::ConventionalCommitsConfig;
use crate::domain::{ConventionalCommit, IncrementKind};
use semver::Version;

/// Decides how far a set of commits moves a version
#[derive(Debug, Clone)]
pub struct VersionIncrementPolicy {
    significant_types: Vec<String>,
    ignore_insignificant: bool,
}

impl VersionIncrementPolicy {
    /// Create a new policy
    pub fn new(config: &ConventionalCommitsConfig, ignore_insignificant: bool) -> Self {
        VersionIncrementPolicy {
            significant_types: config.significant_types.clone(),
            ignore_insignificant,
        }
    }

    /// Classify commits into the increment they imply.
    ///
    /// A breaking change anywhere forces Major, otherwise any `feat`
    /// forces Minor. Remaining commits give Patch, unless insignificant
    /// changes are ignored, in which case only significant types count.
    pub fn classify<'a, I>(&self, commits: I) -> IncrementKind
    where
        I: IntoIterator<Item = &'a ConventionalCommit>,
    {
        commits
            .into_iter()
            .map(|commit| self.classify_one(commit))
            .max()
            .unwrap_or(IncrementKind::None)
    }

    fn classify_one(&self, commit: &ConventionalCommit) -> IncrementKind {
        if commit.is_breaking_change {
            IncrementKind::Major
        } else if commit.r#type == "feat" {
            IncrementKind::Minor
        } else if !self.ignore_insignificant || self.is_significant(commit) {
            IncrementKind::Patch
        } else {
            IncrementKind::None
        }
    }

    fn is_significant(&self, commit: &ConventionalCommit) -> bool {
        self.significant_types.iter().any(|t| *t == commit.r#type)
    }

    /// Apply `kind` to `base`
    pub fn next_version(&self, base: &Version, kind: IncrementKind) -> Version {
        kind.apply(base)
    }
}
