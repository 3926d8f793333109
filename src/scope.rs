//! Versionable scopes of a working copy and their per-run release state.

use crate::analyzer::VersionIncrementPolicy;
use crate::domain::{tag_belongs_to, ConventionalCommit, VersionDescriptor};
use crate::error::{Result, VersionizeError};
use crate::storage::read_descriptor;
use semver::Version;
use std::collections::{BTreeSet, HashMap};
use std::iter;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One independently versioned unit of the repository
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    pub descriptor: VersionDescriptor,
    /// Path of the descriptor file
    pub location: PathBuf,
    pub assigned_commits: Vec<ConventionalCommit>,
    pub prior_release_tags: BTreeSet<String>,
    /// `None` until versions are computed
    pub computed_version: Option<Version>,
}

impl Scope {
    pub fn new(descriptor: VersionDescriptor, location: impl Into<PathBuf>) -> Self {
        Scope {
            descriptor,
            location: location.into(),
            assigned_commits: Vec::new(),
            prior_release_tags: BTreeSet::new(),
            computed_version: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.scope_name
    }

    /// Directory holding the descriptor
    pub fn directory(&self) -> &Path {
        self.location.parent().unwrap_or_else(|| Path::new("."))
    }

    /// No release tag of this scope exists yet
    pub fn is_initial_release(&self) -> bool {
        self.prior_release_tags.is_empty()
    }

    /// Computed version differs from the stored one, or this is a first
    /// release being materialised
    pub fn has_update(&self) -> bool {
        match &self.computed_version {
            Some(next) => *next != self.descriptor.version || self.is_initial_release(),
            None => false,
        }
    }

    /// Tag the computed version will be released under
    pub fn release_tag(&self) -> Option<String> {
        self.computed_version
            .as_ref()
            .map(|version| self.descriptor.tag_name(version))
    }

    /// Human label for output, `(default)` for the unnamed scope
    pub fn display_name(&self) -> &str {
        if self.descriptor.is_default_scope() {
            "(default)"
        } else {
            self.name()
        }
    }
}

/// All scopes of one orchestration run
#[derive(Debug, Clone, Default)]
pub struct ScopeRegistry {
    scopes: Vec<Scope>,
    skipped: Vec<(PathBuf, String)>,
}

impl ScopeRegistry {
    /// Build a registry, rejecting two scopes with the same name
    pub fn from_scopes(scopes: Vec<Scope>) -> Result<Self> {
        let mut seen: HashMap<&str, &Path> = HashMap::new();
        for scope in &scopes {
            if let Some(first) = seen.insert(scope.name(), &scope.location) {
                return Err(VersionizeError::DuplicateScope {
                    scope: scope.name().to_string(),
                    first: first.to_path_buf(),
                    second: scope.location.clone(),
                });
            }
        }

        Ok(ScopeRegistry {
            scopes,
            skipped: Vec::new(),
        })
    }

    /// Find every parseable `descriptor_file` below `root`.
    ///
    /// Files that fail to parse are not versionable and are only recorded
    /// in [ScopeRegistry::skipped]. Scopes come out in lexicographic path
    /// order.
    pub fn discover(root: &Path, descriptor_file: &str) -> Result<Self> {
        let mut scopes = Vec::new();
        let mut skipped = Vec::new();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != ".git");

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable path during discovery: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() || entry.file_name() != descriptor_file {
                continue;
            }

            match read_descriptor(entry.path()) {
                Ok(descriptor) => {
                    log::debug!(
                        "Found scope '{}' at {}",
                        descriptor.scope_name,
                        entry.path().display()
                    );
                    scopes.push(Scope::new(descriptor, entry.path()));
                }
                Err(e) => {
                    log::debug!("Not versionable: {}", e);
                    skipped.push((entry.path().to_path_buf(), e.to_string()));
                }
            }
        }

        let mut registry = Self::from_scopes(scopes)?;
        registry.skipped = skipped;
        Ok(registry)
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// Descriptor files that were found but could not be parsed
    pub fn skipped(&self) -> &[(PathBuf, String)] {
        &self.skipped
    }

    /// Assign commits and prior release tags to every scope.
    ///
    /// A commit goes to a scope when its declared scope is the scope's own
    /// name or one of its parent scopes. Tags go to a scope when they name
    /// it. Input order of commits is preserved. With no commits at all the
    /// registry is returned unchanged.
    pub fn assign_commits_and_tags(
        &self,
        commits: &[ConventionalCommit],
        tags: &[String],
    ) -> ScopeRegistry {
        if commits.is_empty() {
            return self.clone();
        }

        let mut by_scope: HashMap<&str, Vec<usize>> = HashMap::new();
        for (index, commit) in commits.iter().enumerate() {
            by_scope.entry(commit.scope_key()).or_default().push(index);
        }

        let scopes = self
            .scopes
            .iter()
            .map(|scope| {
                let descriptor = &scope.descriptor;
                let indices: BTreeSet<usize> = iter::once(descriptor.scope_name.as_str())
                    .chain(descriptor.parent_scopes.iter().map(String::as_str))
                    .filter_map(|key| by_scope.get(key))
                    .flatten()
                    .copied()
                    .collect();

                Scope {
                    assigned_commits: indices.into_iter().map(|i| commits[i].clone()).collect(),
                    prior_release_tags: tags
                        .iter()
                        .filter(|tag| tag_belongs_to(tag, &descriptor.scope_name))
                        .cloned()
                        .collect(),
                    ..scope.clone()
                }
            })
            .collect();

        ScopeRegistry {
            scopes,
            skipped: self.skipped.clone(),
        }
    }

    /// Compute the next version of every scope.
    ///
    /// An explicit `release_as` wins over everything else. Otherwise a
    /// scope without prior release keeps its current version, and a scope
    /// with one is moved by `policy` according to its assigned commits.
    pub fn compute_versions(
        &self,
        policy: &VersionIncrementPolicy,
        release_as: Option<&Version>,
    ) -> Result<ScopeRegistry> {
        let scopes = self
            .scopes
            .iter()
            .map(|scope| {
                let current = &scope.descriptor.version;
                let next = match release_as {
                    Some(requested) if requested < current => {
                        return Err(VersionizeError::VersionRegression {
                            scope: scope.display_name().to_string(),
                            current: current.clone(),
                            requested: requested.clone(),
                        })
                    }
                    Some(requested) => requested.clone(),
                    None if scope.is_initial_release() => current.clone(),
                    None => {
                        let kind = policy.classify(&scope.assigned_commits);
                        log::debug!(
                            "Scope '{}': {} commits, {} increment",
                            scope.display_name(),
                            scope.assigned_commits.len(),
                            kind
                        );
                        policy.next_version(current, kind)
                    }
                };

                Ok(Scope {
                    computed_version: Some(next),
                    ..scope.clone()
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ScopeRegistry {
            scopes,
            skipped: self.skipped.clone(),
        })
    }

    /// Scopes whose release has to be written back
    pub fn scopes_with_updates(&self) -> Vec<&Scope> {
        self.scopes.iter().filter(|scope| scope.has_update()).collect()
    }
}
