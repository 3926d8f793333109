//! Main release workflow orchestration logic
//!
//! This module contains the release state machine, kept apart from CLI
//! argument parsing so that it can be driven programmatically and tested
//! against [crate::git::MockRepository].
//!
//! Every state either continues, short-circuits with a benign
//! [ReleaseOutcome] or fails with a [VersionizeError]. Failures before the
//! first write leave the working copy untouched. Once writing has begun
//! there is no rollback; a failure there leaves a dirty working copy.

use chrono::Local;
use git2::Oid;
use semver::Version;

use crate::analyzer::VersionIncrementPolicy;
use crate::boundary::BoundaryWarning;
use crate::changelog::{link_builder_for, Changelog};
use crate::config::Config;
use crate::conventional::{CommitParser, ConventionalCommitParser};
use crate::error::{Result, VersionizeError};
use crate::git::Repository;
use crate::resolver::ReleaseTagResolver;
use crate::scope::{Scope, ScopeRegistry};
use crate::storage::write_descriptor;

/// Arguments for the release workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
/// This decoupling allows the workflow to be called programmatically
/// without depending on clap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseArgs {
    /// Compute everything, write nothing
    pub dry_run: bool,

    pub skip_dirty_check: bool,

    /// Write descriptors and changelogs but neither commit nor tag
    pub skip_commit: bool,

    /// Release every scope at exactly this version
    pub release_as: Option<Version>,

    /// Commits outside the significant types do not cause a release
    pub ignore_insignificant: bool,

    /// List every commit in the changelog, not only configured sections
    pub include_all_commits: bool,
}

/// Version change of one released scope
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeRelease {
    pub scope_name: String,
    pub previous: Version,
    pub next: Version,
    pub tag: String,
    pub initial: bool,
}

/// Result of a release that got past the significance gate
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseSummary {
    pub scopes: Vec<ScopeRelease>,
    /// `None` under dry-run or skip-commit
    pub commit: Option<Oid>,
    /// Tags actually created
    pub tags: Vec<String>,
    pub dry_run: bool,
    pub warnings: Vec<BoundaryWarning>,
}

/// How a release run ended
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseOutcome {
    /// Nothing was committed since the last release
    NoCommits { warnings: Vec<BoundaryWarning> },
    /// Commits exist but none of them changes any version
    NoSignificantChanges {
        latest_tag: Option<String>,
        warnings: Vec<BoundaryWarning>,
    },
    Released(ReleaseSummary),
}

/// Main release workflow
///
/// Runs the release state machine:
/// 1. Check the working copy is clean
/// 2. Discover versionable scopes
/// 3. Resolve the latest release tag and the commits since
/// 4. Parse commits
/// 5. Group commits and tags by scope
/// 6. Compute next versions
/// 7. Stop when no scope changes
/// 8. Write descriptors and changelogs
/// 9. Commit
/// 10. Tag
///
/// # Arguments
///
/// * `repo` - Repository the release is made in
/// * `args` - Workflow arguments (dry run, skips, overrides)
/// * `config` - Loaded configuration
///
/// # Returns
///
/// The outcome of the run, or the error that stopped it
pub fn run_release<R: Repository>(
    repo: &R,
    args: &ReleaseArgs,
    config: &Config,
) -> Result<ReleaseOutcome> {
    let workdir = repo.workdir();
    let mut warnings = Vec::new();

    if !args.skip_dirty_check && repo.is_dirty()? {
        return Err(VersionizeError::DirtyWorkingCopy(workdir.to_path_buf()));
    }

    let registry = ScopeRegistry::discover(workdir, &config.descriptor_file)?;
    warnings.extend(registry.skipped().iter().map(|(path, reason)| {
        BoundaryWarning::SkippedDescriptor {
            path: path.clone(),
            reason: reason.clone(),
        }
    }));
    if registry.is_empty() {
        return Err(VersionizeError::NoVersionableScopes(workdir.to_path_buf()));
    }
    log::info!("Discovered {} versionable scopes", registry.len());
    for scope in registry.scopes() {
        log::info!(
            "  {} {} ({})",
            scope.display_name(),
            scope.descriptor.version,
            scope.location.display()
        );
    }

    let resolver = ReleaseTagResolver::new(repo);
    let latest_tag = resolver.latest_release_tag();
    if latest_tag.is_none() {
        warnings.push(BoundaryWarning::NoReleaseTag);
    }
    let raw_commits = resolver.commits_since(latest_tag.as_ref())?;

    let commits = ConventionalCommitParser::new(&config.conventional_commits).parse(&raw_commits);
    if commits.is_empty() {
        log::info!("No commits since the last release");
        return Ok(ReleaseOutcome::NoCommits { warnings });
    }

    let existing_tags = resolver.tag_names()?;
    let ignore_insignificant = args.ignore_insignificant || config.behavior.ignore_insignificant;
    let policy = VersionIncrementPolicy::new(&config.conventional_commits, ignore_insignificant);

    let computed = registry
        .assign_commits_and_tags(&commits, &existing_tags)
        .compute_versions(&policy, args.release_as.as_ref())?;

    let updated = computed.scopes_with_updates();
    if updated.is_empty() {
        log::info!("No scope version affected by {} commits", commits.len());
        return Ok(ReleaseOutcome::NoSignificantChanges {
            latest_tag: latest_tag.map(|t| t.friendly_name),
            warnings,
        });
    }

    let releases = updated
        .iter()
        .map(|scope| scope_release(scope))
        .collect::<Result<Vec<_>>>()?;

    if let Some(taken) = releases
        .iter()
        .find(|release| existing_tags.contains(&release.tag))
    {
        return Err(VersionizeError::TagAlreadyExists(taken.tag.clone()));
    }

    if args.dry_run {
        return Ok(ReleaseOutcome::Released(ReleaseSummary {
            scopes: releases,
            commit: None,
            tags: Vec::new(),
            dry_run: true,
            warnings,
        }));
    }

    let include_all = args.include_all_commits || config.behavior.include_all_commits;
    let links = link_builder_for(repo.remote_url("origin").as_deref());
    let timestamp = Local::now();
    let mut touched = Vec::new();

    for (scope, release) in updated.iter().zip(&releases) {
        write_descriptor(&scope.location, &scope.descriptor.with_version(release.next.clone()))?;
        touched.push(scope.location.clone());

        let changelog = Changelog::for_scope(scope.directory(), &config.changelog);
        changelog.write(
            scope.name(),
            &release.next,
            timestamp,
            links.as_ref(),
            &scope.assigned_commits,
            include_all,
        )?;
        touched.push(changelog.path().to_path_buf());
        log::info!(
            "Bumped {} from {} to {}",
            scope.display_name(),
            release.previous,
            release.next
        );
    }

    let tag_names: Vec<String> = releases.iter().map(|r| r.tag.clone()).collect();
    if args.skip_commit {
        warnings.push(BoundaryWarning::CommitSkipped { tags: tag_names });
        return Ok(ReleaseOutcome::Released(ReleaseSummary {
            scopes: releases,
            commit: None,
            tags: Vec::new(),
            dry_run: false,
            warnings,
        }));
    }

    for path in &touched {
        repo.stage(path)?;
    }
    let commit = repo.commit(&release_commit_message(&config.release.commit_message_prefix, &releases))?;

    for release in &releases {
        repo.create_tag(&release.tag, commit, &release.next.to_string())?;
        log::info!("Tagged {} at {}", release.tag, commit);
    }

    Ok(ReleaseOutcome::Released(ReleaseSummary {
        scopes: releases,
        commit: Some(commit),
        tags: tag_names,
        dry_run: false,
        warnings,
    }))
}

fn scope_release(scope: &Scope) -> Result<ScopeRelease> {
    let next = scope.computed_version.clone().ok_or_else(|| {
        VersionizeError::version(format!("no version computed for {}", scope.display_name()))
    })?;

    Ok(ScopeRelease {
        scope_name: scope.name().to_string(),
        previous: scope.descriptor.version.clone(),
        tag: scope.descriptor.tag_name(&next),
        next,
        initial: scope.is_initial_release(),
    })
}

/// Commit message with one `scope: version` line per released scope
pub fn release_commit_message(prefix: &str, releases: &[ScopeRelease]) -> String {
    let lines: Vec<String> = releases
        .iter()
        .map(|release| {
            if release.scope_name.is_empty() {
                release.next.to_string()
            } else {
                format!("{}: {}", release.scope_name, release.next)
            }
        })
        .collect();
    format!("{}{}", prefix, lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;
    use std::fs;
    use std::path::Path;

    fn write_scope(root: &Path, dir: &str, content: &str) {
        fs::create_dir_all(root.join(dir)).unwrap();
        fs::write(root.join(dir).join("version.json"), content).unwrap();
    }

    fn release(scope: &str, next: Version) -> ScopeRelease {
        ScopeRelease {
            scope_name: scope.to_string(),
            previous: Version::new(0, 0, 0),
            tag: crate::domain::release_tag_name(scope, &next),
            next,
            initial: false,
        }
    }

    #[test]
    fn test_release_commit_message_one_line_per_scope() {
        let message = release_commit_message(
            "chore(release): ",
            &[release("api", Version::new(1, 2, 1)), release("web", Version::new(0, 4, 0))],
        );
        assert_eq!(message, "chore(release): api: 1.2.1\nweb: 0.4.0");
    }

    #[test]
    fn test_release_commit_message_default_scope() {
        let message = release_commit_message("release: ", &[release("", Version::new(2, 0, 0))]);
        assert_eq!(message, "release: 2.0.0");
    }

    #[test]
    fn test_dirty_working_copy_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let repo = MockRepository::new(dir.path());
        repo.set_dirty(true);

        let err = run_release(&repo, &ReleaseArgs::default(), &Config::default()).unwrap_err();
        assert!(matches!(err, VersionizeError::DirtyWorkingCopy(_)));
    }

    #[test]
    fn test_skip_dirty_check() {
        let dir = tempfile::tempdir().unwrap();
        write_scope(dir.path(), "api", r#"{"version": "1.0.0", "scopeName": "api"}"#);
        let repo = MockRepository::new(dir.path());
        repo.set_dirty(true);

        let args = ReleaseArgs {
            skip_dirty_check: true,
            ..Default::default()
        };
        let outcome = run_release(&repo, &args, &Config::default()).unwrap();
        assert!(matches!(outcome, ReleaseOutcome::NoCommits { .. }));
    }

    #[test]
    fn test_no_scopes_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = MockRepository::new(dir.path());
        repo.add_commit("feat: something");

        let err = run_release(&repo, &ReleaseArgs::default(), &Config::default()).unwrap_err();
        assert!(matches!(err, VersionizeError::NoVersionableScopes(_)));
    }

    #[test]
    fn test_initial_release_commits_and_tags() {
        let dir = tempfile::tempdir().unwrap();
        write_scope(dir.path(), "api", r#"{"version": "1.2.0", "scopeName": "api"}"#);
        let repo = MockRepository::new(dir.path());
        repo.add_commit("feat: add endpoint");
        repo.add_commit("fix(api): null check");

        let summary = match run_release(&repo, &ReleaseArgs::default(), &Config::default()).unwrap() {
            ReleaseOutcome::Released(summary) => summary,
            other => panic!("expected a release, got {:?}", other),
        };

        assert_eq!(summary.tags, vec!["api/v1.2.0".to_string()]);
        assert!(summary.scopes[0].initial);
        assert_eq!(summary.scopes[0].next, Version::new(1, 2, 0));
        assert!(summary.warnings.contains(&BoundaryWarning::NoReleaseTag));

        let commit = summary.commit.unwrap();
        let tag = repo.tag("api/v1.2.0").unwrap();
        assert_eq!(tag.target, commit);
        assert_eq!(tag.message.as_deref(), Some("1.2.0"));
        assert_eq!(repo.head_message().as_deref(), Some("chore(release): api: 1.2.0"));

        let staged = repo.staged_paths();
        assert!(staged.iter().any(|p| p.ends_with("api/version.json")));
        assert!(staged.iter().any(|p| p.ends_with("api/CHANGELOG.md")));
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        write_scope(dir.path(), "api", r#"{"version": "1.2.0", "scopeName": "api"}"#);
        let repo = MockRepository::new(dir.path());
        repo.add_commit("fix(api): null check");

        run_release(&repo, &ReleaseArgs::default(), &Config::default()).unwrap();
        let commits = repo.commit_count();
        let changelog = fs::read_to_string(dir.path().join("api/CHANGELOG.md")).unwrap();

        let outcome = run_release(&repo, &ReleaseArgs::default(), &Config::default()).unwrap();
        assert!(matches!(outcome, ReleaseOutcome::NoCommits { .. }));
        assert_eq!(repo.commit_count(), commits);
        assert_eq!(fs::read_to_string(dir.path().join("api/CHANGELOG.md")).unwrap(), changelog);
    }

    #[test]
    fn test_ignored_changes_short_circuit_without_writes() {
        let dir = tempfile::tempdir().unwrap();
        write_scope(dir.path(), "api", r#"{"version": "1.2.0", "scopeName": "api"}"#);
        let repo = MockRepository::new(dir.path());
        let tagged = repo.add_commit("chore(release): api: 1.2.0");
        repo.add_tag("api/v1.2.0", tagged);
        repo.add_commit("docs(api): update readme");

        let args = ReleaseArgs {
            ignore_insignificant: true,
            ..Default::default()
        };
        let outcome = run_release(&repo, &args, &Config::default()).unwrap();

        assert_eq!(
            outcome,
            ReleaseOutcome::NoSignificantChanges {
                latest_tag: Some("api/v1.2.0".to_string()),
                warnings: Vec::new(),
            }
        );
        assert!(!dir.path().join("api/CHANGELOG.md").exists());
        assert!(repo.staged_paths().is_empty());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let descriptor = r#"{"version": "1.2.0", "scopeName": "api"}"#;
        write_scope(dir.path(), "api", descriptor);
        let repo = MockRepository::new(dir.path());
        let tagged = repo.add_commit("chore: init");
        repo.add_tag("api/v1.2.0", tagged);
        repo.add_commit("feat(api): add endpoint");

        let args = ReleaseArgs {
            dry_run: true,
            ..Default::default()
        };
        let ReleaseOutcome::Released(summary) = run_release(&repo, &args, &Config::default()).unwrap() else {
            panic!("expected a release");
        };

        assert!(summary.dry_run);
        assert_eq!(summary.scopes[0].next, Version::new(1, 3, 0));
        assert_eq!(summary.commit, None);
        assert!(summary.tags.is_empty());
        assert_eq!(fs::read_to_string(dir.path().join("api/version.json")).unwrap(), descriptor);
        assert!(!dir.path().join("api/CHANGELOG.md").exists());
        assert_eq!(repo.commit_count(), 2);
    }

    #[test]
    fn test_skip_commit_writes_files_but_no_tags() {
        let dir = tempfile::tempdir().unwrap();
        write_scope(dir.path(), "api", r#"{"version": "1.2.0", "scopeName": "api"}"#);
        let repo = MockRepository::new(dir.path());
        let tagged = repo.add_commit("chore: init");
        repo.add_tag("api/v1.2.0", tagged);
        repo.add_commit("fix(api): null check");

        let args = ReleaseArgs {
            skip_commit: true,
            ..Default::default()
        };
        let ReleaseOutcome::Released(summary) = run_release(&repo, &args, &Config::default()).unwrap() else {
            panic!("expected a release");
        };

        assert!(summary.tags.is_empty());
        assert!(summary.warnings.contains(&BoundaryWarning::CommitSkipped {
            tags: vec!["api/v1.2.1".to_string()],
        }));
        assert!(fs::read_to_string(dir.path().join("api/version.json"))
            .unwrap()
            .contains("\"1.2.1\""));
        assert!(repo.tag("api/v1.2.1").is_none());
        assert_eq!(repo.commit_count(), 2);
    }

    #[test]
    fn test_existing_tag_blocks_release_before_writes() {
        let dir = tempfile::tempdir().unwrap();
        let descriptor = r#"{"version": "1.2.0", "scopeName": "api"}"#;
        write_scope(dir.path(), "api", descriptor);
        let repo = MockRepository::new(dir.path());
        let tagged = repo.add_commit("chore: init");
        repo.add_tag("api/v1.2.0", tagged);
        repo.add_tag("api/v1.3.0", Oid::zero());
        repo.add_commit("feat(api): add endpoint");

        let err = run_release(&repo, &ReleaseArgs::default(), &Config::default()).unwrap_err();
        assert!(matches!(err, VersionizeError::TagAlreadyExists(ref tag) if tag == "api/v1.3.0"));
        assert_eq!(fs::read_to_string(dir.path().join("api/version.json")).unwrap(), descriptor);
    }

    #[test]
    fn test_changelog_links_follow_origin_remote() {
        let dir = tempfile::tempdir().unwrap();
        write_scope(dir.path(), "api", r#"{"version": "1.2.0", "scopeName": "api"}"#);
        let repo = MockRepository::new(dir.path());
        repo.set_remote("origin", "git@github.com:acme/widgets.git");
        repo.add_commit("feat(api): add endpoint");

        run_release(&repo, &ReleaseArgs::default(), &Config::default()).unwrap();

        let changelog = fs::read_to_string(dir.path().join("api/CHANGELOG.md")).unwrap();
        assert!(changelog.contains("(https://github.com/acme/widgets/releases/tag/api/v1.2.0)"));
        assert!(changelog.contains("https://github.com/acme/widgets/commit/"));
    }

    #[test]
    fn test_nested_scope_releases_again_after_first_release() {
        let dir = tempfile::tempdir().unwrap();
        write_scope(dir.path(), "libs/core", r#"{"version": "1.0.0", "scopeName": "core"}"#);
        write_scope(dir.path(), "libs/util", r#"{"version": "1.0.0", "scopeName": "libs/util"}"#);
        let repo = MockRepository::new(dir.path());
        repo.add_commit("feat(core): first");

        let first = run_release(&repo, &ReleaseArgs::default(), &Config::default()).unwrap();
        let ReleaseOutcome::Released(first) = first else {
            panic!("expected a first release");
        };
        assert_eq!(first.tags, vec!["core/v1.0.0".to_string()]);
        assert!(first.warnings.iter().any(|w| matches!(
            w,
            BoundaryWarning::SkippedDescriptor { path, .. } if path.ends_with("libs/util/version.json")
        )));

        repo.add_commit("fix(core): second");
        let second = run_release(&repo, &ReleaseArgs::default(), &Config::default()).unwrap();
        let ReleaseOutcome::Released(second) = second else {
            panic!("expected a second release");
        };
        assert!(!second.scopes[0].initial);
        assert_eq!(second.tags, vec!["core/v1.0.1".to_string()]);
    }

    #[test]
    fn test_skipped_descriptor_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        write_scope(dir.path(), "api", r#"{"version": "1.0.0", "scopeName": "api"}"#);
        write_scope(dir.path(), "legacy", r#"{"scopeName": "legacy"}"#);
        let repo = MockRepository::new(dir.path());

        let ReleaseOutcome::NoCommits { warnings } =
            run_release(&repo, &ReleaseArgs::default(), &Config::default()).unwrap()
        else {
            panic!("expected no commits");
        };
        assert!(warnings
            .iter()
            .any(|w| matches!(w, BoundaryWarning::SkippedDescriptor { path, .. } if path.ends_with("legacy/version.json"))));
    }
}
