//! Markdown changelog of a scope.
//!
//! Every release inserts one entry directly below the configured header,
//! so the file reads newest first.

pub mod links;

pub use links::{link_builder_for, HostKind, HostedLinkBuilder, LinkBuilder, PlainLinkBuilder};

use crate::config::ChangelogConfig;
use crate::domain::{release_tag_name, ConventionalCommit};
use crate::error::Result;
use chrono::{DateTime, Local, NaiveDate};
use semver::Version;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Changelog file of one scope
#[derive(Debug, Clone)]
pub struct Changelog {
    path: PathBuf,
    config: ChangelogConfig,
}

impl Changelog {
    /// Changelog living in the scope directory `dir`
    pub fn for_scope(dir: &Path, config: &ChangelogConfig) -> Self {
        Changelog {
            path: dir.join(&config.file_name),
            config: config.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render an entry for `version` and insert it into the file, creating
    /// the file when needed
    pub fn write(
        &self,
        scope_name: &str,
        version: &Version,
        timestamp: DateTime<Local>,
        links: &dyn LinkBuilder,
        commits: &[ConventionalCommit],
        include_all_commits: bool,
    ) -> Result<()> {
        let entry = render_entry(
            &self.config,
            scope_name,
            version,
            timestamp.date_naive(),
            links,
            commits,
            include_all_commits,
        );

        let existing = if self.path.exists() {
            Some(fs::read_to_string(&self.path)?)
        } else {
            None
        };

        let content = insert_entry(existing.as_deref(), &self.config.header, &entry);
        fs::write(&self.path, content)?;
        log::debug!("Wrote changelog entry {} to {}", version, self.path.display());
        Ok(())
    }
}

/// Render the Markdown entry of one release
pub fn render_entry(
    config: &ChangelogConfig,
    scope_name: &str,
    version: &Version,
    date: NaiveDate,
    links: &dyn LinkBuilder,
    commits: &[ConventionalCommit],
    include_all_commits: bool,
) -> String {
    let tag = release_tag_name(scope_name, version);
    let mut out = String::new();

    let _ = writeln!(out, "<a name=\"{}\"></a>", tag);
    match links.version_link(&tag) {
        Some(link) => {
            let _ = writeln!(out, "## [{}]({}) ({})", version, link, date.format("%Y-%m-%d"));
        }
        None => {
            let _ = writeln!(out, "## {} ({})", version, date.format("%Y-%m-%d"));
        }
    }
    out.push('\n');

    let breaking: Vec<&ConventionalCommit> =
        commits.iter().filter(|c| c.is_breaking_change).collect();
    write_section(&mut out, "Breaking Changes", &breaking, scope_name, links);

    for section in &config.sections {
        let items: Vec<&ConventionalCommit> = commits
            .iter()
            .filter(|c| !c.is_breaking_change && c.r#type == section.r#type)
            .collect();
        write_section(&mut out, &section.title, &items, scope_name, links);
    }

    if include_all_commits {
        let other: Vec<&ConventionalCommit> = commits
            .iter()
            .filter(|c| {
                !c.is_breaking_change && !config.sections.iter().any(|s| s.r#type == c.r#type)
            })
            .collect();
        write_section(&mut out, &config.other_title, &other, scope_name, links);
    }

    out
}

fn write_section(
    out: &mut String,
    title: &str,
    commits: &[&ConventionalCommit],
    scope_name: &str,
    links: &dyn LinkBuilder,
) {
    if commits.is_empty() {
        return;
    }

    let _ = writeln!(out, "### {}\n", title);
    for commit in commits {
        out.push_str("* ");
        if let Some(scope) = commit.scope.as_deref().filter(|s| *s != scope_name) {
            let _ = write!(out, "**{}:** ", scope);
        }
        out.push_str(&commit.subject);

        let id = commit.id.to_string();
        let short = &id[..id.len().min(7)];
        match links.commit_link(&commit.id) {
            Some(link) => {
                let _ = writeln!(out, " ([{}]({}))", short, link);
            }
            None => {
                let _ = writeln!(out, " ({})", short);
            }
        }
    }
    out.push('\n');
}

/// Place `entry` directly after `header`, keeping earlier entries below.
///
/// Content that does not start with the header gets the header put in
/// front of it.
pub fn insert_entry(existing: Option<&str>, header: &str, entry: &str) -> String {
    let rest = existing
        .map(|content| content.strip_prefix(header).unwrap_or(content))
        .unwrap_or("")
        .trim_start_matches('\n');

    let mut out = format!("{}\n{}", header, entry);
    out.push_str(rest);
    out
}
