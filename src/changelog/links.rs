//! Hyperlinks to commits and releases on a hosting service.

use git2::Oid;
use regex::Regex;
use std::sync::OnceLock;

/// Produces links for changelog entries
pub trait LinkBuilder {
    /// Link to a single commit, `None` when links are not supported
    fn commit_link(&self, id: &Oid) -> Option<String>;

    /// Link to the release page of `tag`
    fn version_link(&self, tag: &str) -> Option<String>;
}

/// Fallback for remotes of unknown hosts: no links at all
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainLinkBuilder;

impl LinkBuilder for PlainLinkBuilder {
    fn commit_link(&self, _id: &Oid) -> Option<String> {
        None
    }

    fn version_link(&self, _tag: &str) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    GitHub,
    GitLab,
}

/// Links for a repository on GitHub or GitLab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedLinkBuilder {
    kind: HostKind,
    /// `https://{host}/{owner}/{repo}`
    base_url: String,
}

impl HostedLinkBuilder {
    pub fn new(kind: HostKind, base_url: impl Into<String>) -> Self {
        HostedLinkBuilder {
            kind,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl LinkBuilder for HostedLinkBuilder {
    fn commit_link(&self, id: &Oid) -> Option<String> {
        Some(match self.kind {
            HostKind::GitHub => format!("{}/commit/{}", self.base_url, id),
            HostKind::GitLab => format!("{}/-/commit/{}", self.base_url, id),
        })
    }

    fn version_link(&self, tag: &str) -> Option<String> {
        Some(match self.kind {
            HostKind::GitHub => format!("{}/releases/tag/{}", self.base_url, tag),
            HostKind::GitLab => format!("{}/-/tags/{}", self.base_url, tag),
        })
    }
}

fn remote_regex() -> &'static Regex {
    static REMOTE: OnceLock<Regex> = OnceLock::new();
    REMOTE.get_or_init(|| {
        Regex::new(r"^(?:https?://|ssh://)?(?:[^@/]+@)?(?P<host>[^/:]+)[:/](?P<path>\S+?)(?:\.git)?/?$")
            .expect("remote url regex is valid")
    })
}

/// Pick a link builder for a remote URL.
///
/// Handles `https://`, `ssh://` and scp-like `git@host:owner/repo` remotes
/// on github.com and gitlab.com; anything else gets [PlainLinkBuilder].
pub fn link_builder_for(remote_url: Option<&str>) -> Box<dyn LinkBuilder> {
    match remote_url.and_then(parse_remote) {
        Some(builder) => Box::new(builder),
        None => Box::new(PlainLinkBuilder),
    }
}

fn parse_remote(url: &str) -> Option<HostedLinkBuilder> {
    let captures = remote_regex().captures(url.trim())?;
    let host = captures["host"].to_lowercase();
    let path = &captures["path"];

    let kind = match host.as_str() {
        "github.com" => HostKind::GitHub,
        "gitlab.com" => HostKind::GitLab,
        _ => {
            log::debug!("No link format known for host '{}'", host);
            return None;
        }
    };

    Some(HostedLinkBuilder::new(
        kind,
        format!("https://{}/{}", host, path),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid() -> Oid {
        Oid::from_str("4f2c1e0a9b8d7c6e5f4a3b2c1d0e9f8a7b6c5d4e").unwrap()
    }

    #[test]
    fn test_github_https_remote() {
        let builder = parse_remote("https://github.com/acme/widgets.git").unwrap();
        assert_eq!(builder.base_url(), "https://github.com/acme/widgets");
        assert_eq!(
            builder.commit_link(&oid()).as_deref(),
            Some("https://github.com/acme/widgets/commit/4f2c1e0a9b8d7c6e5f4a3b2c1d0e9f8a7b6c5d4e")
        );
        assert_eq!(
            builder.version_link("api/v1.2.0").as_deref(),
            Some("https://github.com/acme/widgets/releases/tag/api/v1.2.0")
        );
    }

    #[test]
    fn test_github_scp_remote() {
        let builder = parse_remote("git@github.com:acme/widgets.git").unwrap();
        assert_eq!(builder.base_url(), "https://github.com/acme/widgets");
    }

    #[test]
    fn test_gitlab_ssh_remote() {
        let builder = parse_remote("ssh://git@gitlab.com/group/sub/project.git").unwrap();
        assert_eq!(builder.base_url(), "https://gitlab.com/group/sub/project");
        assert_eq!(
            builder.version_link("v2.0.0").as_deref(),
            Some("https://gitlab.com/group/sub/project/-/tags/v2.0.0")
        );
        assert!(builder.commit_link(&oid()).unwrap().contains("/-/commit/"));
    }

    #[test]
    fn test_remote_without_git_suffix() {
        let builder = parse_remote("https://github.com/acme/widgets/").unwrap();
        assert_eq!(builder.base_url(), "https://github.com/acme/widgets");
    }

    #[test]
    fn test_unknown_host_has_no_links() {
        assert!(parse_remote("https://git.example.org/acme/widgets.git").is_none());

        let builder = link_builder_for(Some("https://git.example.org/acme/widgets.git"));
        assert_eq!(builder.commit_link(&oid()), None);
        assert_eq!(builder.version_link("v1.0.0"), None);
    }

    #[test]
    fn test_no_remote_has_no_links() {
        let builder = link_builder_for(None);
        assert_eq!(builder.version_link("v1.0.0"), None);
    }
}
