use crate::domain::version::parse_version;
use git2::Oid;
use semver::Version;

/// A release tag and the commit it marks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    pub friendly_name: String,
    pub target: Oid,
}

impl ReleaseTag {
    /// Create a new release tag
    pub fn new(friendly_name: impl Into<String>, target: Oid) -> Self {
        ReleaseTag {
            friendly_name: friendly_name.into(),
            target,
        }
    }

    /// Whether this tag records a release of `scope_name`
    pub fn belongs_to(&self, scope_name: &str) -> bool {
        tag_belongs_to(&self.friendly_name, scope_name)
    }
}

/// Tag name of a release: `{scope}/v{version}`, or `v{version}` for the
/// default scope
pub fn release_tag_name(scope_name: &str, version: &Version) -> String {
    if scope_name.is_empty() {
        format!("v{}", version)
    } else {
        format!("{}/v{}", scope_name, version)
    }
}

/// Whether a tag name records a release of `scope_name`.
///
/// Scoped tags look like `{scope}/v{version}` and match on the first `/`
/// segment. The default scope (empty name) owns bare `v{version}` tags.
pub fn tag_belongs_to(tag_name: &str, scope_name: &str) -> bool {
    if scope_name.is_empty() {
        return !tag_name.contains('/')
            && tag_name.starts_with('v')
            && parse_version(tag_name).is_ok();
    }

    tag_name.split('/').next() == Some(scope_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_new() {
        let tag = ReleaseTag::new("api/v1.2.0", Oid::zero());
        assert_eq!(tag.friendly_name, "api/v1.2.0");
        assert_eq!(tag.target, Oid::zero());
    }

    #[test]
    fn test_scoped_tag_matches_first_segment() {
        assert!(tag_belongs_to("api/v1.2.0", "api"));
        assert!(!tag_belongs_to("api/v1.2.0", "web"));
        assert!(!tag_belongs_to("apiv2/v1.0.0", "api"));
    }

    #[test]
    fn test_default_scope_owns_bare_version_tags() {
        assert!(tag_belongs_to("v1.0.0", ""));
        assert!(!tag_belongs_to("api/v1.0.0", ""));
        assert!(!tag_belongs_to("nightly", ""));
        assert!(!tag_belongs_to("1.0.0", ""));
    }

    #[test]
    fn test_bare_tag_is_not_a_scoped_release() {
        assert!(!tag_belongs_to("v1.0.0", "api"));
    }

    #[test]
    fn test_release_tag_name() {
        let version = Version::new(1, 2, 0);
        assert_eq!(release_tag_name("api", &version), "api/v1.2.0");
        assert_eq!(release_tag_name("", &version), "v1.2.0");
    }

    #[test]
    fn test_release_tag_belongs_to() {
        let tag = ReleaseTag::new("core/v0.3.1", Oid::zero());
        assert!(tag.belongs_to("core"));
        assert!(!tag.belongs_to(""));
    }
}
