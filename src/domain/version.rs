use crate::error::{Result, VersionizeError};
use semver::Version;
use std::fmt;

/// Parse a three-component semantic version (e.g., "1.2.3" or "v1.2.3")
pub fn parse_version(raw: &str) -> Result<Version> {
    let trimmed = raw.trim();
    let clean = trimmed.strip_prefix('v').unwrap_or(trimmed);

    if clean.is_empty() {
        return Err(VersionizeError::version("empty version string"));
    }

    Version::parse(clean).map_err(|e| {
        VersionizeError::version(format!(
            "Invalid version format: '{}' - expected X.Y.Z ({})",
            raw, e
        ))
    })
}

/// Class of version bump implied by a set of commits.
///
/// Variants are ordered so that `max` over a set of kinds yields the
/// winning bump: Major beats Minor beats Patch beats None.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum IncrementKind {
    #[default]
    None,
    Patch,
    Minor,
    Major,
}

impl IncrementKind {
    /// Apply this increment to `base`, returning a new version.
    ///
    /// Pre-release and build metadata are cleared on any real bump.
    pub fn apply(self, base: &Version) -> Version {
        match self {
            IncrementKind::None => base.clone(),
            IncrementKind::Patch => Version::new(base.major, base.minor, base.patch + 1),
            IncrementKind::Minor => Version::new(base.major, base.minor + 1, 0),
            IncrementKind::Major => Version::new(base.major + 1, 0, 0),
        }
    }
}

impl fmt::Display for IncrementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IncrementKind::None => "none",
            IncrementKind::Patch => "patch",
            IncrementKind::Minor => "minor",
            IncrementKind::Major => "major",
        };
        f.write_str(name)
    }
}
