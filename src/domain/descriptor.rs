use crate::domain::tag::release_tag_name;
use crate::domain::version::parse_version;
use crate::error::{Result, VersionizeError};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// On-disk shape of a version descriptor (`version.json`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorFile {
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_name: Option<String>,

    #[serde(default)]
    pub parent_scopes: Vec<String>,
}

/// Version metadata of one versionable scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDescriptor {
    pub version: Version,
    /// Empty for the default (unnamed) scope
    pub scope_name: String,
    pub parent_scopes: BTreeSet<String>,
}

impl VersionDescriptor {
    /// Create a descriptor without parent scopes
    pub fn new(version: Version, scope_name: impl Into<String>) -> Self {
        VersionDescriptor {
            version,
            scope_name: scope_name.into(),
            parent_scopes: BTreeSet::new(),
        }
    }

    /// Validate a raw descriptor read from `path`.
    ///
    /// Fails when the version is missing, blank or not a plain X.Y.Z, or
    /// when the scope name contains `/`. A missing scope name is the
    /// default scope; parent scopes default to empty.
    pub fn parse(raw: DescriptorFile, path: &Path) -> Result<Self> {
        let version_string = match raw.version.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => {
                return Err(VersionizeError::invalid_descriptor(
                    path,
                    "contains no or an empty \"version\" field, for example use \"version\": \"1.0.0\"",
                ))
            }
        };

        let version = parse_version(&version_string).map_err(|_| {
            VersionizeError::invalid_descriptor(
                path,
                format!("contains an invalid version {}", version_string),
            )
        })?;

        if !version.pre.is_empty() || !version.build.is_empty() {
            return Err(VersionizeError::invalid_descriptor(
                path,
                format!(
                    "contains version {} with pre-release or build metadata, expected X.Y.Z",
                    version_string
                ),
            ));
        }

        // Release tags are matched on their first `/` segment
        let scope_name = raw.scope_name.unwrap_or_default().trim().to_string();
        if scope_name.contains('/') {
            return Err(VersionizeError::invalid_descriptor(
                path,
                format!("declares scope name '{}' containing '/'", scope_name),
            ));
        }

        Ok(VersionDescriptor {
            version,
            scope_name,
            parent_scopes: raw
                .parent_scopes
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        })
    }

    /// Same scope metadata, replaced version
    pub fn with_version(&self, next: Version) -> Self {
        VersionDescriptor {
            version: next,
            scope_name: self.scope_name.clone(),
            parent_scopes: self.parent_scopes.clone(),
        }
    }

    /// Whether this is the default scope (no `scopeName`)
    pub fn is_default_scope(&self) -> bool {
        self.scope_name.is_empty()
    }

    /// Tag name a release of `version` gets for this scope
    pub fn tag_name(&self, version: &Version) -> String {
        release_tag_name(&self.scope_name, version)
    }

    pub fn to_file(&self) -> DescriptorFile {
        DescriptorFile {
            version: Some(self.version.to_string()),
            scope_name: (!self.scope_name.is_empty()).then(|| self.scope_name.clone()),
            parent_scopes: self.parent_scopes.iter().cloned().collect(),
        }
    }
}
