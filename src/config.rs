use crate::error::{Result, VersionizeError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working copy root
pub const CONFIG_FILE_NAME: &str = "versionize.toml";

/// File name looked up in the user configuration directory
pub const USER_CONFIG_FILE_NAME: &str = ".versionize.toml";

/// Represents the complete configuration for git-versionize.
///
/// Contains descriptor discovery, commit classification, changelog layout and behavior options.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_descriptor_file")]
    pub descriptor_file: String,

    #[serde(default)]
    pub conventional_commits: ConventionalCommitsConfig,

    #[serde(default)]
    pub changelog: ChangelogConfig,

    #[serde(default)]
    pub release: ReleaseConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

fn default_descriptor_file() -> String {
    "version.json".to_string()
}

/// Returns the commit types that count as significant changes.
fn default_significant_types() -> Vec<String> {
    vec!["feat".to_string(), "fix".to_string(), "perf".to_string()]
}

/// Returns the default list of breaking change indicators.
fn default_breaking_change_indicators() -> Vec<String> {
    vec![
        "BREAKING CHANGE:".to_string(),
        "BREAKING-CHANGE:".to_string(),
    ]
}

/// Configuration for conventional commit analysis.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConventionalCommitsConfig {
    #[serde(default = "default_significant_types")]
    pub significant_types: Vec<String>,

    #[serde(default = "default_breaking_change_indicators")]
    pub breaking_change_indicators: Vec<String>,
}

impl Default for ConventionalCommitsConfig {
    fn default() -> Self {
        ConventionalCommitsConfig {
            significant_types: default_significant_types(),
            breaking_change_indicators: default_breaking_change_indicators(),
        }
    }
}

/// One changelog section: commits of `type` listed under `title`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SectionConfig {
    pub r#type: String,
    pub title: String,
}

impl SectionConfig {
    fn new(r#type: &str, title: &str) -> Self {
        SectionConfig {
            r#type: r#type.to_string(),
            title: title.to_string(),
        }
    }
}

fn default_changelog_file() -> String {
    "CHANGELOG.md".to_string()
}

fn default_changelog_header() -> String {
    "# Change Log\n\nAll notable changes to this project will be documented in this file. \
     See [Conventional Commits](https://www.conventionalcommits.org) for commit guidelines.\n"
        .to_string()
}

fn default_sections() -> Vec<SectionConfig> {
    vec![
        SectionConfig::new("feat", "Features"),
        SectionConfig::new("fix", "Bug Fixes"),
        SectionConfig::new("perf", "Performance Improvements"),
    ]
}

fn default_other_title() -> String {
    "Other".to_string()
}

/// Configuration for changelog layout.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChangelogConfig {
    #[serde(default = "default_changelog_file")]
    pub file_name: String,

    #[serde(default = "default_changelog_header")]
    pub header: String,

    #[serde(default = "default_sections")]
    pub sections: Vec<SectionConfig>,

    #[serde(default = "default_other_title")]
    pub other_title: String,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        ChangelogConfig {
            file_name: default_changelog_file(),
            header: default_changelog_header(),
            sections: default_sections(),
            other_title: default_other_title(),
        }
    }
}

fn default_commit_message_prefix() -> String {
    "chore(release): ".to_string()
}

/// Configuration for the release commit.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default = "default_commit_message_prefix")]
    pub commit_message_prefix: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            commit_message_prefix: default_commit_message_prefix(),
        }
    }
}

/// Configuration for behavior customization.
///
/// Command line flags can only switch these on, never off.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct BehaviorConfig {
    #[serde(default)]
    pub ignore_insignificant: bool,

    #[serde(default)]
    pub include_all_commits: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            descriptor_file: default_descriptor_file(),
            conventional_commits: ConventionalCommitsConfig::default(),
            changelog: ChangelogConfig::default(),
            release: ReleaseConfig::default(),
            behavior: BehaviorConfig::default(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `versionize.toml` in the working copy root
/// 3. `.versionize.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, working_copy: &Path) -> Result<Config> {
    match locate_config(config_path, working_copy) {
        Some(path) => {
            log::debug!("Loading configuration from {}", path.display());
            let config_str = fs::read_to_string(&path).map_err(|e| {
                VersionizeError::config(format!("cannot read {}: {}", path.display(), e))
            })?;
            parse_config(&config_str)
                .map_err(|e| VersionizeError::config(format!("{}: {}", path.display(), e)))
        }
        None => {
            log::debug!("No configuration file found, using defaults");
            Ok(Config::default())
        }
    }
}

fn locate_config(config_path: Option<&Path>, working_copy: &Path) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(path.to_path_buf());
    }

    let local = working_copy.join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(USER_CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}

/// Parse configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).map_err(|e| VersionizeError::config(e.to_string()))
}
