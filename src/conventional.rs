use crate::config::ConventionalCommitsConfig;
use crate::domain::ConventionalCommit;
use crate::git::CommitInfo;

/// Turns raw commits into structured conventional commits
pub trait CommitParser {
    fn parse(&self, commits: &[CommitInfo]) -> Vec<ConventionalCommit>;
}

/// Parser for the conventional commits grammar
pub struct ConventionalCommitParser {
    breaking_change_indicators: Vec<String>,
}

impl ConventionalCommitParser {
    pub fn new(config: &ConventionalCommitsConfig) -> Self {
        ConventionalCommitParser {
            breaking_change_indicators: config.breaking_change_indicators.clone(),
        }
    }
}

impl CommitParser for ConventionalCommitParser {
    /// Parse every non-merge commit, preserving input order
    fn parse(&self, commits: &[CommitInfo]) -> Vec<ConventionalCommit> {
        let parsed: Vec<ConventionalCommit> = commits
            .iter()
            .filter(|commit| {
                let merge = is_merge_message(&commit.message);
                if merge {
                    log::debug!("Skipping merge commit {} by {}", commit.id, commit.author);
                }
                !merge
            })
            .map(|commit| {
                ConventionalCommit::parse(
                    &commit.message,
                    commit.id,
                    &self.breaking_change_indicators,
                )
            })
            .collect();

        let unconventional = parsed.iter().filter(|c| !c.is_conventional()).count();
        if unconventional > 0 {
            log::debug!("{} commits do not follow conventional commits", unconventional);
        }
        parsed
    }
}

fn is_merge_message(message: &str) -> bool {
    message.trim_start().starts_with("Merge ")
}
