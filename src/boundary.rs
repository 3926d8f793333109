use std::fmt;
use std::path::PathBuf;

/// Non-fatal conditions met during a release run.
/// These are reported to the user but never abort the run.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No tag is reachable from HEAD; the full history is analysed
    NoReleaseTag,
    /// A descriptor file was found but is not versionable
    SkippedDescriptor { path: PathBuf, reason: String },
    /// Tags were not created because the release commit was skipped
    CommitSkipped { tags: Vec<String> },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoReleaseTag => {
                write!(f, "No release tag reachable from HEAD, analysing full history")
            }
            BoundaryWarning::SkippedDescriptor { path, reason } => {
                write!(f, "Skipping {}: {}", path.display(), reason)
            }
            BoundaryWarning::CommitSkipped { tags } => {
                write!(
                    f,
                    "Release commit skipped, tags not created: {}",
                    tags.join(", ")
                )
            }
        }
    }
}
