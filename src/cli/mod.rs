//! Release workflow driven by the command line
//!
//! - [orchestration]: The release state machine and its outcome types

pub mod orchestration;

pub use orchestration::{
    release_commit_message, run_release, ReleaseArgs, ReleaseOutcome, ReleaseSummary,
    ScopeRelease,
};
