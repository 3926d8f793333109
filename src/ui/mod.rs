//! User interface module - formatting of workflow results.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Rendering of a whole release outcome

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_error, display_information,
    display_manual_push_instruction, display_status, display_step, display_success,
    display_version_change,
};

use crate::cli::{ReleaseOutcome, ReleaseSummary};

/// Print the outcome of a release run, warnings first.
pub fn display_release_outcome(outcome: &ReleaseOutcome) {
    match outcome {
        ReleaseOutcome::NoCommits { warnings } => {
            warnings.iter().for_each(display_boundary_warning);
            display_information("No commits found since the last release");
        }
        ReleaseOutcome::NoSignificantChanges {
            latest_tag,
            warnings,
        } => {
            warnings.iter().for_each(display_boundary_warning);
            display_information(&format!(
                "Version was not affected by commits since last release ({}), no action will be performed",
                latest_tag.as_deref().unwrap_or("none")
            ));
        }
        ReleaseOutcome::Released(summary) => display_release_summary(summary),
    }
}

fn display_release_summary(summary: &ReleaseSummary) {
    summary.warnings.iter().for_each(display_boundary_warning);

    if summary.dry_run {
        display_status("Dry run, nothing will be written:");
    } else {
        display_step("Bumped versions:");
    }
    for release in &summary.scopes {
        let name = if release.scope_name.is_empty() {
            "(default)"
        } else {
            release.scope_name.as_str()
        };
        display_version_change(
            name,
            &release.previous.to_string(),
            &release.next.to_string(),
            release.initial,
        );
    }

    if summary.dry_run {
        return;
    }

    display_step("Updated descriptors and changelogs");
    if let Some(commit) = summary.commit {
        display_step(&format!("Committed release as {}", commit));
    }
    for tag in &summary.tags {
        display_success(&format!("Tagged release as {}", tag));
    }
    if !summary.tags.is_empty() {
        display_manual_push_instruction();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::BoundaryWarning;
    use crate::cli::ScopeRelease;
    use semver::Version;

    #[test]
    fn test_display_release_outcome_variants() {
        // Visual verification test - output is printed to stdout/stderr
        display_release_outcome(&ReleaseOutcome::NoCommits {
            warnings: vec![BoundaryWarning::NoReleaseTag],
        });
        display_release_outcome(&ReleaseOutcome::NoSignificantChanges {
            latest_tag: Some("api/v1.2.0".to_string()),
            warnings: Vec::new(),
        });
        display_release_outcome(&ReleaseOutcome::Released(ReleaseSummary {
            scopes: vec![ScopeRelease {
                scope_name: "api".to_string(),
                previous: Version::new(1, 2, 0),
                next: Version::new(1, 2, 1),
                tag: "api/v1.2.1".to_string(),
                initial: false,
            }],
            commit: None,
            tags: Vec::new(),
            dry_run: true,
            warnings: Vec::new(),
        }));
    }
}
