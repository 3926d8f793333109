//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from the
//! release workflow. Colors come from `console` and are dropped
//! automatically when the output is not a terminal.

use console::style;

use crate::boundary::BoundaryWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Format and print one workflow step.
pub fn display_step(message: &str) {
    println!("{} {}", style("√").green(), message);
}

/// Format and print a neutral informational line.
pub fn display_information(message: &str) {
    println!("{} {}", style("i").cyan(), message);
}

/// Display a boundary warning to the user.
///
/// Shows a yellow warning icon followed by the warning message.
///
/// # Arguments
/// * `warning` - The boundary warning to display
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display the version change of one scope.
///
/// # Arguments
/// * `scope` - Display name of the scope
/// * `previous` - Version stored before the release
/// * `next` - Released version
/// * `initial` - Whether this is the first release of the scope
pub fn display_version_change(scope: &str, previous: &str, next: &str, initial: bool) {
    if initial {
        println!("  {}: initial release {}", scope, style(next).green());
    } else {
        println!(
            "  {}: {} -> {}",
            scope,
            style(previous).red(),
            style(next).green()
        );
    }
}

/// Display manual push instruction for the release.
///
/// Tags are created locally only; pushing is left to the user.
pub fn display_manual_push_instruction() {
    println!(
        "\n{} To publish the release, run:\n  {}",
        style("→").yellow(),
        style("git push --follow-tags").cyan()
    );
}
