//! Pure formatting functions for UI output.
//!
//! Everything here either returns a string or prints one; no input is read.

use crate::outcome::{SkipReason, SyncReport};
use crate::sync::latest::Promotion;
use console::style;

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

/// Display why a run stopped early.
pub fn display_skip(reason: &SkipReason) {
    println!("{} {}", style("⚠ SKIPPED:").yellow(), reason);
}

/// Opening line of a log group
pub fn group_header(title: &str, annotate: bool) -> String {
    if annotate {
        format!("::group::{}", title)
    } else {
        style(title).bold().to_string()
    }
}

/// Closing line of a log group, if the style has one
pub fn group_footer(annotate: bool) -> Option<&'static str> {
    annotate.then_some("::endgroup::")
}

/// Lines summarizing a completed run
pub fn summary_lines(report: &SyncReport) -> Vec<String> {
    let mut lines = vec![format!("Updated tags: {}", report.tags.join(", "))];

    for release in &report.releases {
        lines.push(format!("Release {}: {}", release.tag, release.action));
    }

    match report.promotion {
        Some(Promotion::AlreadyLatest { release_id }) => {
            lines.push(format!("Release {} is already latest", release_id))
        }
        Some(Promotion::Promoted { release_id }) => {
            lines.push(format!("Marked release {} as latest", release_id))
        }
        None => {}
    }

    lines
}

/// Display a summary of a completed run.
pub fn display_summary(report: &SyncReport) {
    for line in summary_lines(report) {
        display_success(&line);
    }
}
