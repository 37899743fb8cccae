//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.

use crate::boundary::BoundaryWarning;
use crate::domain::RELEASE_NOTE_SECTIONS;
use crate::release::ReleaseInfo;
use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// One line per non-empty bucket, in release-notes order: `Bug Fixes: 2`
pub fn bucket_summary(release: &ReleaseInfo) -> Vec<String> {
    RELEASE_NOTE_SECTIONS
        .iter()
        .filter(|(change_type, _)| release.changelog.has(*change_type))
        .map(|(change_type, title)| {
            format!("{}: {}", title, release.changelog.lines(*change_type).len())
        })
        .collect()
}

/// Display the computed release.
///
/// # Arguments
/// * `release` - The computed release
/// * `current` - Version the release was computed from
/// * `since_tag` - Start of the commit range (None for the full history)
pub fn display_release_summary(release: &ReleaseInfo, current: &str, since_tag: Option<&str>) {
    println!("\n{}", style("Release").bold());
    println!("  From:  {}", style(current).red());
    println!("  To:    {}", style(release.tag_name()).green());
    println!("  Type:  {}", release.release_type);
    println!("  Tag:   {}", release.package_tag());
    println!("  Range: {}", since_tag.unwrap_or("full history"));

    for line in bucket_summary(release) {
        println!("    - {}", line);
    }
}

/// Display a Markdown block under a heading.
pub fn display_markdown(heading: &str, body: &str) {
    println!("\n{}", style(heading).bold().underlined());
    if body.is_empty() {
        println!("{}", style("(empty)").dim());
    } else {
        println!("{}", body);
    }
}
