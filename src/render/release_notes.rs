use crate::domain::{Changelog, RELEASE_NOTE_SECTIONS};

/// Release-notes body: one `## Title` section per non-empty bucket
///
/// Sections follow the fixed priority order and are separated by a blank
/// line. An empty changelog renders as an empty string.
pub fn release_notes(changelog: &Changelog) -> String {
    RELEASE_NOTE_SECTIONS
        .iter()
        .filter(|(change_type, _)| changelog.has(*change_type))
        .map(|(change_type, title)| {
            format!("## {}\n\n{}", title, changelog.lines(*change_type).join("\n"))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
