//! Markdown output: the persisted changelog block and the release-notes body

pub mod changelog;
pub mod release_notes;

pub use changelog::{changelog_entry, format_release_date, prepend_changelog, update_changelog_file};
pub use release_notes::release_notes;
