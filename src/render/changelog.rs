use crate::error::Result;
use crate::release::ReleaseInfo;
use chrono::NaiveDate;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

/// Long-form date used in changelog headings ("October 18, 2026")
pub fn format_release_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Changelog block for one release: heading, blank line, commit lines, blank line
pub fn changelog_entry(release: &ReleaseInfo, date: NaiveDate) -> String {
    format!(
        "v{} - {}\n\n{}\n\n",
        release.version,
        format_release_date(date),
        release.raw_changelog
    )
}

/// New block placed before the existing content, which is kept verbatim
pub fn prepend_changelog(entry: &str, existing: &str) -> String {
    let mut contents = String::with_capacity(entry.len() + existing.len());
    contents.push_str(entry);
    contents.push_str(existing);
    contents
}

/// Prepend the release block to a changelog file, creating it when missing
pub fn update_changelog_file(path: &Path, release: &ReleaseInfo, date: NaiveDate) -> Result<()> {
    let existing = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    let entry = changelog_entry(release, date);
    fs::write(path, prepend_changelog(&entry, &existing))?;

    info!(path = %path.display(), version = %release.version, "updated changelog");
    Ok(())
}
