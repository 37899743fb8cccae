use crate::domain::CommitRecord;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

static REVERT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"This reverts commit (?P<sha>[0-9a-f]{40})\.").expect("Invalid regex")
});

/// Title prefix of the automated sponsor/readme sync commits
pub const DEFAULT_SYNC_MARKER: &str = "Sponsors: Sync";

/// Hash of the commit a revert undoes, read from its body
pub fn reverted_sha(commit: &CommitRecord) -> Option<&str> {
    REVERT_REGEX
        .captures(&commit.body)
        .and_then(|captures| captures.name("sha"))
        .map(|m| m.as_str())
}

/// Drops revert pairs and administrative sync commits
#[derive(Debug, Clone)]
pub struct RevertFilter {
    sync_marker: String,
}

impl RevertFilter {
    pub fn new(sync_marker: impl Into<String>) -> Self {
        RevertFilter {
            sync_marker: sync_marker.into(),
        }
    }

    fn is_sync_commit(&self, commit: &CommitRecord) -> bool {
        !self.sync_marker.is_empty() && commit.title.starts_with(&self.sync_marker)
    }

    /// Filtered copy of `commits` (newest first), relative order preserved.
    ///
    /// Scans oldest to newest. A revert whose target was already seen removes
    /// both itself and the target; a revert whose target is outside the range
    /// stays visible.
    pub fn apply(&self, commits: &[CommitRecord]) -> Vec<CommitRecord> {
        let mut keep = vec![true; commits.len()];
        let mut seen: HashMap<&str, usize> = HashMap::new();

        for (index, commit) in commits.iter().enumerate().rev() {
            if self.is_sync_commit(commit) {
                keep[index] = false;
            }

            let target_index = reverted_sha(commit).and_then(|sha| seen.get(sha).copied());

            match target_index {
                Some(target) => {
                    debug!(
                        revert = commit.short_sha(),
                        reverted = commits[target].short_sha(),
                        "dropping revert pair"
                    );
                    keep[index] = false;
                    keep[target] = false;
                }
                None => {
                    seen.insert(commit.sha.as_str(), index);
                }
            }
        }

        commits
            .iter()
            .zip(keep)
            .filter_map(|(commit, kept)| kept.then(|| commit.clone()))
            .collect()
    }
}

impl Default for RevertFilter {
    fn default() -> Self {
        RevertFilter::new(DEFAULT_SYNC_MARKER)
    }
}
