use crate::analyzer::RepositoryAnalysis;
use std::fmt;

/// Non-fatal conditions met while preparing or publishing a release.
/// These are reported to the user but never abort the flow on their own.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// The commit range is empty
    NoNewCommits { since_tag: Option<String> },
    /// No version tags are reachable from HEAD; the whole history is used
    NoVersionTags,
    /// Only prerelease tags exist, so a stable release uses the whole history
    NoStableVersionTags { prerelease_tags: usize },
    /// Commits without a recognized type prefix, kept out of the buckets
    UnclassifiedCommits { count: usize },
    /// Creating the hosted release failed after everything else succeeded
    HostPublishFailed { tag: String, reason: String },
}

impl BoundaryWarning {
    /// Warnings implied by a repository analysis
    pub fn from_analysis(analysis: &RepositoryAnalysis) -> Vec<BoundaryWarning> {
        let mut warnings = Vec::new();

        if analysis.since_tag.is_none() {
            warnings.push(match analysis.tag_count {
                0 => BoundaryWarning::NoVersionTags,
                n => BoundaryWarning::NoStableVersionTags { prerelease_tags: n },
            });
        }

        if analysis.commit_count == 0 {
            warnings.push(BoundaryWarning::NoNewCommits {
                since_tag: analysis.since_tag.as_ref().map(|t| t.name.clone()),
            });
        }

        let release = &analysis.release;
        let rendered = release.raw_changelog.lines().count();
        let classified: usize = release
            .changelog
            .change_types()
            .map(|change_type| release.changelog.lines(change_type).len())
            .sum();
        if rendered > classified {
            warnings.push(BoundaryWarning::UnclassifiedCommits {
                count: rendered - classified,
            });
        }

        warnings
    }

    /// Whether the user should confirm before the release goes ahead
    pub fn needs_confirmation(&self) -> bool {
        matches!(self, BoundaryWarning::NoNewCommits { .. })
    }
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoNewCommits { since_tag } => match since_tag {
                Some(tag) => write!(f, "No new commits since tag '{}'", tag),
                None => write!(f, "No commits found in repository history"),
            },
            BoundaryWarning::NoVersionTags => {
                write!(f, "No version tags found; using the full commit history")
            }
            BoundaryWarning::NoStableVersionTags { prerelease_tags } => write!(
                f,
                "Only prerelease tags found ({}); using the full commit history",
                prerelease_tags
            ),
            BoundaryWarning::UnclassifiedCommits { count } => {
                write!(
                    f,
                    "{} commit(s) have no recognized type prefix and only appear in the changelog",
                    count
                )
            }
            BoundaryWarning::HostPublishFailed { tag, reason } => {
                write!(f, "Could not create hosted release for '{}': {}", tag, reason)
            }
        }
    }
}
