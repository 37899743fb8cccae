use crate::domain::{ChangeType, Changelog, CommitRecord};
use tracing::debug;

/// Default source-hosting domain used for commit links
pub const DEFAULT_HOST: &str = "github.com";

/// Result of classifying a filtered commit sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub changelog: Changelog,
    /// Every rendered line, tagged or not, newline-joined in log order
    pub raw_changelog: String,
}

/// Groups commits into changelog buckets and renders their display lines
#[derive(Debug, Clone)]
pub struct Classifier {
    host: String,
    repository: String,
}

impl Classifier {
    /// `repository` is the `owner/name` identifier used in commit links
    pub fn new(host: impl Into<String>, repository: impl Into<String>) -> Self {
        Classifier {
            host: host.into(),
            repository: repository.into(),
        }
    }

    pub fn commit_url(&self, sha: &str) -> String {
        format!("https://{}/{}/commit/{}", self.host, self.repository, sha)
    }

    /// Display line: the `* <sha>` prefix becomes a short-hash Markdown link
    pub fn display_line(&self, commit: &CommitRecord) -> String {
        format!(
            "* [`{}`]({}) {}",
            commit.short_sha(),
            self.commit_url(&commit.sha),
            commit.raw_remainder()
        )
    }

    pub fn classify(&self, commits: &[CommitRecord]) -> Classification {
        let mut changelog = Changelog::new();
        let mut lines = Vec::with_capacity(commits.len());

        for commit in commits {
            let line = self.display_line(commit);

            match commit.flag.as_deref().and_then(ChangeType::from_flag) {
                Some(change_type) => changelog.push(change_type, line.clone()),
                None => debug!(sha = commit.short_sha(), title = %commit.title, "unclassified commit"),
            }

            lines.push(line);
        }

        Classification {
            changelog,
            raw_changelog: lines.join("\n"),
        }
    }
}
