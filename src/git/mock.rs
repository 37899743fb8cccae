use crate::error::{ReleaseError, Result};
use crate::git::{format_log_record, Repository};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A commit recorded by [MockRepository::commit_files]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommit {
    pub paths: Vec<PathBuf>,
    pub message: String,
}

/// A push recorded by [MockRepository::push]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPush {
    pub remote: String,
    pub branch: String,
    pub tag: String,
}

/// Mock repository for testing without actual git operations
///
/// Log lines are registered per range start; writes are recorded so tests
/// can assert on them.
#[derive(Default)]
pub struct MockRepository {
    tags: Vec<String>,
    logs: HashMap<Option<String>, Vec<String>>,
    commits: Mutex<Vec<RecordedCommit>>,
    created_tags: Mutex<Vec<String>>,
    pushes: Mutex<Vec<RecordedPush>>,
    fail_push: bool,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags reachable from HEAD, in any order
    pub fn with_tags<S: AsRef<str>>(mut self, tags: &[S]) -> Self {
        self.tags = tags.iter().map(|t| t.as_ref().to_string()).collect();
        self
    }

    /// Raw log lines returned for the range starting at `since`
    pub fn with_log<S: AsRef<str>>(mut self, since: Option<&str>, lines: &[S]) -> Self {
        self.logs.insert(
            since.map(str::to_string),
            lines.iter().map(|l| l.as_ref().to_string()).collect(),
        );
        self
    }

    /// Append one commit to the range starting at `since`; add newest first
    pub fn add_commit(&mut self, since: Option<&str>, sha: &str, subject: &str, author: &str, body: &str) {
        self.logs
            .entry(since.map(str::to_string))
            .or_default()
            .extend(format_log_record(sha, subject, author, body));
    }

    /// Make every push fail as a remote error
    pub fn failing_push(mut self) -> Self {
        self.fail_push = true;
        self
    }

    pub fn recorded_commits(&self) -> Vec<RecordedCommit> {
        self.commits.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn created_tags(&self) -> Vec<String> {
        self.created_tags.lock().map(|t| t.clone()).unwrap_or_default()
    }

    pub fn recorded_pushes(&self) -> Vec<RecordedPush> {
        self.pushes.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

fn poisoned<T>(_: T) -> ReleaseError {
    ReleaseError::Git(git2::Error::from_str("mock repository lock poisoned"))
}

impl Repository for MockRepository {
    fn version_tags(&self) -> Result<Vec<String>> {
        let mut tags = self.tags.clone();
        tags.extend(self.created_tags.lock().map_err(poisoned)?.iter().cloned());
        Ok(tags)
    }

    fn log_lines(&self, since: Option<&str>) -> Result<Vec<String>> {
        if let Some(tag) = since {
            if !self.tags.iter().any(|t| t == tag) {
                return Err(ReleaseError::tag(format!("Cannot find tag '{}'", tag)));
            }
        }

        Ok(self
            .logs
            .get(&since.map(str::to_string))
            .cloned()
            .unwrap_or_default())
    }

    fn commit_files(&self, paths: &[&Path], message: &str) -> Result<()> {
        self.commits.lock().map_err(poisoned)?.push(RecordedCommit {
            paths: paths.iter().map(|p| p.to_path_buf()).collect(),
            message: message.to_string(),
        });
        Ok(())
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        let mut created = self.created_tags.lock().map_err(poisoned)?;
        if self.tags.iter().chain(created.iter()).any(|t| t == name) {
            return Err(ReleaseError::tag(format!("Tag '{}' already exists", name)));
        }
        created.push(name.to_string());
        Ok(())
    }

    fn push(&self, remote: &str, branch: &str, tag: &str) -> Result<()> {
        if self.fail_push {
            return Err(ReleaseError::remote(format!("Failed to push to '{}'", remote)));
        }

        self.pushes.lock().map_err(poisoned)?.push(RecordedPush {
            remote: remote.to_string(),
            branch: branch.to_string(),
            tag: tag.to_string(),
        });
        Ok(())
    }
}
