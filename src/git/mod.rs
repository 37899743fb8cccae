//! Git operations abstraction layer
//!
//! The release engine never talks to git directly. It consumes tag names and
//! log lines produced by a [Repository] implementation:
//!
//! - [repository::Git2Repository]: a real implementation using the `git2` crate
//! - [mock::MockRepository]: an in-memory implementation for tests
//!
//! Log lines follow the fixed record format `* <sha> <subject> (<author>)`
//! followed by the commit body, one line per body line, merge commits omitted.

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use std::path::Path;

/// Format one commit the way the log parser expects it
pub fn format_log_record(sha: &str, subject: &str, author: &str, body: &str) -> Vec<String> {
    let mut lines = vec![format!("* {} {} ({})", sha, subject, author)];
    lines.extend(body.lines().map(str::to_string));
    lines
}

/// Common git operation trait for abstraction
///
/// All implementors must be `Send`. Methods return
/// [crate::error::Result] and map underlying failures to
/// [crate::error::ReleaseError] variants.
pub trait Repository: Send {
    /// Names of all tags whose commit is reachable from HEAD
    ///
    /// Tags on unmerged branches are excluded. Names are returned unfiltered;
    /// callers keep the ones that parse as versions.
    fn version_tags(&self) -> Result<Vec<String>>;

    /// Log lines for `since..HEAD`, newest first
    ///
    /// `since` is a tag name (exclusive boundary); `None` walks the full history.
    fn log_lines(&self, since: Option<&str>) -> Result<Vec<String>>;

    /// Stage the given paths (relative to the work tree) and commit them
    fn commit_files(&self, paths: &[&Path], message: &str) -> Result<()>;

    /// Create a lightweight tag at HEAD
    fn create_tag(&self, name: &str) -> Result<()>;

    /// Push a branch and a release tag to a remote
    fn push(&self, remote: &str, branch: &str, tag: &str) -> Result<()>;
}
