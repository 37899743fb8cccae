//! Source-hosting release entries

use crate::error::{ReleaseError, Result};
use crate::release::ReleaseInfo;
use crate::render::release_notes;
use crate::shell::CommandRunner;
use std::path::PathBuf;
use tracing::{info, instrument};

/// Payload of a "create release" call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRequest {
    /// `owner/name`
    pub repository: String,
    pub tag_name: String,
    pub body: String,
    pub prerelease: bool,
}

impl ReleaseRequest {
    /// Request for a computed release; the body is the release-notes rendering
    pub fn from_release(release: &ReleaseInfo) -> Self {
        ReleaseRequest {
            repository: release.repository.clone(),
            tag_name: release.tag_name(),
            body: release_notes(&release.changelog),
            prerelease: release.is_prerelease(),
        }
    }
}

/// A platform that can publish a release entry for a pushed tag
pub trait ReleaseHost {
    fn create_release(&self, request: &ReleaseRequest) -> Result<()>;
}

/// Creates releases through the `gh` command-line client
///
/// Authentication is left to `gh` itself (`GH_TOKEN` or its login state).
pub struct GhCliHost<R: CommandRunner> {
    runner: R,
    root: PathBuf,
}

impl<R: CommandRunner> GhCliHost<R> {
    pub fn new(runner: R, root: impl Into<PathBuf>) -> Self {
        GhCliHost {
            runner,
            root: root.into(),
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }
}

impl<R: CommandRunner> ReleaseHost for GhCliHost<R> {
    #[instrument(skip(self, request), fields(tag = %request.tag_name))]
    fn create_release(&self, request: &ReleaseRequest) -> Result<()> {
        let mut args = vec![
            "release",
            "create",
            request.tag_name.as_str(),
            "--repo",
            request.repository.as_str(),
            "--title",
            request.tag_name.as_str(),
            "--notes",
            request.body.as_str(),
        ];
        if request.prerelease {
            args.push("--prerelease");
        }

        self.runner
            .run("gh", &args, &self.root)
            .map_err(|e| ReleaseError::host(e.to_string()))?;

        info!(repository = %request.repository, "created hosted release");
        Ok(())
    }
}
