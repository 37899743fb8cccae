//! Computed release information and its on-disk snapshot
//!
//! The generate step writes a [`ReleaseInfo`] snapshot as JSON; the separate
//! publish steps read it back instead of recomputing anything.

use crate::domain::{tag_name, Changelog, PrereleaseId, ReleaseType};
use crate::error::{ReleaseError, Result};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Default snapshot filename
pub const SNAPSHOT_FILE: &str = ".release-info.json";

/// Registry distribution tag for stable releases
pub const LATEST_TAG: &str = "latest";

/// Result of a release calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseInfo {
    /// The computed next version
    pub version: Version,
    #[serde(rename = "type")]
    pub release_type: ReleaseType,
    pub changelog: Changelog,
    pub raw_changelog: String,
    /// `owner/name` of the source repository
    pub repository: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_tag: Option<String>,
}

impl ReleaseInfo {
    pub fn is_prerelease(&self) -> bool {
        !self.version.pre.is_empty()
    }

    /// Tag name of the release (`v<version>`)
    pub fn tag_name(&self) -> String {
        tag_name(&self.version)
    }

    /// Distribution tag for the registry publish, `latest` when unset
    pub fn package_tag(&self) -> &str {
        self.package_tag.as_deref().unwrap_or(LATEST_TAG)
    }
}

/// Distribution tag for a release: `latest`, or the prerelease identifier
pub fn package_tag_for(prerelease: Option<&PrereleaseId>) -> String {
    prerelease
        .map(|id| id.as_str().to_string())
        .unwrap_or_else(|| LATEST_TAG.to_string())
}

/// Write the snapshot as pretty-printed JSON
pub fn write_snapshot(path: &Path, release: &ReleaseInfo) -> Result<()> {
    let json = serde_json::to_string_pretty(release)?;
    fs::write(path, json)?;
    info!(path = %path.display(), version = %release.version, "wrote release snapshot");
    Ok(())
}

/// Read a snapshot written by a previous generate step
pub fn read_snapshot(path: &Path) -> Result<ReleaseInfo> {
    if !path.is_file() {
        return Err(ReleaseError::snapshot(format!(
            "No release snapshot at '{}'; run the generate step first",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path)?;
    let release: ReleaseInfo = serde_json::from_str(&contents)?;
    debug!(path = %path.display(), version = %release.version, "read release snapshot");
    Ok(release)
}
