use crate::domain::prerelease::{PrereleaseCounter, PrereleaseId};
use crate::domain::{ChangeType, Changelog};
use crate::error::{ReleaseError, Result};
use semver::{BuildMetadata, Prerelease, Version};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Magnitude of a release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    Major,
    Minor,
    Patch,
}

impl ReleaseType {
    /// Bump magnitude implied by a classified changelog
    ///
    /// First match wins: breaking -> major, new/update -> minor, anything else -> patch.
    pub fn from_changelog(changelog: &Changelog) -> Self {
        if changelog.has(ChangeType::Breaking) {
            ReleaseType::Major
        } else if changelog.has(ChangeType::New) || changelog.has(ChangeType::Update) {
            ReleaseType::Minor
        } else {
            ReleaseType::Patch
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseType::Major => write!(f, "major"),
            ReleaseType::Minor => write!(f, "minor"),
            ReleaseType::Patch => write!(f, "patch"),
        }
    }
}

/// Parse a version string, accepting an optional leading `v`
pub fn parse_version(s: &str) -> Result<Version> {
    let trimmed = s.trim();
    let clean = trimmed.strip_prefix('v').unwrap_or(trimmed);

    Version::parse(clean)
        .map_err(|e| ReleaseError::version(format!("Invalid version '{}': {}", s, e)))
}

/// Stable increment
///
/// A prerelease whose base already reflects the requested magnitude is
/// promoted instead of bumped again: `2.0.0-rc.1` + major -> `2.0.0`.
/// A component already at `u64::MAX` cannot be bumped and is an error.
pub fn increment(version: &Version, release_type: ReleaseType) -> Result<Version> {
    let is_pre = !version.pre.is_empty();
    let mut next = Version::new(version.major, version.minor, version.patch);

    match release_type {
        ReleaseType::Major => {
            if !(is_pre && version.minor == 0 && version.patch == 0) {
                next = Version::new(bump(version, version.major)?, 0, 0);
            }
        }
        ReleaseType::Minor => {
            if !(is_pre && version.patch == 0) {
                next = Version::new(version.major, bump(version, version.minor)?, 0);
            }
        }
        ReleaseType::Patch => {
            if !is_pre {
                next.patch = bump(version, version.patch)?;
            }
        }
    }

    Ok(next)
}

fn bump(version: &Version, component: u64) -> Result<u64> {
    component
        .checked_add(1)
        .ok_or_else(|| ReleaseError::version(format!("Version {} cannot be incremented", version)))
}

/// Prerelease increment
///
/// From a stable version: bump the base by `release_type` and start `<id>.0`.
/// From a prerelease: keep the base and advance the counter (reset to 0 when
/// the identifier changes).
pub fn increment_prerelease(
    version: &Version,
    release_type: ReleaseType,
    id: &PrereleaseId,
) -> Result<Version> {
    let (mut next, pre) = match PrereleaseCounter::from_prerelease(&version.pre) {
        Some(current) => (
            Version::new(version.major, version.minor, version.patch),
            current.next(id)?,
        ),
        None => {
            let base = increment(version, release_type)?;
            (base, PrereleaseCounter::new(id, 0))
        }
    };

    next.pre = pre.to_prerelease()?;
    next.build = BuildMetadata::EMPTY;
    Ok(next)
}

/// Next version for a release of the given type, stable or prerelease
pub fn next_version(
    current: &Version,
    release_type: ReleaseType,
    prerelease: Option<&PrereleaseId>,
) -> Result<Version> {
    match prerelease {
        Some(id) => increment_prerelease(current, release_type, id),
        None => increment(current, release_type),
    }
}

/// True when the version carries a prerelease component
pub fn is_prerelease(version: &Version) -> bool {
    version.pre != Prerelease::EMPTY
}
