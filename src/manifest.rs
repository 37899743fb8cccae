//! Package manifest (`package.json`) access
//!
//! A release reads the current `version`, the `repository` (normalized to
//! `owner/name` for commit links) and the published `files` list.

use crate::domain::parse_version;
use crate::error::{ReleaseError, Result};
use semver::Version;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Lockfiles the package manager rewrites along with the manifest version
pub const LOCKFILES: [&str; 2] = ["package-lock.json", "npm-shrinkwrap.json"];

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RepositoryField {
    Short(String),
    Object { url: String },
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    version: Option<String>,
    repository: Option<RepositoryField>,
    #[serde(default)]
    files: Vec<String>,
}

/// Release-relevant manifest metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub version: Version,
    /// `owner/name`
    pub repository: String,
    /// Paths shipped in the published package
    pub files: Vec<String>,
}

impl Manifest {
    /// Parse manifest JSON; a missing or invalid version is fatal
    pub fn parse(contents: &str) -> Result<Self> {
        let raw: RawManifest = serde_json::from_str(contents)?;

        let version = raw
            .version
            .ok_or_else(|| ReleaseError::manifest("Manifest has no \"version\" field"))?;
        let version = parse_version(&version)?;

        let repository = match raw.repository {
            Some(RepositoryField::Short(s)) | Some(RepositoryField::Object { url: s }) => {
                normalize_repository(&s)?
            }
            None => {
                return Err(ReleaseError::manifest(
                    "Manifest has no \"repository\" field",
                ))
            }
        };

        Ok(Manifest {
            version,
            repository,
            files: raw.files,
        })
    }

    /// Pre-flight check before any release step runs
    ///
    /// A package without a `files` list would publish the whole work tree.
    pub fn validate_setup(&self) -> Result<()> {
        if self.files.is_empty() {
            return Err(ReleaseError::manifest(
                "Missing 'files' property in package.json",
            ));
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ReleaseError::manifest(format!("Cannot read '{}': {}", path.display(), e))
        })?;

        let manifest = Self::parse(&contents)?;
        debug!(
            path = %path.display(),
            version = %manifest.version,
            repository = %manifest.repository,
            "loaded manifest"
        );
        Ok(manifest)
    }
}

/// Lockfiles present next to the manifest at `manifest_path`
pub fn lockfiles_beside(manifest_path: &Path) -> Vec<PathBuf> {
    let dir = manifest_path.parent().unwrap_or_else(|| Path::new(""));
    LOCKFILES
        .iter()
        .map(|name| dir.join(name))
        .filter(|path| path.is_file())
        .collect()
}

/// Reduce a repository reference to `owner/name`
///
/// Accepts `owner/name`, `github:owner/name`, `git+https://host/owner/name.git`,
/// `git@host:owner/name.git` and plain URLs.
pub fn normalize_repository(reference: &str) -> Result<String> {
    let trimmed = reference.trim();
    let invalid = || {
        ReleaseError::manifest(format!(
            "Cannot determine owner/name from repository '{}'",
            reference
        ))
    };

    let path = if let Some((_, rest)) = trimmed.split_once("://") {
        rest.split_once('/').map(|(_, path)| path).ok_or_else(invalid)?
    } else if let Some((_, rest)) = trimmed.split_once(':') {
        // `github:owner/name` shorthand or scp-like `git@host:owner/name`
        rest
    } else {
        trimmed
    };

    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    let mut segments = path.split('/').filter(|s| !s.is_empty());
    match (segments.next(), segments.next(), segments.next()) {
        (Some(owner), Some(name), None) => Ok(format!("{}/{}", owner, name)),
        _ => Err(invalid()),
    }
}
