use crate::analyzer::{DEFAULT_HOST, DEFAULT_SYNC_MARKER};
use crate::error::{ReleaseError, Result};
use crate::release::SNAPSHOT_FILE;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming a configuration file
pub const CONFIG_ENV: &str = "GIT_RELEASE_CONFIG";

/// Configuration filename looked up in the current directory
pub const CONFIG_FILE: &str = "release.toml";

/// Represents the complete configuration for git-release.
///
/// Every table is optional; missing tables and fields fall back to defaults.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub commits: CommitsConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub package: PackageConfig,
}

fn default_manifest() -> String {
    "package.json".to_string()
}

fn default_changelog() -> String {
    "CHANGELOG.md".to_string()
}

fn default_snapshot() -> String {
    SNAPSHOT_FILE.to_string()
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

/// Project files and the hosting domain used for commit links.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProjectConfig {
    #[serde(default = "default_manifest")]
    pub manifest: String,

    #[serde(default = "default_changelog")]
    pub changelog: String,

    #[serde(default = "default_snapshot")]
    pub snapshot: String,

    #[serde(default = "default_host")]
    pub host: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            manifest: default_manifest(),
            changelog: default_changelog(),
            snapshot: default_snapshot(),
            host: default_host(),
        }
    }
}

fn default_sync_marker() -> String {
    DEFAULT_SYNC_MARKER.to_string()
}

/// Commit filtering settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CommitsConfig {
    /// Title prefix of administrative commits left out of the changelog;
    /// empty disables the filter
    #[serde(default = "default_sync_marker")]
    pub sync_marker: String,
}

impl Default for CommitsConfig {
    fn default() -> Self {
        CommitsConfig {
            sync_marker: default_sync_marker(),
        }
    }
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

/// Where the publish step pushes the release commit and tag.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_branch")]
    pub branch: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            remote: default_remote(),
            branch: default_branch(),
        }
    }
}

fn default_manager() -> String {
    "npm".to_string()
}

fn default_install() -> bool {
    true
}

/// Package-manager executable and behavior.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PackageConfig {
    #[serde(default = "default_manager")]
    pub manager: String,

    /// Run `<manager> install` before the test step
    #[serde(default = "default_install")]
    pub install: bool,
}

impl Default for PackageConfig {
    fn default() -> Self {
        PackageConfig {
            manager: default_manager(),
            install: default_install(),
        }
    }
}

impl Config {
    /// Parse a configuration document
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Manifest path resolved against a project root
    pub fn manifest_path(&self, root: &Path) -> PathBuf {
        root.join(&self.project.manifest)
    }

    pub fn changelog_path(&self, root: &Path) -> PathBuf {
        root.join(&self.project.changelog)
    }

    pub fn snapshot_path(&self, root: &Path) -> PathBuf {
        root.join(&self.project.snapshot)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter, or the `GIT_RELEASE_CONFIG` variable
/// 2. `release.toml` in current directory
/// 3. `git-release/release.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If an explicitly named file is missing, or any file found cannot be parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let explicit = config_path
        .map(Path::to_path_buf)
        .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));

    let path = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(ReleaseError::config(format!(
                    "Configuration file '{}' not found",
                    path.display()
                )));
            }
            path
        }
        None => match discover_config_file() {
            Some(path) => path,
            None => {
                debug!("no configuration file found, using defaults");
                return Ok(Config::default());
            }
        },
    };

    debug!(path = %path.display(), "loading configuration");
    let contents = fs::read_to_string(&path)?;
    Config::from_toml(&contents).map_err(|e| {
        ReleaseError::config(format!("Invalid configuration in '{}': {}", path.display(), e))
    })
}

fn discover_config_file() -> Option<PathBuf> {
    let local = Path::new(".").join(CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("git-release").join(CONFIG_FILE))
        .filter(|path| path.is_file())
}
