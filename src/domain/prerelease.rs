//! Prerelease identifiers and counters
//!
//! A prerelease version carries an identifier (alpha, beta, rc, or custom) and a
//! numeric counter: `2.0.0-beta.3`. See https://semver.org/#spec-item-9

use crate::error::{ReleaseError, Result};
use semver::Prerelease;
use std::fmt;
use std::str::FromStr;

/// Prerelease identifier requested for a release (`alpha`, `beta`, `rc`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrereleaseId(String);

impl PrereleaseId {
    /// Parse and validate an identifier
    ///
    /// Accepts a single semver identifier: ASCII alphanumerics and hyphens,
    /// not purely numeric (the numeric part is the counter).
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PrereleaseId {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        let id = s.trim();

        if id.is_empty() {
            return Err(ReleaseError::version("Empty prerelease identifier"));
        }

        if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ReleaseError::version(format!(
                "Invalid prerelease identifier: '{}'",
                s
            )));
        }

        if id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ReleaseError::version(format!(
                "Prerelease identifier must not be numeric: '{}'",
                s
            )));
        }

        Ok(PrereleaseId(id.to_string()))
    }
}

impl fmt::Display for PrereleaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Prerelease component of a version split into identifier and counter
///
/// # Examples
/// - "alpha.0" -> PrereleaseCounter { identifier: "alpha", counter: Some(0) }
/// - "rc" -> PrereleaseCounter { identifier: "rc", counter: None }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrereleaseCounter {
    pub identifier: String,
    pub counter: Option<u64>,
}

impl PrereleaseCounter {
    pub fn new(identifier: &PrereleaseId, counter: u64) -> Self {
        PrereleaseCounter {
            identifier: identifier.as_str().to_string(),
            counter: Some(counter),
        }
    }

    /// Split a version's prerelease component. Returns `None` for stable versions.
    pub fn from_prerelease(pre: &Prerelease) -> Option<Self> {
        if pre.is_empty() {
            return None;
        }

        let mut parts = pre.as_str().split('.');
        let identifier = parts.next().unwrap_or_default().to_string();
        let counter = parts.next().and_then(|p| p.parse::<u64>().ok());

        Some(PrereleaseCounter {
            identifier,
            counter,
        })
    }

    /// Next counter under `id`: increment when the identifier is unchanged and
    /// numbered, otherwise restart at 0.
    pub fn next(&self, id: &PrereleaseId) -> Result<Self> {
        match self.counter {
            Some(n) if self.identifier == id.as_str() => {
                let n = n.checked_add(1).ok_or_else(|| {
                    ReleaseError::version(format!(
                        "Prerelease counter '{}' cannot be incremented",
                        self
                    ))
                })?;
                Ok(PrereleaseCounter::new(id, n))
            }
            _ => Ok(PrereleaseCounter::new(id, 0)),
        }
    }

    pub fn to_prerelease(&self) -> Result<Prerelease> {
        Prerelease::new(&self.to_string()).map_err(|e| {
            ReleaseError::version(format!("Invalid prerelease '{}': {}", self, e))
        })
    }
}

impl fmt::Display for PrereleaseCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier)?;
        if let Some(counter) = self.counter {
            write!(f, ".{}", counter)?;
        }
        Ok(())
    }
}
