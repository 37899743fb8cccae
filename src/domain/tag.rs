use crate::domain::version::is_prerelease;
use semver::Version;

/// A git tag whose name parses as a semantic version (`v1.2.3` or `1.2.3`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTag {
    pub name: String,
    pub version: Version,
}

impl VersionTag {
    /// Parse a tag name; `None` when it is not a valid semantic version
    pub fn parse(name: &str) -> Option<Self> {
        let clean = name.strip_prefix('v').unwrap_or(name);
        let version = Version::parse(clean).ok()?;

        Some(VersionTag {
            name: name.to_string(),
            version,
        })
    }

    pub fn is_prerelease(&self) -> bool {
        is_prerelease(&self.version)
    }
}

/// Keep version tags only, sorted ascending by semantic-version precedence
pub fn sort_version_tags<S: AsRef<str>>(names: &[S]) -> Vec<VersionTag> {
    let mut tags: Vec<VersionTag> = names
        .iter()
        .filter_map(|name| VersionTag::parse(name.as_ref()))
        .collect();

    tags.sort_by(|a, b| a.version.cmp(&b.version));
    tags
}

/// Tag the commit range of the next release starts from (exclusive)
///
/// `tags` must be ascending. A prerelease continues from the latest tag. A
/// stable release after a run of prereleases walks back to the latest stable
/// tag so the whole prerelease sequence lands in its changelog. `None` means
/// the full history.
pub fn range_start(tags: &[VersionTag], prerelease_requested: bool) -> Option<&VersionTag> {
    let latest = tags.last()?;

    if prerelease_requested || !latest.is_prerelease() {
        return Some(latest);
    }

    tags.iter().rev().find(|tag| !tag.is_prerelease())
}

/// Formats a version as a release tag name (`v1.2.3`)
pub fn tag_name(version: &Version) -> String {
    format!("v{}", version)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> Vec<VersionTag> {
        sort_version_tags(names)
    }

    #[test]
    fn test_parse_tag() {
        let tag = VersionTag::parse("v1.2.3").unwrap();
        assert_eq!(tag.name, "v1.2.3");
        assert_eq!(tag.version, Version::new(1, 2, 3));
        assert!(VersionTag::parse("1.2.3").is_some());
        assert!(VersionTag::parse("release-1.2.3").is_none());
        assert!(VersionTag::parse("v1.2").is_none());
    }

    #[test]
    fn test_sort_filters_and_orders() {
        let sorted = tags(&["v1.0.1", "junk", "v2.0.0-alpha.0", "v1.0.0", "v1.10.0", "v1.9.0"]);
        let names: Vec<&str> = sorted.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["v1.0.0", "v1.0.1", "v1.9.0", "v1.10.0", "v2.0.0-alpha.0"]);
    }

    #[test]
    fn test_range_start_no_tags() {
        assert!(range_start(&[], false).is_none());
        assert!(range_start(&[], true).is_none());
    }

    #[test]
    fn test_range_start_stable_after_prereleases() {
        let list = tags(&["1.0.0", "1.0.1", "2.0.0-alpha.0", "2.0.0-rc.0"]);
        assert_eq!(range_start(&list, false).unwrap().name, "1.0.1");
    }

    #[test]
    fn test_range_start_prerelease_continues() {
        let list = tags(&["1.0.0", "1.0.1", "2.0.0-alpha.0", "2.0.0-rc.0"]);
        assert_eq!(range_start(&list, true).unwrap().name, "2.0.0-rc.0");
    }

    #[test]
    fn test_range_start_latest_stable() {
        let list = tags(&["v1.0.0", "v1.1.0"]);
        assert_eq!(range_start(&list, false).unwrap().name, "v1.1.0");
        assert_eq!(range_start(&list, true).unwrap().name, "v1.1.0");
    }

    #[test]
    fn test_range_start_only_prereleases() {
        let list = tags(&["v1.0.0-alpha.0", "v1.0.0-beta.0"]);
        assert!(range_start(&list, false).is_none());
        assert_eq!(range_start(&list, true).unwrap().name, "v1.0.0-beta.0");
    }

    #[test]
    fn test_tag_name() {
        assert_eq!(tag_name(&Version::parse("2.0.0-alpha.0").unwrap()), "v2.0.0-alpha.0");
    }
}
