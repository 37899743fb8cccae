use crate::analyzer::classifier::Classifier;
use crate::analyzer::revert_filter::RevertFilter;
use crate::config::Config;
use crate::domain::{next_version, parse_log, parse_version, range_start, sort_version_tags};
use crate::domain::{PrereleaseId, ReleaseType, VersionTag};
use crate::error::Result;
use crate::git::Repository;
use crate::release::{package_tag_for, ReleaseInfo};
use tracing::{debug, info, instrument};

/// Release calculation together with the commit range it was computed from
#[derive(Debug, Clone)]
pub struct RepositoryAnalysis {
    pub release: ReleaseInfo,
    /// Exclusive range start; `None` when the full history was used
    pub since_tag: Option<VersionTag>,
    /// Version tags reachable from HEAD, prerelease tags included
    pub tag_count: usize,
    /// Commits in the range before revert and noise filtering
    pub commit_count: usize,
}

/// Turns a current version and a commit log into the next release
///
/// The pipeline is parse, filter, classify, then version. Nothing here
/// performs I/O except [ReleaseAnalyzer::analyze_repository], which only
/// reads tags and log lines through the [Repository] trait.
#[derive(Debug, Clone)]
pub struct ReleaseAnalyzer {
    filter: RevertFilter,
    classifier: Classifier,
    repository: String,
}

impl ReleaseAnalyzer {
    /// Analyzer for `owner/name` hosted on `host`, with the default sync marker
    pub fn new(host: impl Into<String>, repository: impl Into<String>) -> Self {
        let repository = repository.into();

        ReleaseAnalyzer {
            filter: RevertFilter::default(),
            classifier: Classifier::new(host, repository.clone()),
            repository,
        }
    }

    /// Analyzer using the configured host and sync marker
    pub fn from_config(config: &Config, repository: impl Into<String>) -> Self {
        Self::new(config.project.host.clone(), repository)
            .with_sync_marker(config.commits.sync_marker.clone())
    }

    pub fn with_sync_marker(mut self, marker: impl Into<String>) -> Self {
        self.filter = RevertFilter::new(marker);
        self
    }

    /// Compute the next release from raw log lines (newest first)
    ///
    /// The current version is parsed before anything else; an invalid version
    /// aborts the calculation.
    #[instrument(skip(self, log_lines), fields(lines = log_lines.len()))]
    pub fn calculate<S: AsRef<str>>(
        &self,
        current_version: &str,
        log_lines: &[S],
        prerelease: Option<&PrereleaseId>,
    ) -> Result<ReleaseInfo> {
        let current = parse_version(current_version)?;

        let commits = parse_log(log_lines);
        let filtered = self.filter.apply(&commits);
        debug!(
            parsed = commits.len(),
            kept = filtered.len(),
            "filtered commit log"
        );

        let classification = self.classifier.classify(&filtered);
        let release_type = ReleaseType::from_changelog(&classification.changelog);
        let version = next_version(&current, release_type, prerelease)?;

        info!(from = %current, to = %version, %release_type, "calculated release");

        Ok(ReleaseInfo {
            version,
            release_type,
            changelog: classification.changelog,
            raw_changelog: classification.raw_changelog,
            repository: self.repository.clone(),
            package_tag: Some(package_tag_for(prerelease)),
        })
    }

    /// Resolve the commit range from the repository's tags, then calculate
    #[instrument(skip(self, repo))]
    pub fn analyze_repository<R: Repository + ?Sized>(
        &self,
        repo: &R,
        current_version: &str,
        prerelease: Option<&PrereleaseId>,
    ) -> Result<RepositoryAnalysis> {
        let tags = sort_version_tags(&repo.version_tags()?);
        let since_tag = range_start(&tags, prerelease.is_some()).cloned();

        match &since_tag {
            Some(tag) => debug!(since = %tag.name, "using commits since tag"),
            None => debug!(tags = tags.len(), "no usable version tag, using full history"),
        }

        let lines = repo.log_lines(since_tag.as_ref().map(|t| t.name.as_str()))?;
        let commit_count = parse_log(&lines).len();
        let release = self.calculate(current_version, &lines, prerelease)?;

        Ok(RepositoryAnalysis {
            release,
            since_tag,
            tag_count: tags.len(),
            commit_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::DEFAULT_HOST;
    use crate::domain::ChangeType;
    use crate::git::MockRepository;

    const SHA_A: &str = "abcdef010c481d5da8d2d9b5ef74945e6566166c";
    const SHA_B: &str = "123456710c481d5da8d2d9b5ef74945e6566166c";
    const SHA_C: &str = "0123456789abcdeffedcba9876543210a1b2c3d4";
    const SHA_D: &str = "fedcba9876543210fedcba9876543210fedcba98";

    fn analyzer() -> ReleaseAnalyzer {
        ReleaseAnalyzer::new(DEFAULT_HOST, "acme/widget")
    }

    fn alpha() -> PrereleaseId {
        PrereleaseId::parse("alpha").unwrap()
    }

    #[test]
    fn test_patch_release() {
        let logs = vec![
            format!("* {} Fix: Something (Foo Bar)", SHA_A),
            format!("* {} Docs: Something else (foobar)", SHA_B),
            format!("* {} Fix: Something else (Foo B. Baz)", SHA_C),
        ];

        let release = analyzer().calculate("1.0.0", &logs, None).unwrap();

        assert_eq!(release.release_type, ReleaseType::Patch);
        assert_eq!(release.version.to_string(), "1.0.1");
        assert_eq!(release.changelog.lines(ChangeType::Fix).len(), 2);
        assert_eq!(release.changelog.lines(ChangeType::Docs).len(), 1);
        assert_eq!(release.repository, "acme/widget");
        assert_eq!(release.package_tag(), "latest");
        assert_eq!(release.raw_changelog.lines().count(), 3);
    }

    #[test]
    fn test_minor_release() {
        let logs = vec![
            format!("* {} Fix: Something (Foo Bar)", SHA_A),
            format!("* {} Update: Something else (foobar)", SHA_B),
        ];

        let release = analyzer().calculate("1.0.0", &logs, None).unwrap();
        assert_eq!(release.release_type, ReleaseType::Minor);
        assert_eq!(release.version.to_string(), "1.1.0");
    }

    #[test]
    fn test_major_release() {
        let logs = vec![
            format!("* {} Breaking: Something (Foo Bar)", SHA_A),
            format!("* {} New: Something else (foobar)", SHA_B),
            format!("* {} Fix: Something else (Foo B. Baz)", SHA_C),
        ];

        let release = analyzer().calculate("1.0.0", &logs, None).unwrap();
        assert_eq!(release.release_type, ReleaseType::Major);
        assert_eq!(release.version.to_string(), "2.0.0");
        assert_eq!(release.changelog.lines(ChangeType::New).len(), 1);
    }

    #[test]
    fn test_reverted_commits_are_excluded() {
        let logs = vec![
            format!("* {} Revert \"New: Add a feature\" (Foo Bar)", SHA_D),
            format!("This reverts commit {}.", SHA_B),
            String::new(),
            format!("* {} Fix: Something (Foo Bar)", SHA_A),
            format!("* {} New: Add a feature (foobar)", SHA_B),
            format!("* {} Docs: Something else (Foo B. Baz)", SHA_C),
        ];

        let release = analyzer().calculate("1.0.0", &logs, None).unwrap();

        assert_eq!(release.release_type, ReleaseType::Patch);
        assert_eq!(release.version.to_string(), "1.0.1");
        assert!(!release.changelog.has(ChangeType::New));
        assert!(!release.raw_changelog.contains("Revert"));
        assert_eq!(release.raw_changelog.lines().count(), 2);
    }

    #[test]
    fn test_sync_commits_are_excluded() {
        let logs = vec![
            format!("* {} Sponsors: Sync (Bot)", SHA_A),
            format!("* {} Fix: Something (Foo Bar)", SHA_B),
        ];

        let release = analyzer().calculate("1.0.0", &logs, None).unwrap();
        assert_eq!(release.raw_changelog.lines().count(), 1);
    }

    #[test]
    fn test_custom_sync_marker() {
        let logs = vec![
            format!("* {} Chore: Sync readme (Bot)", SHA_A),
            format!("* {} Sponsors: Sync (Bot)", SHA_B),
        ];

        let release = analyzer()
            .with_sync_marker("Chore: Sync")
            .calculate("1.0.0", &logs, None)
            .unwrap();
        assert_eq!(release.raw_changelog.lines().count(), 1);
        assert!(release.raw_changelog.contains("Sponsors: Sync"));
    }

    #[test]
    fn test_major_prerelease_from_stable() {
        let logs = vec![
            format!("* {} Breaking: Something (Foo Bar)", SHA_A),
            format!("* {} Fix: Something else (Foo B. Baz)", SHA_B),
        ];

        let release = analyzer().calculate("1.0.0", &logs, Some(&alpha())).unwrap();

        assert_eq!(release.release_type, ReleaseType::Major);
        assert_eq!(release.version.to_string(), "2.0.0-alpha.0");
        assert_eq!(release.package_tag(), "alpha");
        assert!(release.is_prerelease());
    }

    #[test]
    fn test_prerelease_counter_increments() {
        let logs = vec![format!("* {} Fix: Something (Foo Bar)", SHA_A)];

        let release = analyzer()
            .calculate("2.0.0-alpha.0", &logs, Some(&alpha()))
            .unwrap();

        assert_eq!(release.release_type, ReleaseType::Patch);
        assert_eq!(release.version.to_string(), "2.0.0-alpha.1");
    }

    #[test]
    fn test_invalid_version_is_fatal() {
        let logs = vec![format!("* {} Fix: Something (Foo Bar)", SHA_A)];
        let err = analyzer().calculate("not-a-version", &logs, None).unwrap_err();
        assert!(err.to_string().contains("Invalid version"));
    }

    #[test]
    fn test_empty_log_is_patch() {
        let logs: Vec<String> = Vec::new();
        let release = analyzer().calculate("1.0.0", &logs, None).unwrap();
        assert_eq!(release.version.to_string(), "1.0.1");
        assert!(release.changelog.is_empty());
        assert_eq!(release.raw_changelog, "");
    }

    #[test]
    fn test_analyze_repository_stable_after_prereleases() {
        let repo = MockRepository::new()
            .with_tags(&["v1.0.0", "v1.0.1", "v2.0.0-alpha.0", "v2.0.0-rc.0", "not-a-version"])
            .with_log(
                Some("v1.0.1"),
                &[
                    format!("* {} Breaking: Something (Foo Bar)", SHA_A),
                    format!("* {} Fix: Something (Foo Bar)", SHA_B),
                ],
            );

        let analysis = analyzer()
            .analyze_repository(&repo, "2.0.0-rc.0", None)
            .unwrap();

        assert_eq!(analysis.since_tag.map(|t| t.name).as_deref(), Some("v1.0.1"));
        assert_eq!(analysis.commit_count, 2);
        assert_eq!(analysis.release.version.to_string(), "2.0.0");
    }

    #[test]
    fn test_analyze_repository_prerelease_continues() {
        let repo = MockRepository::new()
            .with_tags(&["v1.0.0", "v1.0.1", "v2.0.0-alpha.0", "v2.0.0-rc.0"])
            .with_log(
                Some("v2.0.0-rc.0"),
                &[format!("* {} Fix: Something (Foo Bar)", SHA_A)],
            );

        let rc = PrereleaseId::parse("rc").unwrap();
        let analysis = analyzer()
            .analyze_repository(&repo, "2.0.0-rc.0", Some(&rc))
            .unwrap();

        assert_eq!(
            analysis.since_tag.map(|t| t.name).as_deref(),
            Some("v2.0.0-rc.0")
        );
        assert_eq!(analysis.release.version.to_string(), "2.0.0-rc.1");
        assert_eq!(analysis.release.package_tag(), "rc");
    }

    #[test]
    fn test_analyze_repository_without_tags() {
        let repo = MockRepository::new().with_log(
            None,
            &[format!("* {} New: First feature (Foo Bar)", SHA_A)],
        );

        let analysis = analyzer().analyze_repository(&repo, "0.1.0", None).unwrap();
        assert!(analysis.since_tag.is_none());
        assert_eq!(analysis.release.version.to_string(), "0.2.0");
    }
}
