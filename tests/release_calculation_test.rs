// End-to-end release calculation through the public API: raw log lines in,
// version, buckets and rendered Markdown out.
use chrono::NaiveDate;
use git_release::analyzer::ReleaseAnalyzer;
use git_release::domain::{range_start, sort_version_tags, ChangeType, PrereleaseId, ReleaseType};
use git_release::render::{changelog_entry, prepend_changelog, release_notes};

const SHA_A: &str = "abcdef010c481d5da8d2d9b5ef74945e6566166c";
const SHA_B: &str = "123456710c481d5da8d2d9b5ef74945e6566166c";
const SHA_C: &str = "0123456789abcdeffedcba9876543210a1b2c3d4";
const SHA_D: &str = "fedcba9876543210fedcba9876543210fedcba98";
const SHA_E: &str = "1111111111111111111111111111111111111111";

fn analyzer() -> ReleaseAnalyzer {
    ReleaseAnalyzer::new("github.com", "eslint/eslint-release")
}

fn link(sha: &str) -> String {
    format!(
        "* [`{}`](https://github.com/eslint/eslint-release/commit/{})",
        &sha[..7],
        sha
    )
}

#[test]
fn test_patch_release_scenario() {
    let logs = vec![
        format!("* {} Fix: Something (Foo Bar)", SHA_A),
        format!("* {} Docs: Something else (foobar)", SHA_B),
        format!("* {} Fix: Something else (Foo B. Baz)", SHA_C),
    ];

    let release = analyzer().calculate("1.0.0", &logs, None).unwrap();

    assert_eq!(release.release_type, ReleaseType::Patch);
    assert_eq!(release.version.to_string(), "1.0.1");
    assert_eq!(
        release.changelog.lines(ChangeType::Fix),
        [
            format!("{} Fix: Something (Foo Bar)", link(SHA_A)),
            format!("{} Fix: Something else (Foo B. Baz)", link(SHA_C)),
        ]
    );
    assert_eq!(
        release.changelog.lines(ChangeType::Docs),
        [format!("{} Docs: Something else (foobar)", link(SHA_B))]
    );
    assert_eq!(
        release.changelog.change_types().collect::<Vec<_>>(),
        vec![ChangeType::Fix, ChangeType::Docs]
    );
}

#[test]
fn test_major_prerelease_scenario() {
    let logs = vec![
        format!("* {} Breaking: Something (Foo Bar)", SHA_A),
        format!("* {} Fix: Something else (Foo B. Baz)", SHA_B),
    ];
    let alpha = PrereleaseId::parse("alpha").unwrap();

    let release = analyzer().calculate("1.0.0", &logs, Some(&alpha)).unwrap();

    assert_eq!(release.release_type, ReleaseType::Major);
    assert_eq!(release.version.to_string(), "2.0.0-alpha.0");
}

#[test]
fn test_prerelease_identifier_change_resets_counter() {
    let logs = vec![format!("* {} Fix: Something (Foo Bar)", SHA_A)];
    let beta = PrereleaseId::parse("beta").unwrap();

    let release = analyzer().calculate("2.0.0-alpha.3", &logs, Some(&beta)).unwrap();
    assert_eq!(release.version.to_string(), "2.0.0-beta.0");
}

#[test]
fn test_exhausted_prerelease_counter_is_rejected() {
    let alpha = PrereleaseId::parse("alpha").unwrap();

    let err = analyzer()
        .calculate::<String>("1.0.0-alpha.18446744073709551615", &[], Some(&alpha))
        .unwrap_err();

    assert!(matches!(err, git_release::ReleaseError::Version(_)));
}

#[test]
fn test_exhausted_patch_component_is_rejected() {
    let logs = vec![format!("* {} Fix: Something (Foo Bar)", SHA_A)];

    let err = analyzer()
        .calculate("1.2.18446744073709551615", &logs, None)
        .unwrap_err();

    assert!(matches!(err, git_release::ReleaseError::Version(_)));
}

#[test]
fn test_conventional_prefixes() {
    let logs = vec![
        format!("* {} feat(parser): add thing (A)", SHA_A),
        format!("* {} perf: faster (B)", SHA_B),
        format!("* {} chore: tidy (C)", SHA_C),
    ];

    let release = analyzer().calculate("1.4.2", &logs, None).unwrap();
    assert_eq!(release.release_type, ReleaseType::Minor);
    assert_eq!(release.version.to_string(), "1.5.0");
    assert_eq!(release.changelog.lines(ChangeType::New).len(), 1);
    assert_eq!(release.changelog.lines(ChangeType::Chore).len(), 2);
}

#[test]
fn test_bang_prefix_is_breaking() {
    let logs = vec![format!("* {} fix!: drop node 12 (A)", SHA_A)];

    let release = analyzer().calculate("3.1.4", &logs, None).unwrap();
    assert_eq!(release.release_type, ReleaseType::Major);
    assert_eq!(release.version.to_string(), "4.0.0");
}

#[test]
fn test_mixed_case_flags_share_a_bucket() {
    let logs = vec![
        format!("* {} Fix: upper (A)", SHA_A),
        format!("* {} fix: lower (B)", SHA_B),
        format!("* {} FIX: shouting (C)", SHA_C),
    ];

    let release = analyzer().calculate("1.0.0", &logs, None).unwrap();
    assert_eq!(release.changelog.lines(ChangeType::Fix).len(), 3);
}

#[test]
fn test_revert_outside_range_stays_visible() {
    let logs = vec![
        format!("* {} Revert \"New: old feature\" (Foo Bar)", SHA_A),
        format!("This reverts commit {}.", SHA_E),
        format!("* {} Fix: Something (Foo Bar)", SHA_B),
    ];

    let release = analyzer().calculate("1.0.0", &logs, None).unwrap();
    assert_eq!(release.raw_changelog.lines().count(), 2);
    assert!(release.raw_changelog.starts_with(&link(SHA_A)));
}

#[test]
fn test_revert_and_sync_noise() {
    let logs = vec![
        format!("* {} Sponsors: Sync (ESLint Jenkins)", SHA_A),
        format!("* {} Revert \"Breaking: remove option\" (Foo Bar)", SHA_B),
        format!("This reverts commit {}.", SHA_D),
        String::new(),
        "Reason: too early".to_string(),
        format!("* {} Update: improve docs site (Foo Bar)", SHA_C),
        format!("* {} Breaking: remove option (Foo Bar)", SHA_D),
    ];

    let release = analyzer().calculate("5.0.0", &logs, None).unwrap();
    assert_eq!(release.release_type, ReleaseType::Minor);
    assert_eq!(release.version.to_string(), "5.1.0");
    assert_eq!(
        release.raw_changelog,
        format!("{} Update: improve docs site (Foo Bar)", link(SHA_C))
    );
}

#[test]
fn test_range_boundary_scenarios() {
    let tags = sort_version_tags(&["v2.0.0-rc.0", "v1.0.0", "v2.0.0-alpha.0", "v1.0.1"]);

    assert_eq!(range_start(&tags, false).map(|t| t.name.as_str()), Some("v1.0.1"));
    assert_eq!(range_start(&tags, true).map(|t| t.name.as_str()), Some("v2.0.0-rc.0"));
    assert_eq!(range_start(&[], false), None);
}

#[test]
fn test_rendered_outputs() {
    let logs = vec![
        format!("* {} Fix: Something (Foo Bar)", SHA_A),
        format!("* {} New: Feature (Foo Bar)", SHA_B),
        format!("* {} Tweak layout (Foo Bar)", SHA_C),
    ];
    let release = analyzer().calculate("1.0.0", &logs, None).unwrap();
    let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

    let entry = changelog_entry(&release, date);
    assert!(entry.starts_with("v1.1.0 - October 18, 2026\n\n"));
    assert!(entry.ends_with("Tweak layout (Foo Bar)\n\n"));

    let previous = "v1.0.0 - September 1, 2026\n\n* old\n\n";
    let updated = prepend_changelog(&entry, previous);
    assert_eq!(&updated[entry.len()..], previous);

    assert_eq!(
        release_notes(&release.changelog),
        format!(
            "## Features\n\n{} New: Feature (Foo Bar)\n\n## Bug Fixes\n\n{} Fix: Something (Foo Bar)",
            link(SHA_B),
            link(SHA_A)
        )
    );
}

#[test]
fn test_stable_increment_is_monotonic() {
    let analyzer = analyzer();
    let logs_by_type = [
        (ReleaseType::Major, format!("* {} Breaking: x (A)", SHA_A)),
        (ReleaseType::Minor, format!("* {} New: x (A)", SHA_A)),
        (ReleaseType::Patch, format!("* {} Fix: x (A)", SHA_A)),
    ];

    for current in ["0.0.0", "0.9.9", "1.2.3", "2.0.0-rc.1", "10.0.0-alpha.0"] {
        for (expected_type, line) in &logs_by_type {
            let release = analyzer.calculate(current, &[line], None).unwrap();
            let before = semver::Version::parse(current).unwrap();
            assert_eq!(release.release_type, *expected_type);
            assert!(release.version > before, "{} -> {}", current, release.version);
            assert!(release.version.pre.is_empty());
        }
    }
}
