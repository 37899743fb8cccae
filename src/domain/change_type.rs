use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized changelog bucket a commit flag maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Breaking,
    New,
    Update,
    Fix,
    Docs,
    Upgrade,
    Build,
    Chore,
}

/// Release-notes section order and headings.
pub const RELEASE_NOTE_SECTIONS: [(ChangeType, &str); 8] = [
    (ChangeType::Breaking, "Breaking Changes"),
    (ChangeType::New, "Features"),
    (ChangeType::Update, "Enhancements"),
    (ChangeType::Fix, "Bug Fixes"),
    (ChangeType::Docs, "Documentation"),
    (ChangeType::Upgrade, "Dependency Upgrades"),
    (ChangeType::Build, "Build Related"),
    (ChangeType::Chore, "Chores"),
];

impl ChangeType {
    /// Normalize a commit flag (`fix`, `Feat!`, `Breaking`, ...) to its bucket.
    ///
    /// Lookup is case-insensitive. Any `!`-suffixed flag is a breaking change,
    /// even when the bare type is outside the vocabulary. Unknown flags yield `None`.
    pub fn from_flag(flag: &str) -> Option<Self> {
        let flag = flag.trim().to_lowercase();

        if let Some(base) = flag.strip_suffix('!') {
            return (!base.is_empty()).then_some(ChangeType::Breaking);
        }

        match flag.as_str() {
            "breaking" => Some(ChangeType::Breaking),
            "feat" | "new" => Some(ChangeType::New),
            "update" => Some(ChangeType::Update),
            "fix" => Some(ChangeType::Fix),
            "docs" => Some(ChangeType::Docs),
            "upgrade" => Some(ChangeType::Upgrade),
            "build" => Some(ChangeType::Build),
            "chore" | "perf" | "ci" | "refactor" | "test" => Some(ChangeType::Chore),
            _ => None,
        }
    }

    /// Bucket key as used in the serialized changelog.
    pub fn key(&self) -> &'static str {
        match self {
            ChangeType::Breaking => "breaking",
            ChangeType::New => "new",
            ChangeType::Update => "update",
            ChangeType::Fix => "fix",
            ChangeType::Docs => "docs",
            ChangeType::Upgrade => "upgrade",
            ChangeType::Build => "build",
            ChangeType::Chore => "chore",
        }
    }

    /// Human-readable release-notes heading
    pub fn title(&self) -> &'static str {
        RELEASE_NOTE_SECTIONS
            .iter()
            .find(|(change_type, _)| change_type == self)
            .map(|(_, title)| *title)
            .unwrap_or("Other")
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flag_case_insensitive() {
        assert_eq!(ChangeType::from_flag("Fix"), Some(ChangeType::Fix));
        assert_eq!(ChangeType::from_flag("fix"), Some(ChangeType::Fix));
        assert_eq!(ChangeType::from_flag("FIX"), Some(ChangeType::Fix));
    }

    #[test]
    fn test_from_flag_breaking_variants() {
        assert_eq!(ChangeType::from_flag("fix!"), Some(ChangeType::Breaking));
        assert_eq!(ChangeType::from_flag("Feat!"), Some(ChangeType::Breaking));
        assert_eq!(ChangeType::from_flag("Breaking"), Some(ChangeType::Breaking));
        assert_eq!(ChangeType::from_flag("refactor!"), Some(ChangeType::Breaking));
    }

    #[test]
    fn test_from_flag_conventional_aliases() {
        assert_eq!(ChangeType::from_flag("feat"), Some(ChangeType::New));
        assert_eq!(ChangeType::from_flag("New"), Some(ChangeType::New));
        assert_eq!(ChangeType::from_flag("perf"), Some(ChangeType::Chore));
        assert_eq!(ChangeType::from_flag("ci"), Some(ChangeType::Chore));
        assert_eq!(ChangeType::from_flag("refactor"), Some(ChangeType::Chore));
        assert_eq!(ChangeType::from_flag("test"), Some(ChangeType::Chore));
        assert_eq!(ChangeType::from_flag("Upgrade"), Some(ChangeType::Upgrade));
        assert_eq!(ChangeType::from_flag("Update"), Some(ChangeType::Update));
    }

    #[test]
    fn test_from_flag_unknown() {
        assert_eq!(ChangeType::from_flag("style"), None);
        assert_eq!(ChangeType::from_flag("revert"), None);
        assert_eq!(ChangeType::from_flag(""), None);
        assert_eq!(ChangeType::from_flag("!"), None);
    }

    #[test]
    fn test_section_table_covers_every_bucket_once() {
        let keys: Vec<&str> = RELEASE_NOTE_SECTIONS
            .iter()
            .map(|(change_type, _)| change_type.key())
            .collect();
        assert_eq!(
            keys,
            vec!["breaking", "new", "update", "fix", "docs", "upgrade", "build", "chore"]
        );
    }

    #[test]
    fn test_titles() {
        assert_eq!(ChangeType::Breaking.title(), "Breaking Changes");
        assert_eq!(ChangeType::Upgrade.title(), "Dependency Upgrades");
        assert_eq!(ChangeType::Chore.title(), "Chores");
    }

    #[test]
    fn test_serde_uses_bucket_keys() {
        let json = serde_json::to_string(&ChangeType::Update).unwrap();
        assert_eq!(json, "\"update\"");
        let back: ChangeType = serde_json::from_str("\"breaking\"").unwrap();
        assert_eq!(back, ChangeType::Breaking);
    }
}
