//! Domain logic - pure release rules independent of git and the filesystem

pub mod change_type;
pub mod changelog;
pub mod commit;
pub mod prerelease;
pub mod tag;
pub mod version;

pub use change_type::{ChangeType, RELEASE_NOTE_SECTIONS};
pub use changelog::Changelog;
pub use commit::{parse_log, parse_log_text, CommitRecord};
pub use prerelease::{PrereleaseCounter, PrereleaseId};
pub use tag::{range_start, sort_version_tags, tag_name, VersionTag};
pub use version::{next_version, parse_version, ReleaseType};
