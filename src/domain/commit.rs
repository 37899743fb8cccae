use regex::Regex;
use std::sync::LazyLock;

/// First line of a log record: `* <sha> <subject> (<author>)`.
///
/// The author group is optional so that a malformed first line still opens a record.
static RECORD_START_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\* (?P<sha>[0-9a-f]{40}) (?P<title>.*?)(?: \((?P<author>[^()]*)\))?$")
        .expect("Invalid regex")
});

/// Leading `type:`, `type!:` or `type(scope)!:` tag of a subject line
static FLAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<type>[a-z]+)(?:\([^)]*\))?(?P<bang>!)?:").expect("Invalid regex")
});

/// One parsed entry of the commit log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Full commit hash
    pub sha: String,
    /// Subject line, including any leading type tag
    pub title: String,
    /// Type tag as written (e.g. `Fix`, `feat!`), if the subject has one
    pub flag: Option<String>,
    /// Author name from the trailing parentheses, empty when absent
    pub author: String,
    /// Lines following the first line, each terminated by `\n`
    pub body: String,
    /// The first line exactly as emitted by the log
    pub raw: String,
}

impl CommitRecord {
    /// Try to open a record from a log line.
    ///
    /// Returns `None` when the line is not a record start.
    pub fn from_start_line(line: &str) -> Option<Self> {
        let captures = RECORD_START_REGEX.captures(line)?;

        let sha = captures.name("sha")?.as_str().to_string();
        let title = captures
            .name("title")
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let author = captures
            .name("author")
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let flag = parse_flag(&title);

        Some(CommitRecord {
            sha,
            title,
            flag,
            author,
            body: String::new(),
            raw: line.to_string(),
        })
    }

    /// First seven characters of the hash
    pub fn short_sha(&self) -> &str {
        &self.sha[..7.min(self.sha.len())]
    }

    /// Text after the `* <sha> ` prefix of the raw line (subject and author)
    pub fn raw_remainder(&self) -> &str {
        let prefix_len = 2 + self.sha.len() + 1;
        self.raw.get(prefix_len..).unwrap_or("")
    }
}

/// Extract the type tag of a subject line, keeping a trailing `!` and dropping any scope.
pub fn parse_flag(title: &str) -> Option<String> {
    let captures = FLAG_REGEX.captures(title)?;
    let commit_type = captures.name("type")?.as_str();
    let bang = if captures.name("bang").is_some() { "!" } else { "" };
    Some(format!("{}{}", commit_type, bang))
}

/// Parse raw log lines into records, preserving log order.
///
/// Lines that do not start a record are appended to the open record's body.
/// Lines before the first record are discarded. Never fails: unparseable input
/// yields an empty sequence.
pub fn parse_log<S: AsRef<str>>(lines: &[S]) -> Vec<CommitRecord> {
    let mut records: Vec<CommitRecord> = Vec::new();

    for line in lines {
        let line = line.as_ref().trim_end_matches('\r');

        if let Some(record) = CommitRecord::from_start_line(line) {
            records.push(record);
        } else if let Some(current) = records.last_mut() {
            current.body.push_str(line);
            current.body.push('\n');
        }
    }

    records
}

/// Parse a whole log output (newline separated)
pub fn parse_log_text(text: &str) -> Vec<CommitRecord> {
    let lines: Vec<&str> = text.lines().collect();
    parse_log(&lines)
}
