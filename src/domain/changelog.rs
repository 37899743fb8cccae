use crate::domain::ChangeType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rendered commit lines grouped by change type
///
/// Within a bucket, lines keep the order they were added in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Changelog {
    buckets: BTreeMap<ChangeType, Vec<String>>,
}

impl Changelog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line to a bucket, creating the bucket on first use
    pub fn push(&mut self, change_type: ChangeType, line: impl Into<String>) {
        self.buckets.entry(change_type).or_default().push(line.into());
    }

    /// Lines of a bucket; empty when the bucket was never used
    pub fn lines(&self, change_type: ChangeType) -> &[String] {
        self.buckets
            .get(&change_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has(&self, change_type: ChangeType) -> bool {
        !self.lines(change_type).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }

    /// Buckets that have been created
    pub fn change_types(&self) -> impl Iterator<Item = ChangeType> + '_ {
        self.buckets.keys().copied()
    }
}
