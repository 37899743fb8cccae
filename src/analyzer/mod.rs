//! Release analysis: revert filtering, classification and the full pipeline

pub mod classifier;
pub mod release_analyzer;
pub mod revert_filter;

pub use classifier::{Classification, Classifier, DEFAULT_HOST};
pub use release_analyzer::{ReleaseAnalyzer, RepositoryAnalysis};
pub use revert_filter::{reverted_sha, RevertFilter, DEFAULT_SYNC_MARKER};
