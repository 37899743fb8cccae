//! Command-line workflows

pub mod orchestration;

pub use orchestration::{
    release_commit_message, GenerateOptions, GenerateOutcome, ReleaseWorkflow,
};
