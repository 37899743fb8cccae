pub mod analyzer;
pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod host;
pub mod manifest;
pub mod release;
pub mod render;
pub mod shell;
pub mod ui;

pub use error::{ReleaseError, Result};
