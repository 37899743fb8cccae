//! External commands: a process runner and the package-manager steps built on it

use crate::error::{ReleaseError, Result};
use regex::Regex;
use semver::Version;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;
use tracing::{debug, info, instrument};

static OTP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--otp=\d+").expect("Invalid regex"));

/// Runs an external program to completion
pub trait CommandRunner {
    /// Run `program args...` in `cwd`, returning stdout
    ///
    /// A non-zero exit status is an error carrying stdout and stderr.
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<String>;
}

/// Runs commands as child processes
///
/// The project's `node_modules/.bin` is searched before the inherited `PATH`,
/// so locally installed tools win over global ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<String> {
        let cmdline = command_line(program, args);
        debug!(command = %cmdline, cwd = %cwd.display(), "running command");

        let path = local_bin_path(cwd, std::env::var_os("PATH"))?;
        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .env("PATH", path)
            .output()
            .map_err(|e| ReleaseError::command(format!("Failed to execute {}: {}", cmdline, e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReleaseError::command(format!(
                "{} failed with exit code {}\nStdout: {}\nStderr: {}",
                cmdline,
                output.status.code().unwrap_or(-1),
                stdout,
                stderr
            )));
        }

        Ok(stdout)
    }
}

/// `PATH` with `<cwd>/node_modules/.bin` in front of `inherited`
pub fn local_bin_path(cwd: &Path, inherited: Option<OsString>) -> Result<OsString> {
    let local = cwd.join("node_modules").join(".bin");
    let rest = inherited
        .as_deref()
        .map(|p| std::env::split_paths(p).collect::<Vec<_>>())
        .unwrap_or_default();

    std::env::join_paths(std::iter::once(local).chain(rest))
        .map_err(|e| ReleaseError::command(format!("Cannot build PATH: {}", e)))
}

/// Printable command line with one-time passwords masked
fn command_line(program: &str, args: &[&str]) -> String {
    let line = std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");
    redact_otp(&line)
}

pub fn redact_otp(line: &str) -> String {
    OTP_REGEX.replace_all(line, "--otp=(redacted)").into_owned()
}

/// Package-manager steps of a release, run from the project root
pub struct PackageManager<R: CommandRunner> {
    runner: R,
    program: String,
    root: PathBuf,
}

impl<R: CommandRunner> PackageManager<R> {
    pub fn new(runner: R, program: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        PackageManager {
            runner,
            program: program.into(),
            root: root.into(),
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        self.runner.run(&self.program, args, &self.root)
    }

    #[instrument(skip(self), fields(program = %self.program))]
    pub fn install(&self) -> Result<()> {
        self.run(&["install"])?;
        info!("installed dependencies");
        Ok(())
    }

    #[instrument(skip(self), fields(program = %self.program))]
    pub fn test(&self) -> Result<()> {
        self.run(&["test"])?;
        info!("tests passed");
        Ok(())
    }

    /// Write the version into the manifest without creating a git tag
    #[instrument(skip(self), fields(program = %self.program))]
    pub fn set_version(&self, version: &Version) -> Result<()> {
        let version = version.to_string();
        self.run(&["version", &version, "--no-git-tag-version"])?;
        info!(%version, "updated manifest version");
        Ok(())
    }

    /// Publish under a distribution tag (`latest` or a prerelease id)
    #[instrument(skip(self), fields(program = %self.program))]
    pub fn publish(&self, tag: &str) -> Result<()> {
        self.run(&["publish", "--tag", tag])?;
        info!(tag, "published package");
        Ok(())
    }
}
