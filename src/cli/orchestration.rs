//! Release workflow orchestration
//!
//! Sequences the collaborators (repository, package manager, release host)
//! around the release computation. Kept apart from `main.rs` so the
//! workflows can be driven programmatically and tested without clap.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use crate::analyzer::ReleaseAnalyzer;
use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::PrereleaseId;
use crate::git::Repository;
use crate::host::{ReleaseHost, ReleaseRequest};
use crate::manifest::{lockfiles_beside, Manifest};
use crate::release::{read_snapshot, write_snapshot, ReleaseInfo};
use crate::render::{changelog_entry, release_notes, update_changelog_file};
use crate::shell::{CommandRunner, PackageManager};
use crate::ui;

/// Options for the generate step
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOptions {
    /// Prerelease identifier; `None` cuts a stable release
    pub prerelease: Option<PrereleaseId>,

    /// Compute and print without touching files, git or the registry
    pub dry_run: bool,

    /// Skip confirmation prompts
    pub assume_yes: bool,

    /// Date written into the changelog heading
    pub date: NaiveDate,
}

/// How a generate step ended
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateOutcome {
    /// Changelog, manifest, commit, tag and snapshot were all written
    Released(ReleaseInfo),
    /// Nothing was written
    DryRun(ReleaseInfo),
    /// The user declined to continue
    Cancelled,
}

impl GenerateOutcome {
    pub fn release(&self) -> Option<&ReleaseInfo> {
        match self {
            GenerateOutcome::Released(release) | GenerateOutcome::DryRun(release) => Some(release),
            GenerateOutcome::Cancelled => None,
        }
    }
}

/// Commit message of the release commit
pub fn release_commit_message(release: &ReleaseInfo) -> String {
    format!("Build: changelog update for {}", release.tag_name())
}

/// The collaborators of one project, bundled for the release workflows
pub struct ReleaseWorkflow<G: Repository, C: CommandRunner, H: ReleaseHost> {
    root: PathBuf,
    config: Config,
    repo: G,
    package: PackageManager<C>,
    host: H,
}

impl<G: Repository, C: CommandRunner, H: ReleaseHost> ReleaseWorkflow<G, C, H> {
    /// `root` is the project directory; configured paths resolve against it
    pub fn new(root: impl Into<PathBuf>, config: Config, repo: G, runner: C, host: H) -> Self {
        let root = root.into();
        let package = PackageManager::new(runner, config.package.manager.clone(), root.clone());

        ReleaseWorkflow {
            root,
            config,
            repo,
            package,
            host,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn repository(&self) -> &G {
        &self.repo
    }

    pub fn package_manager(&self) -> &PackageManager<C> {
        &self.package
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Compute the release and record it locally
    ///
    /// Installs and tests, computes the release from the tag history,
    /// prepends the changelog, bumps the manifest, commits, tags and writes
    /// the snapshot read by the publish steps. `confirm` is asked before
    /// releasing an empty commit range unless `assume_yes` is set.
    #[instrument(skip(self, options, confirm), fields(prerelease = ?options.prerelease, dry_run = options.dry_run))]
    pub fn generate<F>(&self, options: &GenerateOptions, mut confirm: F) -> Result<GenerateOutcome>
    where
        F: FnMut(&str) -> Result<bool>,
    {
        let manifest_path = self.config.manifest_path(&self.root);
        let changelog_path = self.config.changelog_path(&self.root);
        let manifest = Manifest::load(&manifest_path)?;
        manifest.validate_setup()?;

        if !options.dry_run {
            if self.config.package.install {
                ui::display_status("Installing dependencies");
                self.package.install()?;
            }
            ui::display_status("Running tests");
            self.package.test()?;
        }

        ui::display_status("Calculating changes for release");
        let current = manifest.version.to_string();
        let analysis = ReleaseAnalyzer::from_config(&self.config, manifest.repository.as_str())
            .analyze_repository(&self.repo, &current, options.prerelease.as_ref())?;

        let warnings = BoundaryWarning::from_analysis(&analysis);
        for warning in &warnings {
            warn!(%warning, "release boundary");
            ui::display_boundary_warning(warning);
        }

        let release = analysis.release;
        let since = analysis.since_tag.as_ref().map(|t| t.name.as_str());
        ui::display_release_summary(&release, &current, since);

        if options.dry_run {
            ui::display_markdown("Changelog entry", &changelog_entry(&release, options.date));
            ui::display_markdown("Release notes", &release_notes(&release.changelog));
            return Ok(GenerateOutcome::DryRun(release));
        }

        if warnings.iter().any(BoundaryWarning::needs_confirmation)
            && !options.assume_yes
            && !confirm("Continue with the release anyway?")?
        {
            info!("release cancelled by user");
            return Ok(GenerateOutcome::Cancelled);
        }

        update_changelog_file(&changelog_path, &release, options.date)?;
        self.package.set_version(&release.version)?;

        let lockfiles = lockfiles_beside(&manifest_path);
        let mut paths = vec![manifest_path.as_path(), changelog_path.as_path()];
        paths.extend(lockfiles.iter().map(PathBuf::as_path));

        self.repo
            .commit_files(&paths, &release_commit_message(&release))
            .context("Failed to commit release files")?;
        self.repo.create_tag(&release.tag_name())?;

        write_snapshot(&self.config.snapshot_path(&self.root), &release)?;

        ui::display_success(&format!("Release is {}", release.tag_name()));
        Ok(GenerateOutcome::Released(release))
    }

    /// Push the release commit and tag, then publish to the registry
    #[instrument(skip(self))]
    pub fn publish(&self) -> Result<ReleaseInfo> {
        let release = read_snapshot(&self.config.snapshot_path(&self.root))?;
        let tag = release.tag_name();

        ui::display_status(&format!(
            "Pushing {} to {}/{}",
            tag, self.config.git.remote, self.config.git.branch
        ));
        self.repo
            .push(&self.config.git.remote, &self.config.git.branch, &tag)
            .with_context(|| format!("Failed to push {}", tag))?;

        ui::display_status(&format!("Publishing under '{}'", release.package_tag()));
        self.package.publish(release.package_tag())?;

        ui::display_success(&format!("Published {}", tag));
        Ok(release)
    }

    /// Create the hosted release entry for the last generated release
    ///
    /// A failure from the host is reported as a warning and never returned
    /// as an error; a missing snapshot still is.
    #[instrument(skip(self))]
    pub fn publish_to_host(&self) -> Result<Option<BoundaryWarning>> {
        let release = read_snapshot(&self.config.snapshot_path(&self.root))?;
        let request = ReleaseRequest::from_release(&release);

        match self.host.create_release(&request) {
            Ok(()) => {
                ui::display_success(&format!("Created hosted release {}", request.tag_name));
                Ok(None)
            }
            Err(e) => {
                let warning = BoundaryWarning::HostPublishFailed {
                    tag: request.tag_name,
                    reason: e.to_string(),
                };
                warn!(%warning, "hosted release failed");
                ui::display_boundary_warning(&warning);
                Ok(Some(warning))
            }
        }
    }

    /// Generate, publish and create the hosted release in one go
    ///
    /// Publishing is skipped for dry runs and cancelled generates.
    pub fn ci_release<F>(&self, options: &GenerateOptions, confirm: F) -> Result<GenerateOutcome>
    where
        F: FnMut(&str) -> Result<bool>,
    {
        let outcome = self.generate(options, confirm)?;

        if let GenerateOutcome::Released(_) = outcome {
            self.publish()?;
            self.publish_to_host()?;
        }

        Ok(outcome)
    }
}
