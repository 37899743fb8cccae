use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use git_release::cli::{GenerateOptions, GenerateOutcome, ReleaseWorkflow};
use git_release::config::{self, CONFIG_ENV};
use git_release::domain::PrereleaseId;
use git_release::git::Git2Repository;
use git_release::host::GhCliHost;
use git_release::shell::SystemRunner;
use git_release::ui;

#[derive(Parser)]
#[command(
    name = "git-release",
    version,
    about = "Compute the next version from commit history, write the changelog and publish"
)]
struct Cli {
    #[arg(short, long, global = true, env = CONFIG_ENV, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Log debug output (RUST_LOG takes precedence)")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the release, update changelog and manifest, commit and tag
    Generate(GenerateArgs),
    /// Push the generated release and publish it to the package registry
    Publish,
    /// Create the hosted release entry for the generated release
    GhRelease,
    /// Generate, publish and create the hosted release in one run
    CiRelease(GenerateArgs),
}

#[derive(Args)]
struct GenerateArgs {
    #[arg(short, long, help = "Prerelease identifier (alpha, beta, rc, ...)")]
    prerelease: Option<PrereleaseId>,

    #[arg(long, help = "Preview the release without making changes")]
    dry_run: bool,

    #[arg(short, long, help = "Skip confirmation prompts")]
    yes: bool,
}

impl GenerateArgs {
    fn options(&self) -> GenerateOptions {
        GenerateOptions {
            prerelease: self.prerelease.clone(),
            dry_run: self.dry_run,
            assume_yes: self.yes,
            date: chrono::Local::now().date_naive(),
        }
    }
}

/// Console logging controlled by RUST_LOG (default: warn, or debug with --verbose)
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(filter),
        )
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = config::load_config(cli.config.as_deref())?;
    let root = std::env::current_dir().context("Cannot determine the current directory")?;
    let repo = Git2Repository::open(&root).context("Not inside a git repository")?;
    let host = GhCliHost::new(SystemRunner, root.clone());

    let workflow = ReleaseWorkflow::new(root, config, repo, SystemRunner, host);

    match cli.command {
        Command::Generate(args) => {
            let outcome = workflow.generate(&args.options(), ui::confirm_action)?;
            report(&outcome);
        }
        Command::Publish => {
            workflow.publish()?;
        }
        Command::GhRelease => {
            workflow.publish_to_host()?;
        }
        Command::CiRelease(args) => {
            let outcome = workflow.ci_release(&args.options(), ui::confirm_action)?;
            report(&outcome);
        }
    }

    Ok(())
}

fn report(outcome: &GenerateOutcome) {
    match outcome {
        GenerateOutcome::Released(_) => {}
        GenerateOutcome::DryRun(release) => {
            ui::display_status(&format!("Dry run: {} was not written", release.tag_name()));
        }
        GenerateOutcome::Cancelled => println!("Operation cancelled by user."),
    }
}
