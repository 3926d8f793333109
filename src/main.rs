use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use semver::Version;

use git_versionize::cli::{run_release, ReleaseArgs};
use git_versionize::config::load_config;
use git_versionize::domain::parse_version;
use git_versionize::git::{Git2Repository, Repository};
use git_versionize::ui;

#[derive(clap::Parser)]
#[command(
    name = "git-versionize",
    version,
    about = "Version every scope of a repository from its conventional commits"
)]
struct Args {
    #[arg(
        short,
        long,
        default_value = ".",
        help = "Directory inside the git working copy"
    )]
    working_dir: PathBuf,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(long, help = "Release even when the working copy has uncommitted changes")]
    skip_dirty: bool,

    #[arg(long, help = "Update files but do not commit or tag")]
    skip_commit: bool,

    #[arg(
        short,
        long,
        value_parser = parse_release_as,
        help = "Release every scope as this exact version"
    )]
    release_as: Option<Version>,

    #[arg(
        short,
        long,
        help = "Only release when commits contain significant changes"
    )]
    ignore_insignificant_commits: bool,

    #[arg(long, help = "List every commit in the changelog")]
    changelog_all: bool,

    #[arg(short, long, help = "Print diagnostic logging")]
    verbose: bool,
}

fn parse_release_as(raw: &str) -> std::result::Result<Version, String> {
    parse_version(raw).map_err(|e| e.to_string())
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init()?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(args.verbose) {
        eprintln!("Cannot initialise logging: {}", e);
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::display_error(&e.to_string());
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(args: Args) -> git_versionize::Result<()> {
    let repo = Git2Repository::discover(&args.working_dir)?;
    let config = load_config(args.config.as_deref(), repo.workdir())?;

    let release_args = ReleaseArgs {
        dry_run: args.dry_run,
        skip_dirty_check: args.skip_dirty,
        skip_commit: args.skip_commit,
        release_as: args.release_as,
        ignore_insignificant: args.ignore_insignificant_commits,
        include_all_commits: args.changelog_all,
    };

    let outcome = run_release(&repo, &release_args, &config)?;
    ui::display_release_outcome(&outcome);
    Ok(())
}
