//! Git Courier - async companion for git remote operations
//!
//! Run with `git-courier --help` for usage.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use git_courier::{
    config::Config,
    ops::{CloneOptions, Courier, FetchOptions, FormatPatchOptions, PullOptions, PushOptions},
    prompt::{PresetPrompter, Prompter, TerminalPrompter},
    runner::GitFlag,
    APP_NAME, VERSION,
};

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(version = VERSION)]
#[command(about = "An async command-line companion for git remote operations")]
#[command(long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Repository to operate on (default: current directory)
    #[arg(short = 'C', long = "repo", global = true)]
    repo: Option<PathBuf>,

    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true, conflicts_with = "no")]
    yes: bool,

    /// Answer no to every confirmation prompt
    #[arg(short, long, global = true)]
    no: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone a repository
    Clone {
        /// Repository URL
        url: String,

        /// Target directory (derived from the URL when omitted)
        directory: Option<PathBuf>,

        #[command(flatten)]
        flags: CloneFlags,
    },

    /// Fetch from a remote
    Fetch {
        /// Remote to fetch from
        remote: Option<String>,

        /// Refspec to fetch
        refspec: Option<String>,

        /// Fetch all remotes
        #[arg(long, conflicts_with = "refspec")]
        all: bool,

        /// Prune deleted remote branches
        #[arg(long)]
        prune: bool,

        /// Fetch all tags
        #[arg(long, conflicts_with = "no_tags")]
        tags: bool,

        /// Do not fetch tags
        #[arg(long)]
        no_tags: bool,

        /// Limit history to N commits
        #[arg(long)]
        depth: Option<u32>,

        /// Convert a shallow repository to a complete one
        #[arg(long)]
        unshallow: bool,
    },

    /// Pull from a remote into the current branch
    Pull {
        /// Remote to pull from
        remote: Option<String>,

        /// Branch to pull
        branch: Option<String>,

        /// Rebase instead of merge
        #[arg(long)]
        rebase: bool,

        /// Only fast-forward
        #[arg(long, conflicts_with = "rebase")]
        ff_only: bool,

        /// Always create a merge commit
        #[arg(long, conflicts_with_all = ["rebase", "ff_only"])]
        no_ff: bool,

        /// Stash local changes around the pull
        #[arg(long)]
        autostash: bool,
    },

    /// Push to a remote
    Push {
        /// Remote to push to (default: the configured push default)
        remote: Option<String>,

        /// Refspec to push (default: the current branch)
        refspec: Option<String>,

        /// Force push, but only if the remote ref is where we expect it
        #[arg(long)]
        force_with_lease: bool,

        /// Force push unconditionally
        #[arg(long, conflicts_with = "force_with_lease")]
        force: bool,

        /// Push all tags
        #[arg(long)]
        tags: bool,

        /// Set the upstream of the pushed branch
        #[arg(short = 'u', long)]
        set_upstream: bool,

        /// Show what would be pushed without pushing
        #[arg(long)]
        dry_run: bool,

        /// Skip the pre-push hook
        #[arg(long)]
        no_verify: bool,
    },

    /// Manage remotes
    Remote {
        #[command(subcommand)]
        command: RemoteCommands,
    },

    /// Write patch files for a revision range
    FormatPatch {
        /// Revision range (e.g. origin/main..HEAD)
        range: Option<String>,

        /// Directory to write patches into
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Name patches [PATCH] instead of [PATCH n/m]
        #[arg(short = 'N', long)]
        no_numbered: bool,
    },

    /// Print a pull request summary
    RequestPull {
        /// Commit the changes start from
        start: String,

        /// URL to pull from
        url: String,

        /// End commit (default: HEAD)
        end: Option<String>,

        /// Include the patch text
        #[arg(short = 'p', long)]
        patch: bool,
    },

    /// Show configuration
    Config {
        /// Initialize config file with defaults
        #[arg(long)]
        init: bool,
    },
}

#[derive(Subcommand)]
enum RemoteCommands {
    /// Add a remote
    Add {
        /// Remote name
        name: String,

        /// Remote URL
        url: String,

        /// Fetch the remote right away
        #[arg(short, long)]
        fetch: bool,
    },

    /// Rename a remote
    Rename {
        /// Current name
        old: String,

        /// New name
        new: String,
    },

    /// Remove a remote
    Rm {
        /// Remote name
        name: String,
    },

    /// Change a remote's URL
    SetUrl {
        /// Remote name
        name: String,

        /// New URL
        url: String,
    },

    /// Prune refs deleted on a remote
    Prune {
        /// Remote name
        name: String,
    },
}

#[derive(Args)]
struct CloneFlags {
    /// Limit history to N commits
    #[arg(long)]
    depth: Option<u32>,

    /// Limit history to commits after DATE (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    shallow_since: Option<NaiveDate>,

    /// Exclude history reachable from a revision
    #[arg(long, value_name = "REV")]
    shallow_exclude: Option<String>,

    /// Clone only one branch
    #[arg(long, conflicts_with = "no_single_branch")]
    single_branch: bool,

    /// Clone all branches even when --depth implies one
    #[arg(long)]
    no_single_branch: bool,

    /// Create a bare repository
    #[arg(long, conflicts_with = "mirror")]
    bare: bool,

    /// Create a mirror repository
    #[arg(long)]
    mirror: bool,

    /// Also clone submodules
    #[arg(long)]
    recurse_submodules: bool,

    /// Name for the clone's remote (default: origin)
    #[arg(short, long, value_name = "NAME")]
    origin: Option<String>,

    /// Branch to check out after cloning
    #[arg(short, long, value_name = "NAME")]
    branch: Option<String>,
}

impl CloneFlags {
    fn into_flags(self) -> Vec<GitFlag> {
        let mut flags = Vec::new();
        if let Some(n) = self.depth {
            flags.push(GitFlag::Depth(n));
        }
        if let Some(date) = self.shallow_since {
            flags.push(GitFlag::ShallowSince(date));
        }
        if let Some(rev) = self.shallow_exclude {
            flags.push(GitFlag::ShallowExclude(rev));
        }
        if self.single_branch {
            flags.push(GitFlag::SingleBranch);
        }
        if self.no_single_branch {
            flags.push(GitFlag::NoSingleBranch);
        }
        if self.bare {
            flags.push(GitFlag::Bare);
        }
        if self.mirror {
            flags.push(GitFlag::Mirror);
        }
        if self.recurse_submodules {
            flags.push(GitFlag::RecurseSubmodules);
        }
        if let Some(name) = self.origin {
            flags.push(GitFlag::Origin(name));
        }
        if let Some(name) = self.branch {
            flags.push(GitFlag::Branch(name));
        }
        flags
    }
}

fn setup_logging(debug: bool, log_file: Option<&PathBuf>) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        // Use info level for our crate, warn for dependencies
        EnvFilter::new("info")
            .add_directive("gix=warn".parse()?)
            .add_directive("tokio=warn".parse()?)
    };

    if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(file).with_target(false))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .with(filter)
            .init();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre error hooks
    color_eyre::install()?;

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config, using defaults: {}", e);
        Config::default()
    });

    setup_logging(cli.debug || config.debug, config.log_file.as_ref())?;

    let prompter: Arc<dyn Prompter> = if cli.yes {
        Arc::new(PresetPrompter::new(true))
    } else if cli.no {
        Arc::new(PresetPrompter::new(false))
    } else {
        Arc::new(TerminalPrompter)
    };

    let repo = cli
        .repo
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let courier = Courier::new(config.clone(), prompter);
    courier.runner().check_installed().await?;

    match cli.command {
        Commands::Clone {
            url,
            directory,
            flags,
        } => {
            let opts = CloneOptions {
                url,
                directory,
                flags: flags.into_flags(),
            };
            let target = courier.clone(&repo, opts).await?;
            println!("Cloned into {}", target.display());
        }

        Commands::Fetch {
            remote,
            refspec,
            all,
            prune,
            tags,
            no_tags,
            depth,
            unshallow,
        } => {
            let mut flags = Vec::new();
            if prune {
                flags.push(GitFlag::Prune);
            }
            if tags {
                flags.push(GitFlag::Tags);
            }
            if no_tags {
                flags.push(GitFlag::NoTags);
            }
            if let Some(n) = depth {
                flags.push(GitFlag::Depth(n));
            }
            if unshallow {
                flags.push(GitFlag::Unshallow);
            }
            courier
                .fetch(
                    &repo,
                    FetchOptions {
                        remote,
                        refspec,
                        all,
                        flags,
                    },
                )
                .await?;
        }

        Commands::Pull {
            remote,
            branch,
            rebase,
            ff_only,
            no_ff,
            autostash,
        } => {
            let mut flags = Vec::new();
            if rebase {
                flags.push(GitFlag::Rebase);
            }
            if ff_only {
                flags.push(GitFlag::FfOnly);
            }
            if no_ff {
                flags.push(GitFlag::NoFf);
            }
            if autostash {
                flags.push(GitFlag::Autostash);
            }
            courier
                .pull(
                    &repo,
                    PullOptions {
                        remote,
                        branch,
                        flags,
                    },
                )
                .await?;
        }

        Commands::Push {
            remote,
            refspec,
            force_with_lease,
            force,
            tags,
            set_upstream,
            dry_run,
            no_verify,
        } => {
            let mut flags = Vec::new();
            if force_with_lease {
                flags.push(GitFlag::ForceWithLease);
            }
            if force {
                flags.push(GitFlag::Force);
            }
            if tags {
                flags.push(GitFlag::Tags);
            }
            if set_upstream {
                flags.push(GitFlag::SetUpstream);
            }
            if dry_run {
                flags.push(GitFlag::DryRun);
            }
            if no_verify {
                flags.push(GitFlag::NoVerify);
            }
            courier
                .push(
                    &repo,
                    PushOptions {
                        remote,
                        refspec,
                        flags,
                    },
                )
                .await?;
        }

        Commands::Remote { command } => match command {
            RemoteCommands::Add { name, url, fetch } => {
                courier.remote_add(&repo, &name, &url, fetch).await?;
            }
            RemoteCommands::Rename { old, new } => {
                if courier.remote_rename(&repo, &old, &new).await? {
                    println!("Renamed {} to {}", old, new);
                } else {
                    println!("Remote {} already has that name", old);
                }
            }
            RemoteCommands::Rm { name } => {
                courier.remote_remove(&repo, &name).await?;
            }
            RemoteCommands::SetUrl { name, url } => {
                courier.remote_set_url(&repo, &name, &url).await?;
            }
            RemoteCommands::Prune { name } => {
                courier.remote_prune(&repo, &name).await?;
            }
        },

        Commands::FormatPatch {
            range,
            output_dir,
            no_numbered,
        } => {
            let mut flags = Vec::new();
            if no_numbered {
                flags.push(GitFlag::NoNumbered);
            }
            courier
                .format_patch(
                    &repo,
                    FormatPatchOptions {
                        range,
                        output_dir,
                        flags,
                    },
                )
                .await?;
        }

        Commands::RequestPull {
            start,
            url,
            end,
            patch,
        } => {
            courier
                .request_pull(&repo, &start, &url, end.as_deref(), patch)
                .await?;
        }

        Commands::Config { init } => {
            if init {
                config.save()?;
                println!(
                    "Configuration initialized at {:?}",
                    Config::config_file_path()?
                );
            } else {
                println!("Configuration:");
                println!("{}", toml::to_string_pretty(&config)?);
                println!("\nConfig file: {:?}", Config::config_file_path()?);
            }
        }
    }

    Ok(())
}
