//! CLI Adapter.

mod check;
mod inspect;
mod integrate;
mod manual;
mod remove;
mod store;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::api::{CheckRequest, IntegrateRequest, ManualRequest, RemoveRequest, TOOL_VERSION};
use crate::app::logging::{self, LoggingConfig};
use crate::domain::{AppError, PlacementPolicy};

#[derive(Parser)]
#[command(name = "lintphase")]
#[command(version)]
#[command(
    about = "Install and maintain a version-stamped lint build phase in Xcode projects",
    long_about = None
)]
struct Cli {
    /// Print debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

/// Where to find the project.
#[derive(Args)]
struct ProjectArgs {
    /// .xcodeproj, .xcworkspace, or a directory containing one
    path: PathBuf,
    /// Project to use inside a workspace
    #[arg(short, long)]
    project: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert, update or migrate the lint phase of a target
    #[clap(visible_alias = "i")]
    Integrate {
        #[command(flatten)]
        location: ProjectArgs,
        /// Target name (defaults to the first application target)
        #[arg(short, long)]
        target: Option<String>,
        /// Version stamped into the phase
        #[arg(long, default_value = TOOL_VERSION)]
        tool_version: String,
        /// Scripts directory relative to the project root (remembered per target)
        #[arg(short, long)]
        scripts_path: Option<String>,
        /// Where a new phase goes: after-compile-sources, before-compile-sources, start, end
        #[arg(long)]
        placement: Option<PlacementPolicy>,
        /// Rewrite the phase body even when its version matches
        #[arg(short, long)]
        force: bool,
        /// Show what would change without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the phase to add by hand instead of editing the project
    Manual {
        #[command(flatten)]
        location: ProjectArgs,
        #[arg(short, long)]
        target: Option<String>,
        #[arg(long, default_value = TOOL_VERSION)]
        tool_version: String,
        #[arg(short, long)]
        scripts_path: Option<String>,
        #[arg(long)]
        placement: Option<PlacementPolicy>,
    },
    /// Report whether the lint phase is installed and current
    #[clap(visible_alias = "c")]
    Check {
        #[command(flatten)]
        location: ProjectArgs,
        #[arg(short, long)]
        target: Option<String>,
    },
    /// Remove the lint phase from a target
    #[clap(visible_alias = "rm")]
    Remove {
        #[command(flatten)]
        location: ProjectArgs,
        #[arg(short, long)]
        target: Option<String>,
        /// Show what would be removed without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// List the targets of a project
    Targets {
        #[command(flatten)]
        location: ProjectArgs,
    },
    /// List the projects of a workspace
    Projects {
        /// .xcworkspace, .xcodeproj, or a directory
        path: PathBuf,
    },
    /// Inspect or edit remembered scripts locations
    Store {
        #[command(subcommand)]
        command: store::StoreCommands,
    },
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    logging::init(LoggingConfig::from_env(cli.verbose));

    let result: Result<i32, AppError> = match cli.command {
        Commands::Integrate {
            location,
            target,
            tool_version,
            scripts_path,
            placement,
            force,
            dry_run,
        } => {
            let request = IntegrateRequest {
                project: location.path,
                project_name: location.project,
                target,
                version: tool_version,
                scripts_path,
                placement,
                force,
                dry_run,
            };
            integrate::run_integrate(&request).map(|_| 0)
        }
        Commands::Manual { location, target, tool_version, scripts_path, placement } => {
            let request = ManualRequest {
                project: location.path,
                project_name: location.project,
                target,
                version: tool_version,
                scripts_path,
                placement,
            };
            manual::run_manual(&request).map(|_| 0)
        }
        Commands::Check { location, target } => {
            let request = CheckRequest {
                project: location.path,
                project_name: location.project,
                target,
                version: TOOL_VERSION.to_string(),
            };
            check::run_check(&request)
        }
        Commands::Remove { location, target, dry_run } => {
            let request = RemoveRequest {
                project: location.path,
                project_name: location.project,
                target,
                dry_run,
            };
            remove::run_remove(&request).map(|_| 0)
        }
        Commands::Targets { location } => {
            inspect::run_targets(&location.path, location.project.as_deref()).map(|_| 0)
        }
        Commands::Projects { path } => inspect::run_projects(&path).map(|_| 0),
        Commands::Store { command } => store::run_store(command).map(|_| 0),
    };

    match result {
        Ok(exit_code) => {
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
