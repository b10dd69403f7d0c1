//! Store subcommands.

use std::path::PathBuf;

use clap::Subcommand;

use crate::app::api::{self, StoredProject};
use crate::domain::AppError;

#[derive(Subcommand)]
pub enum StoreCommands {
    /// List every remembered project and target
    List,
    /// Show what is remembered for one target
    Show {
        path: PathBuf,
        #[arg(short, long)]
        target: String,
        #[arg(short, long)]
        project: Option<String>,
    },
    /// Forget one target
    Forget {
        path: PathBuf,
        #[arg(short, long)]
        target: String,
        #[arg(short, long)]
        project: Option<String>,
    },
}

pub fn run_store(command: StoreCommands) -> Result<(), AppError> {
    match command {
        StoreCommands::List => {
            let entries = api::store_list()?;
            if entries.is_empty() {
                println!("ℹ️ Nothing stored yet");
            }
            for entry in &entries {
                print_entry(entry);
            }
        }
        StoreCommands::Show { path, target, project } => {
            let identity = api::identity_for(&path, project.as_deref(), &target);
            match api::store_show(&identity)? {
                Some(entry) => print_entry(&entry),
                None => println!("ℹ️ Nothing stored for {}", identity),
            }
        }
        StoreCommands::Forget { path, target, project } => {
            let identity = api::identity_for(&path, project.as_deref(), &target);
            if api::store_forget(&identity)? {
                println!("✅ Forgot {}", identity);
            } else {
                println!("ℹ️ Nothing stored for {}", identity);
            }
        }
    }
    Ok(())
}

fn print_entry(entry: &StoredProject) {
    println!("{}", entry.identity);
    if let Some(path) = &entry.scripts_path {
        println!("  scripts: {}", path);
    }
    if let Some(config) = &entry.config {
        println!("  root: {}", config.project_root);
        println!("  opened via: {}", config.xcode_path);
        if !config.created_at.is_empty() {
            println!("  since: {}", config.created_at);
        }
    }
}
