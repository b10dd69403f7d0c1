//! Remove command implementation.

use crate::app::api::{self, RemoveOutcome, RemoveRequest};
use crate::domain::AppError;

pub fn run_remove(request: &RemoveRequest) -> Result<(), AppError> {
    let report = api::remove(request)?;

    match report.outcome {
        RemoveOutcome::Removed { count } => {
            let dry_run = if report.dry_run { " (dry run)" } else { "" };
            println!("✅ Removed {} lint phase(s) from {}{}", count, report.target, dry_run);
        }
        RemoveOutcome::NotInstalled => println!("ℹ️ No lint phase in {}", report.target),
    }
    Ok(())
}
