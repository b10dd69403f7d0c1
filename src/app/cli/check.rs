//! Check command implementation.

use crate::app::api::{self, CheckOutcome, CheckRequest};
use crate::domain::AppError;

/// Print the check result and return the process exit code.
pub fn run_check(request: &CheckRequest) -> Result<i32, AppError> {
    let report = api::check(request)?;
    let target = &report.target;

    match &report.outcome {
        CheckOutcome::NotInstalled => println!("ℹ️ No lint phase in {}", target),
        CheckOutcome::UpToDate { version } => {
            println!("✅ Lint phase in {} is up to date ({})", target, version)
        }
        CheckOutcome::NeedsUpdate { installed, latest } => println!(
            "⚠️ Lint phase in {} is at {} (latest {}); run `lintphase integrate` to update",
            target,
            installed.as_deref().unwrap_or("unknown"),
            latest
        ),
        CheckOutcome::Legacy { name } => println!(
            "⚠️ {} still has the legacy phase '{}'; run `lintphase integrate` to migrate",
            target, name
        ),
    }
    Ok(report.outcome.exit_code())
}
