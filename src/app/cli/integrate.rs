//! Integrate command implementation.

use crate::app::api::{self, IntegrateRequest, IntegrationOutcome};
use crate::domain::AppError;

pub fn run_integrate(request: &IntegrateRequest) -> Result<(), AppError> {
    let report = api::integrate(request)?;

    if !report.warnings.is_empty() {
        println!("⚠️  Store warnings:");
        for warning in &report.warnings {
            println!("  • {}", warning);
        }
    }

    let dry_run = if report.dry_run { " (dry run)" } else { "" };
    match report.outcome {
        IntegrationOutcome::Inserted => println!(
            "✅ Inserted '{}' into {} at position {} (version {}){}",
            report.phase_name, report.target, report.position, report.version, dry_run
        ),
        IntegrationOutcome::Updated => println!(
            "✅ Updated '{}' in {} from {} to {}{}",
            report.phase_name,
            report.target,
            report.previous_version.as_deref().unwrap_or("unknown"),
            report.version,
            dry_run
        ),
        IntegrationOutcome::Migrated => println!(
            "✅ Migrated the legacy phase in {} to '{}' (version {}){}",
            report.target, report.phase_name, report.version, dry_run
        ),
        IntegrationOutcome::NoChangeNeeded => println!(
            "✅ '{}' in {} is already at version {}",
            report.phase_name, report.target, report.version
        ),
    }

    if !report.placement_respected {
        println!(
            "ℹ️ The phase sits at position {}, outside the configured placement; left as is",
            report.position
        );
    }
    Ok(())
}
