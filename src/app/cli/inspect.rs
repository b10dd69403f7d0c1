//! Targets and projects listing.

use std::path::Path;

use crate::app::api;
use crate::domain::AppError;

pub fn run_targets(path: &Path, project_name: Option<&str>) -> Result<(), AppError> {
    for target in api::targets(path, project_name)? {
        let mut line = target.name.clone();
        if target.is_default {
            line.push_str(" (default)");
        }
        if let Some(phase) = target.managed_phase {
            let version = target.installed_version.as_deref().unwrap_or("unknown");
            line.push_str(&format!(" [{} @ {}]", phase.name(), version));
        }
        println!("{}", line);
    }
    Ok(())
}

pub fn run_projects(path: &Path) -> Result<(), AppError> {
    let projects = api::projects(path)?;
    if projects.is_empty() {
        println!("ℹ️ No projects found");
    }
    for project in projects {
        println!("{}", project);
    }
    Ok(())
}
