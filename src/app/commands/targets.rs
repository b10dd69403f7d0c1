//! Describe the targets of a project and their managed phase.

use std::path::Path;

use super::{find_managed, open_project};
use crate::domain::{AppError, ManagedPhase, extract_version};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSummary {
    pub name: String,
    pub product_type: Option<String>,
    /// Picked when no target is named.
    pub is_default: bool,
    pub managed_phase: Option<ManagedPhase>,
    pub installed_version: Option<String>,
}

pub fn execute(path: &Path, project_name: Option<&str>) -> Result<Vec<TargetSummary>, AppError> {
    let (_, project) = open_project(path, project_name)?;
    let default_id = project.default_target().map(|target| target.id);
    Ok(project
        .targets()
        .into_iter()
        .map(|target| {
            let managed = find_managed(&target);
            TargetSummary {
                is_default: default_id.as_deref() == Some(target.id.as_str()),
                managed_phase: managed.map(|(variant, _)| variant),
                installed_version: managed
                    .and_then(|(_, phase)| phase.script.as_deref())
                    .and_then(extract_version),
                product_type: target.product_type.clone(),
                name: target.name.clone(),
            }
        })
        .collect())
}
