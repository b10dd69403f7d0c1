pub mod check;
pub mod integrate;
pub mod manual;
pub mod remove;
pub mod store;
pub mod targets;

use std::path::Path;

use tracing::debug;

use crate::adapters::{LocatedProject, locate};
use crate::domain::{
    AppError, BuildPhase, ManagedPhase, ProjectFile, ProjectIdentity, Target,
    normalize_scripts_path,
};

/// Resolve `path` to a project and load its project file.
pub(crate) fn open_project(
    path: &Path,
    project_name: Option<&str>,
) -> Result<(LocatedProject, ProjectFile), AppError> {
    let located = locate(path, project_name)?;
    let project = ProjectFile::load(&located.pbxproj_path())?;
    debug!(project = %located.xcodeproj_path.display(), "loaded project");
    Ok((located, project))
}

/// The named target, or the default target when no name is given.
pub(crate) fn select_target(project: &ProjectFile, name: Option<&str>) -> Result<Target, AppError> {
    match name {
        Some(name) => project.require_target(name),
        None => project.default_target().ok_or_else(|| AppError::TargetNotFound {
            name: "(default)".to_string(),
            available: Vec::new(),
        }),
    }
}

/// First phase of `target` carrying one of the managed names, in phase order.
pub(crate) fn find_managed(target: &Target) -> Option<(ManagedPhase, &BuildPhase)> {
    let phase = target.find_phase(&ManagedPhase::recognized_names())?;
    ManagedPhase::from_name(&phase.name).map(|variant| (variant, phase))
}

/// The requested scripts directory, else the stored one, normalized.
pub(crate) fn resolve_scripts_path(
    requested: Option<&str>,
    stored: Option<&str>,
    identity: &ProjectIdentity,
) -> Result<String, AppError> {
    match (requested, stored) {
        (Some(path), _) | (None, Some(path)) => normalize_scripts_path(path),
        (None, None) => Err(AppError::ScriptsPathMissing { key: identity.key() }),
    }
}
