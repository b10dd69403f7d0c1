//! Describe the managed phase for adding it by hand; never writes anything.

use std::path::PathBuf;

use tracing::debug;

use super::{open_project, resolve_scripts_path, select_target};
use crate::app::AppContext;
use crate::domain::{AppError, PlacementPolicy, ProjectConfig};
use crate::ports::{IdentityStore, PhaseTemplates};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualRequest {
    pub project: PathBuf,
    pub project_name: Option<String>,
    pub target: Option<String>,
    pub version: String,
    /// Scripts directory relative to SRCROOT; the stored one when absent.
    pub scripts_path: Option<String>,
    pub placement: Option<PlacementPolicy>,
}

/// The phase as `integrate` would insert it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualSteps {
    pub target: String,
    /// Directory `${SRCROOT}` expands to.
    pub project_root: PathBuf,
    pub scripts_path: String,
    pub phase_name: String,
    pub body: String,
    pub placement: PlacementPolicy,
    /// Index the phase would take in the target's phase list.
    pub position: usize,
    /// Phase it goes right after; `None` at the start of the list.
    pub after: Option<String>,
}

pub fn execute<P, C, T>(
    ctx: &AppContext<P, C, T>,
    request: &ManualRequest,
) -> Result<ManualSteps, AppError>
where
    P: IdentityStore<String>,
    C: IdentityStore<ProjectConfig>,
    T: PhaseTemplates,
{
    let (located, project) = open_project(&request.project, request.project_name.as_deref())?;
    let target = select_target(&project, request.target.as_deref())?;
    let identity = located.identity(&target.name);

    let stored_path = ctx.paths().get(&identity);
    let scripts_path =
        resolve_scripts_path(request.scripts_path.as_deref(), stored_path.as_deref(), &identity)?;
    let rendered = ctx.templates().render_current(request.version.trim(), &scripts_path)?;
    let placement = request.placement.unwrap_or(ctx.settings().placement);
    let position = placement.resolve(&target.phases);
    let after = position
        .checked_sub(1)
        .and_then(|idx| target.phases.get(idx))
        .map(|phase| phase.name.clone());
    debug!(key = %identity, position, %placement, "described managed phase");

    Ok(ManualSteps {
        target: target.name,
        project_root: located.project_root(),
        scripts_path,
        phase_name: rendered.name,
        body: rendered.body,
        placement,
        position,
        after,
    })
}
