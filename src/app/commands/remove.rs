//! Detach every managed phase, current or legacy, from a target.

use std::path::PathBuf;

use tracing::{debug, info};

use super::{find_managed, open_project, select_target};
use crate::domain::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveRequest {
    pub project: PathBuf,
    pub project_name: Option<String>,
    pub target: Option<String>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed { count: usize },
    NotInstalled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveReport {
    pub target: String,
    pub outcome: RemoveOutcome,
    pub dry_run: bool,
}

/// Remove the managed phases of one target. Stored locations are kept.
pub fn execute(request: &RemoveRequest) -> Result<RemoveReport, AppError> {
    let (_, mut project) = open_project(&request.project, request.project_name.as_deref())?;
    let name = select_target(&project, request.target.as_deref())?.name;

    let mut count = 0;
    loop {
        let target = project.require_target(&name)?;
        let Some((variant, phase)) = find_managed(&target) else { break };
        debug!(target = %name, phase = %phase.id, ?variant, "removing managed phase");
        project.remove_phase(&target, phase)?;
        count += 1;
    }

    if count == 0 {
        return Ok(RemoveReport {
            target: name,
            outcome: RemoveOutcome::NotInstalled,
            dry_run: request.dry_run,
        });
    }
    if !request.dry_run {
        project.save()?;
    }
    info!(target = %name, count, dry_run = request.dry_run, "removed managed phases");
    let outcome = RemoveOutcome::Removed { count };
    Ok(RemoveReport { target: name, outcome, dry_run: request.dry_run })
}
