//! Report whether a target's managed phase matches the running tool version.

use std::path::PathBuf;

use tracing::debug;

use super::{find_managed, open_project, select_target};
use crate::domain::{AppError, ManagedPhase, extract_version, is_outdated};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRequest {
    pub project: PathBuf,
    pub project_name: Option<String>,
    pub target: Option<String>,
    /// Version the installed phase is compared against.
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    NotInstalled,
    UpToDate { version: String },
    /// `installed` is `None` when the body carries no version marker.
    NeedsUpdate { installed: Option<String>, latest: String },
    /// A legacy-named phase is still present.
    Legacy { name: String },
}

impl CheckOutcome {
    /// Process exit code: 0 up to date, 1 not installed, 2 update needed.
    pub fn exit_code(&self) -> i32 {
        match self {
            CheckOutcome::UpToDate { .. } => 0,
            CheckOutcome::NotInstalled => 1,
            CheckOutcome::NeedsUpdate { .. } | CheckOutcome::Legacy { .. } => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub target: String,
    pub outcome: CheckOutcome,
}

pub fn execute(request: &CheckRequest) -> Result<CheckReport, AppError> {
    let (_, project) = open_project(&request.project, request.project_name.as_deref())?;
    let target = select_target(&project, request.target.as_deref())?;
    let latest = request.version.trim();

    let legacy = target.find_phase(&ManagedPhase::legacy_names());
    let outcome = match (find_managed(&target), legacy) {
        (None, _) => CheckOutcome::NotInstalled,
        (Some(_), Some(legacy)) => CheckOutcome::Legacy { name: legacy.name.clone() },
        (Some((_, phase)), None) => {
            let installed = phase.script.as_deref().and_then(extract_version);
            if is_outdated(installed.as_deref(), latest) {
                CheckOutcome::NeedsUpdate { installed, latest: latest.to_string() }
            } else {
                CheckOutcome::UpToDate { version: installed.unwrap_or_default() }
            }
        }
    };
    debug!(target = %target.name, ?outcome, "checked managed phase");
    Ok(CheckReport { target: target.name, outcome })
}
