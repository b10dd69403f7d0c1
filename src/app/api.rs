//! API Facade for the application.
//!
//! This module exposes high-level functions that glue together context creation
//! and command execution. Functions without a suffix read settings from the
//! environment; the `_in` variants take an explicit settings directory.

use std::path::{Path, PathBuf};

use crate::adapters::{EmbeddedPhaseTemplates, JsonFileStore, locate};
use crate::app::{
    AppContext, Settings,
    commands::{check, integrate, manual, remove, store, targets},
};
use crate::domain::{ProjectConfig, ProjectIdentity};

pub use crate::app::commands::check::{CheckOutcome, CheckReport, CheckRequest};
pub use crate::app::commands::integrate::{
    IntegrateRequest, IntegrationOutcome, IntegrationReport,
};
pub use crate::app::commands::manual::{ManualRequest, ManualSteps};
pub use crate::app::commands::remove::{RemoveOutcome, RemoveReport, RemoveRequest};
pub use crate::app::commands::store::StoredProject;
pub use crate::app::commands::targets::TargetSummary;
pub use crate::domain::{AppError, ErrorKind, PlacementPolicy};

/// Version stamped into phases written by this build.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

type FileContext =
    AppContext<JsonFileStore<String>, JsonFileStore<ProjectConfig>, EmbeddedPhaseTemplates>;

/// Create an `AppContext` backed by the JSON stores under `settings`.
fn create_context(settings: Settings) -> FileContext {
    let paths = JsonFileStore::new(settings.paths_file());
    let configs = JsonFileStore::new(settings.projects_file());
    AppContext::new(paths, configs, EmbeddedPhaseTemplates::new(), settings)
}

// =============================================================================
// Integration
// =============================================================================

/// Install or refresh the managed phase.
pub fn integrate(request: &IntegrateRequest) -> Result<IntegrationReport, AppError> {
    integrate_with(Settings::load()?, request)
}

/// Install or refresh the managed phase, keeping stores under `home`.
pub fn integrate_in(
    home: impl Into<PathBuf>,
    request: &IntegrateRequest,
) -> Result<IntegrationReport, AppError> {
    integrate_with(Settings::load_from(home)?, request)
}

/// Install or refresh the managed phase with explicit settings.
pub fn integrate_with(
    settings: Settings,
    request: &IntegrateRequest,
) -> Result<IntegrationReport, AppError> {
    integrate::execute(&create_context(settings), request)
}

/// Describe the phase `integrate` would insert, for adding it by hand.
pub fn manual(request: &ManualRequest) -> Result<ManualSteps, AppError> {
    manual_with(Settings::load()?, request)
}

/// Describe the phase for adding it by hand, with explicit settings.
pub fn manual_with(settings: Settings, request: &ManualRequest) -> Result<ManualSteps, AppError> {
    manual::execute(&create_context(settings), request)
}

/// Compare the installed phase with `request.version`.
pub fn check(request: &CheckRequest) -> Result<CheckReport, AppError> {
    check::execute(request)
}

/// Detach every managed phase from the target.
pub fn remove(request: &RemoveRequest) -> Result<RemoveReport, AppError> {
    remove::execute(request)
}

// =============================================================================
// Project inspection
// =============================================================================

/// Targets of the project at `path`.
pub fn targets(path: &Path, project_name: Option<&str>) -> Result<Vec<TargetSummary>, AppError> {
    targets::execute(path, project_name)
}

/// Names of the projects reachable from `path`.
pub fn projects(path: &Path) -> Result<Vec<String>, AppError> {
    crate::adapters::list_projects(path)
}

// =============================================================================
// Store administration
// =============================================================================

/// Identity the stores use for `target` of the project at `path`.
///
/// Paths that no longer resolve to a project are keyed as given, so entries
/// of deleted projects can still be forgotten.
pub fn identity_for(path: &Path, project_name: Option<&str>, target: &str) -> ProjectIdentity {
    match locate(path, project_name) {
        Ok(located) => located.identity(target),
        Err(_) => ProjectIdentity::new(path, project_name, target),
    }
}

pub fn store_list() -> Result<Vec<StoredProject>, AppError> {
    store::list(&create_context(Settings::load()?))
}

pub fn store_list_in(home: impl Into<PathBuf>) -> Result<Vec<StoredProject>, AppError> {
    store::list(&create_context(Settings::load_from(home)?))
}

pub fn store_show(identity: &ProjectIdentity) -> Result<Option<StoredProject>, AppError> {
    Ok(store::show(&create_context(Settings::load()?), identity))
}

pub fn store_show_in(
    home: impl Into<PathBuf>,
    identity: &ProjectIdentity,
) -> Result<Option<StoredProject>, AppError> {
    Ok(store::show(&create_context(Settings::load_from(home)?), identity))
}

/// Delete `identity` from both stores.
pub fn store_forget(identity: &ProjectIdentity) -> Result<bool, AppError> {
    store::forget(&create_context(Settings::load()?), identity)
}

pub fn store_forget_in(
    home: impl Into<PathBuf>,
    identity: &ProjectIdentity,
) -> Result<bool, AppError> {
    store::forget(&create_context(Settings::load_from(home)?), identity)
}
