//! Install or refresh the managed lint phase of one target.
//!
//! One invocation walks: locate project, load, pick target, resolve the
//! scripts location, render, then Insert, Compare/Update or Migrate, and
//! finally save and remember the location. Only the project file decides
//! whether a phase exists; the stores are a memo of where the scripts live.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info, warn};

use super::{find_managed, open_project, resolve_scripts_path, select_target};
use crate::adapters::LocatedProject;
use crate::app::AppContext;
use crate::domain::{
    AppError, BuildPhase, ManagedPhase, PlacementPolicy, ProjectConfig, ProjectFile,
    ProjectIdentity, RenderedPhase, ScriptPhase, Target, extract_scripts_path, extract_version,
};
use crate::ports::{IdentityStore, PhaseTemplates};

/// Caller input for one integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrateRequest {
    /// `.xcodeproj`, `.xcworkspace`, or a directory holding one.
    pub project: PathBuf,
    /// Project to pick inside a workspace.
    pub project_name: Option<String>,
    /// Target to integrate; the default target when absent.
    pub target: Option<String>,
    pub version: String,
    /// Scripts directory relative to SRCROOT; the stored one when absent.
    pub scripts_path: Option<String>,
    /// Overrides the configured placement for a newly inserted phase.
    pub placement: Option<PlacementPolicy>,
    /// Rewrite the body even when the installed version matches.
    pub force: bool,
    /// Decide the outcome without writing the project file or the stores.
    pub dry_run: bool,
}

impl IntegrateRequest {
    pub fn new(project: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            project_name: None,
            target: None,
            version: version.into(),
            scripts_path: None,
            placement: None,
            force: false,
            dry_run: false,
        }
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn project_name(mut self, project_name: impl Into<String>) -> Self {
        self.project_name = Some(project_name.into());
        self
    }

    pub fn scripts_path(mut self, scripts_path: impl Into<String>) -> Self {
        self.scripts_path = Some(scripts_path.into());
        self
    }

    pub fn placement(mut self, placement: PlacementPolicy) -> Self {
        self.placement = Some(placement);
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Terminal state of a successful integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationOutcome {
    NoChangeNeeded,
    Inserted,
    Updated,
    Migrated,
}

impl IntegrationOutcome {
    pub fn is_change(self) -> bool {
        self != IntegrationOutcome::NoChangeNeeded
    }
}

/// What an integration decided and did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationReport {
    pub outcome: IntegrationOutcome,
    pub identity: ProjectIdentity,
    /// The `project.pbxproj` that was inspected.
    pub project_file: PathBuf,
    pub target: String,
    pub phase_name: String,
    /// Version stamped in the managed phase before this run.
    pub previous_version: Option<String>,
    pub version: String,
    pub scripts_path: String,
    /// Index of the managed phase in the target's phase list.
    pub position: usize,
    /// Whether the phase sits where the placement policy would put it.
    pub placement_respected: bool,
    /// Whether the project file was rewritten.
    pub written: bool,
    pub dry_run: bool,
    /// Store failures that did not stop the integration.
    pub warnings: Vec<String>,
}

/// Outcome of the in-memory edit, before anything is written.
struct Edit {
    outcome: IntegrationOutcome,
    previous_version: Option<String>,
}

/// Run one integration against the project named by `request`.
pub fn execute<P, C, T>(
    ctx: &AppContext<P, C, T>,
    request: &IntegrateRequest,
) -> Result<IntegrationReport, AppError>
where
    P: IdentityStore<String>,
    C: IdentityStore<ProjectConfig>,
    T: PhaseTemplates,
{
    let (located, mut project) = open_project(&request.project, request.project_name.as_deref())?;
    let target = select_target(&project, request.target.as_deref())?;
    let identity = located.identity(&target.name);

    let stored_path = ctx.paths().get(&identity);
    let scripts_path =
        resolve_scripts_path(request.scripts_path.as_deref(), stored_path.as_deref(), &identity)?;
    let version = request.version.trim();
    let rendered = ctx.templates().render_current(version, &scripts_path)?;
    let placement = request.placement.unwrap_or(ctx.settings().placement);
    let desired =
        Desired { rendered: &rendered, version, scripts_path: &scripts_path, force: request.force };
    debug!(
        key = %identity,
        scripts = %scripts_path,
        %placement,
        force = request.force,
        "integrating"
    );

    let current = target.find_phase(&[rendered.name.as_str()]);
    let edit = match (current, find_managed(&target)) {
        (_, None) => insert(&mut project, &target, &rendered, placement)?,
        (Some(current), Some(_)) => reconcile(&mut project, &target, current, &desired)?,
        (None, Some((_, legacy))) => migrate(&mut project, &target, legacy, &desired)?,
    };

    let target = project.require_target(&target.name)?;
    let phase = target.find_phase(&[rendered.name.as_str()]).ok_or_else(|| {
        AppError::Internal(format!("managed phase missing from '{}' after edit", target.name))
    })?;
    let position = phase.position;
    let placement_respected = placement.is_satisfied(&target.phases, position);
    if !placement_respected {
        debug!(target = %target.name, position, %placement, "phase was moved by hand; keeping it");
    }

    let written = if request.dry_run { false } else { project.save()? };
    let mut warnings = Vec::new();
    if !request.dry_run {
        let location =
            Location { located: &located, target: &target.name, scripts_path: &scripts_path };
        persist_location(ctx, &identity, &location, stored_path.as_deref(), &mut warnings);
    }

    info!(
        target = %target.name,
        outcome = ?edit.outcome,
        version,
        written,
        dry_run = request.dry_run,
        "integration finished"
    );
    Ok(IntegrationReport {
        outcome: edit.outcome,
        identity,
        project_file: project.path().to_path_buf(),
        target: target.name.clone(),
        phase_name: rendered.name,
        previous_version: edit.previous_version,
        version: version.to_string(),
        scripts_path,
        position,
        placement_respected,
        written,
        dry_run: request.dry_run,
        warnings,
    })
}

fn insert(
    project: &mut ProjectFile,
    target: &Target,
    rendered: &RenderedPhase,
    placement: PlacementPolicy,
) -> Result<Edit, AppError> {
    let phase = ScriptPhase::new(&rendered.name, &rendered.body);
    let inserted = project.insert_phase(target, phase, placement)?;
    debug!(target = %target.name, position = inserted.position, "inserted managed phase");
    Ok(Edit { outcome: IntegrationOutcome::Inserted, previous_version: None })
}

/// What the managed phase should look like after this run.
struct Desired<'a> {
    rendered: &'a RenderedPhase,
    version: &'a str,
    scripts_path: &'a str,
    force: bool,
}

/// Rewrite the body when its version or scripts directory differs from the
/// desired one, or when `force` is set and the body differs at all.
fn compare(
    project: &mut ProjectFile,
    phase: &BuildPhase,
    desired: &Desired<'_>,
) -> Result<Edit, AppError> {
    let body = phase.script.as_deref().unwrap_or_default();
    let installed = extract_version(body);
    let stale = installed.as_deref() != Some(desired.version);
    let relocated = extract_scripts_path(body).is_some_and(|path| path != desired.scripts_path);
    if body == desired.rendered.body || !(stale || relocated || desired.force) {
        debug!(phase = %phase.id, installed = ?installed, "managed phase is current");
        let outcome = IntegrationOutcome::NoChangeNeeded;
        return Ok(Edit { outcome, previous_version: installed });
    }
    project.replace_phase_body(phase, &desired.rendered.body)?;
    debug!(
        phase = %phase.id,
        from = ?installed,
        to = desired.version,
        relocated,
        "updated managed phase body"
    );
    Ok(Edit { outcome: IntegrationOutcome::Updated, previous_version: installed })
}

/// Compare the current phase, then drop any legacy phases sitting beside it.
fn reconcile(
    project: &mut ProjectFile,
    target: &Target,
    current: &BuildPhase,
    desired: &Desired<'_>,
) -> Result<Edit, AppError> {
    let edit = compare(project, current, desired)?;
    let dropped = drop_legacy(project, &target.name)?;
    if dropped == 0 {
        return Ok(edit);
    }
    debug!(target = %target.name, current = %current.id, dropped, "dropped legacy phases");
    Ok(Edit { outcome: IntegrationOutcome::Migrated, previous_version: edit.previous_version })
}

/// Replace a legacy phase by the current one at the same position, carrying
/// its input/output declarations forward.
fn migrate(
    project: &mut ProjectFile,
    target: &Target,
    legacy: &BuildPhase,
    desired: &Desired<'_>,
) -> Result<Edit, AppError> {
    let previous_version = legacy.script.as_deref().and_then(extract_version);
    let rendered = desired.rendered;
    let phase = ScriptPhase::new(&rendered.name, &rendered.body).with_io_from(legacy);
    project.insert_phase_at(target, phase, legacy.position)?;
    let dropped = drop_legacy(project, &target.name)?;
    let position = legacy.position;
    debug!(target = %target.name, legacy = %legacy.id, position, dropped, "migrated");
    Ok(Edit { outcome: IntegrationOutcome::Migrated, previous_version })
}

/// Remove every legacy-named phase from a target; returns how many went.
fn drop_legacy(project: &mut ProjectFile, target_name: &str) -> Result<usize, AppError> {
    let legacy_names = ManagedPhase::legacy_names();
    let mut dropped = 0;
    loop {
        let target = project.require_target(target_name)?;
        let Some(legacy) = target.find_phase(&legacy_names) else { return Ok(dropped) };
        project.remove_phase(&target, legacy)?;
        dropped += 1;
    }
}

struct Location<'a> {
    located: &'a LocatedProject,
    target: &'a str,
    scripts_path: &'a str,
}

impl Location<'_> {
    fn config(&self) -> ProjectConfig {
        let display = |path: &Path| path.to_string_lossy().into_owned();
        ProjectConfig {
            project_root: display(&self.located.project_root()),
            xcode_path: display(&self.located.input_path),
            is_workspace: self.located.is_workspace(),
            xcodeproj_path: display(&self.located.xcodeproj_path),
            project_name: self.located.project_name(),
            target_name: self.target.to_string(),
            scripts_dir_relative: self.scripts_path.to_string(),
            created_at: String::new(),
        }
    }
}

/// Record the scripts location in both stores when it changed.
///
/// Store failures are downgraded to warnings.
fn persist_location<P, C, T>(
    ctx: &AppContext<P, C, T>,
    identity: &ProjectIdentity,
    location: &Location<'_>,
    stored_path: Option<&str>,
    warnings: &mut Vec<String>,
) where
    P: IdentityStore<String>,
    C: IdentityStore<ProjectConfig>,
    T: PhaseTemplates,
{
    if stored_path != Some(location.scripts_path) {
        if let Err(err) = ctx.paths().save(identity, &location.scripts_path.to_string()) {
            warn!(key = %identity, error = %err, "could not record scripts path");
            warnings.push(format!("Could not record scripts path: {err}"));
        }
    }

    let existing = ctx.configs().get(identity);
    let mut record = location.config();
    if existing.as_ref().is_some_and(|existing| existing.same_location(&record)) {
        return;
    }
    record.created_at = existing
        .map(|existing| existing.created_at)
        .filter(|created_at| !created_at.is_empty())
        .unwrap_or_else(|| Utc::now().to_rfc3339());
    if let Err(err) = ctx.configs().save(identity, &record) {
        warn!(key = %identity, error = %err, "could not record project configuration");
        warnings.push(format!("Could not record project configuration: {err}"));
    }
}
