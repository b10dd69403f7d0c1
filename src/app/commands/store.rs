//! Administration of the scripts-path and project configuration stores.

use std::collections::BTreeMap;

use tracing::info;

use crate::app::AppContext;
use crate::domain::{AppError, ProjectConfig, ProjectIdentity};
use crate::ports::{IdentityStore, PhaseTemplates};

/// Everything remembered about one identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredProject {
    pub identity: ProjectIdentity,
    pub scripts_path: Option<String>,
    pub config: Option<ProjectConfig>,
}

impl StoredProject {
    fn empty(identity: ProjectIdentity) -> Self {
        Self { identity, scripts_path: None, config: None }
    }
}

/// Entries of both stores merged by identity, in key order.
pub fn list<P, C, T>(ctx: &AppContext<P, C, T>) -> Result<Vec<StoredProject>, AppError>
where
    P: IdentityStore<String>,
    C: IdentityStore<ProjectConfig>,
    T: PhaseTemplates,
{
    let mut merged: BTreeMap<ProjectIdentity, StoredProject> = BTreeMap::new();
    for (identity, path) in ctx.paths().list_all()? {
        entry(&mut merged, identity).scripts_path = Some(path);
    }
    for (identity, config) in ctx.configs().list_all()? {
        entry(&mut merged, identity).config = Some(config);
    }
    Ok(merged.into_values().collect())
}

fn entry(
    merged: &mut BTreeMap<ProjectIdentity, StoredProject>,
    identity: ProjectIdentity,
) -> &mut StoredProject {
    merged.entry(identity.clone()).or_insert_with(|| StoredProject::empty(identity))
}

/// What the stores hold for `identity`, or `None` when neither knows it.
pub fn show<P, C, T>(ctx: &AppContext<P, C, T>, identity: &ProjectIdentity) -> Option<StoredProject>
where
    P: IdentityStore<String>,
    C: IdentityStore<ProjectConfig>,
    T: PhaseTemplates,
{
    let entry = StoredProject {
        identity: identity.clone(),
        scripts_path: ctx.paths().get(identity),
        config: ctx.configs().get(identity),
    };
    (entry.scripts_path.is_some() || entry.config.is_some()).then_some(entry)
}

/// Delete `identity` from both stores. Returns whether either held it.
pub fn forget<P, C, T>(
    ctx: &AppContext<P, C, T>,
    identity: &ProjectIdentity,
) -> Result<bool, AppError>
where
    P: IdentityStore<String>,
    C: IdentityStore<ProjectConfig>,
    T: PhaseTemplates,
{
    let path_removed = ctx.paths().delete(identity)?;
    let config_removed = ctx.configs().delete(identity)?;
    info!(key = %identity, path_removed, config_removed, "forgot project");
    Ok(path_removed || config_removed)
}
