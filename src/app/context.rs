use crate::app::config::Settings;
use crate::domain::ProjectConfig;
use crate::ports::{IdentityStore, PhaseTemplates};

/// Application context holding dependencies for command execution.
pub struct AppContext<P, C, T>
where
    P: IdentityStore<String>,
    C: IdentityStore<ProjectConfig>,
    T: PhaseTemplates,
{
    paths: P,
    configs: C,
    templates: T,
    settings: Settings,
}

impl<P, C, T> AppContext<P, C, T>
where
    P: IdentityStore<String>,
    C: IdentityStore<ProjectConfig>,
    T: PhaseTemplates,
{
    /// Create a new application context.
    pub fn new(paths: P, configs: C, templates: T, settings: Settings) -> Self {
        Self { paths, configs, templates, settings }
    }

    /// Get a reference to the scripts-path store.
    pub fn paths(&self) -> &P {
        &self.paths
    }

    /// Get a reference to the project configuration store.
    pub fn configs(&self) -> &C {
        &self.configs
    }

    /// Get a reference to the phase template engine.
    pub fn templates(&self) -> &T {
        &self.templates
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
