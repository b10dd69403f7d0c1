//! User-level settings: store locations and integration defaults.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::domain::{AppError, PlacementPolicy};

/// Overrides the settings directory (defaults to `$HOME/.lintphase`).
pub const HOME_ENV: &str = "LINTPHASE_HOME";

const HOME_DIR_NAME: &str = ".lintphase";
const PATHS_FILE: &str = "paths.json";
const PROJECTS_FILE: &str = "projects.json";
const CONFIG_FILE: &str = "config.toml";

/// Resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    home_dir: PathBuf,
    /// Placement used when a managed phase is first inserted.
    pub placement: PlacementPolicy,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    integration: IntegrationSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IntegrationSection {
    placement: PlacementPolicy,
}

impl Settings {
    /// Settings rooted at `home_dir` with built-in defaults, ignoring any config file.
    pub fn new(home_dir: impl Into<PathBuf>) -> Self {
        Self { home_dir: home_dir.into(), placement: PlacementPolicy::default() }
    }

    /// Load settings from the environment's settings directory.
    pub fn load() -> Result<Self, AppError> {
        Self::load_from(default_home_dir()?)
    }

    /// Load settings rooted at `home_dir`, reading `config.toml` when present.
    pub fn load_from(home_dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let mut settings = Self::new(home_dir);
        let config_path = settings.config_file();
        let file: SettingsFile = match fs::read_to_string(&config_path) {
            Ok(content) => toml::from_str(&content)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => SettingsFile::default(),
            Err(err) => return Err(err.into()),
        };
        settings.placement = file.integration.placement;
        debug!(home = %settings.home_dir.display(), placement = %settings.placement, "settings");
        Ok(settings)
    }

    /// Replace the placement when the caller supplied one.
    pub fn with_placement(mut self, placement: Option<PlacementPolicy>) -> Self {
        if let Some(placement) = placement {
            self.placement = placement;
        }
        self
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    /// Scripts-path store file.
    pub fn paths_file(&self) -> PathBuf {
        self.home_dir.join(PATHS_FILE)
    }

    /// Project configuration store file.
    pub fn projects_file(&self) -> PathBuf {
        self.home_dir.join(PROJECTS_FILE)
    }

    pub fn config_file(&self) -> PathBuf {
        self.home_dir.join(CONFIG_FILE)
    }
}

fn default_home_dir() -> Result<PathBuf, AppError> {
    if let Some(dir) = env::var_os(HOME_ENV).filter(|dir| !dir.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(|home| PathBuf::from(home).join(HOME_DIR_NAME))
        .ok_or_else(|| {
            AppError::config_error(format!("HOME is not set; set {HOME_ENV} to choose a directory"))
        })
}
