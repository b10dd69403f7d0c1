pub mod error;
pub mod identity;
pub mod pbxproj;
pub mod phase;
pub mod project_config;
pub mod version;

pub use error::{AppError, ErrorKind};
pub use identity::{KEY_SEPARATOR, ProjectIdentity, make_key, normalize_path};
pub use pbxproj::{BuildPhase, PhaseKind, ProjectFile, ScriptPhase, Target};
pub use phase::{
    ManagedPhase, PlacementPolicy, RenderedPhase, extract_scripts_path, extract_version,
};
pub use project_config::{ProjectConfig, normalize_scripts_path};
pub use version::{Version, is_outdated};
