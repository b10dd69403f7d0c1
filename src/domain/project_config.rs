use serde::{Deserialize, Serialize};

use crate::domain::AppError;

/// Per-identity configuration record kept in the config store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// SRCROOT of the project (the directory holding the `.xcodeproj`).
    pub project_root: String,
    /// Path the caller passed in (`.xcworkspace`, `.xcodeproj` or a directory).
    pub xcode_path: String,
    /// Whether `xcode_path` is a workspace.
    pub is_workspace: bool,
    /// Resolved `.xcodeproj` path.
    pub xcodeproj_path: String,
    /// Project selected in the workspace, or the `.xcodeproj` stem.
    pub project_name: String,
    pub target_name: String,
    /// Tooling scripts directory relative to `project_root`.
    pub scripts_dir_relative: String,
    /// RFC 3339 creation timestamp; preserved across updates.
    #[serde(default)]
    pub created_at: String,
}

impl ProjectConfig {
    /// `${SRCROOT}`-anchored form of the scripts directory, as used in phase scripts.
    pub fn scripts_srcroot_path(&self) -> String {
        format!("${{SRCROOT}}/{}", self.scripts_dir_relative)
    }

    /// Equality ignoring the creation timestamp.
    pub fn same_location(&self, other: &ProjectConfig) -> bool {
        let mut left = self.clone();
        left.created_at.clone_from(&other.created_at);
        left == *other
    }
}

/// Canonical form of a scripts directory given relative to SRCROOT.
///
/// Strips surrounding whitespace, leading `./` and trailing `/`. The result is
/// embedded in a quoted shell line, so absolute paths, quotes and control
/// characters are rejected.
pub fn normalize_scripts_path(raw: &str) -> Result<String, AppError> {
    let mut path = raw.trim();
    while let Some(rest) = path.strip_prefix("./") {
        path = rest;
    }
    let path = path.trim_end_matches('/');
    if path.is_empty() || path == "." {
        return Err(AppError::config_error(format!(
            "Scripts path '{raw}' must name a directory below the project root"
        )));
    }
    if path.starts_with('/') {
        return Err(AppError::config_error(format!(
            "Scripts path '{raw}' must be relative to the project root"
        )));
    }
    if path.chars().any(|c| c == '"' || c.is_control()) {
        return Err(AppError::config_error(format!(
            "Scripts path '{}' contains characters that cannot appear in a phase script",
            raw.escape_debug()
        )));
    }
    Ok(path.to_string())
}
