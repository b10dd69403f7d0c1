//! Composite project identity used to address every persisted per-project value.

use std::fmt;
use std::path::Path;

/// Separator between the identity components inside a store key.
pub const KEY_SEPARATOR: char = '|';

/// `(project_path, project_name?, target_name)`.
///
/// `project_path` is normalized at construction; an empty project name is
/// stored as `None` so that both spellings address the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectIdentity {
    project_path: String,
    project_name: Option<String>,
    target_name: String,
}

impl ProjectIdentity {
    pub fn new(
        project_path: impl AsRef<Path>,
        project_name: Option<&str>,
        target_name: impl Into<String>,
    ) -> Self {
        Self {
            project_path: normalize_path(project_path.as_ref()),
            project_name: project_name.filter(|name| !name.is_empty()).map(str::to_string),
            target_name: target_name.into(),
        }
    }

    /// Rebuild an identity from a serialized store key.
    ///
    /// The last two separators delimit project name and target, so project
    /// paths may themselves contain the separator.
    pub fn from_key(key: &str) -> Option<Self> {
        let mut parts = key.rsplitn(3, KEY_SEPARATOR);
        let target_name = parts.next()?;
        let project_name = parts.next()?;
        let project_path = parts.next()?;
        if project_path.is_empty() || target_name.is_empty() {
            return None;
        }
        Some(Self {
            project_path: project_path.to_string(),
            project_name: Some(project_name).filter(|name| !name.is_empty()).map(str::to_string),
            target_name: target_name.to_string(),
        })
    }

    pub fn project_path(&self) -> &str {
        &self.project_path
    }

    pub fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    /// Serialized store key for this identity.
    pub fn key(&self) -> String {
        make_key(&self.project_path, self.project_name.as_deref(), &self.target_name)
    }
}

impl fmt::Display for ProjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Join identity components into a store key.
///
/// Order-sensitive and pure; `None` and `Some("")` produce the same key.
pub fn make_key(project_path: &str, project_name: Option<&str>, target_name: &str) -> String {
    format!(
        "{project_path}{sep}{name}{sep}{target_name}",
        sep = KEY_SEPARATOR,
        name = project_name.unwrap_or("")
    )
}

/// Resolve symlinks and make the path absolute when it exists on disk;
/// otherwise only strip trailing separators.
pub fn normalize_path(path: &Path) -> String {
    match path.canonicalize() {
        Ok(resolved) => resolved.to_string_lossy().into_owned(),
        Err(_) => {
            let raw = path.to_string_lossy();
            let trimmed = raw.trim_end_matches('/');
            if trimmed.is_empty() { raw.into_owned() } else { trimmed.to_string() }
        }
    }
}
