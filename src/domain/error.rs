use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of an [`AppError`], stable across variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Project file unreadable or structurally inconsistent.
    Parse,
    /// Requested target absent from the project.
    TargetNotFound,
    /// Serialization or filesystem write failure.
    Write,
    /// Path/config store read or write failure.
    Store,
    /// Invalid caller input or configuration.
    Input,
    /// A project container or file could not be located.
    NotFound,
    /// Unexpected internal failure.
    Internal,
}

/// Library-wide error type for lintphase operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Project file could not be parsed or its object graph is inconsistent.
    #[error("Failed to parse {}:{line}:{column}: {details}", path.display())]
    Parse { path: PathBuf, line: usize, column: usize, details: String },

    /// Target does not exist in the loaded project.
    #[error("Target '{name}' not found. Available: {}", available.join(", "))]
    TargetNotFound { name: String, available: Vec<String> },

    /// Serialization or write of the project file failed.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Path/config store could not be read or written.
    #[error("Store I/O failure at {}: {details}", path.display())]
    StoreIo { path: PathBuf, details: String },

    /// No Xcode project could be located from the given input.
    #[error("Xcode project not found: {0}")]
    ProjectNotFound(String),

    /// No scripts location stored for the identity and none supplied.
    #[error("No scripts path stored for '{key}'. Pass --scripts-path to record one.")]
    ScriptsPathMissing { key: String },

    /// Phase script template failed to render.
    #[error("Template error: {0}")]
    Template(String),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    pub(crate) fn parse_error(
        path: impl Into<PathBuf>,
        source: &str,
        offset: usize,
        details: impl Into<String>,
    ) -> Self {
        let (line, column) = line_column(source, offset);
        AppError::Parse { path: path.into(), line, column, details: details.into() }
    }

    /// Classify this error into one of the coarse integration kinds.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Parse { .. } => ErrorKind::Parse,
            AppError::TargetNotFound { .. } => ErrorKind::TargetNotFound,
            AppError::Write { .. } => ErrorKind::Write,
            AppError::StoreIo { .. } => ErrorKind::Store,
            AppError::ScriptsPathMissing { .. }
            | AppError::Configuration(_)
            | AppError::TomlParse(_) => ErrorKind::Input,
            AppError::ProjectNotFound(_) => ErrorKind::NotFound,
            AppError::Io(err) if err.kind() == io::ErrorKind::NotFound => ErrorKind::NotFound,
            AppError::Io(_) | AppError::Template(_) | AppError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// 1-based line and column of a byte offset.
fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let column = before.rfind('\n').map_or(before.len(), |idx| before.len() - idx - 1) + 1;
    (line, column)
}
