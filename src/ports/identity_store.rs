use crate::domain::{AppError, ProjectIdentity};

/// Persistent mapping from a [`ProjectIdentity`] to a value.
///
/// Backs both the scripts-path store (`V = String`) and the project
/// configuration store (`V = ProjectConfig`). Stores are a convenience
/// cache; the project file stays the source of truth for what is installed.
pub trait IdentityStore<V> {
    /// Stored value for `identity`.
    ///
    /// Unreadable or corrupt backing storage reads as absent.
    fn get(&self, identity: &ProjectIdentity) -> Option<V>;

    /// Insert or overwrite the value for `identity`, keeping other entries.
    fn save(&self, identity: &ProjectIdentity, value: &V) -> Result<(), AppError>;

    /// Remove the value for `identity`. Returns whether an entry existed.
    fn delete(&self, identity: &ProjectIdentity) -> Result<bool, AppError>;

    /// Every stored entry whose key parses back into an identity, in key order.
    fn list_all(&self) -> Result<Vec<(ProjectIdentity, V)>, AppError>;
}
