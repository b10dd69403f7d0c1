use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{AppError, ProjectIdentity};
use crate::ports::IdentityStore;

/// In-memory [`IdentityStore`] for tests and dry runs.
///
/// Clones share state. A store built with [`MemoryStore::failing`] rejects
/// every write, which exercises the integrator's store-degradation path.
#[derive(Debug, Clone)]
pub struct MemoryStore<V> {
    entries: Arc<Mutex<BTreeMap<String, V>>>,
    fail_writes: bool,
}

impl<V> Default for MemoryStore<V> {
    fn default() -> Self {
        Self { entries: Arc::new(Mutex::new(BTreeMap::new())), fail_writes: false }
    }
}

impl<V> MemoryStore<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { fail_writes: true, ..Self::default() }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, V>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_writable(&self) -> Result<(), AppError> {
        if self.fail_writes {
            return Err(AppError::StoreIo {
                path: PathBuf::from("<memory>"),
                details: "store is read-only".to_string(),
            });
        }
        Ok(())
    }
}

impl<V: Clone> IdentityStore<V> for MemoryStore<V> {
    fn get(&self, identity: &ProjectIdentity) -> Option<V> {
        self.lock().get(&identity.key()).cloned()
    }

    fn save(&self, identity: &ProjectIdentity, value: &V) -> Result<(), AppError> {
        self.check_writable()?;
        self.lock().insert(identity.key(), value.clone());
        Ok(())
    }

    fn delete(&self, identity: &ProjectIdentity) -> Result<bool, AppError> {
        self.check_writable()?;
        Ok(self.lock().remove(&identity.key()).is_some())
    }

    fn list_all(&self) -> Result<Vec<(ProjectIdentity, V)>, AppError> {
        Ok(self
            .lock()
            .iter()
            .filter_map(|(key, value)| Some((ProjectIdentity::from_key(key)?, value.clone())))
            .collect())
    }
}
