use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{AppError, ProjectIdentity};
use crate::ports::IdentityStore;

/// [`IdentityStore`] backed by a single pretty-printed JSON object on disk.
///
/// Every call reads the whole file; saves rewrite it through a sibling
/// temporary file. Entries this store cannot decode are carried through
/// untouched.
pub struct JsonFileStore<V> {
    path: PathBuf,
    _value: PhantomData<fn() -> V>,
}

impl<V> JsonFileStore<V> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), _value: PhantomData }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, Value>, AppError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(self.store_error(err)),
        };
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&text).map_err(|err| self.store_error(err))
    }

    /// Entries on disk, treating unreadable or corrupt files as empty.
    fn entries_or_empty(&self) -> BTreeMap<String, Value> {
        self.read_entries().unwrap_or_else(|err| {
            warn!(path = %self.path.display(), error = %err, "ignoring unreadable store");
            BTreeMap::new()
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, Value>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| self.store_error(err))?;
        }
        let mut text =
            serde_json::to_string_pretty(entries).map_err(|err| self.store_error(err))?;
        text.push('\n');

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text).map_err(|err| self.store_error(err))?;
        fs::rename(&tmp, &self.path).map_err(|err| self.store_error(err))
    }

    fn store_error(&self, err: impl std::fmt::Display) -> AppError {
        AppError::StoreIo { path: self.path.clone(), details: err.to_string() }
    }
}

impl<V> IdentityStore<V> for JsonFileStore<V>
where
    V: Serialize + DeserializeOwned,
{
    fn get(&self, identity: &ProjectIdentity) -> Option<V> {
        let key = identity.key();
        let value = self.entries_or_empty().remove(&key)?;
        serde_json::from_value(value)
            .inspect_err(|err| debug!(%key, error = %err, "stored value has unexpected shape"))
            .ok()
    }

    fn save(&self, identity: &ProjectIdentity, value: &V) -> Result<(), AppError> {
        let mut entries = self.entries_or_empty();
        let value = serde_json::to_value(value).map_err(|err| self.store_error(err))?;
        entries.insert(identity.key(), value);
        self.write_entries(&entries)
    }

    fn delete(&self, identity: &ProjectIdentity) -> Result<bool, AppError> {
        let mut entries = self.read_entries()?;
        if entries.remove(&identity.key()).is_none() {
            return Ok(false);
        }
        self.write_entries(&entries)?;
        Ok(true)
    }

    fn list_all(&self) -> Result<Vec<(ProjectIdentity, V)>, AppError> {
        let entries = self.entries_or_empty();
        Ok(entries
            .into_iter()
            .filter_map(|(key, value)| {
                let identity = ProjectIdentity::from_key(&key)?;
                let value = serde_json::from_value(value).ok()?;
                Some((identity, value))
            })
            .collect())
    }
}
