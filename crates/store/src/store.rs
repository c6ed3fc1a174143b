use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// The persisted collections, one JSON array file each.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    Reservations,
    Requests,
    Vehicles,
    FleetOverrides,
    Visitors,
    Leads,
    Visits,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Self::Reservations,
        Self::Requests,
        Self::Vehicles,
        Self::FleetOverrides,
        Self::Visitors,
        Self::Leads,
        Self::Visits,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Reservations => "reservations.json",
            Self::Requests => "requests.json",
            Self::Vehicles => "vehicles.json",
            Self::FleetOverrides => "fleet_overrides.json",
            Self::Visitors => "visitors.json",
            Self::Leads => "leads.json",
            Self::Visits => "visits.json",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not create data directory `{path}`: {source}")]
    CreateDir { path: PathBuf, source: std::io::Error },
    #[error("could not write `{path}`: {source}")]
    WriteFile { path: PathBuf, source: std::io::Error },
    #[error("could not encode collection `{collection}`: {source}")]
    Encode { collection: &'static str, source: serde_json::Error },
}

/// Whole-file JSON array persistence.
///
/// Reads are tolerant: a missing file, a file that is not a JSON array, or an
/// array whose elements no longer decode all read as an empty collection, so
/// queries degrade to "nothing stored" instead of failing. Writes always
/// replace the whole file; the per-store mutex serializes read-modify-write
/// cycles within this process, and anything beyond that is last-write-wins.
pub struct JsonStore {
    data_dir: PathBuf,
    guard: Mutex<()>,
}

impl JsonStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into(), guard: Mutex::new(()) }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn ensure_data_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|source| StoreError::CreateDir { path: self.data_dir.clone(), source })
    }

    pub fn read<T>(&self, collection: Collection) -> Vec<T>
    where
        T: DeserializeOwned,
    {
        let _guard = self.lock();
        self.read_unlocked(collection)
    }

    pub fn write<T>(&self, collection: Collection, items: &[T]) -> Result<(), StoreError>
    where
        T: Serialize,
    {
        let _guard = self.lock();
        self.write_unlocked(collection, items)
    }

    /// One read-modify-write cycle under the store lock. The closure's return
    /// value is handed back so callers can report what changed.
    pub fn update<T, R>(
        &self,
        collection: Collection,
        mutate: impl FnOnce(&mut Vec<T>) -> R,
    ) -> Result<R, StoreError>
    where
        T: Serialize + DeserializeOwned,
    {
        let _guard = self.lock();
        let mut items = self.read_unlocked(collection);
        let outcome = mutate(&mut items);
        self.write_unlocked(collection, &items)?;
        Ok(outcome)
    }

    /// Whether the collection file currently decodes as written. Used by the
    /// doctor command; normal reads never report this, they just degrade.
    pub fn collection_health(&self, collection: Collection) -> CollectionHealth {
        let path = self.path(collection);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(_) => return CollectionHealth::Missing,
        };

        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(serde_json::Value::Array(items)) => CollectionHealth::Ok { entries: items.len() },
            Ok(_) => CollectionHealth::Malformed,
            Err(_) => CollectionHealth::Malformed,
        }
    }

    fn read_unlocked<T>(&self, collection: Collection) -> Vec<T>
    where
        T: DeserializeOwned,
    {
        let path = self.path(collection);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(_) => return Vec::new(),
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => items,
            Err(error) => {
                tracing::debug!(
                    event_name = "store.tolerant_read_recovery",
                    collection = collection.file_name(),
                    error = %error,
                    "collection did not decode, reading as empty"
                );
                Vec::new()
            }
        }
    }

    fn write_unlocked<T>(&self, collection: Collection, items: &[T]) -> Result<(), StoreError>
    where
        T: Serialize,
    {
        self.ensure_data_dir()?;
        let encoded = serde_json::to_string_pretty(items)
            .map_err(|source| StoreError::Encode { collection: collection.file_name(), source })?;

        let path = self.path(collection);
        fs::write(&path, encoded).map_err(|source| StoreError::WriteFile { path, source })
    }

    fn path(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        match self.guard.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectionHealth {
    Ok { entries: usize },
    Missing,
    Malformed,
}
