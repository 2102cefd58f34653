use crate::bus::{EventBus, StoreEvent};
use crate::errors::PersistenceError;
use crate::models::{Activity, MealLog};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::{env, fs, io, path::PathBuf};
use tracing::error;

pub const ACTIVITIES_KEY: &str = "fittrack.activities.v1";
pub const MEALS_KEY: &str = "fittrack.meals.v1";

pub fn resolve_data_path() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data")
}

/// Raw string slots the store serializes into.
pub trait KeyValueBackend: Send + Sync {
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
    fn remove(&self, key: &str) -> io::Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per slot inside a directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}

/// Typed persistence of the activity and meal documents. Every successful
/// write publishes the new value on the bus after the write has landed.
pub struct Store {
    backend: Box<dyn KeyValueBackend>,
    bus: Arc<EventBus>,
}

impl Store {
    pub fn new(backend: impl KeyValueBackend + 'static, bus: Arc<EventBus>) -> Self {
        Self {
            backend: Box::new(backend),
            bus,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new(), Arc::new(EventBus::new()))
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn save_activities(&self, activities: &[Activity]) -> Result<(), PersistenceError> {
        self.write_document(ACTIVITIES_KEY, &activities)?;
        self.bus.publish(&StoreEvent::ActivitiesChanged(activities.to_vec()));
        Ok(())
    }

    /// `None` when nothing was ever stored or the stored text is unreadable.
    pub fn load_activities(&self) -> Option<Vec<Activity>> {
        self.load_document(ACTIVITIES_KEY)
    }

    pub fn save_meals(&self, meals: &MealLog) -> Result<(), PersistenceError> {
        self.write_document(MEALS_KEY, meals)?;
        self.bus.publish(&StoreEvent::MealsChanged(meals.clone()));
        Ok(())
    }

    pub fn load_meals(&self) -> Option<MealLog> {
        self.load_document(MEALS_KEY)
    }

    /// Issues both removals even if the first fails; publishes `Reset` only
    /// when both succeeded.
    pub fn reset_all(&self) -> Result<(), PersistenceError> {
        let activities = self
            .backend
            .remove(ACTIVITIES_KEY)
            .map_err(|source| PersistenceError::Remove {
                key: ACTIVITIES_KEY,
                source,
            });
        let meals = self
            .backend
            .remove(MEALS_KEY)
            .map_err(|source| PersistenceError::Remove {
                key: MEALS_KEY,
                source,
            });
        activities?;
        meals?;

        self.bus.publish(&StoreEvent::Reset);
        Ok(())
    }

    fn write_document<T: Serialize + ?Sized>(
        &self,
        key: &'static str,
        value: &T,
    ) -> Result<(), PersistenceError> {
        let payload =
            serde_json::to_string(value).map_err(|source| PersistenceError::Serialize { key, source })?;
        self.backend
            .set(key, &payload)
            .map_err(|source| PersistenceError::Write { key, source })
    }

    fn load_document<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let text = match self.backend.get(key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(err) => {
                error!(key, "failed to read stored document: {err}");
                return None;
            }
        };

        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(err) => {
                error!(key, "failed to parse stored document: {err}");
                None
            }
        }
    }
}
