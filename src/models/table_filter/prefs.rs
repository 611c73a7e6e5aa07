// src/models/table_filter/prefs.rs
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::AppResult;

/// Key/value storage for per-view preferences.
/// Last write wins; there is no coordination between concurrent writers.
pub trait PrefStore {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&mut self, key: &str) -> AppResult<()>;
}

/// Storage key for a table's saved filter selection.
/// key: "pref.{table}_filter"
pub fn pref_key(table: &str) -> String {
    format!("pref.{table}_filter")
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrefStore for MemoryStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> AppResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> AppResult<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// One `{key}.json` file per key inside `dir`. The directory is created on first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '.' || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{file}.json"))
    }
}

impl PrefStore for FileStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> AppResult<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> AppResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Read a saved preference. A missing or unreadable value yields the default.
pub fn load_pref<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: PrefStore + ?Sized,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            log::warn!("Could not read preference {key}: {e}");
            return T::default();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Discarding unreadable preference {key}: {e}");
            T::default()
        }
    }
}

pub fn save_pref<T, S>(store: &mut S, key: &str, value: &T) -> AppResult<()>
where
    T: Serialize,
    S: PrefStore + ?Sized,
{
    let json = serde_json::to_string(value)?;
    store.set(key, &json)?;
    log::debug!("Saved preference {key}");
    Ok(())
}

pub fn clear_pref<S: PrefStore + ?Sized>(store: &mut S, key: &str) -> AppResult<()> {
    store.remove(key)
}
