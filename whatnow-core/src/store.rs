//! Collection storage.
//!
//! The core only needs get/put of whole named collections, each atomic on
//! its own. Values are JSON so records keep the shape the app has always
//! stored.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};

pub const TASKS: &str = "tasks";
pub const TYPES: &str = "types";
pub const TEMPLATES: &str = "templates";
pub const STATS: &str = "stats";
pub const COMPLETED: &str = "completed";
/// The accepted, not yet resolved suggestion.
pub const CURRENT: &str = "current";

pub trait CollectionStore {
    fn get_collection(&self, name: &str) -> Result<Option<Value>>;
    fn put_collection(&mut self, name: &str, value: Value) -> Result<()>;
}

/// Load a list collection; missing → empty.
pub fn load_list<T: DeserializeOwned, S: CollectionStore + ?Sized>(store: &S, name: &str) -> Result<Vec<T>> {
    Ok(load_record::<Vec<T>, S>(store, name)?.unwrap_or_default())
}

/// Load a single-record collection; missing or `null` → `None`.
pub fn load_record<T: DeserializeOwned, S: CollectionStore + ?Sized>(store: &S, name: &str) -> Result<Option<T>> {
    match store.get_collection(name)? {
        None | Some(Value::Null) => Ok(None),
        Some(v) => serde_json::from_value(v)
            .map(Some)
            .map_err(|source| CoreError::Collection {
                name: name.to_string(),
                source,
            }),
    }
}

pub fn save<T: Serialize + ?Sized, S: CollectionStore + ?Sized>(store: &mut S, name: &str, value: &T) -> Result<()> {
    let v = serde_json::to_value(value)?;
    store.put_collection(name, v)
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    collections: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

impl CollectionStore for MemoryStore {
    fn get_collection(&self, name: &str) -> Result<Option<Value>> {
        Ok(self.collections.get(name).cloned())
    }

    fn put_collection(&mut self, name: &str, value: Value) -> Result<()> {
        self.collections.insert(name.to_string(), value);
        Ok(())
    }
}

/// One `<name>.json` file per collection under a directory.
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// reader never sees a half-written collection.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| CoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

impl CollectionStore for JsonDirStore {
    fn get_collection(&self, name: &str) -> Result<Option<Value>> {
        let p = self.path(name);
        if !p.exists() {
            return Ok(None);
        }
        let s = fs::read_to_string(&p).map_err(|source| CoreError::Io { path: p.clone(), source })?;
        if s.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&s)?))
    }

    fn put_collection(&mut self, name: &str, value: Value) -> Result<()> {
        let p = self.path(name);
        let tmp = self.dir.join(format!(".{name}.json.tmp"));
        let json = serde_json::to_string_pretty(&value)?;
        fs::write(&tmp, json).map_err(|source| CoreError::Io { path: tmp.clone(), source })?;
        fs::rename(&tmp, &p).map_err(|source| CoreError::Io { path: p, source })?;
        Ok(())
    }
}
