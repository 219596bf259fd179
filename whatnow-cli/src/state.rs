use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use whatnow_core::JsonDirStore;

/// `$WHATNOW_HOME`, or `~/.whatnow`.
pub fn whatnow_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("WHATNOW_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".whatnow"))
}

pub fn ensure_whatnow_home() -> Result<PathBuf> {
    let dir = whatnow_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn data_dir() -> Result<PathBuf> {
    Ok(ensure_whatnow_home()?.join("data"))
}

pub fn open_store() -> Result<JsonDirStore> {
    let dir = data_dir()?;
    JsonDirStore::open(&dir).with_context(|| format!("open store at {}", dir.display()))
}
