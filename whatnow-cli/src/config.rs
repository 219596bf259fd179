use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_whatnow_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub suggest: SuggestSection,
    #[serde(default)]
    pub sync: SyncSection,
    #[serde(default)]
    pub log: LogSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestSection {
    /// Max suggestions printed by `whatnow suggest`.
    pub limit: usize,
    /// Offer built-in tasks when none of yours fit.
    pub fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSection {
    pub enabled: bool,
    /// Relative paths resolve under the whatnow home directory.
    pub outbox_file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSection {
    /// tracing EnvFilter directive; RUST_LOG wins when set.
    pub filter: String,
}

impl Default for SuggestSection {
    fn default() -> Self {
        Self {
            limit: 5,
            fallback: true,
        }
    }
}

impl Default for SyncSection {
    fn default() -> Self {
        Self {
            enabled: true,
            outbox_file: "outbox.jsonl".to_string(),
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

impl SyncSection {
    pub fn outbox_path(&self) -> Result<PathBuf> {
        let p = PathBuf::from(&self.outbox_file);
        if p.is_absolute() {
            Ok(p)
        } else {
            Ok(ensure_whatnow_home()?.join(p))
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_whatnow_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: Config = toml::from_str("[suggest]\nlimit = 3\nfallback = false\n").unwrap();
        assert_eq!(cfg.suggest.limit, 3);
        assert!(!cfg.suggest.fallback);
        assert!(cfg.sync.enabled);
        assert_eq!(cfg.log.filter, "warn");
    }

    #[test]
    fn default_round_trips_through_toml() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back, Config::default());
    }
}
