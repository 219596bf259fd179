//! Error types for whatnow-core.
//!
//! Storage and task validation can fail. Malformed cost attributes are
//! absorbed by scoring defaults and a missing task is a no-op, so neither
//! appears here.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("collection '{name}' holds unexpected data: {source}")]
    Collection {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid task: {0}")]
    InvalidTask(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
