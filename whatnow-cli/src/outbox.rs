//! Local outbox for the remote mirror.
//!
//! Effects are appended as JSON lines by a background task so the command
//! that produced them never waits on disk or network. A separate uploader
//! drains the file; write failures are logged and otherwise ignored.

use anyhow::Result;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use whatnow_core::sync::SinkError;
use whatnow_core::{SyncEffect, SyncSink};

pub struct OutboxSink {
    tx: mpsc::UnboundedSender<SyncEffect>,
    writer: JoinHandle<()>,
}

impl OutboxSink {
    /// Must be called inside a tokio runtime.
    pub fn spawn(path: PathBuf) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let writer = tokio::spawn(write_loop(path, rx));
        Self { tx, writer }
    }

    /// Let the writer drain what was queued, then stop it.
    pub async fn close(self) {
        drop(self.tx);
        if let Err(e) = self.writer.await {
            warn!(error = %e, "outbox writer stopped abnormally");
        }
    }
}

impl SyncSink for OutboxSink {
    fn enqueue_sync(&mut self, effect: SyncEffect) -> std::result::Result<(), SinkError> {
        self.tx.send(effect).map_err(|e| format!("outbox closed: {}", e.0.op()).into())
    }
}

async fn write_loop(path: PathBuf, mut rx: mpsc::UnboundedReceiver<SyncEffect>) {
    if let Some(parent) = path.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            warn!(path = %parent.display(), error = %e, "cannot create outbox dir");
        }
    }

    while let Some(effect) = rx.recv().await {
        let op = effect.op();
        if let Err(e) = append_line(&path, &effect).await {
            warn!(op, path = %path.display(), error = %e, "outbox write failed");
        } else {
            debug!(op, "outbox append");
        }
    }
}

async fn append_line(path: &Path, effect: &SyncEffect) -> Result<()> {
    let mut line = serde_json::to_string(effect)?;
    line.push('\n');
    let mut f = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    f.write_all(line.as_bytes()).await?;
    f.flush().await?;
    Ok(())
}

/// Read queued effects, skipping lines that no longer parse.
pub fn read_outbox(path: &Path) -> Result<Vec<SyncEffect>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let f = fs::File::open(path)?;
    let mut rows = Vec::new();
    for line in BufReader::new(f).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if let Ok(v) = serde_json::from_str::<SyncEffect>(&line) {
            rows.push(v);
        }
    }
    Ok(rows)
}
