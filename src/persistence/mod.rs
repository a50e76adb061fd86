//! Best-score persistence
//!
//! The record is a single big-endian `i64` (8 bytes). A missing file means
//! no best score has been recorded yet; that is not an error.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, anyhow, bail};

/// Width of the on-disk record
pub const RECORD_LEN: usize = 8;

/// Durable storage for the best score
pub trait ScoreStore: Send {
    /// Read the stored best, `None` if nothing was ever saved
    fn load(&self) -> anyhow::Result<Option<i64>>;
    /// Overwrite the stored best
    fn save(&mut self, best: i64) -> anyhow::Result<()>;
}

/// Stores the best score in a file
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&self) -> anyhow::Result<Option<i64>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("reading score file {}", self.path.display()));
            }
        };
        let Some(record) = bytes.first_chunk::<RECORD_LEN>() else {
            bail!(
                "score file {} is truncated ({} bytes)",
                self.path.display(),
                bytes.len()
            );
        };
        Ok(Some(i64::from_be_bytes(*record)))
    }

    fn save(&mut self, best: i64) -> anyhow::Result<()> {
        fs::write(&self.path, best.to_be_bytes())
            .with_context(|| format!("writing score file {}", self.path.display()))
    }
}

/// In-memory store; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    slot: Arc<Mutex<Option<i64>>>,
}

impl MemoryScoreStore {
    pub fn with_best(best: i64) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(best))),
        }
    }

    /// Last saved value
    pub fn stored(&self) -> Option<i64> {
        self.slot.lock().ok().and_then(|slot| *slot)
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> anyhow::Result<Option<i64>> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| anyhow!("score slot poisoned"))?;
        Ok(*slot)
    }

    fn save(&mut self, best: i64) -> anyhow::Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| anyhow!("score slot poisoned"))?;
        *slot = Some(best);
        Ok(())
    }
}
