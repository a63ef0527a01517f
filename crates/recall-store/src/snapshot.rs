//! JSON snapshot persistence for [`InMemoryStore`].

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

use recall_core::error::{Error, Result};

use crate::memory::{InMemoryStore, StoreState};

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    dimension: usize,
    next_id: u64,
    #[serde(flatten)]
    state: StoreState,
}

impl InMemoryStore {
    /// Write the committed state to `path`, replacing it atomically.
    pub fn save_snapshot(&self, path: &Path) -> Result<()> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            dimension: self.dimension,
            next_id: self.next_id.load(Ordering::SeqCst),
            state: self.state.read().clone(),
        };
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer(&mut writer, &snapshot)?;
            writer.flush()?;
        }
        tmp.persist(path).map_err(|e| Error::Io(e.error))?;
        info!(path = %path.display(), documents = snapshot.state.documents.len(), chunks = snapshot.state.chunks.len(), "saved snapshot");
        Ok(())
    }

    pub fn load_snapshot(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(Error::Serialization(format!(
                "unsupported snapshot version {} in {}",
                snapshot.version,
                path.display()
            )));
        }
        let max_id = snapshot.state.documents.iter().map(|d| d.id.0).max().unwrap_or(0);
        info!(path = %path.display(), documents = snapshot.state.documents.len(), chunks = snapshot.state.chunks.len(), "loaded snapshot");
        Ok(Self {
            dimension: snapshot.dimension,
            state: RwLock::new(snapshot.state),
            next_id: AtomicU64::new(snapshot.next_id.max(max_id + 1)),
        })
    }

    /// Load `path` if it exists, otherwise start empty. An existing snapshot
    /// built with a different dimension is rejected.
    pub fn open_or_create(path: &Path, dimension: usize) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new(dimension));
        }
        let store = Self::load_snapshot(path)?;
        if store.dimension != dimension {
            return Err(Error::InvalidConfiguration(format!(
                "snapshot {} uses dimension {}, configured dimension is {}",
                path.display(),
                store.dimension,
                dimension
            )));
        }
        Ok(store)
    }
}
