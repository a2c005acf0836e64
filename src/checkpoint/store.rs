//! Snapshot stores.

use super::{CheckpointError, Snapshot, SnapshotFormat};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Durable home for the current snapshot.
///
/// `load` returns `Ok(None)` when nothing has been stored yet.
pub trait ContextStore {
    fn load(&self) -> Result<Option<Snapshot>, CheckpointError>;

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), CheckpointError>;
}

/// Stores one snapshot in a single file.
///
/// Writes go to a sibling `.tmp` file which is then renamed over the target,
/// so a crash mid-write leaves the previous snapshot intact.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
    format: SnapshotFormat,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: SnapshotFormat::default(),
        }
    }

    pub fn with_format(mut self, format: SnapshotFormat) -> Self {
        self.format = format;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> SnapshotFormat {
        self.format
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl ContextStore for FileStore {
    fn load(&self) -> Result<Option<Snapshot>, CheckpointError> {
        match fs::read(&self.path) {
            Ok(bytes) => self.format.decode(&bytes).map(Some),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), CheckpointError> {
        let bytes = self.format.encode(snapshot)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let temp = self.temp_path();
        fs::write(&temp, bytes)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

/// In-process store, for tests and hosts that persist elsewhere.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    snapshot: Option<Snapshot>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `snapshot`.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            writes: 0,
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Number of successful saves.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ContextStore for MemoryStore {
    fn load(&self) -> Result<Option<Snapshot>, CheckpointError> {
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), CheckpointError> {
        self.snapshot = Some(snapshot.clone());
        self.writes += 1;
        Ok(())
    }
}
