//! JSON snapshot persistence.
//!
//! A snapshot is the complete ordered record list for one feed. It is read
//! once at the start of a run and rewritten wholesale at the end. There is no
//! locking; callers must not run two updates against the same file at once.

mod atomic;

use crate::Error;
use crate::record::Record;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Handle to one snapshot file on disk.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot.
    ///
    /// A missing file, an empty file and a JSON `null` all load as an empty
    /// list. Anything else that fails to parse is a fatal `SnapshotLoad`.
    pub fn load(&self) -> Result<Vec<Record>, Error> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no snapshot yet, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(Error::SnapshotLoad(format!("{}: {e}", self.path.display()))),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let records: Option<Vec<Record>> = serde_json::from_slice(&bytes)
            .map_err(|e| Error::SnapshotLoad(format!("{}: {e}", self.path.display())))?;
        let records = records.unwrap_or_default();

        tracing::debug!(path = %self.path.display(), count = records.len(), "loaded snapshot");
        Ok(records)
    }

    /// Replace the snapshot with `records`, in the given order.
    ///
    /// On failure the previous file is left untouched.
    pub fn save(&self, records: &[Record]) -> Result<(), Error> {
        let mut json = serde_json::to_vec_pretty(records)
            .map_err(|e| Error::SnapshotSave(format!("{}: {e}", self.path.display())))?;
        json.push(b'\n');

        atomic::write_atomically(&self.path, &json)
            .map_err(|e| Error::SnapshotSave(format!("{}: {e}", self.path.display())))?;

        tracing::debug!(path = %self.path.display(), count = records.len(), "saved snapshot");
        Ok(())
    }

    /// Drop one record so the next run probes it again.
    ///
    /// Returns the removed record, or `None` (without rewriting the file) when
    /// the identifier is not present.
    pub fn forget(&self, identifier: &str) -> Result<Option<Record>, Error> {
        let mut records = self.load()?;
        let Some(index) = records.iter().position(|r| r.identifier == identifier) else {
            return Ok(None);
        };

        let removed = records.remove(index);
        self.save(&records)?;
        Ok(Some(removed))
    }
}
