use super::{SnapshotStore, StoreError, StoreResult};
use crate::models::Snapshot;
use parking_lot::RwLock;
use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Snapshot kept as a single JSON document on disk.
///
/// Saves go to a staging file next to the target which is synced and then
/// renamed over it, so readers see either the old or the new document.
pub struct JsonFileStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Reads and decodes the file. `Ok(None)` when it does not exist.
    fn read_file(&self) -> StoreResult<Option<Snapshot>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Decode {
                path: self.path.clone(),
                source,
            })
    }

    fn write_file(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let bytes = serde_json::to_vec(snapshot).map_err(StoreError::Encode)?;
        self.write_atomic(&bytes).map_err(|err| self.io_error(err))
    }

    fn write_atomic(&self, bytes: &[u8]) -> io::Result<()> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| io::Error::other("store path has no file name"))?
            .to_string_lossy();
        let staging_path = self
            .path
            .with_file_name(format!(".{file_name}.{}.staging", Uuid::new_v4()));

        let staged = (|| {
            let mut file = File::create(&staging_path)?;
            file.write_all(bytes)?;
            file.sync_all()?;
            restrict_permissions(&staging_path)?;
            fs::rename(&staging_path, &self.path)
        })();

        if let Err(err) = staged {
            if let Err(cleanup) = fs::remove_file(&staging_path) {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    warn!(path = %staging_path.display(), "failed to remove staging file: {cleanup}");
                }
            }
            return Err(err);
        }

        sync_parent_dir(&self.path);
        Ok(())
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> StoreResult<Snapshot> {
        {
            let _guard = self.lock.read();
            if let Some(snapshot) = self.read_file()? {
                return Ok(snapshot);
            }
        }

        // Another caller may have created the file since the read lock was
        // released.
        let _guard = self.lock.write();
        if let Some(snapshot) = self.read_file()? {
            return Ok(snapshot);
        }
        info!(path = %self.path.display(), "creating empty database");
        let snapshot = Snapshot::default();
        self.write_file(&snapshot)?;
        Ok(snapshot)
    }

    fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let _guard = self.lock.write();
        self.write_file(snapshot)?;
        debug!(
            chirps = snapshot.chirps.len(),
            users = snapshot.users.len(),
            "snapshot saved"
        );
        Ok(())
    }

    fn reset(&self) -> StoreResult<()> {
        let _guard = self.lock.write();
        match fs::remove_file(&self.path) {
            Ok(()) => info!(path = %self.path.display(), "database removed"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(self.io_error(err)),
        }
        self.write_file(&Snapshot::default())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// Fsyncs the directory holding `path` after a rename. Errors are logged only;
/// the new file is already in place.
fn sync_parent_dir(path: &Path) {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if let Err(e) = sync_dir(parent) {
        warn!(dir = %parent.display(), "failed to sync directory after rename: {e}");
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
