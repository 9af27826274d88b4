//! Snapshot persistence.
//!
//! A [`SnapshotStore`] only knows how to read and replace the whole
//! [`Snapshot`]. [`Database`] layers the write critical section on top so
//! repositories never race each other through load-modify-save.

mod database;
mod json_file;
mod memory;

pub use database::Database;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::models::Snapshot;
use std::{io, path::PathBuf};
use thiserror::Error;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backing content exists but is not a snapshot.
    #[error("store content at {} is not a valid snapshot: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Backing medium for the snapshot.
///
/// Each call is atomic on its own: `load` never observes a half-written
/// `save`. Callers that need load-modify-save atomicity go through
/// [`Database::write`].
pub trait SnapshotStore: Send + Sync {
    /// Reads the current snapshot, creating an empty one if none exists yet.
    fn load(&self) -> StoreResult<Snapshot>;

    /// Replaces the stored snapshot.
    fn save(&self, snapshot: &Snapshot) -> StoreResult<()>;

    /// Drops all state and reinitializes an empty snapshot. Succeeds when
    /// nothing was stored.
    fn reset(&self) -> StoreResult<()>;
}
