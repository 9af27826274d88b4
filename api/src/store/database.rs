use super::{SnapshotStore, StoreError, StoreResult};
use crate::models::Snapshot;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// Shared handle to the snapshot store.
///
/// `write` holds one mutex across load, mutation and save, so concurrent
/// mutations are applied one after another. Reads skip the mutex and only
/// contend on the store's own lock for the physical read.
#[derive(Clone)]
pub struct Database {
    inner: Arc<Inner>,
}

struct Inner {
    store: Box<dyn SnapshotStore>,
    write_lock: Mutex<()>,
}

impl Database {
    pub fn new(store: impl SnapshotStore + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                store: Box::new(store),
                write_lock: Mutex::new(()),
            }),
        }
    }

    pub fn read(&self) -> StoreResult<Snapshot> {
        self.inner.store.load()
    }

    /// Runs `mutate` against a freshly loaded snapshot and saves the result.
    ///
    /// Nothing is saved when `mutate` fails.
    pub fn write<T, E>(&self, mutate: impl FnOnce(&mut Snapshot) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let _guard = self.inner.write_lock.lock();
        let mut snapshot = self.inner.store.load()?;
        let output = mutate(&mut snapshot)?;
        self.inner.store.save(&snapshot)?;
        Ok(output)
    }

    pub fn reset(&self) -> StoreResult<()> {
        let _guard = self.inner.write_lock.lock();
        debug!("resetting snapshot store");
        self.inner.store.reset()
    }
}
