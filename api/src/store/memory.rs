use super::{SnapshotStore, StoreResult};
use crate::models::Snapshot;
use parking_lot::RwLock;

/// In-process store, used by tests and throwaway instances.
#[derive(Default)]
pub struct MemoryStore {
    snapshot: RwLock<Option<Snapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> StoreResult<Snapshot> {
        if let Some(snapshot) = self.snapshot.read().as_ref() {
            return Ok(snapshot.clone());
        }
        let mut slot = self.snapshot.write();
        Ok(slot.get_or_insert_with(Snapshot::default).clone())
    }

    fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        *self.snapshot.write() = Some(snapshot.clone());
        Ok(())
    }

    fn reset(&self) -> StoreResult<()> {
        *self.snapshot.write() = Some(Snapshot::default());
        Ok(())
    }
}
