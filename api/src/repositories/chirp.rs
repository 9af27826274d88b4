use super::{RepoError, RepoResult};
use crate::{
    models::{Chirp, ChirpId, UserId},
    store::Database,
};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChirpFilter {
    pub author_id: Option<UserId>,
}

#[derive(Clone)]
pub struct ChirpRepository {
    db: Database,
}

impl ChirpRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Stores a new chirp. Body validation and author checks belong to the
    /// caller.
    pub fn create(&self, body: &str, author_id: UserId) -> RepoResult<Chirp> {
        let chirp = self.db.write(|snapshot| {
            let id = snapshot.next_chirp_id();
            let chirp = Chirp {
                id,
                body: body.to_owned(),
                author_id,
            };
            snapshot.chirps.insert(id, chirp.clone());
            Ok::<_, RepoError>(chirp)
        })?;
        info!(chirp_id = chirp.id, author_id, "chirp created");
        Ok(chirp)
    }

    /// Chirps ordered by ID, optionally restricted to one author.
    pub fn list(&self, filter: ChirpFilter, order: SortOrder) -> RepoResult<Vec<Chirp>> {
        let snapshot = self.db.read()?;
        let mut chirps: Vec<Chirp> = snapshot
            .chirps
            .into_values()
            .filter(|chirp| filter.author_id.is_none_or(|author| chirp.author_id == author))
            .collect();
        if order == SortOrder::Desc {
            chirps.reverse();
        }
        Ok(chirps)
    }

    pub fn get(&self, id: ChirpId) -> RepoResult<Chirp> {
        self.db
            .read()?
            .chirps
            .remove(&id)
            .ok_or_else(|| RepoError::not_found("chirp", id))
    }

    /// Removes the chirp if present. Deleting an unknown ID is a no-op.
    pub fn delete(&self, id: ChirpId) -> RepoResult<()> {
        let removed = self
            .db
            .write(|snapshot| Ok::<_, RepoError>(snapshot.chirps.remove(&id)))?;
        if removed.is_some() {
            info!(chirp_id = id, "chirp deleted");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn repo() -> ChirpRepository {
        ChirpRepository::new(Database::new(MemoryStore::new()))
    }

    #[test]
    fn sequential_creates_get_consecutive_ids() {
        let repo = repo();
        let ids: Vec<_> = (0..5)
            .map(|i| repo.create(&format!("chirp {i}"), 1).unwrap().id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn list_filters_and_orders() {
        let repo = repo();
        repo.create("one", 1).unwrap();
        repo.create("two", 2).unwrap();
        repo.create("three", 1).unwrap();

        let asc = repo.list(ChirpFilter::default(), SortOrder::default()).unwrap();
        assert_eq!(asc.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2, 3]);

        let by_author = repo
            .list(ChirpFilter { author_id: Some(1) }, SortOrder::Desc)
            .unwrap();
        assert_eq!(
            by_author.iter().map(|c| c.body.as_str()).collect::<Vec<_>>(),
            vec!["three", "one"]
        );
    }

    #[test]
    fn get_missing_is_not_found() {
        let repo = repo();
        assert!(matches!(repo.get(42), Err(RepoError::NotFound { .. })));
    }

    #[test]
    fn delete_missing_is_a_no_op() {
        let db = Database::new(MemoryStore::new());
        let repo = ChirpRepository::new(db.clone());
        repo.create("keep me", 1).unwrap();
        let before = db.read().unwrap();

        repo.delete(99).unwrap();

        assert_eq!(db.read().unwrap(), before);
    }

    #[test]
    fn deleted_ids_are_not_reused() {
        let repo = repo();
        repo.create("a", 1).unwrap();
        let second = repo.create("b", 1).unwrap();
        repo.delete(second.id).unwrap();

        assert_eq!(repo.create("c", 1).unwrap().id, 3);
        assert!(matches!(repo.get(second.id), Err(RepoError::NotFound { .. })));
    }
}
