//! Typed access to the entities inside the snapshot.
//!
//! Repositories hold no state of their own: every call loads the snapshot,
//! and every mutation goes through [`Database::write`](crate::store::Database::write).

mod chirp;
mod revoked_token;
mod user;

pub use chirp::{ChirpFilter, ChirpRepository, SortOrder};
pub use revoked_token::RevokedTokenRepository;
pub use user::UserRepository;

use crate::store::StoreError;
use thiserror::Error;

pub type RepoResult<T> = std::result::Result<T, RepoError>;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{entity} {key} not found")]
    NotFound { entity: &'static str, key: String },

    #[error("{entity} {key} already exists")]
    AlreadyExists { entity: &'static str, key: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RepoError {
    pub(crate) fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub(crate) fn already_exists(entity: &'static str, key: impl ToString) -> Self {
        Self::AlreadyExists {
            entity,
            key: key.to_string(),
        }
    }
}
