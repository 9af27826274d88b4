use super::{RepoError, RepoResult};
use crate::store::Database;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

#[derive(Clone)]
pub struct RevokedTokenRepository {
    db: Database,
}

impl RevokedTokenRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Records `token` as revoked at `at`. A token that is already revoked
    /// keeps its original revocation instant.
    pub fn revoke(&self, token: &str, at: DateTime<Utc>) -> RepoResult<()> {
        let newly_revoked = self.db.write(|snapshot| {
            let newly_revoked = !snapshot.revoked_tokens.contains_key(token);
            snapshot
                .revoked_tokens
                .entry(token.to_owned())
                .or_insert(at);
            Ok::<_, RepoError>(newly_revoked)
        })?;
        if newly_revoked {
            info!("token revoked");
        } else {
            debug!("token was already revoked");
        }
        Ok(())
    }

    pub fn is_revoked(&self, token: &str) -> RepoResult<bool> {
        Ok(self.db.read()?.revoked_tokens.contains_key(token))
    }
}
