use super::{RepoError, RepoResult};
use crate::{
    models::{Snapshot, User, UserId},
    store::Database,
};
use tracing::info;

#[derive(Clone)]
pub struct UserRepository {
    db: Database,
}

fn find_by_email<'a>(snapshot: &'a Snapshot, email: &str) -> Option<&'a User> {
    snapshot.users.values().find(|user| user.email == email)
}

impl UserRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Registers a user. Emails are compared exactly, case included.
    pub fn create(&self, email: &str, password_hash: &str) -> RepoResult<User> {
        let user = self.db.write(|snapshot| {
            if find_by_email(snapshot, email).is_some() {
                return Err(RepoError::already_exists("user", email));
            }
            let id = snapshot.next_user_id();
            let user = User {
                id,
                email: email.to_owned(),
                password_hash: password_hash.to_owned(),
                is_promoted: false,
            };
            snapshot.users.insert(id, user.clone());
            Ok(user)
        })?;
        info!(user_id = user.id, "user created");
        Ok(user)
    }

    pub fn get_by_email(&self, email: &str) -> RepoResult<User> {
        let snapshot = self.db.read()?;
        find_by_email(&snapshot, email)
            .cloned()
            .ok_or_else(|| RepoError::not_found("user", email))
    }

    pub fn get_by_id(&self, id: UserId) -> RepoResult<User> {
        self.db
            .read()?
            .users
            .remove(&id)
            .ok_or_else(|| RepoError::not_found("user", id))
    }

    /// Replaces email and password hash, keeping the ID and promotion flag.
    /// Taking an email that belongs to another user fails with
    /// `AlreadyExists`.
    pub fn update(&self, id: UserId, email: &str, password_hash: &str) -> RepoResult<User> {
        let user = self.db.write(|snapshot| {
            if find_by_email(snapshot, email).is_some_and(|other| other.id != id) {
                return Err(RepoError::already_exists("user", email));
            }
            let user = snapshot
                .users
                .get_mut(&id)
                .ok_or_else(|| RepoError::not_found("user", id))?;
            user.email = email.to_owned();
            user.password_hash = password_hash.to_owned();
            Ok(user.clone())
        })?;
        info!(user_id = id, "user updated");
        Ok(user)
    }

    pub fn promote(&self, id: UserId) -> RepoResult<()> {
        self.db.write(|snapshot| {
            let user = snapshot
                .users
                .get_mut(&id)
                .ok_or_else(|| RepoError::not_found("user", id))?;
            user.is_promoted = true;
            Ok::<_, RepoError>(())
        })?;
        info!(user_id = id, "user promoted");
        Ok(())
    }
}
