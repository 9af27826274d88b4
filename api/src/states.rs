use crate::{
    auth::CredentialService,
    config::{Config, Platform},
    errors::ApiError,
    metrics::Metrics,
    repositories::{ChirpRepository, RevokedTokenRepository, UserRepository},
    store::Database,
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// APPLICATION STATE - Shared data across all requests
// ============================================================================
/// Cloned into every handler. Everything inside is either a cheap handle
/// onto the shared database or wrapped in `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub chirps: ChirpRepository,
    pub users: UserRepository,
    pub credentials: CredentialService,
    pub metrics: Arc<Metrics>,
    pub login_limiter: Arc<DefaultKeyedRateLimiter<String>>, // Keyed by email
    pub login_limiter_max_keys: usize,
    pub polka_key: Arc<str>,
    pub platform: Platform,
}

impl AppState {
    pub fn new(db: Database, config: &Config) -> Self {
        let revoked = RevokedTokenRepository::new(db.clone());
        Self {
            chirps: ChirpRepository::new(db.clone()),
            users: UserRepository::new(db.clone()),
            credentials: CredentialService::new(&config.jwt_secret, revoked)
                .with_access_ttl(config.access_token_ttl)
                .with_refresh_ttl(config.refresh_token_ttl)
                .with_hash_cost(config.bcrypt_cost),
            metrics: Arc::new(Metrics::default()),
            login_limiter: Arc::new(RateLimiter::keyed(Quota::per_minute(
                config.login_attempts_per_minute,
            ))),
            login_limiter_max_keys: config.login_limiter_max_keys,
            polka_key: Arc::from(config.polka_key.as_str()),
            platform: config.platform,
            db,
        }
    }

    /// Runs repository and credential work on tokio's blocking pool.
    ///
    /// Repository calls read, fsync and rename files under the write lock,
    /// and password hashing is deliberately slow; neither may run on an
    /// async worker.
    pub async fn blocking<T, F>(&self, work: F) -> Result<T, ApiError>
    where
        F: FnOnce(AppState) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let state = self.clone();
        tokio::task::spawn_blocking(move || work(state))
            .await
            .map_err(|e| ApiError::InternalError(format!("Blocking task failed: {}", e)))?
    }

    /// Takes one login attempt for `email` from the limiter. Returns `false`
    /// when the email is over its quota.
    ///
    /// Keys are chosen by the client, so once the map grows past
    /// `login_limiter_max_keys` entries that have fully replenished are
    /// dropped.
    pub fn allow_login_attempt(&self, email: &str) -> bool {
        let allowed = self.login_limiter.check_key(&email.to_owned()).is_ok();

        if self.login_limiter.len() > self.login_limiter_max_keys {
            self.login_limiter.retain_recent();
            self.login_limiter.shrink_to_fit();
            debug!(
                remaining = self.login_limiter.len(),
                "pruned idle login limiter keys"
            );
        }

        allowed
    }
}
