use super::{AuthError, AuthResult, SessionClaims, TokenIssuer, password, tokens};
use crate::{models::UserId, repositories::RevokedTokenRepository};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issues and checks session tokens, and hashes passwords.
///
/// Access tokens live for an hour and authorize content operations.
/// Refresh tokens live for 60 days and can only mint new access tokens
/// until they are revoked.
#[derive(Clone)]
pub struct CredentialService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    hash_cost: u32,
    revoked: RevokedTokenRepository,
}

impl CredentialService {
    pub fn new(secret: &str, revoked: RevokedTokenRepository) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl: Duration::hours(1),
            refresh_ttl: Duration::days(60),
            hash_cost: bcrypt::DEFAULT_COST,
            revoked,
        }
    }

    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }

    /// bcrypt work factor, 4 to 31.
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    pub fn hash_password(&self, plain: &str) -> AuthResult<String> {
        password::hash(plain, self.hash_cost)
    }

    pub fn verify_password(&self, plain: &str, hash: &str) -> AuthResult<()> {
        password::verify(plain, hash)
    }

    pub fn issue(&self, user_id: UserId) -> AuthResult<TokenPair> {
        let now = Utc::now();
        let pair = TokenPair {
            access_token: tokens::sign(
                &self.encoding_key,
                user_id,
                TokenIssuer::Access,
                now,
                self.access_ttl,
            )?,
            refresh_token: tokens::sign(
                &self.encoding_key,
                user_id,
                TokenIssuer::Refresh,
                now,
                self.refresh_ttl,
            )?,
        };
        debug!(user_id, "issued token pair");
        Ok(pair)
    }

    /// Checks signature and expiry. Does not look at the issuer or the
    /// revocation list.
    pub fn validate(&self, token: &str) -> AuthResult<SessionClaims> {
        self.validate_at(token, Utc::now())
    }

    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<SessionClaims> {
        tokens::verify(&self.decoding_key, token, now)
    }

    /// Mints a new access token from a live, unrevoked refresh token. The
    /// refresh token itself is not rotated.
    pub fn refresh_access(&self, refresh_token: &str) -> AuthResult<String> {
        let user_id = self.validate(refresh_token)?.require(TokenIssuer::Refresh)?;
        if self.revoked.is_revoked(refresh_token)? {
            warn!(user_id, "refresh attempted with revoked token");
            return Err(AuthError::TokenRevoked);
        }
        tokens::sign(
            &self.encoding_key,
            user_id,
            TokenIssuer::Access,
            Utc::now(),
            self.access_ttl,
        )
    }

    /// Adds the raw token to the revocation list. Revoking twice is fine.
    pub fn revoke(&self, token: &str) -> AuthResult<()> {
        self.revoked.revoke(token, Utc::now())?;
        Ok(())
    }

    /// Gate for content operations: the token must be a valid access token.
    /// Returns the acting user.
    pub fn authorize(&self, token: &str) -> AuthResult<UserId> {
        self.validate(token)?.require(TokenIssuer::Access)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Database, MemoryStore};

    fn service() -> CredentialService {
        let revoked = RevokedTokenRepository::new(Database::new(MemoryStore::new()));
        CredentialService::new("test-secret", revoked).with_hash_cost(4)
    }

    #[test]
    fn issued_access_token_authorizes_its_subject() {
        let service = service();
        let pair = service.issue(5).unwrap();
        assert_ne!(pair.access_token, pair.refresh_token);

        assert_eq!(service.authorize(&pair.access_token).unwrap(), 5);
        let claims = service.validate(&pair.refresh_token).unwrap();
        assert_eq!(claims.issuer, TokenIssuer::Refresh);
    }

    #[test]
    fn access_token_expires_after_ttl() {
        let service = service();
        let pair = service.issue(1).unwrap();
        let later = Utc::now() + Duration::hours(1) + Duration::seconds(5);

        assert!(matches!(
            service.validate_at(&pair.access_token, later),
            Err(AuthError::TokenExpired)
        ));
        assert!(service.validate_at(&pair.refresh_token, later).is_ok());
    }

    #[test]
    fn refresh_token_cannot_authorize_content() {
        let service = service();
        let pair = service.issue(1).unwrap();
        assert!(matches!(
            service.authorize(&pair.refresh_token),
            Err(AuthError::WrongIssuer { .. })
        ));
    }

    #[test]
    fn access_token_cannot_refresh() {
        let service = service();
        let pair = service.issue(1).unwrap();
        assert!(matches!(
            service.refresh_access(&pair.access_token),
            Err(AuthError::WrongIssuer { .. })
        ));
    }

    #[test]
    fn refresh_then_revoke() {
        let service = service();
        let pair = service.issue(9).unwrap();

        let access = service.refresh_access(&pair.refresh_token).unwrap();
        assert_eq!(service.authorize(&access).unwrap(), 9);

        service.revoke(&pair.refresh_token).unwrap();
        service.revoke(&pair.refresh_token).unwrap();
        assert!(matches!(
            service.refresh_access(&pair.refresh_token),
            Err(AuthError::TokenRevoked)
        ));
    }

    #[test]
    fn expired_refresh_token_is_rejected() {
        let service = service().with_refresh_ttl(Duration::seconds(-10));
        let pair = service.issue(1).unwrap();
        assert!(matches!(
            service.refresh_access(&pair.refresh_token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn password_round_trip() {
        let service = service();
        let hash = service.hash_password("pw").unwrap();
        service.verify_password("pw", &hash).unwrap();
        assert!(matches!(
            service.verify_password("PW", &hash),
            Err(AuthError::PasswordMismatch)
        ));
    }
}
