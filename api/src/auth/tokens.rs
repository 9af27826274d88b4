use super::{AuthError, AuthResult};
use crate::models::UserId;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which kind of session token a JWT is, carried in the `iss` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenIssuer {
    Access,
    Refresh,
}

impl TokenIssuer {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenIssuer::Access => "chirpy-access",
            TokenIssuer::Refresh => "chirpy-refresh",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "chirpy-access" => Some(TokenIssuer::Access),
            "chirpy-refresh" => Some(TokenIssuer::Refresh),
            _ => None,
        }
    }
}

impl fmt::Display for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims of a token whose signature has been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub subject: UserId,
    pub issuer: TokenIssuer,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionClaims {
    pub fn require(&self, expected: TokenIssuer) -> AuthResult<UserId> {
        if self.issuer != expected {
            return Err(AuthError::WrongIssuer {
                expected,
                actual: self.issuer,
            });
        }
        Ok(self.subject)
    }
}

// What actually goes into the JWT payload.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // Subject (user ID)
    iss: String,
    iat: i64,
    exp: i64,
}

pub(super) fn sign(
    key: &EncodingKey,
    subject: UserId,
    issuer: TokenIssuer,
    now: DateTime<Utc>,
    ttl: Duration,
) -> AuthResult<String> {
    let claims = Claims {
        sub: subject.to_string(),
        iss: issuer.as_str().to_owned(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    encode(&Header::new(Algorithm::HS256), &claims, key).map_err(AuthError::Signing)
}

/// Verifies the signature and that `now` has not passed the expiry.
/// Revocation and issuer are left to the caller.
pub(super) fn verify(key: &DecodingKey, token: &str, now: DateTime<Utc>) -> AuthResult<SessionClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is checked below against the caller's clock.
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub", "iss"]);

    let claims = decode::<Claims>(token, key, &validation)
        .map(|data| data.claims)
        .map_err(|err| match err.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidSignature => AuthError::TokenSignatureInvalid,
            _ => AuthError::TokenMalformed,
        })?;

    let subject = claims.sub.parse().map_err(|_| AuthError::TokenMalformed)?;
    let issuer = TokenIssuer::parse(&claims.iss).ok_or(AuthError::TokenMalformed)?;
    let issued_at = DateTime::from_timestamp(claims.iat, 0).ok_or(AuthError::TokenMalformed)?;
    let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(AuthError::TokenMalformed)?;

    if now > expires_at {
        return Err(AuthError::TokenExpired);
    }

    Ok(SessionClaims {
        subject,
        issuer,
        issued_at,
        expires_at,
    })
}
