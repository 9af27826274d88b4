//! Passwords, session tokens and the authorization gate.

mod password;
mod service;
mod tokens;

pub use service::{CredentialService, TokenPair};
pub use tokens::{SessionClaims, TokenIssuer};

use crate::repositories::RepoError;
use axum::http::{HeaderMap, header};
use thiserror::Error;

pub type AuthResult<T> = std::result::Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing or malformed authorization header")]
    MissingCredentials,

    #[error("API key does not match")]
    InvalidApiKey,

    #[error("token has expired")]
    TokenExpired,

    #[error("token signature is invalid")]
    TokenSignatureInvalid,

    #[error("token is malformed")]
    TokenMalformed,

    #[error("token has been revoked")]
    TokenRevoked,

    #[error("{actual} token used where {expected} token is required")]
    WrongIssuer {
        expected: TokenIssuer,
        actual: TokenIssuer,
    },

    #[error("password does not match")]
    PasswordMismatch,

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Extracts the credential from `Authorization: <scheme> <credential>`.
pub fn authorization_credential<'a>(headers: &'a HeaderMap, scheme: &str) -> AuthResult<&'a str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let (given_scheme, credential) = value
        .split_once(' ')
        .ok_or(AuthError::MissingCredentials)?;
    let credential = credential.trim();
    if given_scheme != scheme || credential.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok(credential)
}

pub fn bearer_token(headers: &HeaderMap) -> AuthResult<&str> {
    authorization_credential(headers, "Bearer")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn rejects_other_schemes_and_empty_values() {
        assert!(bearer_token(&headers("ApiKey abc")).is_err());
        assert!(bearer_token(&headers("Bearer ")).is_err());
        assert!(bearer_token(&headers("abc")).is_err());
        assert!(bearer_token(&HeaderMap::new()).is_err());
    }

    #[test]
    fn extracts_api_key() {
        assert_eq!(
            authorization_credential(&headers("ApiKey f271c81ff7084ee5b99a5091b42d486e"), "ApiKey")
                .unwrap(),
            "f271c81ff7084ee5b99a5091b42d486e"
        );
    }
}
