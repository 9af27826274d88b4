use crate::{auth::AuthError, repositories::RepoError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

#[derive(Debug)]
pub enum ApiError {
    InvalidCredentials,
    UserAlreadyExists,
    Unauthorized,
    Forbidden,
    NotFound,
    TooManyRequests,
    ValidationError(String),
    InternalError(String),
}

/// Convert our custom errors to HTTP responses
///
/// `IntoResponse` trait: Axum calls this to convert errors to responses
/// This is how we control what users see when errors occur
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            ApiError::UserAlreadyExists => (StatusCode::CONFLICT, "User already exists"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden"),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not Found"),
            ApiError::TooManyRequests => (StatusCode::TOO_MANY_REQUESTS, "Too many requests"),
            ApiError::ValidationError(msg) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({
                      "error": msg
                    })),
                )
                    .into_response();
            }
            ApiError::InternalError(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (
            status,
            Json(serde_json::json!({
              "error": message
            })),
        )
            .into_response()
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound { .. } => ApiError::NotFound,
            RepoError::AlreadyExists { .. } => ApiError::UserAlreadyExists,
            RepoError::Store(err) => ApiError::InternalError(err.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::PasswordMismatch => ApiError::InvalidCredentials,
            AuthError::MissingCredentials
            | AuthError::InvalidApiKey
            | AuthError::TokenExpired
            | AuthError::TokenSignatureInvalid
            | AuthError::TokenMalformed
            | AuthError::TokenRevoked
            | AuthError::WrongIssuer { .. } => {
                warn!("Rejected credentials: {}", err);
                ApiError::Unauthorized
            }
            AuthError::Hash(_) | AuthError::Signing(_) => ApiError::InternalError(err.to_string()),
            AuthError::Repo(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use std::io;

    #[test]
    fn repository_errors_map_to_statuses() {
        let not_found = ApiError::from(RepoError::not_found("chirp", 1)).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let conflict = ApiError::from(RepoError::already_exists("user", "a@b.com")).into_response();
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        let store = RepoError::Store(StoreError::Io {
            path: "database.json".into(),
            source: io::Error::other("disk gone"),
        });
        assert_eq!(
            ApiError::from(store).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn token_errors_are_unauthorized() {
        for err in [
            AuthError::TokenExpired,
            AuthError::TokenRevoked,
            AuthError::TokenMalformed,
            AuthError::TokenSignatureInvalid,
        ] {
            assert_eq!(
                ApiError::from(err).into_response().status(),
                StatusCode::UNAUTHORIZED
            );
        }
    }

    #[test]
    fn header_errors_are_unauthorized() {
        for err in [AuthError::MissingCredentials, AuthError::InvalidApiKey] {
            assert_eq!(
                ApiError::from(err).into_response().status(),
                StatusCode::UNAUTHORIZED
            );
        }
    }
}
