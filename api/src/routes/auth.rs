use crate::{
    AppState,
    auth::{TokenIssuer, bearer_token},
    dto::{LoginRequest, LoginResponse, TokenResponse},
    errors::ApiError,
    repositories::RepoError,
};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tracing::{info, warn};
use validator::Validate;

/// POST /api/login
/// Body: { "email": "...", "password": "..." }
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    if !state.allow_login_attempt(&payload.email) {
        warn!("Login rate limit hit for {}", payload.email);
        return Err(ApiError::TooManyRequests);
    }

    let (user, tokens) = state
        .blocking(move |state| {
            // Unknown email and wrong password look the same to the client
            let user = state.users.get_by_email(&payload.email).map_err(|e| match e {
                RepoError::NotFound { .. } => ApiError::InvalidCredentials,
                other => other.into(),
            })?;

            state
                .credentials
                .verify_password(&payload.password, &user.password_hash)?;

            let tokens = state.credentials.issue(user.id)?;
            Ok((user, tokens))
        })
        .await?;

    info!("User logged in: {}", user.id);

    Ok(Json(LoginResponse {
        user: user.into(),
        token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

/// POST /api/refresh
/// Headers: Authorization: Bearer <refresh token>
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, ApiError> {
    let refresh_token = bearer_token(&headers)?.to_owned();

    let token = state
        .blocking(move |state| Ok(state.credentials.refresh_access(&refresh_token)?))
        .await?;

    Ok(Json(TokenResponse { token }))
}

/// POST /api/revoke
/// Headers: Authorization: Bearer <refresh token>
pub async fn revoke(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let token = bearer_token(&headers)?.to_owned();
    let user_id = state
        .credentials
        .validate(&token)?
        .require(TokenIssuer::Refresh)?;

    state
        .blocking(move |state| Ok(state.credentials.revoke(&token)?))
        .await?;

    info!("Refresh token revoked for user {}", user_id);

    Ok(StatusCode::NO_CONTENT)
}
