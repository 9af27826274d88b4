use crate::{
    AppState,
    auth::bearer_token,
    dto::{UserCredentialsRequest, UserResponse},
    errors::ApiError,
};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tracing::info;
use validator::Validate;

/// POST /api/users
/// Body: { "email": "...", "password": "..." }
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<UserCredentialsRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    let user = state
        .blocking(move |state| {
            let password_hash = state.credentials.hash_password(&payload.password)?;
            Ok(state.users.create(&payload.email, &password_hash)?)
        })
        .await?;

    info!("New user registered: {}", user.id);

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// PUT /api/users
/// Headers: Authorization: Bearer <access token>
/// Body: { "email": "...", "password": "..." }
pub async fn update_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UserCredentialsRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id = state.credentials.authorize(bearer_token(&headers)?)?;

    payload
        .validate()
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    let user = state
        .blocking(move |state| {
            let password_hash = state.credentials.hash_password(&payload.password)?;
            Ok(state.users.update(user_id, &payload.email, &password_hash)?)
        })
        .await?;

    Ok(Json(user.into()))
}
