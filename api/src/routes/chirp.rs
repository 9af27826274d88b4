use crate::{
    AppState,
    auth::bearer_token,
    content::clean_body,
    dto::{CreateChirpRequest, ListChirpsQuery},
    errors::ApiError,
    models::{Chirp, ChirpId},
    repositories::ChirpFilter,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use tracing::{info, warn};
use validator::Validate;

/// POST /api/chirps
/// Headers: Authorization: Bearer <access token>
/// Body: { "body": "..." }
pub async fn create_chirp(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateChirpRequest>,
) -> Result<(StatusCode, Json<Chirp>), ApiError> {
    let user_id = state.credentials.authorize(bearer_token(&headers)?)?;

    payload
        .validate()
        .map_err(|e| ApiError::ValidationError(e.to_string()))?;

    let body = clean_body(&payload.body);
    let chirp = state
        .blocking(move |state| Ok(state.chirps.create(&body, user_id)?))
        .await?;

    Ok((StatusCode::CREATED, Json(chirp)))
}

/// GET /api/chirps?author_id=1&sort=desc
pub async fn list_chirps(
    State(state): State<AppState>,
    Query(params): Query<ListChirpsQuery>,
) -> Result<Json<Vec<Chirp>>, ApiError> {
    let filter = ChirpFilter {
        author_id: params.author_id,
    };
    let chirps = state
        .blocking(move |state| Ok(state.chirps.list(filter, params.sort)?))
        .await?;

    Ok(Json(chirps))
}

/// GET /api/chirps/{id}
pub async fn get_chirp(
    State(state): State<AppState>,
    Path(id): Path<ChirpId>,
) -> Result<Json<Chirp>, ApiError> {
    let chirp = state
        .blocking(move |state| Ok(state.chirps.get(id)?))
        .await?;

    Ok(Json(chirp))
}

/// DELETE /api/chirps/{id}
/// Headers: Authorization: Bearer <access token>
pub async fn delete_chirp(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<ChirpId>,
) -> Result<StatusCode, ApiError> {
    let user_id = state.credentials.authorize(bearer_token(&headers)?)?;

    state
        .blocking(move |state| {
            let chirp = state.chirps.get(id)?;

            // Check ownership
            if chirp.author_id != user_id {
                warn!("User {} tried to delete chirp {} owned by {}", user_id, id, chirp.author_id);
                return Err(ApiError::Forbidden);
            }

            Ok(state.chirps.delete(id)?)
        })
        .await?;

    info!("Chirp deleted: {} by user {}", id, user_id);

    Ok(StatusCode::NO_CONTENT)
}
