use crate::{
    AppState,
    auth::{AuthError, authorization_credential},
    dto::WebhookRequest,
    errors::ApiError,
};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tracing::info;

const USER_UPGRADED: &str = "user.upgraded";

/// POST /api/polka/webhooks
/// Headers: Authorization: ApiKey <key>
/// Body: { "event": "user.upgraded", "data": { "user_id": 3 } }
pub async fn polka_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<WebhookRequest>,
) -> Result<StatusCode, ApiError> {
    let key = authorization_credential(&headers, "ApiKey")?;
    if key != &*state.polka_key {
        return Err(AuthError::InvalidApiKey.into());
    }

    if payload.event != USER_UPGRADED {
        return Ok(StatusCode::NO_CONTENT);
    }

    let user_id = payload.data.user_id;
    state
        .blocking(move |state| Ok(state.users.promote(user_id)?))
        .await?;

    info!("User {} upgraded to Chirpy Red", user_id);

    Ok(StatusCode::NO_CONTENT)
}
