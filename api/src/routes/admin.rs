use crate::{AppState, config::Platform, errors::ApiError};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{Html, Response},
};
use tracing::info;

/// Counts every request that reaches the static file server.
pub async fn count_hits(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.metrics.record_hit();
    next.run(request).await
}

/// GET /admin/metrics
pub async fn metrics(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        r#"<html>

<body>
    <h1>Welcome, Chirpy Admin</h1>
    <p>Chirpy has been visited {} times!</p>
</body>

</html>"#,
        state.metrics.hits()
    ))
}

/// POST /admin/reset
/// Zeroes the hit counter; on the dev platform also wipes the database.
pub async fn reset(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    state.metrics.reset();

    if state.platform != Platform::Dev {
        return Ok("Hits reset to 0");
    }

    state
        .blocking(|state| {
            state
                .db
                .reset()
                .map_err(|e| ApiError::InternalError(e.to_string()))
        })
        .await?;

    info!("Database wiped via admin reset");

    Ok("Hits reset to 0 and database wiped")
}
