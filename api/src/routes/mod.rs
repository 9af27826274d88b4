mod admin;
mod auth;
mod chirp;
mod health;
mod user;
mod webhook;

use crate::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::path::Path;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Builds the full application router.
pub fn router(state: AppState, fileserver_root: &Path, max_concurrent_requests: usize) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let fileserver = Router::new()
        .nest_service("/app", ServeDir::new(fileserver_root))
        .layer(middleware::from_fn_with_state(state.clone(), admin::count_hits));

    Router::new()
        .route("/api/healthz", get(health::health_check))
        // Users and sessions
        .route("/api/users", post(user::create_user).put(user::update_user))
        .route("/api/login", post(auth::login))
        .route("/api/refresh", post(auth::refresh))
        .route("/api/revoke", post(auth::revoke))
        // Chirps
        .route("/api/chirps", post(chirp::create_chirp).get(chirp::list_chirps))
        .route(
            "/api/chirps/{id}",
            get(chirp::get_chirp).delete(chirp::delete_chirp),
        )
        // Payment provider callback
        .route("/api/polka/webhooks", post(webhook::polka_webhook))
        // Admin
        .route("/admin/metrics", get(admin::metrics))
        .route("/admin/reset", post(admin::reset))
        .merge(fileserver)
        // Add state and middleware
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(GlobalConcurrencyLimitLayer::new(max_concurrent_requests))
}
