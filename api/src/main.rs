use anyhow::Context;
use chirpy::{AppState, bootstrap, config::Config, routes};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("chirpy=info,tower_http=info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env().context("invalid configuration")?;

    let db = bootstrap::open_database(&config).context("failed to open database")?;
    let state = AppState::new(db, &config);

    let app = routes::router(
        state,
        &config.fileserver_root,
        config.max_concurrent_requests,
    );

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!("Server running on http://{}", config.bind_addr);
    info!("API Endpoints:");
    info!("  GET    /api/healthz        - Health check");
    info!("  POST   /api/users          - Create account");
    info!("  PUT    /api/users          - Update account (auth)");
    info!("  POST   /api/login          - Login");
    info!("  POST   /api/refresh        - New access token (refresh token)");
    info!("  POST   /api/revoke         - Revoke refresh token");
    info!("  POST   /api/chirps         - Create chirp (auth)");
    info!("  GET    /api/chirps         - List chirps (?author_id=&sort=)");
    info!("  GET    /api/chirps/:id     - Get specific chirp");
    info!("  DELETE /api/chirps/:id     - Delete chirp (auth, author only)");
    info!("  POST   /api/polka/webhooks - Payment webhook (API key)");
    info!("  GET    /admin/metrics      - Hit counter");
    info!("  POST   /admin/reset        - Reset counter (and database on dev)");

    axum::serve(listener, app).await?;
    Ok(())
}
