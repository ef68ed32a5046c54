use axum::Router;
use configs::AppConfig;
use service::store::SeaOrmStore;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the store (creating schema and counter row) and build the app.
/// Any failure here is fatal for the process.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let store = SeaOrmStore::open(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    let state = ServerState::from_store(store);
    Ok(routes::build_router(state, build_cors(), cfg.server.body_limit_bytes))
}

/// Public entry: build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    let addr = format!("{}:{}", cfg.server.host, cfg.server.port);
    let listener = tokio::net::TcpListener::bind((cfg.server.host.as_str(), cfg.server.port))
        .await
        .map_err(|source| StartupError::Bind { addr: addr.clone(), source })?;
    let local = listener.local_addr()?;
    info!(service = "server", event = "listening", %local, db = %cfg.database.url, "backend listening on http://{}", local);
    axum::serve(listener, app).await?;
    Ok(())
}
