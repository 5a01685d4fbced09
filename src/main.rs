//! DreamBuy Shop Backend
//! Mission: Serve users, products, orders and banners behind a JWT gate

use anyhow::{Context, Result};
use axum::middleware;
use dotenv::dotenv;
use dreambuy_backend::{
    auth::JwtHandler, build_router, middleware::{cors_layer, request_logging},
    store::DocumentStore, AppState, Config,
};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    load_env();
    init_tracing();

    let config = Config::from_env()?;

    let store = Arc::new(DocumentStore::new(&config.database_path)?);
    let jwt_handler = Arc::new(JwtHandler::with_ttl(
        &config.token_secret,
        config.token_ttl_secs,
    ));

    info!(
        "🔐 Token service ready (lifetime {}s)",
        jwt_handler.ttl_secs()
    );

    let state = AppState::new(store, jwt_handler);

    let app = build_router(state)
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&config.cors_origins)?);

    // Start server
    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("🎯 BD Shop server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dreambuy_backend=debug,dreambuy=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_env() {
    // Standard dotenv search (cwd + parents), then the crate directory
    let _ = dotenv();

    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}
