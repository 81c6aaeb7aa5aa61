//! Scribe server
//!
//! Binary entry point: loads configuration, initializes logging,
//! connects the database pool, reads the RSA key pair and serves the
//! API router until shutdown.

use std::sync::Arc;
use std::time::Duration;

use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scribe_api::AppState;
use scribe_auth::{AuthService, TokenCodec, TokenConfig};
use scribe_core::cache::{JsonCache, MemoryCache};
use scribe_core::AppConfig;
use scribe_db::{
    ApiKeyRepository, BlogRepository, Database, KeystoreRepository, MessageRepository,
    UserRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    dotenvy::dotenv().ok();
    let config = AppConfig::from_env();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        "starting scribe"
    );

    let db = Database::connect(&config.database).await?;
    db.ping().await?;
    info!("connected to database");

    let private_pem = std::fs::read(&config.auth.rsa_private_key_path)?;
    let public_pem = std::fs::read(&config.auth.rsa_public_key_path)?;
    let codec = TokenCodec::from_rsa_pem(&private_pem, &public_pem)
        .map_err(|e| anyhow::anyhow!("unusable RSA key pair: {e}"))?;

    let pool = db.pool().clone();
    let auth = Arc::new(AuthService::new(
        codec,
        TokenConfig::from_auth_config(&config.auth),
        Arc::new(KeystoreRepository::new(pool.clone())),
        Arc::new(UserRepository::new(pool.clone())),
        Arc::new(ApiKeyRepository::new(pool.clone())),
    ));

    let state = AppState {
        auth,
        users: Arc::new(UserRepository::new(pool.clone())),
        blogs: Arc::new(BlogRepository::new(pool.clone())),
        messages: Arc::new(MessageRepository::new(pool)),
        blog_cache: JsonCache::new(Arc::new(MemoryCache::new()), "blog"),
    };

    let app = scribe_api::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr = config.server_addr();
    info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shutdown complete");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,scribe_server=debug,scribe_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("shutdown signal received");
}
