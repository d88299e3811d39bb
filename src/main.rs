use axum::Server;
use config::Config;
use std::net::SocketAddr;

mod api;
mod config;
mod db;
mod errors;
mod logging;
mod schema;
mod services;
mod validation;
mod views;

/// Result type for the directory server
pub type Result<T> = std::result::Result<T, errors::ApiError>;

/// Static configuration instance for the server
static CONFIG: once_cell::sync::Lazy<Config> = once_cell::sync::Lazy::new(|| {
    dotenv::dotenv().ok();
    envy::from_env::<Config>().expect("Failed to load configuration")
});

#[tokio::main]
async fn main() {
    // Initialize logging
    if let Err(err) = logging::setup_logging(&CONFIG.log_dir) {
        eprintln!("Failed to initialize file logging: {err:#}");
        tracing_subscriber::fmt::init();
    }

    // Initialize database and Redis connections
    let db_client = db::DbClient::new(&CONFIG.database_url, &CONFIG.redis_url);

    // Hosted auth and storage clients
    let auth_client = services::AuthClient::new(&CONFIG.backend_url, &CONFIG.backend_anon_key);
    let storage_client = services::StorageClient::new(
        &CONFIG.backend_url,
        CONFIG
            .backend_service_key
            .as_deref()
            .unwrap_or(&CONFIG.backend_anon_key),
        &CONFIG.storage_bucket,
    );

    let sessions = services::session::SessionSettings {
        ttl_secs: CONFIG.session_ttl_secs,
    };

    let state = api::AppState::new(db_client, auth_client, storage_client, sessions);

    // Setup router and start server
    let app = api::initialize_router(state, CONFIG.max_upload_bytes);
    let addr = SocketAddr::from(([0, 0, 0, 0], CONFIG.port));
    tracing::info!("Server starting on {}", addr);

    Server::bind(&addr)
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .expect("Server terminated unexpectedly");
}
