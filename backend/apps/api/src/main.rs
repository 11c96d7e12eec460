//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; application-level errors use the
//! tagged `auth::AuthError` / `kernel` types.

mod config;

use auth::domain::repository::SessionRepository;
use auth::{MongoAuthRepository, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;

/// Cadence of the background expired-session sweep
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Configuration (loads .env first)
    let cfg = Config::load();

    // Database connection
    let client = mongodb::Client::with_uri_str(&cfg.mongodb.uri).await?;
    let db = client.database(&cfg.mongodb.database);

    // Fail fast if the store is unreachable
    db.run_command(bson::doc! { "ping": 1 }).await?;
    tracing::info!(database = %cfg.mongodb.database, "Connected to MongoDB");

    let repo = MongoAuthRepository::new(&db);
    repo.ensure_indexes().await?;
    tracing::info!("Store indexes ensured");

    // Startup cleanup: remove expired sessions.
    // Errors here should not prevent server startup.
    match repo.delete_expired().await {
        Ok(sessions) => {
            tracing::info!(sessions_deleted = sessions, "Session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Session cleanup failed, continuing anyway");
        }
    }

    // Periodic sweep keeps the sessions collection bounded
    let sweep_repo = repo.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        interval.tick().await; // first tick fires immediately; startup already swept
        loop {
            interval.tick().await;
            if let Err(e) = sweep_repo.delete_expired().await {
                tracing::warn!(error = %e, "Periodic session sweep failed");
            }
        }
    });

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]));

    // Build router
    let app = Router::new()
        .merge(auth_router(repo, cfg.auth_config()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
