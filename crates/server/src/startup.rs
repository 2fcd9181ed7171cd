use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use configs::AppConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::session::MemorySessionStore;
use service::upload::UploadStore;
use service::user_service;

use crate::routes;
use crate::state::AppState;

/// Public URL prefix for uploaded pictures.
pub const UPLOAD_PREFIX: &str = "/upload";

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Create the configured admin account when it does not exist yet.
async fn bootstrap_admin(db: &DatabaseConnection, cfg: &AppConfig) -> anyhow::Result<()> {
    let Some(admin) = &cfg.admin else {
        warn!("no [admin] section or ADMIN_USER_ID/ADMIN_PASSWORD; admin console needs an existing admin account");
        return Ok(());
    };
    let created = user_service::ensure_admin(db, &admin.user_id, &admin.user_name, &admin.password).await?;
    info!(user_id = %admin.user_id, created, "admin bootstrap");
    Ok(())
}

/// Connect, migrate and assemble the handler state described by `cfg`.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<AppState> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    bootstrap_admin(&db, cfg).await?;

    common::env::ensure_env(&cfg.upload.dir).await?;
    let uploads = UploadStore::new(&cfg.upload.dir, UPLOAD_PREFIX, cfg.upload.max_bytes);
    let sessions = MemorySessionStore::new(
        Duration::from_secs(cfg.session.idle_timeout_secs),
        cfg.session.max_sessions,
    );

    Ok(AppState {
        db,
        sessions: Arc::new(sessions),
        uploads: Arc::new(uploads),
        cookie_name: Arc::from(cfg.session.cookie_name.as_str()),
    })
}

pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let state = build_state(cfg).await?;
    Ok(routes::build_router(state, build_cors()))
}

/// Serve with an already loaded configuration.
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;
    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting venue booking server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Public entry: load configuration, build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = AppConfig::load_or_env()?;
    run_with_config(cfg).await
}
