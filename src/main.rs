// src/main.rs
use axum::{extract::Extension, middleware, Router};
use dotenv::dotenv;
use reqwest::Client;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::PathBuf;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod auth;
mod common;
mod interviews;
mod logging_middleware;
mod notifications;
mod services;
mod users;

// ============================================================================
// COMMON IMPORTS
// ============================================================================

use common::config::{AppConfig, StoreBackend};
use common::{AppState, Clock, SystemClock};
use interviews::{InterviewStore, SqliteInterviewStore};
use notifications::{
    build_mailer, EmailConfig, EvictionPolicy, InMemoryReminderCache, MailerUnavailable,
    NotificationComposer, NotificationService, ReminderEngine,
};
use services::RemoteStoreClient;
use users::{SqliteUserDirectory, UserDirectory};

/// All API routes with the shared state attached
pub fn app_router(shared: Arc<RwLock<AppState>>) -> Router {
    Router::new()
        // ====================================================================
        // INTERVIEW ROUTES
        // ====================================================================
        .merge(interviews::interviews_routes())
        // ====================================================================
        // USER DIRECTORY ROUTES
        // ====================================================================
        .merge(users::users_routes())
        // ====================================================================
        // NOTIFICATION ROUTES (On-demand and cron)
        // ====================================================================
        .merge(notifications::notifications_routes())
        .layer(Extension(shared))
}

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let config = AppConfig::from_env()?;

    if config.cron_secret.is_none() {
        warn!("CRON_SECRET not set, the reminder trigger accepts unauthenticated calls");
    }
    info!(timezone = %config.display_timezone, "Email dates rendered in display timezone");

    let http_client = Client::builder().build()?;

    // ========================================================================
    // STORE SETUP
    // ========================================================================

    let (interview_store, user_directory): (Arc<dyn InterviewStore>, Arc<dyn UserDirectory>) =
        match &config.store_backend {
            StoreBackend::Sqlite => {
                if let Some(path_part) = config.database_url.strip_prefix("sqlite://") {
                    let path_without_params = path_part.split('?').next().unwrap_or("");
                    if !path_without_params.is_empty() && !path_without_params.starts_with(':') {
                        let db_path = PathBuf::from(path_without_params);
                        if let Some(parent) = db_path.parent() {
                            if !parent.as_os_str().is_empty() {
                                tokio::fs::create_dir_all(parent).await?;
                            }
                        }
                    }
                }

                let connect_options =
                    SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
                let pool = SqlitePoolOptions::new()
                    .connect_with(connect_options)
                    .await?;

                common::migrations::run_migrations(&pool).await?;
                info!("Using local SQLite store");

                (
                    Arc::new(SqliteInterviewStore::new(pool.clone())),
                    Arc::new(SqliteUserDirectory::new(pool)),
                )
            }
            StoreBackend::Remote {
                base_url,
                access_token,
            } => {
                info!(base_url = %base_url, "Using remote document store");
                let client = Arc::new(RemoteStoreClient::new(
                    http_client.clone(),
                    base_url,
                    access_token.clone(),
                ));
                (client.clone(), client)
            }
        };

    // ========================================================================
    // NOTIFICATION SETUP
    // ========================================================================

    let mailer = match EmailConfig::from_env() {
        Ok(email_config) => build_mailer(&email_config, http_client.clone())
            .map_err(|e| MailerUnavailable::Build(e.to_string())),
        Err(e) => Err(MailerUnavailable::Config(e)),
    };
    match &mailer {
        Ok(m) => info!(provider = m.provider(), "Email transport configured"),
        Err(e) => error!(error = %e, "Email transport unavailable, notification calls will fail"),
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let composer = NotificationComposer::new(config.display_timezone);
    let reminder_engine = ReminderEngine::new(
        interview_store.clone(),
        user_directory.clone(),
        Arc::new(InMemoryReminderCache::new(EvictionPolicy::default())),
        composer,
        clock.clone(),
    );
    let notification_service = NotificationService::new(mailer, composer, reminder_engine);

    if let Some(period) = config.reminder_scan_interval {
        notification_service.start_reminder_ticker(period);
    }

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let app_state = AppState {
        jwt_secret: config.jwt_secret.clone(),
        cron_secret: config.cron_secret.clone(),
        clock,
        interviews: interview_store,
        users: user_directory,
        notifications: notification_service,
    };

    let shared = Arc::new(RwLock::new(app_state));

    // ========================================================================
    // ROUTER COMPOSITION
    // ========================================================================

    let origins: Vec<axum::http::HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let app = app_router(shared)
        // ====================================================================
        // MIDDLEWARE AND LAYERS
        // ====================================================================
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PUT,
                    axum::http::Method::PATCH,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::AUTHORIZATION,
                ])
                .allow_credentials(true),
        )
        .layer(TraceLayer::new_for_http());

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
