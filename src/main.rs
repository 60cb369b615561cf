//! # Chatwoot Bridge
//!
//! Mirrors the WhatsApp conversations of each tenant into a Chatwoot inbox and
//! relays the agents' replies back to WhatsApp. Configures logging, storage,
//! WhatsApp sessions, SSL and route handling.
#![recursion_limit = "256"]

pub mod api;
pub mod config;
pub mod consts;
pub mod logger;
pub mod metric;
pub mod models;
pub mod repo;
pub mod server;
pub mod services;
pub mod utils;
pub mod webhook;

use anyhow::Context;
use logfire::config::{MetricsOptions, SendToLogfire};
use ntex::web;
use openssl::ssl::{SslAcceptor, SslFiletype, SslMethod};
use repo::TenantRepo;
use std::sync::Arc;

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    // Initialize configuration
    config::init_config()?;

    let app_config = config::APP_CONFIG
        .get()
        .context("failed to get app config")?;

    // Initialize logging and metrics, exported only when a token is configured
    let mut logfire_config = logfire::configure()
        .install_panic_handler()
        .with_metrics(Some(MetricsOptions::default()))
        .send_to_logfire(SendToLogfire::IfTokenPresent);
    if !app_config.logfire_token.is_empty() {
        logfire_config = logfire_config.with_token(&app_config.logfire_token);
    }
    let shutdown_handler = logfire_config.finish()?;

    // request logs of the ntex Logger middleware go through `log`
    if let Err(e) = logger::setup_simple_logger() {
        logfire::warn!("simple logger not installed: {error}", error = e.to_string());
    }

    // Initialize database connection pool
    let sqlite_repo = repo::sqlite::SqlxSqliteRepo {
        db_pool: utils::setup_sqlite_db_pool(app_config.is_prod()).await?,
    };

    let sessions = Arc::new(services::sessions::SessionMap::new());
    register_whatsapp_sessions(&sqlite_repo, &sessions).await?;

    // Configure and start the web server
    configure_and_run_server(create_app_state(sqlite_repo, sessions)).await?;

    shutdown_handler.shutdown()?;

    Ok(())
}

/// Registers a Cloud API session for every tenant with WhatsApp credentials
async fn register_whatsapp_sessions(
    sqlite_repo: &repo::sqlite::SqlxSqliteRepo,
    sessions: &services::sessions::SessionMap,
) -> anyhow::Result<()> {
    for account in sqlite_repo.get_whatsapp_accounts().await? {
        let session = webhook::whatsapp::client::CloudApiSession::from_account(
            utils::REQUEST_CLIENT.clone(),
            &account,
        )?;
        sessions.register(account.tenant_id, Arc::new(session)).await;
    }

    logfire::info!(
        "{count} whatsapp sessions registered",
        count = sessions.len().await as i64
    );

    Ok(())
}

/// Configures SSL acceptor for production environments
fn setup_ssl_acceptor() -> anyhow::Result<openssl::ssl::SslAcceptorBuilder> {
    let mut ssl_acceptor = SslAcceptor::mozilla_intermediate(SslMethod::tls_server())
        .map_err(|e| anyhow::anyhow!("Failed to create SSL acceptor: {}", e))?;

    let app_config = config::APP_CONFIG
        .get()
        .context("failed to get app config")?;
    ssl_acceptor
        .set_private_key_file(&app_config.private_key_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load private key from {}: {}",
                app_config.private_key_path,
                e
            )
        })?;

    ssl_acceptor
        .set_certificate_file(&app_config.certificate_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load certificate from {}: {}",
                app_config.certificate_path,
                e
            )
        })?;

    Ok(ssl_acceptor)
}

/// Creates application state from the provided services
fn create_app_state(
    sqlite_repo: repo::sqlite::SqlxSqliteRepo,
    sessions: Arc<services::sessions::SessionMap>,
) -> server::AppState {
    let repo: repo::ImplTenantRepo = Arc::new(sqlite_repo);
    let chatwoot: services::ImplChatwootApi = Arc::new(services::chatwoot::ChatwootHandler {
        client: utils::REQUEST_CLIENT.clone(),
    });

    server::AppState {
        relay: api::relay::ChatwootRelay::new(repo.clone(), chatwoot),
        repo,
        sessions,
    }
}

/// Configures and starts the web server with appropriate SSL settings
async fn configure_and_run_server(app_state: server::AppState) -> anyhow::Result<()> {
    let app_config = config::APP_CONFIG
        .get()
        .context("failed to get app config")?;
    let server_addr = (
        app_config.web_server_host.clone(),
        app_config.web_server_port,
    );

    let server = web::server(move || {
        web::App::new()
            .wrap(web::middleware::Logger::default())
            .wrap(web::middleware::Compress::default())
            .state(app_state.clone())
            .configure(server::routes::chatwoot_config)
            .configure(server::routes::events)
            .configure(webhook::routes::chatwoot)
            .configure(webhook::routes::whatsapp)
            .default_service(web::route().to(server::serve_not_found))
    });

    logfire::info!(
        "Chatwoot bridge listening on {host}:{port}",
        host = server_addr.0.clone(),
        port = i64::from(server_addr.1)
    );

    let bound_server = if app_config.is_prod() {
        let ssl_acceptor = setup_ssl_acceptor()?;
        server.bind_openssl(server_addr, ssl_acceptor)?
    } else {
        server.bind(server_addr)?
    };

    bound_server
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
