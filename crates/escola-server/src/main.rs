//! Escola server binary.
//!
//! Loads credentials and configuration, starts an axum HTTP server with
//! structured logging over the record gateway, and shuts down gracefully on
//! SIGTERM/SIGINT.

use escola_server::{app, config, AppState};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("ESCOLA_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

fn resolve_cred_path() -> PathBuf {
    std::env::var("ESCOLA_CRED_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_CRED_PATH))
}

#[tokio::main]
async fn main() {
    let cred_path = resolve_cred_path();
    let credentials = config::Credentials::read(&cred_path)
        .expect("failed to load credentials file: fix or remove it");
    let cred_loaded = credentials.is_some();
    let credentials = credentials.unwrap_or_default();

    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("config.toml"));

    let config = config::load_config(selected_config_path, &credentials)
        .expect("failed to load configuration: the server cannot start without valid config");

    // Initialize tracing
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        credentials = %cred_path.display(),
        credentials_loaded = cred_loaded,
        "resolved startup configuration"
    );

    let ignored = config::ignored_network_keys(|key| credentials.lookup(key));
    if !ignored.is_empty() {
        tracing::warn!(
            keys = ?ignored,
            db_path = %config.database.path,
            "network store settings have no effect on a file store; ignoring them"
        );
    }

    // Initialize database
    let gateway = escola_db::Gateway::connect(&config.database.settings())
        .expect("failed to create database pool: check database.path in config");

    {
        let conn = gateway
            .pool()
            .get()
            .expect("failed to get database connection for schema check");
        if config.database.bootstrap_schema {
            let created = escola_db::ensure_schema(&conn).expect("failed to bootstrap schema");
            if created > 0 {
                tracing::info!(count = created, "created missing tables");
            }
        } else {
            match escola_db::missing_tables(&conn) {
                Ok(missing) if !missing.is_empty() => {
                    tracing::warn!(
                        tables = ?missing,
                        "store is missing tables; requests touching them will fail"
                    );
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "could not inspect store schema"),
            }
        }
    }

    // Build application
    let app = app(AppState { gateway });
    let addr = SocketAddr::new(config.server.host, config.server.port);

    tracing::info!(%addr, "starting escola server");

    let listener = TcpListener::bind(addr)
        .await
        .expect("failed to bind to address: is another process using this port?");

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("escola server shut down");
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT, initiating graceful shutdown"); }
        () = terminate => { tracing::info!("received SIGTERM, initiating graceful shutdown"); }
    }
}
