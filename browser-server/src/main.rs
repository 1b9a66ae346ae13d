use anyhow::Context;
use axum_schema_browser::{Browser, PostgresExecutor};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod app;
mod config;

use config::Config;

/// Initialize the tracing subscriber for logging
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber.with(fmt::layer().json()).init();
    } else {
        subscriber.with(fmt::layer().with_target(true)).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing(&config);

    info!(
        host = %config.db_host,
        port = config.db_port,
        database = %config.db_name,
        ssl_mode = ?config.db_ssl_mode,
        "connecting to PostgreSQL"
    );

    // Created once here and shared by every request until shutdown
    let pool = config
        .pool_options()
        .after_connect(|_connection, metadata| {
            Box::pin(async move {
                debug!(age = ?metadata.age, "opened database connection");
                Ok(())
            })
        })
        .connect_with(config.connect_options())
        .await
        .with_context(|| {
            format!(
                "failed to connect to {}:{}/{}",
                config.db_host, config.db_port, config.db_name
            )
        })?;

    info!("connected to PostgreSQL");

    let browser = Browser::new(PostgresExecutor::new(pool.clone()));
    let application = app::build_app(&config.base_path, browser);

    let address = config.listen_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind to {}", address))?;

    info!(
        address = %address,
        base_path = %config.base_path,
        "schema browser listening"
    );

    axum::serve(listener, application)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    info!("shut down");

    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
