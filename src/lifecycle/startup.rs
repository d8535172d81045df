//! Startup orchestration.
//!
//! # Order
//! 1. Startup policy (credentials, TLS, messaging account)
//! 2. Messaging transport
//! 3. Initial account directory load
//! 4. Background directory refresher
//! 5. Metrics endpoint (optional)
//! 6. Listener, plain or TLS
//!
//! Any failure before the listener starts is fatal.

use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::accounts::{
    DirectoryError, DirectoryLoader, DirectoryRefresher, SharedDirectory, REFRESH_INTERVAL,
};
use crate::config::{validate_config, FaxmeConfig, StartupError};
use crate::http::{AppState, HttpServer};
use crate::lifecycle::shutdown::Shutdown;
use crate::net::{load_tls_config, TlsError};
use crate::notify::{MessagingTransport, TransportError, TwilioTransport};
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] StartupError),

    #[error("failed to load accounts: {0}")]
    Directory(#[from] DirectoryError),

    #[error("failed to build messaging client: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Validate, load, and serve until `shutdown` fires.
pub async fn run(config: FaxmeConfig, shutdown: Shutdown) -> Result<(), RunError> {
    tracing::info!("faxme server started");
    let refresher_shutdown = shutdown.subscribe();
    let server_shutdown = shutdown.subscribe();

    let posture = validate_config(&config).inspect_err(|e| tracing::error!("{}", e))?;
    tracing::info!(
        basic_auth = posture.basic_auth,
        tls = posture.tls,
        request_validation = posture.request_validation,
        "Security posture"
    );

    let transport: Arc<dyn MessagingTransport> = Arc::new(TwilioTransport::from_config(&config)?);

    let loader = DirectoryLoader::from_config(&config);
    tracing::info!(every = ?REFRESH_INTERVAL, path = %config.accounts_file, "load accounts");
    let initial = loader
        .load()
        .await
        .inspect_err(|e| tracing::error!(path = %config.accounts_file, error = %e, "failed load accounts"))?;
    tracing::info!(accounts = initial.len(), "Account directory loaded");
    let directory = Arc::new(SharedDirectory::new(initial));

    let refresher = DirectoryRefresher::new(directory.clone(), loader, REFRESH_INTERVAL);
    tokio::spawn(refresher.run(refresher_shutdown));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = HttpServer::new(AppState::from_config(&config, directory, transport));
    let addr = config.bind_address();

    if posture.tls {
        let tls = load_tls_config(
            Path::new(&config.tls_cert_file),
            Path::new(&config.tls_key_file),
        )
        .await?;
        let listener = std::net::TcpListener::bind(&addr)?;
        tracing::info!(addr = %addr, "HTTPS server listening");
        server.run_tls(listener, tls, server_shutdown).await?;
    } else {
        let listener = TcpListener::bind(&addr).await?;
        tracing::warn!(addr = %addr, "WARNING: unencrypted HTTP server listening");
        server.run(listener, server_shutdown).await?;
    }

    shutdown.trigger();
    tracing::info!("faxme server stopped");
    Ok(())
}
