//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with both webhook handlers
//! - Wire up middleware (log ids, tracing)
//! - Serve over plain TCP or rustls
//! - Stop accepting on the shutdown signal

use axum::{body::Body, extract::DefaultBodyLimit, http::Request, routing::any, Router};
use axum_server::tls_rustls::RustlsConfig;
use std::future::IntoFuture;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::accounts::SharedDirectory;
use crate::config::FaxmeConfig;
use crate::http::request::{log_id, LogIdMaker};
use crate::http::response::COMPLETION_PATH;
use crate::http::webhook::{completion_handler, decision_handler};
use crate::notify::{MessagingTransport, NotificationDispatcher};
use crate::security::RequestAuthenticator;

/// Path of the decision endpoint.
pub const DECISION_PATH: &str = "/fax/receive";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<SharedDirectory>,
    pub authenticator: Arc<RequestAuthenticator>,
    pub dispatcher: NotificationDispatcher,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn from_config(
        config: &FaxmeConfig,
        directory: Arc<SharedDirectory>,
        transport: Arc<dyn MessagingTransport>,
    ) -> Self {
        Self {
            directory,
            authenticator: Arc::new(RequestAuthenticator::from_config(config)),
            dispatcher: NotificationDispatcher::new(transport),
            max_body_bytes: config.max_body_bytes,
        }
    }
}

/// HTTP server for the fax webhooks.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Routes accept any method; the webhook extractor answers non-POST
    /// requests with 404.
    fn build_router(state: AppState) -> Router {
        let body_limit = DefaultBodyLimit::max(state.max_body_bytes);
        let trace = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    log_id = %log_id(request),
                )
            })
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO));

        Router::new()
            .route(DECISION_PATH, any(decision_handler))
            .route(COMPLETION_PATH, any(completion_handler))
            .layer(body_limit)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(LogIdMaker::default()))
                    .layer(trace)
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// The fully layered router, for serving or driving directly in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve plain HTTP until `shutdown` fires. In-flight requests are not drained.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        tokio::select! {
            res = axum::serve(listener, self.router).into_future() => res?,
            _ = shutdown.recv() => {
                tracing::info!("Shutdown signal received, no longer accepting");
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve HTTPS on `listener` until `shutdown` fires.
    pub async fn run_tls(
        self,
        listener: std::net::TcpListener,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        listener.set_nonblocking(true)?;
        tracing::info!(address = %addr, "HTTPS server starting");

        let handle = axum_server::Handle::new();
        let stop = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            tracing::info!("Shutdown signal received, no longer accepting");
            stop.shutdown();
        });

        axum_server::from_tcp_rustls(listener, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}
