//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, log id, trace span)
//!     → webhook.rs (method, credentials, signature, `to`)
//!     → account directory lookup
//!     → response.rs (receive/reject directive) or notification fan-out
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod webhook;

pub use request::{LogIdMaker, X_REQUEST_ID};
pub use response::{FaxDirective, COMPLETION_PATH};
pub use server::{AppState, HttpServer, DECISION_PATH};
pub use webhook::{WebhookError, WebhookRequest};
