//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → tls.rs (rustls handshake, when cert and key are configured)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - TLS is optional only in unsafe mode; the startup policy enforces it
//! - Certificates are loaded once at startup

pub mod tls;

pub use tls::{load_tls_config, TlsError};
