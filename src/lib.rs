//! faxme: relays received faxes to SMS contacts.
//!
//! Twilio calls the decision webhook when a fax is inbound and the completion
//! webhook once it has been stored. Known fax numbers are accepted and every
//! contact on the account is texted a link to the document.

// Core subsystems
pub mod accounts;
pub mod config;
pub mod http;
pub mod notify;

// Cross-cutting concerns
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod security;

pub use accounts::{Account, AccountDirectory, SharedDirectory};
pub use config::FaxmeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
