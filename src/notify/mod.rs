//! Fax-arrival notifications.
//!
//! # Data Flow
//! ```text
//! completion webhook (account, media url)
//!     → dispatcher.rs (one message per contact, in order)
//!     → transport.rs (Twilio REST API)
//! ```

pub mod dispatcher;
pub mod transport;

pub use dispatcher::{fax_message, DispatchOutcome, NotificationDispatcher};
pub use transport::{MessagingTransport, TransportError, TwilioTransport};
