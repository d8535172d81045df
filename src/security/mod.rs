//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming webhook:
//!     → credentials.rs (HTTP Basic, constant-time compare)
//!     → signature.rs (Twilio HMAC-SHA1 over URL + form)
//!     → authenticator.rs (composes both, each optional)
//!     → Pass to webhook handler
//! ```
//!
//! # Design Decisions
//! - Fail closed: absent or malformed credentials are a mismatch
//! - Gates are independent; disabling one never weakens the other

pub mod authenticator;
pub mod credentials;
pub mod signature;

pub use authenticator::{AuthError, RequestAuthenticator};
pub use credentials::{Credentials, REALM};
pub use signature::{compute_signature, OriginVerifier, TwilioSignature, SIGNATURE_HEADER};
