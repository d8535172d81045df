//! Startup safety policy.
//!
//! # Responsibilities
//! - Require messaging credentials
//! - Refuse to serve without transport credentials unless `unsafe` is set
//! - Refuse to serve without TLS unless `unsafe` is set
//!
//! # Design Decisions
//! - Checks run once before the listener binds; none of them are per-request
//! - The first failing check is reported

use thiserror::Error;

use crate::config::schema::FaxmeConfig;

/// Fatal configuration problems detected before serving.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StartupError {
    #[error("Twilio SID must be configured")]
    MissingTwilioSid,

    #[error("Twilio Token must be configured")]
    MissingTwilioToken,

    #[error("provide username and password in config or specify '--unsafe' command line option")]
    MissingCredentials,

    #[error("provide both TLS cert and key file, only one was configured")]
    IncompleteTls,

    #[error("provide TLS cert and key file in config or specify '--unsafe' command line option")]
    MissingTls,
}

/// Which protections the server will run with once validation passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityPosture {
    pub basic_auth: bool,
    pub tls: bool,
    pub request_validation: bool,
}

/// Validate the configuration against the startup policy.
pub fn validate_config(config: &FaxmeConfig) -> Result<SecurityPosture, StartupError> {
    if config.twilio_sid.is_empty() {
        return Err(StartupError::MissingTwilioSid);
    }
    if config.twilio_token.is_empty() {
        return Err(StartupError::MissingTwilioToken);
    }

    let basic_auth = config.has_credentials();
    if !basic_auth {
        if !config.unsafe_mode {
            return Err(StartupError::MissingCredentials);
        }
        tracing::warn!("WARNING: no user credentials provided in configuration and running in unsafe mode");
    }

    if config.tls_cert_file.is_empty() != config.tls_key_file.is_empty() {
        return Err(StartupError::IncompleteTls);
    }

    let tls = config.has_tls();
    if !tls && !config.unsafe_mode {
        return Err(StartupError::MissingTls);
    }

    if config.skip_request_validation {
        tracing::warn!("WARNING: webhook request signature validation is disabled");
    }

    Ok(SecurityPosture {
        basic_auth,
        tls,
        request_validation: !config.skip_request_validation,
    })
}
