//! Composition of the two request gates.
//!
//! Each gate is optional on its own. Whether a missing gate is acceptable is
//! decided once at startup by `config::validation`, not here.

use axum::http::HeaderMap;
use std::sync::Arc;
use thiserror::Error;

use crate::config::FaxmeConfig;
use crate::security::credentials::Credentials;
use crate::security::signature::{OriginVerifier, TwilioSignature, SIGNATURE_HEADER};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid transport credentials")]
    Credentials,

    #[error("request signature validation failed")]
    Signature,
}

#[derive(Clone)]
pub struct RequestAuthenticator {
    credentials: Option<Credentials>,
    origin: Option<Arc<dyn OriginVerifier>>,
    public_url: String,
}

impl RequestAuthenticator {
    pub fn new(
        credentials: Option<Credentials>,
        origin: Option<Arc<dyn OriginVerifier>>,
        public_url: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            origin,
            public_url: public_url.into(),
        }
    }

    /// Credentials when both user and password are configured; Twilio
    /// signatures unless `skip-req-val` was given.
    pub fn from_config(config: &FaxmeConfig) -> Self {
        let credentials = config
            .has_credentials()
            .then(|| Credentials::new(config.http_user.clone(), config.http_pwd.clone()));

        let origin = (!config.skip_request_validation).then(|| {
            Arc::new(TwilioSignature::new(config.twilio_token.clone())) as Arc<dyn OriginVerifier>
        });

        Self::new(credentials, origin, config.effective_public_url())
    }

    /// Transport credential gate. Passes when no credentials are configured.
    pub fn check_transport(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        match &self.credentials {
            Some(credentials) if !credentials.check(headers) => Err(AuthError::Credentials),
            _ => Ok(()),
        }
    }

    /// Origin signature gate over the effective URL and form parameters.
    /// Passes when validation is skipped.
    pub fn check_origin(
        &self,
        path_and_query: &str,
        headers: &HeaderMap,
        params: &[(String, String)],
    ) -> Result<(), AuthError> {
        let Some(origin) = &self.origin else {
            return Ok(());
        };

        let url = format!("{}{}", self.public_url, path_and_query);
        let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());

        if origin.verify(&url, params, signature) {
            Ok(())
        } else {
            Err(AuthError::Signature)
        }
    }
}
