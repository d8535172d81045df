//! Webhook origin signature validation.
//!
//! Twilio signs every webhook with HMAC-SHA1 keyed by the account auth token:
//! the full URL it called, followed by each POST parameter name and value,
//! parameters sorted by name. The base64 digest arrives in
//! `X-Twilio-Signature`.

use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;
use tracing::warn;

type HmacSha1 = Hmac<Sha1>;

pub const SIGNATURE_HEADER: &str = "x-twilio-signature";

/// Decides whether a webhook call came from the expected sender.
pub trait OriginVerifier: Send + Sync {
    /// `url` is the effective URL the sender called, `params` the decoded form
    /// body in wire order, `signature` the value of the signature header.
    fn verify(&self, url: &str, params: &[(String, String)], signature: Option<&str>) -> bool;
}

/// Twilio request validator.
#[derive(Clone)]
pub struct TwilioSignature {
    auth_token: String,
}

impl TwilioSignature {
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
        }
    }
}

impl OriginVerifier for TwilioSignature {
    fn verify(&self, url: &str, params: &[(String, String)], signature: Option<&str>) -> bool {
        let Some(signature) = signature.filter(|s| !s.is_empty()) else {
            warn!(url = %url, "missing Twilio signature");
            return false;
        };

        let Some(expected) = compute_signature(&self.auth_token, url, params) else {
            warn!("invalid Twilio auth token");
            return false;
        };

        let valid = bool::from(expected.as_bytes().ct_eq(signature.as_bytes()));
        if !valid {
            warn!(
                url = %url,
                expected_length = expected.len(),
                actual_length = signature.len(),
                "Twilio signature mismatch"
            );
        }
        valid
    }
}

/// Compute the base64 signature Twilio would send for this request.
pub fn compute_signature(auth_token: &str, url: &str, params: &[(String, String)]) -> Option<String> {
    let mut mac = HmacSha1::new_from_slice(auth_token.as_bytes()).ok()?;
    mac.update(url.as_bytes());

    // Stable sort: repeated names keep their wire order.
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    for (name, value) in sorted {
        mac.update(name.as_bytes());
        mac.update(value.as_bytes());
    }

    Some(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}
