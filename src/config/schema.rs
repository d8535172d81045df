//! Configuration schema definitions.
//!
//! Keys are kebab-case so existing `faxme.toml` files keep working.
//! Every field has a default, which lets a minimal file (or no file at all)
//! be overlaid by environment and command line values.

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "/etc/faxme/faxme.toml";
pub const DEFAULT_HTTP_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: &str = "7500";

/// Root configuration for the fax relay.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FaxmeConfig {
    /// Address the webhook listener binds to.
    pub http_bind_address: String,

    /// Port the webhook listener binds to.
    pub http_port: String,

    /// Username expected in HTTP Basic credentials.
    pub http_user: String,

    /// Password expected in HTTP Basic credentials.
    pub http_pwd: String,

    /// Path to certificate file (PEM).
    pub tls_cert_file: String,

    /// Path to private key file (PEM).
    pub tls_key_file: String,

    /// Operator fax number for the synthetic account.
    pub fax_number: String,

    /// Mobile number notified for the synthetic account.
    #[serde(rename = "mobile-number")]
    pub sms_number: String,

    /// JSON file holding the fax accounts.
    pub accounts_file: String,

    /// Twilio account SID.
    pub twilio_sid: String,

    /// Twilio auth token. Also the shared secret for request signatures.
    pub twilio_token: String,

    /// Base URL the webhook sender uses to reach this server.
    pub public_url: String,

    /// Twilio REST API base URL.
    pub twilio_api_url: String,

    /// Timeout for a single outbound message request.
    pub twilio_timeout_secs: u64,

    /// Largest accepted webhook body.
    pub max_body_bytes: usize,

    /// Serve without credentials or TLS. Command line only.
    #[serde(skip)]
    pub unsafe_mode: bool,

    /// Skip origin signature validation. Command line only.
    #[serde(skip)]
    pub skip_request_validation: bool,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for FaxmeConfig {
    fn default() -> Self {
        Self {
            http_bind_address: DEFAULT_HTTP_BIND_ADDRESS.to_string(),
            http_port: DEFAULT_HTTP_PORT.to_string(),
            http_user: String::new(),
            http_pwd: String::new(),
            tls_cert_file: String::new(),
            tls_key_file: String::new(),
            fax_number: String::new(),
            sms_number: String::new(),
            accounts_file: String::new(),
            twilio_sid: String::new(),
            twilio_token: String::new(),
            public_url: String::new(),
            twilio_api_url: "https://api.twilio.com".to_string(),
            twilio_timeout_secs: 30,
            max_body_bytes: 1024 * 1024,
            unsafe_mode: false,
            skip_request_validation: false,
            observability: ObservabilityConfig::default(),
        }
    }
}

impl FaxmeConfig {
    /// `host:port` string handed to the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http_bind_address, self.http_port)
    }

    pub fn has_credentials(&self) -> bool {
        !self.http_user.is_empty() && !self.http_pwd.is_empty()
    }

    pub fn has_tls(&self) -> bool {
        !self.tls_cert_file.is_empty() && !self.tls_key_file.is_empty()
    }

    /// Base URL used when rebuilding the URL a webhook was signed over.
    ///
    /// Falls back to the listener address when `public-url` is unset.
    pub fn effective_public_url(&self) -> String {
        if !self.public_url.is_empty() {
            return self.public_url.trim_end_matches('/').to_string();
        }
        let scheme = if self.has_tls() { "https" } else { "http" };
        format!("{}://{}", scheme, self.bind_address())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Pretty for terminals, json for log shipping.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
