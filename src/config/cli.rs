//! Command-line flags.
//!
//! Flag names match the long-standing single-dash options (`-unsafe`,
//! `-skip-req-val`) as double-dash long options.

use clap::Parser;
use std::path::Path;

use crate::config::schema::{FaxmeConfig, DEFAULT_CONFIG_FILE};

#[derive(Debug, Default, Parser)]
#[command(name = "faxme")]
#[command(about = "Relays received faxes to SMS contacts", long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// HTTP bind address
    #[arg(long = "http")]
    pub http_bind_address: Option<String>,

    /// HTTP port
    #[arg(long)]
    pub port: Option<String>,

    /// Username expected when authenticating HTTP requests
    #[arg(long)]
    pub user: Option<String>,

    /// User password expected when authenticating HTTP requests
    #[arg(long)]
    pub pwd: Option<String>,

    /// Path to TLS cert file
    #[arg(long)]
    pub tlscert: Option<String>,

    /// Path to TLS key file
    #[arg(long)]
    pub tlskey: Option<String>,

    /// Must be specified if not using TLS or basic auth
    #[arg(long = "unsafe")]
    pub unsafe_mode: bool,

    /// Your fax number
    #[arg(long)]
    pub fax: Option<String>,

    /// Your mobile number
    #[arg(long)]
    pub sms: Option<String>,

    /// Fax account file
    #[arg(long)]
    pub accounts: Option<String>,

    /// Twilio SID
    #[arg(long)]
    pub sid: Option<String>,

    /// Twilio token
    #[arg(long)]
    pub token: Option<String>,

    /// Public base URL Twilio uses to call this server
    #[arg(long)]
    pub public_url: Option<String>,

    /// Skips HTTP request validation
    #[arg(long = "skip-req-val")]
    pub skip_request_validation: bool,
}

impl Cli {
    pub fn config_path(&self) -> &Path {
        Path::new(&self.config)
    }

    /// Apply command-line values on top of `config`. Empty strings never override.
    pub fn overlay(&self, config: &mut FaxmeConfig) {
        overlay(&mut config.http_bind_address, &self.http_bind_address);
        overlay(&mut config.http_port, &self.port);
        overlay(&mut config.http_user, &self.user);
        overlay(&mut config.http_pwd, &self.pwd);
        overlay(&mut config.tls_cert_file, &self.tlscert);
        overlay(&mut config.tls_key_file, &self.tlskey);
        overlay(&mut config.fax_number, &self.fax);
        overlay(&mut config.sms_number, &self.sms);
        overlay(&mut config.accounts_file, &self.accounts);
        overlay(&mut config.twilio_sid, &self.sid);
        overlay(&mut config.twilio_token, &self.token);
        overlay(&mut config.public_url, &self.public_url);
        config.unsafe_mode = self.unsafe_mode;
        config.skip_request_validation = self.skip_request_validation;
    }
}

fn overlay(current: &mut String, new: &Option<String>) {
    if let Some(value) = new.as_deref().filter(|v| !v.is_empty()) {
        *current = value.to_string();
    }
}
