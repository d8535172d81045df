//! Configuration loading and overlay.
//!
//! Sources are applied from lowest to highest priority:
//! defaults, TOML file, environment, command line.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::cli::Cli;
use crate::config::schema::FaxmeConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid HTTP port {0:?}")]
    InvalidPort(String),
}

/// Environment variables recognised by the overlay.
const ENV_KEYS: &[&str] = &[
    "FAXME_HTTP_BIND_ADDRESS",
    "FAXME_HTTP_PORT",
    "FAXME_HTTP_USER",
    "FAXME_HTTP_PWD",
    "FAXME_TLS_CERT_FILE",
    "FAXME_TLS_KEY_FILE",
    "FAXME_FAX_NUMBER",
    "FAXME_MOBILE_NUMBER",
    "FAXME_ACCOUNTS_FILE",
    "FAXME_TWILIO_SID",
    "FAXME_TWILIO_TOKEN",
    "FAXME_PUBLIC_URL",
];

fn env_field<'a>(config: &'a mut FaxmeConfig, key: &str) -> Option<&'a mut String> {
    let field = match key {
        "FAXME_HTTP_BIND_ADDRESS" => &mut config.http_bind_address,
        "FAXME_HTTP_PORT" => &mut config.http_port,
        "FAXME_HTTP_USER" => &mut config.http_user,
        "FAXME_HTTP_PWD" => &mut config.http_pwd,
        "FAXME_TLS_CERT_FILE" => &mut config.tls_cert_file,
        "FAXME_TLS_KEY_FILE" => &mut config.tls_key_file,
        "FAXME_FAX_NUMBER" => &mut config.fax_number,
        "FAXME_MOBILE_NUMBER" => &mut config.sms_number,
        "FAXME_ACCOUNTS_FILE" => &mut config.accounts_file,
        "FAXME_TWILIO_SID" => &mut config.twilio_sid,
        "FAXME_TWILIO_TOKEN" => &mut config.twilio_token,
        "FAXME_PUBLIC_URL" => &mut config.public_url,
        _ => return None,
    };
    Some(field)
}

/// Load a TOML file. A missing file yields the defaults.
pub fn load_file(path: &Path) -> Result<FaxmeConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(FaxmeConfig::default());
        }
        Err(e) => {
            return Err(ConfigError::Io {
                path: path.display().to_string(),
                source: e,
            })
        }
    };

    Ok(toml::from_str(&content)?)
}

/// Overlay environment values onto `config`. Unset and empty values are ignored.
pub fn apply_env<F>(config: &mut FaxmeConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for key in ENV_KEYS {
        if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
            if let Some(field) = env_field(config, key) {
                *field = value;
            }
        }
    }
}

/// Build the effective configuration: file, then process environment, then `cli`.
pub fn load_config(cli: &Cli) -> Result<FaxmeConfig, ConfigError> {
    let mut config = load_file(cli.config_path())?;
    apply_env(&mut config, |key| std::env::var(key).ok());
    cli.overlay(&mut config);

    if config.http_port.parse::<u16>().is_err() {
        return Err(ConfigError::InvalidPort(config.http_port));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_default() {
        let cfg = load_file(Path::new("/nonexistent/faxme.toml")).unwrap();
        assert_eq!(cfg.http_port, "7500");
    }

    #[test]
    fn test_malformed_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "http-port = [").unwrap();
        assert!(matches!(load_file(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_env_overlays_file() {
        let mut cfg = FaxmeConfig {
            http_user: "file-user".into(),
            http_pwd: "file-pwd".into(),
            ..FaxmeConfig::default()
        };
        let env: HashMap<&str, &str> = [
            ("FAXME_HTTP_USER", "env-user"),
            ("FAXME_HTTP_PWD", ""),
            ("FAXME_MOBILE_NUMBER", "14443332222"),
        ]
        .into_iter()
        .collect();

        apply_env(&mut cfg, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.http_user, "env-user");
        assert_eq!(cfg.http_pwd, "file-pwd");
        assert_eq!(cfg.sms_number, "14443332222");
    }

    #[test]
    fn test_load_config_precedence() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "http-port = \"9000\"\nfax-number = \"111\"\n").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::try_parse_from(["faxme", "--config", &path, "--fax", "222"]).unwrap();
        let cfg = load_config(&cli).unwrap();

        assert_eq!(cfg.http_port, "9000");
        assert_eq!(cfg.fax_number, "222");
    }

    #[test]
    fn test_invalid_port() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "http-port = \"seventy\"\n").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::try_parse_from(["faxme", "--config", &path]).unwrap();
        assert!(matches!(load_config(&cli), Err(ConfigError::InvalidPort(_))));
    }
}
