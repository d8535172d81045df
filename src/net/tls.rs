//! TLS certificate loading.

use axum_server::tls_rustls::RustlsConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TlsError {
    #[error("certificate file not found: {0}")]
    CertNotFound(PathBuf),

    #[error("private key file not found: {0}")]
    KeyNotFound(PathBuf),

    #[error("failed to load TLS material: {0}")]
    Load(#[from] std::io::Error),
}

/// Load a rustls server config from PEM certificate chain and key files.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, TlsError> {
    if !cert_path.exists() {
        return Err(TlsError::CertNotFound(cert_path.to_path_buf()));
    }
    if !key_path.exists() {
        return Err(TlsError::KeyNotFound(key_path.to_path_buf()));
    }

    tracing::debug!(cert = %cert_path.display(), key = %key_path.display(), "Loading TLS material");
    Ok(RustlsConfig::from_pem_file(cert_path, key_path).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_files() {
        let key = tempfile::NamedTempFile::new().unwrap();

        let err = load_tls_config(Path::new("/nonexistent/cert.pem"), key.path())
            .await
            .unwrap_err();
        assert!(matches!(err, TlsError::CertNotFound(_)));

        let err = load_tls_config(key.path(), Path::new("/nonexistent/key.pem"))
            .await
            .unwrap_err();
        assert!(matches!(err, TlsError::KeyNotFound(_)));
    }

    #[tokio::test]
    async fn test_garbage_pem_is_error() {
        let cert = tempfile::NamedTempFile::new().unwrap();
        let key = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(cert.path(), "not a certificate").unwrap();
        std::fs::write(key.path(), "not a key").unwrap();

        let err = load_tls_config(cert.path(), key.path()).await.unwrap_err();
        assert!(matches!(err, TlsError::Load(_)));
    }
}
