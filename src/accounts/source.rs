//! Account record sources and snapshot construction.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::accounts::directory::{Account, AccountDirectory};
use crate::config::FaxmeConfig;

/// Failure to read account records.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("failed to read accounts file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed accounts file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("account source unavailable: {0}")]
    Unavailable(String),
}

/// Somewhere account records can be read from, in order.
#[async_trait]
pub trait AccountSource: Send + Sync {
    async fn load(&self) -> Result<Vec<Account>, DirectoryError>;
}

/// A JSON array of `{"fax_number": ..., "contacts": [...]}` objects on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AccountSource for JsonFileSource {
    async fn load(&self) -> Result<Vec<Account>, DirectoryError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| DirectoryError::Io {
                path: self.path.clone(),
                source,
            })?;

        serde_json::from_slice(&bytes).map_err(|source| DirectoryError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

/// Used when no accounts file is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptySource;

#[async_trait]
impl AccountSource for EmptySource {
    async fn load(&self) -> Result<Vec<Account>, DirectoryError> {
        Ok(Vec::new())
    }
}

/// Builds complete directory snapshots from a source plus the operator's own account.
#[derive(Clone)]
pub struct DirectoryLoader {
    source: Arc<dyn AccountSource>,
    synthetic: Option<Account>,
}

impl DirectoryLoader {
    pub fn new(source: Arc<dyn AccountSource>, synthetic: Option<Account>) -> Self {
        Self { source, synthetic }
    }

    /// Wire the loader from configuration: `accounts-file` plus the
    /// `fax-number`/`mobile-number` pair when both are set.
    pub fn from_config(config: &FaxmeConfig) -> Self {
        let source: Arc<dyn AccountSource> = if config.accounts_file.is_empty() {
            Arc::new(EmptySource)
        } else {
            Arc::new(JsonFileSource::new(&config.accounts_file))
        };

        let synthetic = (!config.fax_number.is_empty() && !config.sms_number.is_empty())
            .then(|| Account::new(config.fax_number.clone(), vec![config.sms_number.clone()]));

        Self::new(source, synthetic)
    }

    /// Read the source and build a fresh snapshot. The synthetic account is
    /// applied last and overrides a record with the same number.
    pub async fn load(&self) -> Result<AccountDirectory, DirectoryError> {
        let mut records = self.source.load().await?;
        if let Some(account) = &self.synthetic {
            records.push(account.clone());
        }
        Ok(AccountDirectory::from_accounts(records))
    }
}
