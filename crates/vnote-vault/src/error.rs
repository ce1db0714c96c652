use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VaultError>;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Vault directory not found at path: {0}")]
    RootNotFound(PathBuf),

    #[error("Path escapes the vault: {0}")]
    OutsideVault(String),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[cfg(feature = "watcher")]
    #[error("Watcher error: {0}")]
    Notify(#[from] notify::Error),
}

impl From<VaultError> for vnote::Error {
    fn from(e: VaultError) -> Self {
        match e {
            VaultError::Io(io) => vnote::Error::Io(io),
            other => vnote::Error::Host(other.to_string()),
        }
    }
}
