use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpgradeError {
    #[error("Environment variable {0} is not set")]
    MissingConfig(String),

    #[error("Invalid address: {0:?}")]
    InvalidAddress(String),

    #[error("Wallet error: {0}")]
    WalletError(#[from] ethers::signers::WalletError),

    #[error("Artifact for contract {0:?} not found")]
    ArtifactNotFound(String),

    #[error("Contract name {name:?} is ambiguous, use one of: {}", .candidates.join(", "))]
    AmbiguousArtifact {
        name: String,
        candidates: Vec<String>,
    },

    #[error("Invalid artifact {}: {}", .path.display(), .reason)]
    InvalidArtifact {
        path: PathBuf,
        reason: String,
    },

    #[error("Address {0} is not an EIP-1967 proxy")]
    NotAProxy(String),

    #[error("Unsupported proxy: {0}")]
    UnsupportedProxy(String),

    #[error("Implementation deployment failed: {0}")]
    Deployment(String),

    #[error("Upgrade transaction failed: {0}")]
    UpgradeFailed(String),

    #[error("RPC error: {0}")]
    RpcError(#[from] ethers::providers::ProviderError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Artifact walk error: {0}")]
    WalkError(#[from] walkdir::Error),
}

/// Coarse grouping of failures by the stage that raised them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Artifact,
    Upgrade,
}

impl UpgradeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            UpgradeError::MissingConfig(_)
            | UpgradeError::InvalidAddress(_)
            | UpgradeError::WalletError(_) => ErrorCategory::Configuration,

            UpgradeError::ArtifactNotFound(_)
            | UpgradeError::AmbiguousArtifact { .. }
            | UpgradeError::InvalidArtifact { .. }
            | UpgradeError::JsonError(_)
            | UpgradeError::IoError(_)
            | UpgradeError::WalkError(_) => ErrorCategory::Artifact,

            UpgradeError::NotAProxy(_)
            | UpgradeError::UnsupportedProxy(_)
            | UpgradeError::Deployment(_)
            | UpgradeError::UpgradeFailed(_)
            | UpgradeError::RpcError(_) => ErrorCategory::Upgrade,
        }
    }
}

pub type Result<T> = std::result::Result<T, UpgradeError>;
