use async_trait::async_trait;
use crate::models::{ContractArtifact, UpgradeReceipt};
use crate::utils::Result;

/// Resolves logical contract names into deployable artifacts
#[async_trait]
pub trait ArtifactRegistry: Send + Sync {
    /// Look up the artifact for `name`; unknown names are an error
    async fn get_factory(&self, name: &str) -> Result<ContractArtifact>;
}

/// Replaces the implementation behind a deployed proxy
#[async_trait]
pub trait ProxyUpgrader: Send + Sync {
    /// Deploy `artifact` and point the proxy at `address` to it.
    ///
    /// `address` is passed through exactly as configured. Returns once the
    /// upgrade transaction is confirmed or has failed.
    async fn upgrade_proxy(&self, address: &str, artifact: &ContractArtifact) -> Result<UpgradeReceipt>;
}
