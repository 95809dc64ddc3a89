use std::io::Write;
use std::sync::Arc;
use crate::config::UpgradeConfig;
use crate::core::reporter::report_completion;
use crate::core::{ArtifactRegistry, ProxyUpgrader};
use crate::models::UpgradeReceipt;
use crate::utils::Result;

/// Runs one upgrade: resolve config, look up the artifact, upgrade, report
pub struct UpgradeRunner {
    registry: Arc<dyn ArtifactRegistry>,
    upgrader: Arc<dyn ProxyUpgrader>,
}

impl UpgradeRunner {
    pub fn new(registry: Arc<dyn ArtifactRegistry>, upgrader: Arc<dyn ProxyUpgrader>) -> Self {
        Self { registry, upgrader }
    }

    /// Upgrade the proxy described by `config`.
    ///
    /// On success the completion line is written to `out`. On failure nothing
    /// is written and the first error is returned unchanged.
    pub async fn run<W: Write>(&self, config: &UpgradeConfig, out: &mut W) -> Result<UpgradeReceipt> {
        let address = config.proxy_address()?;
        let name = config.target.contract_name();

        tracing::info!("🔧 Upgrading {} proxy at {:?}", name, address);

        let artifact = self.registry.get_factory(name).await?;
        let receipt = self.upgrader.upgrade_proxy(address, &artifact).await?;

        tracing::info!("✅ {}", receipt);

        report_completion(out)?;
        Ok(receipt)
    }
}

impl std::fmt::Debug for UpgradeRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpgradeRunner").finish_non_exhaustive()
    }
}
