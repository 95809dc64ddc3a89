use proxy_upgrader::{cli, Result, UpgradeTarget};

/// Upgrade the MultiSig proxy at $MULTI_SIG_CONTRACT
#[tokio::main]
async fn main() -> Result<()> {
    cli::main(UpgradeTarget::MultiSig).await
}
