use proxy_upgrader::{cli, Result, UpgradeTarget};

/// Upgrade the Token proxy at $PROXY_CONTRACT
#[tokio::main]
async fn main() -> Result<()> {
    cli::main(UpgradeTarget::Token).await
}
