//! Shared entry point of the `upgrade-token` and `upgrade-multisig` binaries

use std::path::PathBuf;
use std::sync::Arc;
use clap::Parser;
use ethers::prelude::*;
use tracing_subscriber::EnvFilter;
use crate::artifacts::{HardhatArtifacts, DEFAULT_ARTIFACTS_DIR};
use crate::blockchain::{BlockchainClient, EthersUpgrader, DEFAULT_RPC_URL};
use crate::config::{ProcessEnv, UpgradeConfig};
use crate::core::{ProxyUpgrader, UpgradeRunner};
use crate::models::UpgradeTarget;
use crate::utils::{Result, UpgradeError};

/// Upgrade a proxy contract to its latest compiled implementation
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON-RPC endpoint
    #[arg(long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Signing key, the node's first unlocked account is used when unset
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Hardhat artifacts directory
    #[arg(long, env = "ARTIFACTS_DIR", default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts: PathBuf,

    /// Confirmations to wait for per transaction
    #[arg(long, env = "CONFIRMATIONS", default_value_t = 1)]
    pub confirmations: usize,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Logs go to stderr, stdout only carries the completion line
pub fn init_logging(verbose: bool) {
    let directive = if verbose {
        "proxy_upgrader=debug"
    } else {
        "proxy_upgrader=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)))
        .with_writer(std::io::stderr)
        .init();
}

/// Parse arguments, set up logging and upgrade `target`
pub async fn main(target: UpgradeTarget) -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    execute(target, &args).await.map_err(|e| {
        tracing::error!("❌ {} upgrade failed: {}", target, e);
        e
    })
}

pub async fn execute(target: UpgradeTarget, args: &Args) -> Result<()> {
    // Unset address fails here, before any RPC connection is made
    let config = UpgradeConfig::resolve(target, &ProcessEnv);
    config.proxy_address()?;

    let registry = Arc::new(HardhatArtifacts::new(&args.artifacts));

    tracing::info!("Connecting to {}...", args.rpc_url);
    let client = Arc::new(BlockchainClient::new(&args.rpc_url).await?);
    tracing::info!("✓ Connected to {}", client.chain_name());

    let upgrader = connect_upgrader(client, args).await?;
    let runner = UpgradeRunner::new(registry, upgrader);

    runner.run(&config, &mut std::io::stdout()).await?;
    Ok(())
}

async fn connect_upgrader(client: Arc<BlockchainClient>, args: &Args) -> Result<Arc<dyn ProxyUpgrader>> {
    let provider = (*client.provider()).clone();

    match &args.private_key {
        Some(key) => {
            let wallet = key.parse::<LocalWallet>()?.with_chain_id(client.chain_id());
            tracing::info!("Signing as {:?}", wallet.address());

            let signer = Arc::new(SignerMiddleware::new(provider, wallet));
            Ok(Arc::new(
                EthersUpgrader::new(client, signer).with_confirmations(args.confirmations),
            ))
        }
        None => {
            let sender = client
                .accounts()
                .await?
                .first()
                .copied()
                .ok_or_else(|| UpgradeError::MissingConfig("PRIVATE_KEY".to_string()))?;
            tracing::info!("Signing as node account {:?}", sender);

            let signer = Arc::new(provider.with_sender(sender));
            Ok(Arc::new(
                EthersUpgrader::new(client, signer).with_confirmations(args.confirmations),
            ))
        }
    }
}
