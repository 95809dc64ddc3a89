use ethers::prelude::*;
use std::sync::Arc;
use crate::contracts::slots::address_from_word;
use crate::utils::{Result, UpgradeError};

/// Local Hardhat / Anvil node
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Read-only blockchain RPC client
#[derive(Debug)]
pub struct BlockchainClient<P = Http> {
    provider: Arc<Provider<P>>,
    chain_id: u64,
}

impl BlockchainClient<Http> {
    /// Create a new client
    pub async fn new(rpc_url: &str) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| UpgradeError::RpcError(
                ProviderError::CustomError(format!("Invalid RPC URL: {}", e))
            ))?;

        let provider = Arc::new(provider);

        let chain_id = provider.get_chainid().await?;

        tracing::info!("Connected to chain ID: {}", chain_id);

        Ok(Self {
            provider,
            chain_id: chain_id.as_u64(),
        })
    }
}

impl<P: JsonRpcClient> BlockchainClient<P> {
    /// Wrap an already connected provider
    pub fn from_provider(provider: Provider<P>, chain_id: u64) -> Self {
        Self {
            provider: Arc::new(provider),
            chain_id,
        }
    }

    pub fn provider(&self) -> Arc<Provider<P>> {
        self.provider.clone()
    }

    /// Get storage at slot
    pub async fn get_storage(&self, address: Address, slot: H256) -> Result<H256> {
        let value = self.provider.get_storage_at(address, slot, None).await?;
        Ok(value)
    }

    /// Read an address kept in a storage slot
    pub async fn get_address_slot(&self, address: Address, slot: H256) -> Result<Address> {
        let word = self.get_storage(address, slot).await?;
        Ok(address_from_word(word))
    }

    /// Get runtime bytecode at address
    pub async fn get_code(&self, address: Address) -> Result<Bytes> {
        Ok(self.provider.get_code(address, None).await?)
    }

    /// Check if address is a contract
    pub async fn is_contract(&self, address: Address) -> Result<bool> {
        Ok(!self.get_code(address).await?.is_empty())
    }

    /// Accounts unlocked on the node, used when no private key is configured
    pub async fn accounts(&self) -> Result<Vec<Address>> {
        Ok(self.provider.get_accounts().await?)
    }

    /// Get chain ID
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Get chain name
    pub fn chain_name(&self) -> &'static str {
        match self.chain_id {
            1 => "Ethereum Mainnet",
            10 => "Optimism",
            137 => "Polygon",
            8453 => "Base",
            42161 => "Arbitrum One",
            11155111 => "Sepolia",
            17000 => "Holesky",
            31337 => "Hardhat",
            1337 => "Local Devnet",
            _ => "Unknown Chain",
        }
    }
}
