//! Proxy upgrades over ethers
//!
//! Steps for one upgrade:
//! 1. Check the EIP-1967 slots to learn the proxy kind
//! 2. Skip when the live implementation already runs the artifact's code
//! 3. Pick the upgrade function the proxy kind and OpenZeppelin release expect
//! 4. Deploy the new implementation from the artifact's creation code
//! 5. Send the upgrade call, wait for confirmations and verify the
//!    implementation slot moved
//!
//! Storage-layout compatibility between the old and new implementation is
//! not checked here.

use std::sync::Arc;
use async_trait::async_trait;
use ethers::contract::{ContractCall, ContractError, ContractFactory};
use ethers::prelude::*;
use ethers::providers::{JsonRpcError, MiddlewareError, RpcError};
use crate::blockchain::BlockchainClient;
use crate::contracts::slots::{ADMIN_SLOT, BEACON_SLOT, IMPLEMENTATION_SLOT};
use crate::contracts::{IProxyAdmin, IUUPSUpgradeable, UPGRADE_INTERFACE_V5};
use crate::core::ProxyUpgrader;
use crate::models::{ContractArtifact, ProxyKind, UpgradeReceipt};
use crate::utils::{Result, UpgradeError};

/// Function used to repoint a proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeMethod {
    /// `ProxyAdmin.upgrade(proxy, implementation)`, 4.x
    AdminUpgrade { admin: Address },
    /// `ProxyAdmin.upgradeAndCall(proxy, implementation, 0x)`, 5.x
    AdminUpgradeAndCall { admin: Address },
    /// `proxy.upgradeTo(implementation)`, 4.x UUPS or account-administered proxies
    UpgradeTo,
    /// `proxy.upgradeToAndCall(implementation, 0x)`, 5.x UUPS
    UpgradeToAndCall,
}

impl std::fmt::Display for UpgradeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpgradeMethod::AdminUpgrade { admin } => write!(f, "ProxyAdmin({:?}).upgrade", admin),
            UpgradeMethod::AdminUpgradeAndCall { admin } => {
                write!(f, "ProxyAdmin({:?}).upgradeAndCall", admin)
            }
            UpgradeMethod::UpgradeTo => write!(f, "upgradeTo"),
            UpgradeMethod::UpgradeToAndCall => write!(f, "upgradeToAndCall"),
        }
    }
}

/// Choose the upgrade function
///
/// `admin_is_contract` only matters for transparent proxies. `v5` is whether
/// the contract receiving the call reports the 5.x upgrade interface.
pub fn select_upgrade_method(kind: ProxyKind, admin_is_contract: bool, v5: bool) -> UpgradeMethod {
    match kind {
        ProxyKind::Transparent { admin } if admin_is_contract && v5 => {
            UpgradeMethod::AdminUpgradeAndCall { admin }
        }
        ProxyKind::Transparent { admin } if admin_is_contract => UpgradeMethod::AdminUpgrade { admin },
        ProxyKind::Transparent { .. } => UpgradeMethod::UpgradeTo,
        ProxyKind::Uups if v5 => UpgradeMethod::UpgradeToAndCall,
        ProxyKind::Uups => UpgradeMethod::UpgradeTo,
    }
}

/// Interpret the result of `UPGRADE_INTERFACE_VERSION()`
///
/// Only a revert or an undecodable answer means the function is absent (4.x).
/// Transport and provider failures are errors.
pub fn interface_version_is_v5<M: Middleware>(
    result: std::result::Result<String, ContractError<M>>,
) -> Result<bool> {
    let err = match result {
        Ok(version) => return Ok(version == UPGRADE_INTERFACE_V5),
        Err(err) => err,
    };

    let response = match &err {
        ContractError::MiddlewareError { e } => MiddlewareError::as_error_response(e)
            .or_else(|| e.as_provider_error().and_then(RpcError::as_error_response)),
        ContractError::ProviderError { e } => RpcError::as_error_response(e),
        _ => None,
    };

    let absent = matches!(
        err,
        ContractError::Revert(_)
            | ContractError::DecodingError(_)
            | ContractError::DetokenizationError(_)
    ) || response.map_or(false, JsonRpcError::is_revert);

    if absent {
        tracing::debug!("UPGRADE_INTERFACE_VERSION unavailable: {}", err);
        Ok(false)
    } else {
        Err(UpgradeError::RpcError(ProviderError::CustomError(format!(
            "UPGRADE_INTERFACE_VERSION call failed: {}",
            err
        ))))
    }
}

/// A mined receipt with status 1, anything else is a failed upgrade
pub fn check_receipt(tx_hash: TxHash, receipt: Option<TransactionReceipt>) -> Result<TransactionReceipt> {
    let receipt = receipt
        .ok_or_else(|| UpgradeError::UpgradeFailed(format!("transaction {:?} was dropped", tx_hash)))?;

    if receipt.status != Some(U64::one()) {
        return Err(UpgradeError::UpgradeFailed(format!("transaction {:?} reverted", tx_hash)));
    }

    Ok(receipt)
}

/// Upgrades proxies by signing transactions through `M`
#[derive(Debug)]
pub struct EthersUpgrader<M, P = Http> {
    client: Arc<BlockchainClient<P>>,
    signer: Arc<M>,
    confirmations: usize,
}

impl<M, P> EthersUpgrader<M, P>
where
    M: Middleware + 'static,
    P: JsonRpcClient + 'static,
{
    pub fn new(client: Arc<BlockchainClient<P>>, signer: Arc<M>) -> Self {
        Self {
            client,
            signer,
            confirmations: 1,
        }
    }

    /// Confirmations awaited for the deployment and the upgrade transaction
    pub fn with_confirmations(mut self, confirmations: usize) -> Self {
        self.confirmations = confirmations.max(1);
        self
    }

    /// Read the proxy's EIP-1967 slots
    ///
    /// Returns the current implementation and how the proxy is administered.
    pub async fn inspect(&self, proxy: Address) -> Result<(Address, ProxyKind)> {
        if !self.client.is_contract(proxy).await? {
            return Err(UpgradeError::NotAProxy(format!("{:?}", proxy)));
        }

        let implementation = self.client.get_address_slot(proxy, *IMPLEMENTATION_SLOT).await?;
        if implementation.is_zero() {
            return Err(UpgradeError::NotAProxy(format!("{:?}", proxy)));
        }

        let beacon = self.client.get_address_slot(proxy, *BEACON_SLOT).await?;
        if !beacon.is_zero() {
            return Err(UpgradeError::UnsupportedProxy(format!(
                "{:?} is a beacon proxy, upgrade beacon {:?} instead",
                proxy, beacon
            )));
        }

        let admin = self.client.get_address_slot(proxy, *ADMIN_SLOT).await?;
        let kind = if admin.is_zero() {
            ProxyKind::Uups
        } else {
            ProxyKind::Transparent { admin }
        };

        tracing::debug!("Proxy {:?}: {} -> {:?}", proxy, kind, implementation);

        Ok((implementation, kind))
    }

    /// Whether `implementation` already runs the artifact's runtime code
    async fn is_current(&self, implementation: Address, artifact: &ContractArtifact) -> Result<bool> {
        if artifact.deployed_bytecode.is_empty() {
            return Ok(false);
        }
        let live = self.client.get_code(implementation).await?;
        Ok(live == artifact.deployed_bytecode)
    }

    /// Decide how to upgrade before anything is deployed
    async fn plan_upgrade(&self, proxy: Address, kind: ProxyKind) -> Result<UpgradeMethod> {
        let (admin_is_contract, v5) = match kind {
            ProxyKind::Transparent { admin } => {
                let admin_is_contract = self.client.is_contract(admin).await?;
                let v5 = if admin_is_contract {
                    let version = IProxyAdmin::new(admin, self.signer.clone())
                        .upgrade_interface_version()
                        .call()
                        .await;
                    interface_version_is_v5(version)?
                } else {
                    false
                };
                (admin_is_contract, v5)
            }
            ProxyKind::Uups => {
                let version = IUUPSUpgradeable::new(proxy, self.signer.clone())
                    .upgrade_interface_version()
                    .call()
                    .await;
                (false, interface_version_is_v5(version)?)
            }
        };

        let method = select_upgrade_method(kind, admin_is_contract, v5);
        tracing::debug!("Upgrade via {}", method);
        Ok(method)
    }

    async fn deploy_implementation(&self, artifact: &ContractArtifact) -> Result<Address> {
        tracing::info!("🚀 Deploying {} implementation", artifact.fully_qualified_name());
        if let Some(path) = &artifact.path {
            tracing::debug!("Artifact: {}", path.display());
        }

        let factory = ContractFactory::new(
            artifact.abi.clone(),
            artifact.bytecode.clone(),
            self.signer.clone(),
        );

        let contract = factory
            .deploy(())
            .map_err(|e| UpgradeError::Deployment(e.to_string()))?
            .confirmations(self.confirmations)
            .send()
            .await
            .map_err(|e| UpgradeError::Deployment(e.to_string()))?;

        tracing::info!("✓ Implementation deployed at {:?}", contract.address());

        Ok(contract.address())
    }

    fn upgrade_call(&self, method: UpgradeMethod, proxy: Address, implementation: Address) -> ContractCall<M, ()> {
        match method {
            UpgradeMethod::AdminUpgrade { admin } => {
                IProxyAdmin::new(admin, self.signer.clone()).upgrade(proxy, implementation)
            }
            UpgradeMethod::AdminUpgradeAndCall { admin } => IProxyAdmin::new(admin, self.signer.clone())
                .upgrade_and_call(proxy, implementation, Bytes::default()),
            UpgradeMethod::UpgradeTo => {
                IUUPSUpgradeable::new(proxy, self.signer.clone()).upgrade_to(implementation)
            }
            UpgradeMethod::UpgradeToAndCall => IUUPSUpgradeable::new(proxy, self.signer.clone())
                .upgrade_to_and_call(implementation, Bytes::default()),
        }
    }

    async fn send_upgrade(&self, call: ContractCall<M, ()>) -> Result<TxHash> {
        let pending = call
            .send()
            .await
            .map_err(|e| UpgradeError::UpgradeFailed(e.to_string()))?;
        let tx_hash = *pending;

        tracing::info!("📤 Upgrade transaction sent: {:?}", tx_hash);

        let receipt = pending.confirmations(self.confirmations).await?;
        check_receipt(tx_hash, receipt)?;

        Ok(tx_hash)
    }

    /// The implementation slot must now hold `expected`
    async fn verify_implementation(&self, proxy: Address, expected: Address) -> Result<()> {
        let current = self.client.get_address_slot(proxy, *IMPLEMENTATION_SLOT).await?;
        if current != expected {
            return Err(UpgradeError::UpgradeFailed(format!(
                "implementation slot holds {:?}, expected {:?}",
                current, expected
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<M, P> ProxyUpgrader for EthersUpgrader<M, P>
where
    M: Middleware + 'static,
    P: JsonRpcClient + 'static,
{
    async fn upgrade_proxy(&self, address: &str, artifact: &ContractArtifact) -> Result<UpgradeReceipt> {
        let proxy: Address = address
            .parse()
            .map_err(|_| UpgradeError::InvalidAddress(address.to_string()))?;

        let (previous_implementation, kind) = self.inspect(proxy).await?;
        tracing::info!("🔍 {:?} is a {} proxy", proxy, kind);

        if self.is_current(previous_implementation, artifact).await? {
            tracing::warn!(
                "{:?} already runs {}, nothing to deploy",
                previous_implementation,
                artifact.fully_qualified_name()
            );
            return Ok(UpgradeReceipt {
                proxy,
                kind,
                previous_implementation,
                new_implementation: previous_implementation,
                transaction_hash: None,
            });
        }

        let method = self.plan_upgrade(proxy, kind).await?;
        let new_implementation = self.deploy_implementation(artifact).await?;

        let call = self.upgrade_call(method, proxy, new_implementation);
        let transaction_hash = self.send_upgrade(call).await?;

        self.verify_implementation(proxy, new_implementation).await?;

        Ok(UpgradeReceipt {
            proxy,
            kind,
            previous_implementation,
            new_implementation,
            transaction_hash: Some(transaction_hash),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::abi::{encode, Abi, Token};
    use ethers::providers::{MockProvider, MockResponse};
    use serde_json::json;

    type MockUpgrader = EthersUpgrader<Provider<MockProvider>, MockProvider>;

    const PROXY: Address = H160([0xaa; 20]);
    const IMPLEMENTATION: Address = H160([0x11; 20]);
    const ADMIN: Address = H160([0xad; 20]);

    fn mocked() -> (MockUpgrader, MockProvider) {
        let (provider, mock) = Provider::mocked();
        let client = Arc::new(BlockchainClient::from_provider(provider.clone(), 31337));
        (EthersUpgrader::new(client, Arc::new(provider)), mock)
    }

    /// Queue responses in call order; the mock hands out the last one pushed first
    fn respond(mock: &MockProvider, responses: Vec<MockResponse>) {
        for response in responses.into_iter().rev() {
            mock.push_response(response);
        }
    }

    fn value<T: serde::Serialize>(data: T) -> MockResponse {
        MockResponse::Value(serde_json::to_value(data).unwrap())
    }

    fn slot(address: Address) -> MockResponse {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(address.as_bytes());
        value(H256::from(word))
    }

    fn code(bytes: &[u8]) -> MockResponse {
        value(Bytes::from(bytes.to_vec()))
    }

    fn version(version: &str) -> MockResponse {
        value(Bytes::from(encode(&[Token::String(version.to_string())])))
    }

    fn reverted() -> MockResponse {
        MockResponse::Error(JsonRpcError {
            code: 3,
            message: "execution reverted".to_string(),
            data: Some(json!("0x")),
        })
    }

    fn artifact(deployed: &[u8]) -> ContractArtifact {
        ContractArtifact::new("Token", Abi::default(), Bytes::from(vec![0x60, 0x80]))
            .with_deployed_bytecode(Bytes::from(deployed.to_vec()))
    }

    #[test]
    fn test_select_upgrade_method() {
        let transparent = ProxyKind::Transparent { admin: ADMIN };

        assert_eq!(
            select_upgrade_method(transparent, true, true),
            UpgradeMethod::AdminUpgradeAndCall { admin: ADMIN }
        );
        assert_eq!(
            select_upgrade_method(transparent, true, false),
            UpgradeMethod::AdminUpgrade { admin: ADMIN }
        );
        assert_eq!(select_upgrade_method(transparent, false, false), UpgradeMethod::UpgradeTo);
        assert_eq!(select_upgrade_method(transparent, false, true), UpgradeMethod::UpgradeTo);
        assert_eq!(select_upgrade_method(ProxyKind::Uups, false, true), UpgradeMethod::UpgradeToAndCall);
        assert_eq!(select_upgrade_method(ProxyKind::Uups, false, false), UpgradeMethod::UpgradeTo);
    }

    #[test]
    fn test_interface_version_results() {
        type Error = ContractError<Provider<MockProvider>>;

        assert!(interface_version_is_v5::<Provider<MockProvider>>(Ok("5.0.0".into())).unwrap());
        assert!(!interface_version_is_v5::<Provider<MockProvider>>(Ok("4.9.0".into())).unwrap());

        let revert: Error = ContractError::Revert(Bytes::default());
        assert!(!interface_version_is_v5(Err(revert)).unwrap());

        let transport: Error = ContractError::MiddlewareError {
            e: ProviderError::CustomError("connection refused".into()),
        };
        assert!(matches!(
            interface_version_is_v5(Err(transport)),
            Err(UpgradeError::RpcError(_))
        ));
    }

    #[test]
    fn test_check_receipt() {
        let tx = H256::repeat_byte(0x03);

        assert!(matches!(check_receipt(tx, None), Err(UpgradeError::UpgradeFailed(m)) if m.contains("dropped")));

        let failed = TransactionReceipt {
            status: Some(U64::zero()),
            ..Default::default()
        };
        assert!(matches!(
            check_receipt(tx, Some(failed)),
            Err(UpgradeError::UpgradeFailed(m)) if m.contains("reverted")
        ));

        let mined = TransactionReceipt {
            status: Some(U64::one()),
            ..Default::default()
        };
        assert!(check_receipt(tx, Some(mined)).is_ok());
    }

    #[tokio::test]
    async fn test_inspect_uups() {
        let (upgrader, mock) = mocked();
        respond(&mock, vec![code(&[0x60]), slot(IMPLEMENTATION), slot(Address::zero()), slot(Address::zero())]);

        let (implementation, kind) = upgrader.inspect(PROXY).await.unwrap();

        assert_eq!(implementation, IMPLEMENTATION);
        assert_eq!(kind, ProxyKind::Uups);
    }

    #[tokio::test]
    async fn test_inspect_transparent() {
        let (upgrader, mock) = mocked();
        respond(&mock, vec![code(&[0x60]), slot(IMPLEMENTATION), slot(Address::zero()), slot(ADMIN)]);

        let (_, kind) = upgrader.inspect(PROXY).await.unwrap();

        assert_eq!(kind, ProxyKind::Transparent { admin: ADMIN });
    }

    #[tokio::test]
    async fn test_inspect_account_is_not_a_proxy() {
        let (upgrader, mock) = mocked();
        respond(&mock, vec![code(&[])]);

        assert!(matches!(upgrader.inspect(PROXY).await, Err(UpgradeError::NotAProxy(_))));
    }

    #[tokio::test]
    async fn test_inspect_empty_implementation_slot() {
        let (upgrader, mock) = mocked();
        respond(&mock, vec![code(&[0x60]), slot(Address::zero())]);

        assert!(matches!(upgrader.inspect(PROXY).await, Err(UpgradeError::NotAProxy(_))));
    }

    #[tokio::test]
    async fn test_inspect_beacon_proxy() {
        let (upgrader, mock) = mocked();
        respond(&mock, vec![code(&[0x60]), slot(IMPLEMENTATION), slot(Address::repeat_byte(0xbe))]);

        assert!(matches!(upgrader.inspect(PROXY).await, Err(UpgradeError::UnsupportedProxy(_))));
    }

    #[tokio::test]
    async fn test_plan_uups_v5() {
        let (upgrader, mock) = mocked();
        respond(&mock, vec![version("5.0.0")]);

        let method = upgrader.plan_upgrade(PROXY, ProxyKind::Uups).await.unwrap();
        assert_eq!(method, UpgradeMethod::UpgradeToAndCall);
    }

    #[tokio::test]
    async fn test_plan_uups_without_version_function() {
        let (upgrader, mock) = mocked();
        respond(&mock, vec![reverted()]);

        let method = upgrader.plan_upgrade(PROXY, ProxyKind::Uups).await.unwrap();
        assert_eq!(method, UpgradeMethod::UpgradeTo);
    }

    #[tokio::test]
    async fn test_plan_uups_transport_failure() {
        let (upgrader, _mock) = mocked();

        let result = upgrader.plan_upgrade(PROXY, ProxyKind::Uups).await;
        assert!(matches!(result, Err(UpgradeError::RpcError(_))));
    }

    #[tokio::test]
    async fn test_plan_proxy_admin() {
        let transparent = ProxyKind::Transparent { admin: ADMIN };

        let (upgrader, mock) = mocked();
        respond(&mock, vec![code(&[0x60]), version("5.0.0")]);
        assert_eq!(
            upgrader.plan_upgrade(PROXY, transparent).await.unwrap(),
            UpgradeMethod::AdminUpgradeAndCall { admin: ADMIN }
        );

        let (upgrader, mock) = mocked();
        respond(&mock, vec![code(&[0x60]), reverted()]);
        assert_eq!(
            upgrader.plan_upgrade(PROXY, transparent).await.unwrap(),
            UpgradeMethod::AdminUpgrade { admin: ADMIN }
        );
    }

    #[tokio::test]
    async fn test_plan_account_admin() {
        let (upgrader, mock) = mocked();
        respond(&mock, vec![code(&[])]);

        let method = upgrader
            .plan_upgrade(PROXY, ProxyKind::Transparent { admin: ADMIN })
            .await
            .unwrap();
        assert_eq!(method, UpgradeMethod::UpgradeTo);
    }

    #[tokio::test]
    async fn test_verify_implementation_mismatch() {
        let (upgrader, mock) = mocked();
        respond(&mock, vec![slot(IMPLEMENTATION)]);

        let result = upgrader.verify_implementation(PROXY, Address::repeat_byte(0x22)).await;
        assert!(matches!(result, Err(UpgradeError::UpgradeFailed(_))));

        respond(&mock, vec![slot(IMPLEMENTATION)]);
        assert!(upgrader.verify_implementation(PROXY, IMPLEMENTATION).await.is_ok());
    }

    #[tokio::test]
    async fn test_unchanged_code_skips_upgrade() {
        let (upgrader, mock) = mocked();
        respond(
            &mock,
            vec![
                code(&[0x60]),
                slot(IMPLEMENTATION),
                slot(Address::zero()),
                slot(Address::zero()),
                code(&[0x60, 0x80, 0x60, 0x40]),
            ],
        );

        let receipt = upgrader
            .upgrade_proxy(&format!("{:?}", PROXY), &artifact(&[0x60, 0x80, 0x60, 0x40]))
            .await
            .unwrap();

        assert_eq!(receipt.new_implementation, IMPLEMENTATION);
        assert_eq!(receipt.transaction_hash, None);
    }

    #[tokio::test]
    async fn test_failed_version_call_stops_before_deploy() {
        let (upgrader, mock) = mocked();
        respond(
            &mock,
            vec![
                code(&[0x60]),
                slot(IMPLEMENTATION),
                slot(Address::zero()),
                slot(Address::zero()),
                code(&[0x60, 0x80]),
            ],
        );

        // Queue runs dry at the version call; a deployment would fail as `Deployment`
        let result = upgrader
            .upgrade_proxy(&format!("{:?}", PROXY), &artifact(&[0x60, 0x80, 0x60, 0x40]))
            .await;

        assert!(matches!(result, Err(UpgradeError::RpcError(_))), "{:?}", result);
    }

    #[tokio::test]
    async fn test_invalid_address() {
        let (upgrader, _mock) = mocked();

        let result = upgrader.upgrade_proxy("", &artifact(&[])).await;
        assert!(matches!(result, Err(UpgradeError::InvalidAddress(a)) if a.is_empty()));
    }

}
