use ethers::types::{Address, H256};

/// How the proxy expects to be upgraded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyKind {
    /// Upgrades go through the admin stored in the EIP-1967 admin slot
    Transparent { admin: Address },
    /// Upgrade function lives in the implementation itself
    Uups,
}

impl std::fmt::Display for ProxyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProxyKind::Transparent { admin } => write!(f, "transparent (admin {:?})", admin),
            ProxyKind::Uups => write!(f, "UUPS"),
        }
    }
}

/// What a successful upgrade changed on chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeReceipt {
    pub proxy: Address,
    pub kind: ProxyKind,
    pub previous_implementation: Address,
    pub new_implementation: Address,
    /// `None` when the proxy already ran the requested code
    pub transaction_hash: Option<H256>,
}

impl std::fmt::Display for UpgradeReceipt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.transaction_hash {
            Some(tx) => write!(
                f,
                "{:?} ({}): {:?} -> {:?} in tx {:?}",
                self.proxy, self.kind, self.previous_implementation, self.new_implementation, tx
            ),
            None => write!(
                f,
                "{:?} ({}): {:?} unchanged",
                self.proxy, self.kind, self.previous_implementation
            ),
        }
    }
}
