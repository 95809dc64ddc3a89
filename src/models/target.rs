/// Proxy contracts this crate knows how to upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpgradeTarget {
    Token,
    MultiSig,
}

impl UpgradeTarget {
    /// Logical name handed to the artifact registry
    pub fn contract_name(&self) -> &'static str {
        match self {
            UpgradeTarget::Token => "Token",
            UpgradeTarget::MultiSig => "MultiSig",
        }
    }

    /// Environment variable holding the proxy address
    pub fn address_var(&self) -> &'static str {
        match self {
            UpgradeTarget::Token => "PROXY_CONTRACT",
            UpgradeTarget::MultiSig => "MULTI_SIG_CONTRACT",
        }
    }
}

impl std::fmt::Display for UpgradeTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.contract_name())
    }
}
