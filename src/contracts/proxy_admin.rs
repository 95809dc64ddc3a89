//! ProxyAdmin interface
//! Owner contract of transparent proxies, the only account allowed to upgrade them
use ethers::prelude::*;
abigen!(
    IProxyAdmin,
    r#"[
        function UPGRADE_INTERFACE_VERSION() external view returns (string)
        function upgrade(address proxy, address implementation) external
        function upgradeAndCall(address proxy, address implementation, bytes data) external payable
    ]"#,
);
