//! UUPS upgrade surface, also used for transparent proxies administered by an account
use ethers::prelude::*;
abigen!(
    IUUPSUpgradeable,
    r#"[
        function UPGRADE_INTERFACE_VERSION() external view returns (string)
        function upgradeTo(address newImplementation) external
        function upgradeToAndCall(address newImplementation, bytes data) external payable
    ]"#,
);
