//! Proxy contract interfaces
//!
//! OpenZeppelin transparent and UUPS proxies keep their bookkeeping in the
//! EIP-1967 slots and expose a small upgrade surface, covered here for both the
//! 4.x (`upgrade`, `upgradeTo`) and 5.x (`upgradeAndCall`, `upgradeToAndCall`)
//! releases.
pub mod proxy_admin;
pub mod uups;
pub mod slots;
pub use proxy_admin::IProxyAdmin;
pub use uups::IUUPSUpgradeable;

/// `UPGRADE_INTERFACE_VERSION()` value of contracts that only accept the
/// `...AndCall` upgrade functions
pub const UPGRADE_INTERFACE_V5: &str = "5.0.0";
