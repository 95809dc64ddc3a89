pub mod target;
pub mod artifact;
pub mod receipt;

pub use target::UpgradeTarget;
pub use artifact::ContractArtifact;
pub use receipt::{ProxyKind, UpgradeReceipt};
