pub mod client;
pub mod upgrader;

pub use client::{BlockchainClient, DEFAULT_RPC_URL};
pub use upgrader::{select_upgrade_method, EthersUpgrader, UpgradeMethod};
