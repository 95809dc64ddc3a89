pub mod artifacts;
pub mod blockchain;
pub mod cli;
pub mod config;
pub mod contracts;
pub mod core;
pub mod models;
pub mod utils;

pub use crate::core::{ArtifactRegistry, ProxyUpgrader, UpgradeRunner, COMPLETION_MESSAGE};
pub use crate::config::UpgradeConfig;
pub use crate::models::{ContractArtifact, ProxyKind, UpgradeReceipt, UpgradeTarget};
pub use crate::utils::{ErrorCategory, Result, UpgradeError};
