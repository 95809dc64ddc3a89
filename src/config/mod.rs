//! Configuration resolution
//!
//! The proxy address is read from the environment once, at the edge of the
//! program, and then travels as an explicit [`UpgradeConfig`] value.

mod env;

pub use env::{resolve_address, EnvSource, ProcessEnv};

use crate::models::UpgradeTarget;
use crate::utils::{Result, UpgradeError};

/// Everything a single upgrade run needs to know about its target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeConfig {
    pub target: UpgradeTarget,
    /// Raw value of the target's address variable, `None` when unset
    pub proxy_address: Option<String>,
}

impl UpgradeConfig {
    pub fn new(target: UpgradeTarget, proxy_address: Option<String>) -> Self {
        Self { target, proxy_address }
    }

    /// Build the config for `target` from an environment source
    pub fn resolve(target: UpgradeTarget, env: &impl EnvSource) -> Self {
        Self::new(target, resolve_address(env, target.address_var()))
    }

    /// The address exactly as configured. Empty strings pass through.
    pub fn proxy_address(&self) -> Result<&str> {
        self.proxy_address
            .as_deref()
            .ok_or_else(|| UpgradeError::MissingConfig(self.target.address_var().to_string()))
    }
}
