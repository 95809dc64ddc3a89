//! Contract artifact lookup
//!
//! Resolves a logical contract name into the compiled artifact that gets
//! deployed as the proxy's next implementation.

mod hardhat;

pub use hardhat::HardhatArtifacts;

/// Default artifacts root, relative to the project directory
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";
