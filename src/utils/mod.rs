pub mod errors;

pub use errors::{ErrorCategory, Result, UpgradeError};
