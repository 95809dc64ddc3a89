pub mod traits;
pub mod runner;
pub mod reporter;

pub use traits::{ArtifactRegistry, ProxyUpgrader};
pub use runner::UpgradeRunner;
pub use reporter::{report_completion, COMPLETION_MESSAGE};
