//! Registry over a Hardhat `artifacts/` tree
//!
//! Layout: `artifacts/<sourceName>/<ContractName>.json`, next to
//! `<ContractName>.dbg.json` files and a `build-info/` directory, both ignored.

use std::path::PathBuf;
use async_trait::async_trait;
use ethers::abi::Abi;
use ethers::types::Bytes;
use serde::Deserialize;
use walkdir::{DirEntry, WalkDir};
use crate::core::ArtifactRegistry;
use crate::models::ContractArtifact;
use crate::utils::{Result, UpgradeError};

const BUILD_INFO_DIR: &str = "build-info";

/// Subset of `hh-sol-artifact-1` that the upgrade needs
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HardhatArtifact {
    contract_name: String,
    source_name: String,
    abi: Abi,
    bytecode: String,
    deployed_bytecode: String,
    #[serde(default)]
    link_references: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct HardhatArtifacts {
    root: PathBuf,
}

impl HardhatArtifacts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Blocking lookup by bare (`Token`) or fully qualified
    /// (`contracts/Token.sol:Token`) name
    pub fn find(&self, name: &str) -> Result<ContractArtifact> {
        let (source, contract) = match name.rsplit_once(':') {
            Some((source, contract)) => (Some(source), contract),
            None => (None, name),
        };

        if !self.root.is_dir() {
            tracing::warn!("Artifacts directory {} does not exist", self.root.display());
            return Err(UpgradeError::ArtifactNotFound(name.to_string()));
        }

        let file_name = format!("{}.json", contract);
        let mut matches = Vec::new();

        for entry in WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|e| !is_build_info(e))
        {
            let entry = entry?;
            if !entry.file_type().is_file() || entry.file_name() != file_name.as_str() {
                continue;
            }

            tracing::debug!("Reading artifact candidate {}", entry.path().display());
            let raw: HardhatArtifact = serde_json::from_slice(&std::fs::read(entry.path())?)?;

            if raw.contract_name != contract {
                continue;
            }
            if source.map_or(false, |source| raw.source_name != source) {
                continue;
            }

            matches.push((entry.into_path(), raw));
        }

        if matches.len() > 1 {
            let mut candidates: Vec<String> = matches
                .iter()
                .map(|(_, raw)| format!("{}:{}", raw.source_name, raw.contract_name))
                .collect();
            candidates.sort();
            return Err(UpgradeError::AmbiguousArtifact {
                name: name.to_string(),
                candidates,
            });
        }

        match matches.pop() {
            Some((path, raw)) => into_artifact(path, raw),
            None => Err(UpgradeError::ArtifactNotFound(name.to_string())),
        }
    }
}

#[async_trait]
impl ArtifactRegistry for HardhatArtifacts {
    async fn get_factory(&self, name: &str) -> Result<ContractArtifact> {
        let registry = self.clone();
        let name = name.to_string();

        tokio::task::spawn_blocking(move || registry.find(&name))
            .await
            .map_err(|e| UpgradeError::IoError(std::io::Error::other(e)))?
    }
}

fn is_build_info(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name() == BUILD_INFO_DIR
}

fn into_artifact(path: PathBuf, raw: HardhatArtifact) -> Result<ContractArtifact> {
    let invalid = |reason: String| UpgradeError::InvalidArtifact {
        path: path.clone(),
        reason,
    };

    if !raw.link_references.is_empty() || raw.bytecode.contains("__$") {
        return Err(invalid("bytecode has unlinked library references".into()));
    }

    let bytecode: Bytes = raw
        .bytecode
        .parse()
        .map_err(|e| invalid(format!("bytecode: {}", e)))?;
    if bytecode.is_empty() {
        return Err(invalid("empty bytecode, contract is abstract or an interface".into()));
    }

    let deployed_bytecode: Bytes = raw
        .deployed_bytecode
        .parse()
        .map_err(|e| invalid(format!("deployedBytecode: {}", e)))?;

    tracing::info!(
        "📦 Resolved {}:{} ({} bytes)",
        raw.source_name,
        raw.contract_name,
        bytecode.len()
    );

    Ok(ContractArtifact::new(raw.contract_name, raw.abi, bytecode)
        .with_source(raw.source_name)
        .with_deployed_bytecode(deployed_bytecode)
        .with_path(path))
}
