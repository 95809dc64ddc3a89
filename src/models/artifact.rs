use ethers::abi::Abi;
use ethers::types::Bytes;
use std::path::PathBuf;

/// Compiled contract resolved from the artifact registry
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub contract_name: String,
    pub source_name: String,
    pub abi: Abi,
    /// Creation code, constructor included
    pub bytecode: Bytes,
    pub deployed_bytecode: Bytes,
    pub path: Option<PathBuf>,
}

impl ContractArtifact {
    pub fn new(contract_name: impl Into<String>, abi: Abi, bytecode: Bytes) -> Self {
        Self {
            contract_name: contract_name.into(),
            source_name: String::new(),
            abi,
            bytecode,
            deployed_bytecode: Bytes::default(),
            path: None,
        }
    }

    pub fn with_source(mut self, source_name: impl Into<String>) -> Self {
        self.source_name = source_name.into();
        self
    }

    pub fn with_deployed_bytecode(mut self, deployed_bytecode: Bytes) -> Self {
        self.deployed_bytecode = deployed_bytecode;
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// `contracts/Token.sol:Token`, or the bare name when the source is unknown
    pub fn fully_qualified_name(&self) -> String {
        if self.source_name.is_empty() {
            self.contract_name.clone()
        } else {
            format!("{}:{}", self.source_name, self.contract_name)
        }
    }
}
