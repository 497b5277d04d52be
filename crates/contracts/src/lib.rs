//! Typed access to compiled contract artifacts.
//!
//! The external build step writes one JSON artifact per contract into its
//! output directory (`build/contracts/<Name>.json` in the Truffle layout).
//! This crate reads those files back as typed values so that deployment code
//! can look up a contract by name and gets a "not found" error instead of
//! relying on an implicit global registry.

use {
    alloy::{json_abi::JsonAbi, primitives::Bytes},
    serde::Deserialize,
    std::{io, path::PathBuf},
    thiserror::Error,
};

/// A compiled contract as produced by the external build step: creation
/// bytecode, ABI and, through the ABI, the constructor signature.
///
/// Consumed read-only; deployment never mutates the artifact.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    pub contract_name: String,
    pub abi: JsonAbi,
    /// Creation bytecode, 0x-prefixed hex in the artifact file.
    pub bytecode: Bytes,
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("no artifact found for contract {0:?}")]
    NotFound(String),
    #[error("artifact for contract {name:?} is unusable: {reason}")]
    Malformed { name: String, reason: String },
    #[error("failed to read artifact for contract {name:?}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Looks up compiled artifacts by contract name in a build output directory.
#[derive(Clone, Debug)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Reads and validates the artifact for the given contract name.
    ///
    /// Artifacts with empty creation bytecode (interfaces and abstract
    /// contracts) are rejected here so the deployer can assume every
    /// artifact it receives is deployable.
    pub fn artifact(&self, name: &str) -> Result<ContractArtifact, ArtifactError> {
        let path = self.dir.join(format!("{name}.json"));
        let content = match std::fs::read(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(ArtifactError::NotFound(name.to_string()));
            }
            Err(err) => {
                return Err(ArtifactError::Io {
                    name: name.to_string(),
                    source: err,
                });
            }
        };

        let artifact: ContractArtifact =
            serde_json::from_slice(&content).map_err(|err| ArtifactError::Malformed {
                name: name.to_string(),
                reason: err.to_string(),
            })?;

        if artifact.contract_name != name {
            return Err(ArtifactError::Malformed {
                name: name.to_string(),
                reason: format!(
                    "artifact declares contract name {:?}",
                    artifact.contract_name
                ),
            });
        }
        if artifact.bytecode.is_empty() {
            return Err(ArtifactError::Malformed {
                name: name.to_string(),
                reason: "artifact has no creation bytecode".to_string(),
            });
        }

        Ok(artifact)
    }
}
