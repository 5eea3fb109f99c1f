//! Contract build artifacts.

use crate::ToolkitError;
use alloy_json_abi::JsonAbi;
use serde::Deserialize;
use std::path::Path;
use token_events::EventSchema;
use token_types::Bytes;

/// A compiled contract as emitted by Hardhat: ABI plus creation bytecode.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractArtifact {
	#[serde(rename = "contractName", default)]
	pub contract_name: Option<String>,
	pub abi: JsonAbi,
	pub bytecode: Bytes,
}

impl ContractArtifact {
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ToolkitError> {
		let path = path.as_ref();
		let content = tokio::fs::read_to_string(path).await.map_err(|e| {
			ToolkitError::Configuration(format!(
				"Cannot read artifact {}: {}",
				path.display(),
				e
			))
		})?;
		content.parse()
	}

	/// Event schema covering every event in the artifact's ABI.
	pub fn event_schema(&self) -> EventSchema {
		EventSchema::from_json_abi(&self.abi)
	}
}

impl std::str::FromStr for ContractArtifact {
	type Err = ToolkitError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		serde_json::from_str(s)
			.map_err(|e| ToolkitError::Configuration(format!("Invalid artifact: {}", e)))
	}
}
