//! Token deployment.

use crate::contracts::creation_code;
use crate::engine::context::WorkflowContext;
use crate::ToolkitError;
use token_types::{Address, Amount, Bytes, FeeParams, TransactionHash};
use tracing::instrument;

/// Constructor parameters. The admin is always the signing account.
#[derive(Debug, Clone)]
pub struct DeployParams {
	pub name: String,
	pub symbol: String,
	pub cap: Amount,
	pub initial_supply: Amount,
}

/// Where the token ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
	pub address: Address,
	pub block_number: u64,
	pub transaction_hash: TransactionHash,
}

#[instrument(skip_all, fields(name = %params.name, symbol = %params.symbol))]
pub async fn deploy(
	context: &WorkflowContext,
	bytecode: &Bytes,
	params: &DeployParams,
	fees: FeeParams,
) -> Result<Deployment, ToolkitError> {
	if bytecode.is_empty() {
		return Err(ToolkitError::Configuration(
			"artifact has no creation bytecode".into(),
		));
	}
	if params.initial_supply > params.cap {
		return Err(ToolkitError::Configuration(format!(
			"initial supply {} exceeds cap {}",
			params.initial_supply, params.cap
		)));
	}

	let code = creation_code(
		bytecode,
		&params.name,
		&params.symbol,
		params.cap,
		context.signer_address()?,
		params.initial_supply,
	);

	let receipt = context.execute_deployment(code, fees).await?;
	let Some(address) = receipt.contract_address else {
		tracing::warn!(tx_hash = %receipt.hash, "Deployment receipt has no contract address");
		return Err(ToolkitError::Revert {
			receipt: Box::new(receipt),
		});
	};

	tracing::info!(address = %address, block = receipt.block_number, "Token deployed");
	Ok(Deployment {
		address,
		block_number: receipt.block_number,
		transaction_hash: receipt.hash,
	})
}
