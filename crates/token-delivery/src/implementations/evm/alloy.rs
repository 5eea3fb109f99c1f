//! JSON-RPC ledger client built on the Alloy library.
//!
//! Transactions are signed locally by the wallet attached to the provider and
//! broadcast over HTTP. Receipts are polled at a fixed interval. A client built
//! with [`AlloyLedger::read_only`] has no wallet and only serves reads.

use crate::{DeliveryError, LedgerClient};
use alloy_network::TransactionBuilder;
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::{Filter, Log, TransactionReceipt as RpcReceipt, TransactionRequest};
use alloy_transport::{RpcError, TransportError};
use alloy_transport_http::Http;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use token_account::AccountInterface;
use token_types::{
	truncate_id, Address, BlockRange, Bytes, ContractCall, FeeParams, RawLog, TransactionHash,
	TransactionReceipt,
};

type HttpProvider = Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>;

/// Alloy-based EVM ledger client.
pub struct AlloyLedger {
	provider: HttpProvider,
	signer: Option<Address>,
	chain_id: u64,
	poll_interval: Duration,
}

impl AlloyLedger {
	/// Creates a client for one chain, signing with `account`.
	pub fn new(
		rpc_url: &str,
		chain_id: u64,
		account: &dyn AccountInterface,
		poll_interval: Duration,
	) -> Result<Self, DeliveryError> {
		let provider = ProviderBuilder::new()
			.with_recommended_fillers()
			.wallet(account.wallet(chain_id))
			.on_http(parse_url(rpc_url)?);

		provider.client().set_poll_interval(poll_interval);

		Ok(Self {
			provider: Arc::new(provider),
			signer: Some(account.address()),
			chain_id,
			poll_interval,
		})
	}

	/// Creates a client for reads only: state calls, logs and block height.
	pub fn read_only(
		rpc_url: &str,
		chain_id: u64,
		poll_interval: Duration,
	) -> Result<Self, DeliveryError> {
		let provider = ProviderBuilder::new().on_http(parse_url(rpc_url)?);

		provider.client().set_poll_interval(poll_interval);

		Ok(Self {
			provider: Arc::new(provider),
			signer: None,
			chain_id,
			poll_interval,
		})
	}

	/// Applies fee parameters and the signer to a request.
	fn prepare(
		&self,
		request: TransactionRequest,
		fees: FeeParams,
	) -> Result<TransactionRequest, DeliveryError> {
		let signer = self.signer.ok_or_else(|| {
			DeliveryError::Submission("client is read-only, no signing account".into())
		})?;

		Ok(request
			.with_from(signer)
			.with_chain_id(self.chain_id)
			.with_max_fee_per_gas(fees.max_fee_per_gas)
			.with_max_priority_fee_per_gas(fees.max_priority_fee_per_gas))
	}

	async fn send(&self, request: TransactionRequest) -> Result<TransactionHash, DeliveryError> {
		let pending = self
			.provider
			.send_transaction(request)
			.await
			.map_err(submission_error)?;

		Ok(TransactionHash(*pending.tx_hash()))
	}
}

fn parse_url(rpc_url: &str) -> Result<reqwest::Url, DeliveryError> {
	rpc_url
		.parse()
		.map_err(|e| DeliveryError::Network(format!("Invalid RPC URL {}: {}", rpc_url, e)))
}

/// Splits node rejections from transport failures.
fn submission_error(err: TransportError) -> DeliveryError {
	match err {
		RpcError::ErrorResp(payload) => DeliveryError::Submission(payload.to_string()),
		RpcError::LocalUsageError(e) => DeliveryError::Submission(e.to_string()),
		other => DeliveryError::Network(format!("Failed to send transaction: {}", other)),
	}
}

fn convert_receipt(receipt: &RpcReceipt, block_number: u64) -> TransactionReceipt {
	TransactionReceipt {
		hash: TransactionHash(receipt.transaction_hash),
		block_number,
		gas_used: u64::try_from(receipt.gas_used).unwrap_or(u64::MAX),
		effective_gas_price: receipt.effective_gas_price,
		success: receipt.status(),
		contract_address: receipt.contract_address,
	}
}

fn convert_log(log: Log) -> RawLog {
	RawLog {
		address: log.address(),
		topics: log.topics().to_vec(),
		data: log.data().data.clone(),
		block_number: log.block_number,
		transaction_hash: log.transaction_hash.map(TransactionHash),
		log_index: log.log_index,
	}
}

#[async_trait]
impl LedgerClient for AlloyLedger {
	fn signer_address(&self) -> Option<Address> {
		self.signer
	}

	async fn submit(&self, call: ContractCall) -> Result<TransactionHash, DeliveryError> {
		let request = self.prepare(
			TransactionRequest::default()
				.with_to(call.target)
				.with_input(call.calldata),
			call.fees,
		)?;

		let hash = self.send(request).await?;
		tracing::info!(
			tx_hash = %truncate_id(&hash.to_string()),
			function = call.signature,
			"Submitted transaction"
		);
		Ok(hash)
	}

	async fn deploy(&self, code: Bytes, fees: FeeParams) -> Result<TransactionHash, DeliveryError> {
		let request = self.prepare(TransactionRequest::default().with_deploy_code(code), fees)?;

		let hash = self.send(request).await?;
		tracing::info!(tx_hash = %truncate_id(&hash.to_string()), "Submitted deployment");
		Ok(hash)
	}

	async fn wait_for_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<TransactionReceipt, DeliveryError> {
		let start_time = tokio::time::Instant::now();

		loop {
			let receipt = self
				.provider
				.get_transaction_receipt(hash.0)
				.await
				.map_err(|e| DeliveryError::Network(format!("Failed to get receipt: {}", e)))?;

			match receipt {
				Some(receipt) => match receipt.block_number {
					Some(block_number) => {
						let receipt = convert_receipt(&receipt, block_number);
						if !receipt.success {
							return Err(DeliveryError::Reverted(Box::new(receipt)));
						}
						return Ok(receipt);
					}
					None => {
						tracing::debug!(tx_hash = %truncate_id(&hash.to_string()), "Receipt has no block yet")
					}
				},
				None => {
					tracing::debug!(
						tx_hash = %truncate_id(&hash.to_string()),
						elapsed_secs = start_time.elapsed().as_secs(),
						"Waiting for transaction to be mined"
					);
				}
			}

			tokio::time::sleep(self.poll_interval).await;
		}
	}

	async fn read_state(&self, target: Address, calldata: Bytes) -> Result<Bytes, DeliveryError> {
		let request = TransactionRequest::default()
			.with_to(target)
			.with_input(calldata);

		self.provider
			.call(&request)
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to call contract: {}", e)))
	}

	async fn fetch_logs(
		&self,
		target: Address,
		range: BlockRange,
	) -> Result<Vec<RawLog>, DeliveryError> {
		let filter = Filter::new()
			.address(target)
			.from_block(range.from)
			.to_block(range.to);

		let logs = self
			.provider
			.get_logs(&filter)
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get logs: {}", e)))?;

		tracing::debug!(count = logs.len(), range = %range, "Fetched logs");
		Ok(logs.into_iter().map(convert_log).collect())
	}

	async fn block_number(&self) -> Result<u64, DeliveryError> {
		self.provider
			.get_block_number()
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get block number: {}", e)))
	}
}
