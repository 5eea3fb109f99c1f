//! Shared execution context for workflows.
//!
//! Every state-changing workflow submits through [`WorkflowContext`], which
//! owns the two rules all submissions obey: one transaction in flight per
//! signing identity, and a bounded wait for each receipt.

use crate::ToolkitError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use token_delivery::LedgerClient;
use token_types::{truncate_id, Address, Bytes, ContractCall, FeeParams, TransactionHash, TransactionReceipt};
use tracing::instrument;

/// Serialises transactions from one signing identity.
///
/// A holder keeps the lock from submission until its receipt is observed or
/// the wait fails, so the next transaction is never signed against a nonce
/// that is still pending.
#[derive(Clone, Default)]
pub struct SignerLock(Arc<Mutex<()>>);

impl SignerLock {
	pub fn new() -> Self {
		Self::default()
	}

	pub async fn acquire(&self) -> OwnedMutexGuard<()> {
		self.0.clone().lock_owned().await
	}
}

/// Ledger handle, signer lock and receipt deadline shared by workflows.
#[derive(Clone)]
pub struct WorkflowContext {
	ledger: Arc<dyn LedgerClient>,
	signer_lock: SignerLock,
	receipt_timeout: Duration,
}

impl WorkflowContext {
	pub fn new(ledger: Arc<dyn LedgerClient>, receipt_timeout: Duration) -> Self {
		Self {
			ledger,
			signer_lock: SignerLock::new(),
			receipt_timeout,
		}
	}

	pub fn ledger(&self) -> &Arc<dyn LedgerClient> {
		&self.ledger
	}

	/// Address of the signing account; a configuration error for read-only ledgers.
	pub fn signer_address(&self) -> Result<Address, ToolkitError> {
		self.ledger.signer_address().ok_or_else(|| {
			ToolkitError::Configuration(
				"no signing account configured (set account.private_key)".into(),
			)
		})
	}

	pub fn receipt_timeout(&self) -> Duration {
		self.receipt_timeout
	}

	/// Submits a contract call and waits for its receipt.
	#[instrument(skip_all, fields(function = call.signature))]
	pub async fn execute(&self, call: ContractCall) -> Result<TransactionReceipt, ToolkitError> {
		let _guard = self.signer_lock.acquire().await;
		let hash = self.ledger.submit(call).await?;
		self.await_receipt(hash).await
	}

	/// Submits a contract-creation transaction and waits for its receipt.
	#[instrument(skip_all)]
	pub async fn execute_deployment(
		&self,
		code: Bytes,
		fees: FeeParams,
	) -> Result<TransactionReceipt, ToolkitError> {
		let _guard = self.signer_lock.acquire().await;
		let hash = self.ledger.deploy(code, fees).await?;
		self.await_receipt(hash).await
	}

	async fn await_receipt(&self, hash: TransactionHash) -> Result<TransactionReceipt, ToolkitError> {
		let tx_hash = truncate_id(&hash.to_string());

		let receipt =
			match tokio::time::timeout(self.receipt_timeout, self.ledger.wait_for_receipt(&hash))
				.await
			{
				Ok(result) => result?,
				Err(_) => {
					tracing::warn!(
						tx_hash = %tx_hash,
						waited_secs = self.receipt_timeout.as_secs(),
						"Receipt not observed in time"
					);
					return Err(ToolkitError::Timeout {
						hash,
						waited: self.receipt_timeout,
					});
				}
			};

		// Ledgers may report a failed receipt as Ok
		if !receipt.success {
			tracing::warn!(tx_hash = %tx_hash, block = receipt.block_number, "Transaction reverted");
			return Err(ToolkitError::Revert {
				receipt: Box::new(receipt),
			});
		}

		tracing::info!(
			tx_hash = %tx_hash,
			block = receipt.block_number,
			gas_used = receipt.gas_used,
			"Confirmed"
		);
		Ok(receipt)
	}
}
