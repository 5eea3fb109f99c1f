//! Ledger access module for the token toolkit.
//!
//! This module defines the capability surface the toolkit needs from an
//! EVM ledger: submitting signed transactions, waiting for their receipts,
//! reading contract state and fetching event logs. Workflows only ever see the
//! [`LedgerClient`] trait; the alloy-based JSON-RPC client is one implementation.

use async_trait::async_trait;
use thiserror::Error;
use token_types::{
	Address, BlockRange, Bytes, ContractCall, FeeParams, RawLog, TransactionHash,
	TransactionReceipt,
};

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

/// Errors that can occur while talking to the ledger.
#[derive(Debug, Error)]
pub enum DeliveryError {
	/// Transport failure or unexpected node behaviour.
	#[error("Network error: {0}")]
	Network(String),
	/// The ledger refused the transaction before inclusion.
	#[error("Transaction rejected: {0}")]
	Submission(String),
	/// The transaction was included but execution failed.
	#[error("Transaction {} reverted in block {}", .0.hash, .0.block_number)]
	Reverted(Box<TransactionReceipt>),
	/// The node answered with data the client cannot interpret.
	#[error("Invalid response: {0}")]
	InvalidResponse(String),
}

/// Trait defining the capabilities the toolkit consumes from a ledger.
///
/// Every submission is signed by the single identity reported by
/// [`LedgerClient::signer_address`]. A client without one is read-only and
/// rejects submissions. Implementations must not retry on their own; failures
/// are surfaced to the calling workflow as-is.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait LedgerClient: Send + Sync {
	/// Address that signs every submitted transaction, `None` for a
	/// read-only client.
	fn signer_address(&self) -> Option<Address>;

	/// Signs and broadcasts a contract call, returning its hash.
	///
	/// Returns as soon as the node accepts the transaction; inclusion is
	/// observed separately through [`LedgerClient::wait_for_receipt`].
	async fn submit(&self, call: ContractCall) -> Result<TransactionHash, DeliveryError>;

	/// Signs and broadcasts a contract-creation transaction.
	///
	/// `code` is the creation bytecode with the ABI-encoded constructor
	/// arguments appended.
	async fn deploy(&self, code: Bytes, fees: FeeParams) -> Result<TransactionHash, DeliveryError>;

	/// Suspends until the transaction is included.
	///
	/// Fails with [`DeliveryError::Reverted`] when the included transaction
	/// did not execute successfully. There is no internal deadline; callers
	/// bound the wait themselves.
	async fn wait_for_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<TransactionReceipt, DeliveryError>;

	/// Executes a read-only call and returns the raw return data.
	async fn read_state(&self, target: Address, calldata: Bytes) -> Result<Bytes, DeliveryError>;

	/// Fetches every log emitted by `target` within `range`.
	async fn fetch_logs(
		&self,
		target: Address,
		range: BlockRange,
	) -> Result<Vec<RawLog>, DeliveryError>;

	/// Gets the latest block number.
	async fn block_number(&self) -> Result<u64, DeliveryError>;
}
