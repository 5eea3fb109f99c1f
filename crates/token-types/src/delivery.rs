//! Transaction delivery types for the token toolkit.
//!
//! This module defines what the toolkit hands to the ledger (contract calls with
//! fee parameters) and what it gets back (hashes, receipts and raw logs).

use crate::with_0x_prefix;
use alloy_primitives::{Address, Bytes, B256};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur while building fee parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeeError {
	#[error("max_fee_per_gas ({max_fee}) must be >= max_priority_fee_per_gas ({priority_fee})")]
	MaxBelowPriority { max_fee: u128, priority_fee: u128 },
}

/// EIP-1559 fee parameters in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeParams {
	pub max_priority_fee_per_gas: u128,
	pub max_fee_per_gas: u128,
}

impl FeeParams {
	/// Creates fee parameters, rejecting a max fee below the priority fee.
	pub fn new(max_priority_fee_per_gas: u128, max_fee_per_gas: u128) -> Result<Self, FeeError> {
		if max_fee_per_gas < max_priority_fee_per_gas {
			return Err(FeeError::MaxBelowPriority {
				max_fee: max_fee_per_gas,
				priority_fee: max_priority_fee_per_gas,
			});
		}
		Ok(Self {
			max_priority_fee_per_gas,
			max_fee_per_gas,
		})
	}

	/// Fee parameters expressed in gwei.
	pub fn gwei(priority: u64, max: u64) -> Result<Self, FeeError> {
		const GWEI: u128 = 1_000_000_000;
		Self::new(priority as u128 * GWEI, max as u128 * GWEI)
	}
}

impl<'de> Deserialize<'de> for FeeParams {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		#[derive(Deserialize)]
		struct Raw {
			max_priority_fee_per_gas: u128,
			max_fee_per_gas: u128,
		}

		let raw = Raw::deserialize(deserializer)?;
		FeeParams::new(raw.max_priority_fee_per_gas, raw.max_fee_per_gas)
			.map_err(serde::de::Error::custom)
	}
}

/// A state-changing call against a deployed contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
	/// Contract receiving the call.
	pub target: Address,
	/// Four-byte function selector.
	pub selector: [u8; 4],
	/// Human-readable function signature, used for logging.
	pub signature: &'static str,
	/// Full calldata: selector followed by the ABI-encoded arguments.
	pub calldata: Bytes,
	/// Fee parameters for this transaction.
	pub fees: FeeParams,
}

/// Blockchain transaction hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionHash(pub B256);

impl fmt::Display for TransactionHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", with_0x_prefix(&hex::encode(self.0)))
	}
}

impl From<B256> for TransactionHash {
	fn from(hash: B256) -> Self {
		Self(hash)
	}
}

/// Transaction receipt containing execution details.
///
/// Obtained once per transaction and owned by the workflow that submitted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
	/// The hash of the transaction.
	pub hash: TransactionHash,
	/// The block number where the transaction was included.
	pub block_number: u64,
	/// Gas consumed by this transaction.
	pub gas_used: u64,
	/// Price per gas actually paid, in wei.
	pub effective_gas_price: u128,
	/// Whether the transaction executed successfully.
	pub success: bool,
	/// Address of the contract created by this transaction, if any.
	pub contract_address: Option<Address>,
}

/// Inclusive block interval for log queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRange {
	pub from: u64,
	pub to: u64,
}

impl BlockRange {
	/// The `lookback` blocks ending at `latest`, clamped at genesis.
	pub fn trailing(latest: u64, lookback: u64) -> Self {
		Self {
			from: latest.saturating_sub(lookback),
			to: latest,
		}
	}
}

impl fmt::Display for BlockRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}..={}", self.from, self.to)
	}
}

/// An undecoded event log as returned by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLog {
	/// Contract that emitted the log.
	pub address: Address,
	/// Indexed topics; topic 0 is the event selector for non-anonymous events.
	pub topics: Vec<B256>,
	/// Non-indexed ABI-encoded payload.
	pub data: Bytes,
	/// Block the log was emitted in, absent for pending logs.
	pub block_number: Option<u64>,
	pub transaction_hash: Option<TransactionHash>,
	pub log_index: Option<u64>,
}
