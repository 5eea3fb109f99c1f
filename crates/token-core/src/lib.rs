//! Core workflows for the token toolkit.
//!
//! This crate drives every state-changing and read-only interaction with the
//! token contract through a [`token_delivery::LedgerClient`]: deployment,
//! single transfers and approvals, the batched-versus-individual airdrop
//! comparison, balance inspection and log history. It never touches the
//! environment or the transport directly; callers hand it a loaded
//! configuration and a ledger client.

use std::time::Duration;
use thiserror::Error;
use token_account::AccountError;
use token_config::ConfigError;
use token_delivery::DeliveryError;
use token_events::SchemaError;
use token_types::{AddressError, FeeError, PlanError, TransactionHash, TransactionReceipt};

pub mod accounting;
pub mod artifact;
pub mod contracts;
pub mod engine;
pub mod handlers;
pub mod inspector;

#[cfg(test)]
pub(crate) mod test_utils;

pub use accounting::{GasAccounting, GasComparisonReport};
pub use artifact::ContractArtifact;
pub use engine::context::{SignerLock, WorkflowContext};
pub use engine::TokenEngine;
pub use handlers::airdrop::{AirdropOrchestrator, IndividualRun};
pub use handlers::deploy::{DeployParams, Deployment};
pub use handlers::logs::LogHistory;
pub use handlers::transfer::TransferApproveReport;
pub use inspector::{BalanceSnapshot, Inspector};

/// Errors surfaced by toolkit workflows.
#[derive(Debug, Error)]
pub enum ToolkitError {
	/// Invalid or missing configuration, detected before any network call.
	#[error("Configuration error: {0}")]
	Configuration(String),
	/// The ledger rejected a transaction before inclusion.
	#[error("Submission error: {0}")]
	Submission(String),
	/// A transaction was included but failed.
	#[error("Transaction {} reverted in block {}", .receipt.hash, .receipt.block_number)]
	Revert { receipt: Box<TransactionReceipt> },
	/// No receipt was observed within the configured wait.
	#[error("Timed out after {}s waiting for receipt of {hash}", .waited.as_secs())]
	Timeout {
		hash: TransactionHash,
		waited: Duration,
	},
	/// Transport failure or malformed ledger response.
	#[error("Ledger error: {0}")]
	Ledger(String),
}

impl From<DeliveryError> for ToolkitError {
	fn from(err: DeliveryError) -> Self {
		match err {
			DeliveryError::Submission(msg) => ToolkitError::Submission(msg),
			DeliveryError::Reverted(receipt) => ToolkitError::Revert { receipt },
			DeliveryError::Network(_) | DeliveryError::InvalidResponse(_) => {
				ToolkitError::Ledger(err.to_string())
			}
		}
	}
}

impl From<ConfigError> for ToolkitError {
	fn from(err: ConfigError) -> Self {
		ToolkitError::Configuration(err.to_string())
	}
}

impl From<PlanError> for ToolkitError {
	fn from(err: PlanError) -> Self {
		ToolkitError::Configuration(err.to_string())
	}
}

impl From<AddressError> for ToolkitError {
	fn from(err: AddressError) -> Self {
		ToolkitError::Configuration(err.to_string())
	}
}

impl From<FeeError> for ToolkitError {
	fn from(err: FeeError) -> Self {
		ToolkitError::Configuration(err.to_string())
	}
}

impl From<AccountError> for ToolkitError {
	fn from(err: AccountError) -> Self {
		ToolkitError::Configuration(err.to_string())
	}
}

impl From<SchemaError> for ToolkitError {
	fn from(err: SchemaError) -> Self {
		ToolkitError::Configuration(err.to_string())
	}
}
