//! Common types module for the token toolkit.
//!
//! This module defines the data types shared by every toolkit crate: on-chain
//! addresses, fixed-point token amounts, distribution plans, transaction
//! requests and receipts, and raw event logs.

/// Address parsing and canonicalisation.
pub mod address;
/// Fixed-point token amounts.
pub mod amount;
/// Transaction requests, receipts and raw logs exchanged with the ledger.
pub mod delivery;
/// Distribution plans for multi-recipient transfers.
pub mod plan;
/// Redacting wrapper for signing keys.
pub mod secret_string;
/// Utility functions for string formatting.
pub mod utils;

pub use address::{parse_address, AddressError};
pub use alloy_primitives::{Address, Bytes, B256, U256};
pub use amount::{Amount, AmountError, TOKEN_DECIMALS};
pub use delivery::{
	BlockRange, ContractCall, FeeError, FeeParams, RawLog, TransactionHash, TransactionReceipt,
};
pub use plan::{DistributionPlan, PlanEntry, PlanError};
pub use secret_string::SecretString;
pub use utils::{format_token_amount, truncate_id, with_0x_prefix, without_0x_prefix};
