//! Account management module for the token toolkit.
//!
//! Provides the signing identity used by the ledger client. Only local private
//! keys are supported; the key never leaves the [`SecretString`] it was loaded
//! into except to build the signer.

use alloy_network::EthereumWallet;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use thiserror::Error;
use token_types::{with_0x_prefix, Address, SecretString};

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// Error that occurs when a cryptographic key is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
}

/// Trait defining the interface for signing identities.
///
/// Implementations hand the ledger client a wallet bound to a chain id; all
/// transactions of one toolkit run are signed by the same identity.
pub trait AccountInterface: Send + Sync {
	/// Returns the address transactions are sent from.
	fn address(&self) -> Address;

	/// Builds a wallet that signs for the given chain.
	fn wallet(&self, chain_id: u64) -> EthereumWallet;
}

/// Account backed by a private key held in memory.
pub struct LocalAccount {
	signer: PrivateKeySigner,
}

impl LocalAccount {
	/// Parses a hex private key, with or without the `0x` prefix.
	pub fn from_private_key(key: &SecretString) -> Result<Self, AccountError> {
		let signer: PrivateKeySigner = key.with_exposed(|raw| {
			with_0x_prefix(raw.trim())
				.parse()
				.map_err(|_| AccountError::InvalidKey("Invalid private key format".to_string()))
		})?;

		tracing::debug!(address = %signer.address(), "Loaded local account");
		Ok(Self { signer })
	}
}

impl AccountInterface for LocalAccount {
	fn address(&self) -> Address {
		self.signer.address()
	}

	fn wallet(&self, chain_id: u64) -> EthereumWallet {
		EthereumWallet::from(self.signer.clone().with_chain_id(Some(chain_id)))
	}
}
