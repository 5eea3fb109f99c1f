//! Configuration module for the token toolkit.
//!
//! Loads a TOML file into a typed [`Config`] that every workflow receives
//! explicitly. Environment variables are only consulted here, while the file is
//! being read: `${VAR}` is replaced by the variable's value and
//! `${VAR:-default}` falls back to `default` when the variable is unset.
//!
//! ## Modular Configuration Support
//!
//! Configurations can be split into multiple files:
//! - Use `include = ["fees.toml", "airdrop.toml"]` to include other config files
//! - Each top-level section must be unique across all files (no duplicates allowed)

mod loader;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use token_types::{
	parse_address, without_0x_prefix, Address, Amount, FeeParams, SecretString,
};

/// Recipient alias that resolves to the signing account's own address.
pub const SIGNER_ALIAS: &str = "signer";

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when a required value is missing or invalid.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Keep the message only, the error's Display dumps the whole input
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the toolkit.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Ledger endpoint and chain identity.
	pub network: NetworkConfig,
	/// Signing account. Only workflows that submit transactions need it.
	#[serde(default)]
	pub account: Option<AccountConfig>,
	/// Token contract address and deployment parameters.
	pub token: TokenConfig,
	/// Receipt polling and timeout settings.
	#[serde(default)]
	pub delivery: DeliveryConfig,
	/// Fee parameters per transaction class.
	#[serde(default)]
	pub fees: FeesConfig,
	/// Distribution plan for the airdrop comparison.
	#[serde(default)]
	pub airdrop: AirdropConfig,
	/// Historical log query settings.
	#[serde(default)]
	pub logs: LogsConfig,
}

/// Ledger endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
	/// HTTP(S) JSON-RPC endpoint.
	pub rpc_url: String,
	/// Chain identifier used for transaction signing.
	pub chain_id: u64,
}

/// Signing account configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
	/// Hex private key, with or without `0x`. An empty key is treated as unset.
	#[serde(default = "default_private_key")]
	pub private_key: SecretString,
}

fn default_private_key() -> SecretString {
	SecretString::new(String::new())
}

/// Token contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenConfig {
	/// Address of the deployed token. Optional until a workflow needs it;
	/// an empty string is treated as unset.
	#[serde(default)]
	pub address: Option<String>,
	#[serde(default = "default_token_name")]
	pub name: String,
	#[serde(default = "default_token_symbol")]
	pub symbol: String,
	/// Supply cap passed to the constructor, in whole tokens.
	#[serde(default = "default_token_cap")]
	pub cap: Amount,
	/// Amount minted to the deployer, in whole tokens.
	#[serde(default = "default_initial_supply")]
	pub initial_supply: Amount,
	/// Build artifact (JSON with `abi` and `bytecode`) used for deployment and
	/// event decoding.
	#[serde(default)]
	pub artifact: Option<PathBuf>,
}

fn default_token_name() -> String {
	"CampusCredit".to_string()
}

fn default_token_symbol() -> String {
	"CAMP".to_string()
}

fn default_token_cap() -> Amount {
	Amount::from_tokens(2_000_000)
}

fn default_initial_supply() -> Amount {
	Amount::from_tokens(1_000_000)
}

/// Receipt waiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeliveryConfig {
	/// How long a workflow waits for a receipt before failing with a timeout.
	/// Defaults to 120 seconds.
	#[serde(default = "default_receipt_timeout_seconds")]
	pub receipt_timeout_seconds: u64,
	/// Interval between receipt polls. Defaults to 1000 milliseconds.
	#[serde(default = "default_poll_interval_ms")]
	pub poll_interval_ms: u64,
}

impl Default for DeliveryConfig {
	fn default() -> Self {
		Self {
			receipt_timeout_seconds: default_receipt_timeout_seconds(),
			poll_interval_ms: default_poll_interval_ms(),
		}
	}
}

impl DeliveryConfig {
	pub fn receipt_timeout(&self) -> Duration {
		Duration::from_secs(self.receipt_timeout_seconds)
	}

	pub fn poll_interval(&self) -> Duration {
		Duration::from_millis(self.poll_interval_ms)
	}
}

fn default_receipt_timeout_seconds() -> u64 {
	120
}

fn default_poll_interval_ms() -> u64 {
	1000
}

/// Fee parameters for each transaction class.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeesConfig {
	#[serde(default = "default_deploy_fees")]
	pub deploy: FeeParams,
	#[serde(default = "default_transfer_fees")]
	pub transfer: FeeParams,
	#[serde(default = "default_approve_fees")]
	pub approve: FeeParams,
	/// Fees for the single multi-recipient airdrop transaction.
	#[serde(default = "default_airdrop_fees")]
	pub batch: FeeParams,
	/// Fees for each transfer of the individual airdrop path.
	#[serde(default = "default_airdrop_fees")]
	pub individual: FeeParams,
}

impl Default for FeesConfig {
	fn default() -> Self {
		Self {
			deploy: default_deploy_fees(),
			transfer: default_transfer_fees(),
			approve: default_approve_fees(),
			batch: default_airdrop_fees(),
			individual: default_airdrop_fees(),
		}
	}
}

const GWEI: u128 = 1_000_000_000;

fn gwei_fees(priority: u128, max: u128) -> FeeParams {
	FeeParams {
		max_priority_fee_per_gas: priority * GWEI,
		max_fee_per_gas: max * GWEI,
	}
}

fn default_deploy_fees() -> FeeParams {
	gwei_fees(2, 20)
}

fn default_transfer_fees() -> FeeParams {
	gwei_fees(1, 20)
}

fn default_approve_fees() -> FeeParams {
	gwei_fees(2, 21)
}

fn default_airdrop_fees() -> FeeParams {
	gwei_fees(2, 22)
}

/// A configured airdrop recipient.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RecipientConfig {
	/// Hex address, or `"signer"` for the signing account itself.
	pub address: String,
	/// Amount in whole tokens, e.g. `"10"` or `"2.5"`.
	pub amount: Amount,
}

/// Airdrop comparison configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AirdropConfig {
	#[serde(default = "default_recipients")]
	pub recipients: Vec<RecipientConfig>,
}

impl Default for AirdropConfig {
	fn default() -> Self {
		Self {
			recipients: default_recipients(),
		}
	}
}

fn default_recipients() -> Vec<RecipientConfig> {
	[
		(SIGNER_ALIAS, 10),
		("0x70997970C51812dc3A010C7d01b50e0d17dc79C8", 15),
		("0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC", 20),
		("0x90F79bf6EB2c4f870365E785982E1f101E93b906", 25),
	]
	.into_iter()
	.map(|(address, tokens)| RecipientConfig {
		address: address.to_string(),
		amount: Amount::from_tokens(tokens),
	})
	.collect()
}

/// Log history configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogsConfig {
	/// Number of blocks before the latest one to scan. Defaults to 2000.
	#[serde(default = "default_lookback_blocks")]
	pub lookback_blocks: u64,
}

impl Default for LogsConfig {
	fn default() -> Self {
		Self {
			lookback_blocks: default_lookback_blocks(),
		}
	}
}

fn default_lookback_blocks() -> u64 {
	2000
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = String::with_capacity(input.len());
	let mut last_end = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};

		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match cap.get(2) {
				Some(default) => default.as_str().to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)))
				},
			},
		};

		result.push_str(&input[last_end..full_match.start()]);
		result.push_str(&value);
		last_end = full_match.end();
	}
	result.push_str(&input[last_end..]);

	Ok(result)
}

impl Config {
	/// Loads configuration from a file, following `include` directives.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let base_dir = path
			.parent()
			.filter(|p| !p.as_os_str().is_empty())
			.unwrap_or_else(|| Path::new("."));

		let file_name = path.file_name().ok_or_else(|| {
			ConfigError::Validation(format!("Invalid path: {}", path.display()))
		})?;

		let mut loader = loader::ConfigLoader::new(base_dir);
		loader.load_config(file_name).await
	}

	/// Address of the deployed token contract.
	///
	/// Fails when the token has not been configured, which is the case before
	/// the first deployment.
	pub fn token_address(&self) -> Result<Address, ConfigError> {
		let raw = self
			.token
			.address
			.as_deref()
			.map(str::trim)
			.filter(|s| !s.is_empty())
			.ok_or_else(|| {
				ConfigError::Validation(
					"token.address is required (set TOKEN_ADDRESS after deploying)".into(),
				)
			})?;

		parse_address(raw).map_err(|e| ConfigError::Validation(format!("token.address: {}", e)))
	}

	/// Private key of the signing account.
	///
	/// Fails when no key is configured. Read-only workflows never call this.
	pub fn signing_key(&self) -> Result<&SecretString, ConfigError> {
		self.account
			.as_ref()
			.map(|account| &account.private_key)
			.filter(|key| !key.is_blank())
			.ok_or_else(|| {
				ConfigError::Validation(
					"account.private_key is required for workflows that submit transactions"
						.into(),
				)
			})
	}

	/// Validates the configuration before any network interaction.
	fn validate(&self) -> Result<(), ConfigError> {
		let rpc_url = self.network.rpc_url.trim();
		if rpc_url.is_empty() {
			return Err(ConfigError::Validation(
				"network.rpc_url cannot be empty".into(),
			));
		}
		if !(rpc_url.starts_with("http://") || rpc_url.starts_with("https://")) {
			return Err(ConfigError::Validation(
				"network.rpc_url must start with http:// or https://".into(),
			));
		}
		if self.network.chain_id == 0 {
			return Err(ConfigError::Validation(
				"network.chain_id must be greater than 0".into(),
			));
		}

		// Only validate the key when one is set
		if let Ok(key) = self.signing_key() {
			let key_ok = key.with_exposed(|key| {
				let hex = without_0x_prefix(key.trim());
				hex.len() == 64 && hex.chars().all(|c| c.is_ascii_hexdigit())
			});
			if !key_ok {
				return Err(ConfigError::Validation(
					"account.private_key must be 32 bytes of hex".into(),
				));
			}
		}

		// Only validate the token address when one is set
		if self
			.token
			.address
			.as_deref()
			.is_some_and(|s| !s.trim().is_empty())
		{
			self.token_address()?;
		}
		if self.token.initial_supply > self.token.cap {
			return Err(ConfigError::Validation(format!(
				"token.initial_supply ({}) exceeds token.cap ({})",
				self.token.initial_supply, self.token.cap
			)));
		}

		if self.delivery.receipt_timeout_seconds == 0 {
			return Err(ConfigError::Validation(
				"delivery.receipt_timeout_seconds must be greater than 0".into(),
			));
		}
		if self.delivery.poll_interval_ms == 0 {
			return Err(ConfigError::Validation(
				"delivery.poll_interval_ms must be greater than 0".into(),
			));
		}

		if self.airdrop.recipients.is_empty() {
			return Err(ConfigError::Validation(
				"airdrop.recipients must contain at least one recipient".into(),
			));
		}
		for (index, recipient) in self.airdrop.recipients.iter().enumerate() {
			if recipient.address != SIGNER_ALIAS {
				parse_address(&recipient.address).map_err(|e| {
					ConfigError::Validation(format!("airdrop.recipients[{}]: {}", index, e))
				})?;
			}
		}

		if self.logs.lookback_blocks == 0 {
			return Err(ConfigError::Validation(
				"logs.lookback_blocks must be greater than 0".into(),
			));
		}

		Ok(())
	}
}

/// Parses configuration from a TOML string.
///
/// Environment variables are resolved and the configuration is validated
/// after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
