//! Address parsing with checksum enforcement.
//!
//! Every address that enters the toolkit from configuration or the command line
//! goes through [`parse_address`]. Lowercase and uppercase hex are accepted as-is;
//! mixed-case input must carry a valid EIP-55 checksum. Parsed addresses are plain
//! 20-byte values, so comparisons never depend on the textual case of the input,
//! and their `Display` output is always the checksummed form.

use crate::utils::without_0x_prefix;
use alloy_primitives::Address;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while parsing an address.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
	#[error("Address must be 0x followed by 40 hex characters, got '{0}'")]
	InvalidFormat(String),
	#[error("Address '{0}' has an invalid checksum")]
	InvalidChecksum(String),
}

/// Parses and canonicalises a hex address.
pub fn parse_address(input: &str) -> Result<Address, AddressError> {
	let trimmed = input.trim();
	let hex_part = without_0x_prefix(trimmed);

	if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
		return Err(AddressError::InvalidFormat(trimmed.to_string()));
	}

	let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
	let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());

	if has_lower && has_upper {
		let prefixed = format!("0x{}", hex_part);
		return Address::parse_checksummed(&prefixed, None)
			.map_err(|_| AddressError::InvalidChecksum(trimmed.to_string()));
	}

	Address::from_str(hex_part).map_err(|_| AddressError::InvalidFormat(trimmed.to_string()))
}
