//! Fixed-point token amounts.
//!
//! Amounts are stored as the raw on-chain integer (`U256`) scaled by
//! [`TOKEN_DECIMALS`]. Human-readable strings are only parsed and produced at
//! the boundary; arithmetic never goes through floating point.

use crate::utils::format_token_amount;
use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use thiserror::Error;

/// Decimal exponent used by the token.
pub const TOKEN_DECIMALS: u8 = 18;

/// Errors that can occur while parsing a human-readable amount.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
	#[error("Invalid amount '{0}'")]
	Invalid(String),
	#[error("Amount '{value}' has more than {decimals} fractional digits")]
	TooPrecise { value: String, decimals: u8 },
	#[error("Amount '{0}' does not fit in 256 bits")]
	Overflow(String),
}

/// A token amount in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(U256);

impl Amount {
	pub const ZERO: Self = Self(U256::ZERO);

	/// Wraps a raw base-unit value.
	pub const fn from_base_units(value: U256) -> Self {
		Self(value)
	}

	/// Convenience constructor for whole tokens.
	pub fn from_tokens(tokens: u64) -> Self {
		Self(U256::from(tokens) * U256::from(10u64).pow(U256::from(TOKEN_DECIMALS)))
	}

	/// Returns the raw base-unit value.
	pub const fn base_units(&self) -> U256 {
		self.0
	}

	/// Parses a decimal string such as `"10"` or `"0.25"` into base units.
	pub fn parse_units(input: &str) -> Result<Self, AmountError> {
		let value = input.trim();
		if value.is_empty() {
			return Err(AmountError::Invalid(input.to_string()));
		}

		let (integer, fraction) = match value.split_once('.') {
			Some((integer, fraction)) => (integer, fraction),
			None => (value, ""),
		};

		let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
		if (integer.is_empty() && fraction.is_empty()) || !all_digits(integer) || !all_digits(fraction)
		{
			return Err(AmountError::Invalid(input.to_string()));
		}

		let decimals = TOKEN_DECIMALS as usize;
		if fraction.len() > decimals {
			return Err(AmountError::TooPrecise {
				value: input.to_string(),
				decimals: TOKEN_DECIMALS,
			});
		}

		let digits = format!(
			"{}{:0<width$}",
			if integer.is_empty() { "0" } else { integer },
			fraction,
			width = decimals
		);

		U256::from_str_radix(&digits, 10)
			.map(Self)
			.map_err(|_| AmountError::Overflow(input.to_string()))
	}

	/// Formats the amount as a decimal string, trimming trailing zeros.
	pub fn format_units(&self) -> String {
		format_token_amount(&self.0.to_string(), TOKEN_DECIMALS)
	}

	pub fn checked_add(self, other: Self) -> Option<Self> {
		self.0.checked_add(other.0).map(Self)
	}

	pub fn checked_sub(self, other: Self) -> Option<Self> {
		self.0.checked_sub(other.0).map(Self)
	}
}

impl fmt::Display for Amount {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.format_units())
	}
}

impl From<U256> for Amount {
	fn from(value: U256) -> Self {
		Self(value)
	}
}

impl From<Amount> for U256 {
	fn from(amount: Amount) -> Self {
		amount.0
	}
}

impl Sum for Amount {
	fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
		Self(iter.fold(U256::ZERO, |acc, amount| acc.saturating_add(amount.0)))
	}
}

// Amounts are written as human-readable token strings in configuration files
impl Serialize for Amount {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.format_units())
	}
}

impl<'de> Deserialize<'de> for Amount {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		Amount::parse_units(&s).map_err(serde::de::Error::custom)
	}
}
