//! String formatting utilities.
//!
//! Hex prefix handling, token amount rendering and hash truncation for log output.

/// Shortens a hex string for log fields, keeping the first 10 characters.
pub fn truncate_id(id: &str) -> String {
	if id.len() <= 10 {
		id.to_string()
	} else {
		format!("{}..", &id[..10])
	}
}

/// Adds "0x" prefix to a hex string if it doesn't already have one.
pub fn with_0x_prefix(hex_str: &str) -> String {
	if hex_str.to_lowercase().starts_with("0x") {
		hex_str.to_string()
	} else {
		format!("0x{}", hex_str)
	}
}

/// Removes "0x" or "0X" prefix from a hex string if present.
pub fn without_0x_prefix(hex_str: &str) -> &str {
	hex_str
		.strip_prefix("0x")
		.or_else(|| hex_str.strip_prefix("0X"))
		.unwrap_or(hex_str)
}

/// Formats a raw integer amount with decimal places for display.
///
/// `amount` must be a base-10 integer string. Trailing fractional zeros are
/// trimmed, so `"1500000000000000000"` with 18 decimals renders as `"1.5"`.
pub fn format_token_amount(amount: &str, decimals: u8) -> String {
	if decimals == 0 {
		return amount.to_string();
	}

	let decimal_places = decimals as usize;

	let (integer_part, decimal_part) = if amount.len() <= decimal_places {
		let decimal_str = format!("{:0>width$}", amount, width = decimal_places);
		("0".to_string(), decimal_str)
	} else {
		let split_pos = amount.len() - decimal_places;
		(
			amount[..split_pos].to_string(),
			amount[split_pos..].to_string(),
		)
	};

	let decimal_trimmed = decimal_part.trim_end_matches('0');

	if decimal_trimmed.is_empty() {
		integer_part
	} else {
		format!("{}.{}", integer_part, decimal_trimmed)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_truncate_id() {
		assert_eq!(truncate_id("0x12345678"), "0x12345678");
		assert_eq!(truncate_id("0x1234567890abcdef"), "0x12345678..");
	}

	#[test]
	fn test_prefix_helpers() {
		let bare = "70997970c51812dc3a010c7d01b50e0d17dc79c8";
		let prefixed = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

		assert_eq!(with_0x_prefix(bare), prefixed);
		assert_eq!(with_0x_prefix(prefixed), prefixed);
		assert_eq!(without_0x_prefix(prefixed), bare);
		assert_eq!(without_0x_prefix(&prefixed.replace("0x", "0X")), bare);
		assert_eq!(without_0x_prefix(bare), bare);
	}

	#[test]
	fn test_format_token_amount() {
		assert_eq!(format_token_amount("100000000000000000000", 18), "100");
		assert_eq!(format_token_amount("50000000000000000000", 18), "50");
		assert_eq!(format_token_amount("1500000000000000000", 18), "1.5");
		assert_eq!(format_token_amount("1", 18), "0.000000000000000001");
		assert_eq!(format_token_amount("0", 18), "0");
		assert_eq!(format_token_amount("2000000", 0), "2000000");
	}
}
