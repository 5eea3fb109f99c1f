//! Gas accounting for the batched-versus-individual comparison.
//!
//! Pure arithmetic over receipts the orchestrator already observed. All sums
//! are integers; the saving percentage is computed in hundredths of a percent
//! and rounded half away from zero, so the same inputs always print the same
//! two-decimal figure.

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Outcome of comparing one batched transaction with its individual equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GasComparisonReport {
	/// Gas used by the single batched transaction.
	pub batched_gas: u64,
	/// Gas used by each individual transaction, in plan order.
	pub individual_gas: Vec<u64>,
	/// Sum of `individual_gas`.
	pub individual_total: u128,
	/// `individual_total - batched_gas`. Negative when batching cost more.
	pub saved: i128,
	/// `saved / individual_total * 100` with two decimals, zero when nothing was spent individually.
	pub percent_saved: Decimal,
}

impl GasComparisonReport {
	/// Saving percentage with exactly two decimals, e.g. `"25.00"`.
	pub fn percent_display(&self) -> String {
		format!("{:.2}", self.percent_saved)
	}
}

impl fmt::Display for GasComparisonReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"Batch airdrop gas: {}, Individual transfers gas: {}, Gas saved: {}%",
			self.batched_gas,
			self.individual_total,
			self.percent_display()
		)
	}
}

/// Stateless gas comparison engine.
pub struct GasAccounting;

impl GasAccounting {
	pub fn compare(batched_gas: u64, individual_gas: &[u64]) -> GasComparisonReport {
		let individual_total: u128 = individual_gas.iter().map(|g| *g as u128).sum();
		let saved = individual_total as i128 - batched_gas as i128;

		GasComparisonReport {
			batched_gas,
			individual_gas: individual_gas.to_vec(),
			individual_total,
			saved,
			percent_saved: percent_of(saved, individual_total),
		}
	}
}

/// `part / whole * 100` rounded half away from zero to two decimals.
fn percent_of(part: i128, whole: u128) -> Decimal {
	if whole == 0 {
		return Decimal::new(0, 2);
	}

	let whole = whole as i128;
	let scaled = part.saturating_mul(10_000);
	let mut hundredths = scaled / whole;
	let remainder = scaled % whole;
	if remainder.unsigned_abs() * 2 >= whole.unsigned_abs() {
		hundredths += scaled.signum();
	}

	Decimal::try_from_i128_with_scale(hundredths, 2).unwrap_or(if hundredths < 0 {
		Decimal::MIN
	} else {
		Decimal::MAX
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_batch_saves_a_quarter() {
		let report = GasAccounting::compare(150_000, &[50_000; 4]);

		assert_eq!(report.individual_total, 200_000);
		assert_eq!(report.saved, 50_000);
		assert_eq!(report.percent_display(), "25.00");
		assert_eq!(
			report.to_string(),
			"Batch airdrop gas: 150000, Individual transfers gas: 200000, Gas saved: 25.00%"
		);
	}

	#[test]
	fn test_zero_individual_total() {
		let report = GasAccounting::compare(0, &[]);
		assert_eq!(report.individual_total, 0);
		assert_eq!(report.saved, 0);
		assert_eq!(report.percent_display(), "0.00");

		let report = GasAccounting::compare(21_000, &[0, 0]);
		assert_eq!(report.saved, -21_000);
		assert_eq!(report.percent_display(), "0.00");
	}

	#[test]
	fn test_negative_saving_is_kept() {
		let report = GasAccounting::compare(120_000, &[50_000, 50_000]);
		assert_eq!(report.saved, -20_000);
		assert_eq!(report.percent_display(), "-20.00");
	}

	#[test]
	fn test_rounding_half_away_from_zero() {
		// 1/3 of the total saved
		let report = GasAccounting::compare(200, &[100, 100, 100]);
		assert_eq!(report.percent_display(), "33.33");

		// 2/3 of the total saved
		let report = GasAccounting::compare(100, &[100, 100, 100]);
		assert_eq!(report.percent_display(), "66.67");

		// exactly half a hundredth
		let report = GasAccounting::compare(199_990, &[200_000]);
		assert_eq!(report.percent_display(), "0.01");
		let report = GasAccounting::compare(200_010, &[200_000]);
		assert_eq!(report.percent_display(), "-0.01");
	}

	proptest! {
		#[test]
		fn prop_saved_is_total_minus_batched(
			batched in any::<u64>(),
			individual in proptest::collection::vec(any::<u64>(), 0..16),
		) {
			let report = GasAccounting::compare(batched, &individual);
			let total: u128 = individual.iter().map(|g| *g as u128).sum();

			prop_assert_eq!(report.individual_total, total);
			prop_assert_eq!(report.saved, total as i128 - batched as i128);
			prop_assert_eq!(report.percent_saved.scale(), 2);

			if total == 0 {
				prop_assert_eq!(report.percent_display(), "0.00");
			} else {
				prop_assert!(report.saved.signum() * report.percent_saved.mantissa().signum() >= 0);
			}
		}
	}
}
