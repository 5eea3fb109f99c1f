//! Distribution plans for multi-recipient transfers.
//!
//! A plan is validated once at construction: it is never empty and every
//! recipient has exactly one amount. Recipients may repeat, and the entry order
//! is the order in which transfers are executed.

use crate::Amount;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while building a distribution plan.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
	#[error("Distribution plan must contain at least one recipient")]
	Empty,
	#[error("Distribution plan has {recipients} recipients but {amounts} amounts")]
	LengthMismatch { recipients: usize, amounts: usize },
}

/// A single recipient and the amount it receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
	pub recipient: Address,
	pub amount: Amount,
}

/// An ordered, non-empty list of transfers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionPlan {
	entries: Vec<PlanEntry>,
}

impl DistributionPlan {
	/// Builds a plan from parallel recipient and amount sequences.
	pub fn new(recipients: Vec<Address>, amounts: Vec<Amount>) -> Result<Self, PlanError> {
		if recipients.len() != amounts.len() {
			return Err(PlanError::LengthMismatch {
				recipients: recipients.len(),
				amounts: amounts.len(),
			});
		}

		Self::from_entries(
			recipients
				.into_iter()
				.zip(amounts)
				.map(|(recipient, amount)| PlanEntry { recipient, amount })
				.collect(),
		)
	}

	/// Builds a plan from already paired entries.
	pub fn from_entries(entries: Vec<PlanEntry>) -> Result<Self, PlanError> {
		if entries.is_empty() {
			return Err(PlanError::Empty);
		}
		Ok(Self { entries })
	}

	pub fn entries(&self) -> &[PlanEntry] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Always false; kept for API symmetry with `len`.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn recipients(&self) -> Vec<Address> {
		self.entries.iter().map(|e| e.recipient).collect()
	}

	/// Raw base-unit amounts in plan order, ready for ABI encoding.
	pub fn amounts(&self) -> Vec<U256> {
		self.entries.iter().map(|e| e.amount.base_units()).collect()
	}

	/// Sum of all amounts in the plan.
	pub fn total(&self) -> Amount {
		self.entries.iter().map(|e| e.amount).sum()
	}
}
