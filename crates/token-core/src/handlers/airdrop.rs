//! Batched-versus-individual airdrop comparison.
//!
//! The same distribution plan is executed twice: once as a single
//! `airdrop(address[],uint256[])` transaction and once as one `transfer` per
//! entry. Receipts from both paths feed [`GasAccounting`].
//!
//! Individual transfers run strictly in plan order. Each one holds the
//! workflow's [`SignerLock`](crate::SignerLock) from submission until its
//! receipt is observed, so transfer `i + 1` is never signed before transfer `i`
//! is included. A failure aborts the remaining transfers and discards the
//! partial gas total.

use crate::accounting::{GasAccounting, GasComparisonReport};
use crate::contracts::{contract_call, IToken};
use crate::engine::context::WorkflowContext;
use crate::ToolkitError;
use token_types::{Address, DistributionPlan, FeeParams, TransactionReceipt};
use tracing::instrument;

/// Receipts of a completed individual run.
#[derive(Debug, Clone)]
pub struct IndividualRun {
	/// One receipt per plan entry, in plan order.
	pub receipts: Vec<TransactionReceipt>,
	pub total_gas: u128,
}

impl IndividualRun {
	pub fn gas_used(&self) -> Vec<u64> {
		self.receipts.iter().map(|r| r.gas_used).collect()
	}
}

/// Runs the airdrop comparison against one token.
pub struct AirdropOrchestrator {
	context: WorkflowContext,
	token: Address,
	batch_fees: FeeParams,
	individual_fees: FeeParams,
}

impl AirdropOrchestrator {
	pub fn new(
		context: WorkflowContext,
		token: Address,
		batch_fees: FeeParams,
		individual_fees: FeeParams,
	) -> Self {
		Self {
			context,
			token,
			batch_fees,
			individual_fees,
		}
	}

	/// Sends the whole plan as one `airdrop` transaction.
	#[instrument(skip_all, fields(recipients = plan.len()))]
	pub async fn run_batch(
		&self,
		plan: &DistributionPlan,
	) -> Result<TransactionReceipt, ToolkitError> {
		let call = contract_call(
			self.token,
			&IToken::airdropCall {
				recipients: plan.recipients(),
				amounts: plan.amounts(),
			},
			self.batch_fees,
		);

		let receipt = self.context.execute(call).await?;
		tracing::info!(gas_used = receipt.gas_used, "Batch airdrop confirmed");
		Ok(receipt)
	}

	/// Sends one `transfer` per plan entry, in order.
	#[instrument(skip_all, fields(recipients = plan.len()))]
	pub async fn run_individual(
		&self,
		plan: &DistributionPlan,
	) -> Result<IndividualRun, ToolkitError> {
		let mut receipts = Vec::with_capacity(plan.len());

		for (index, entry) in plan.entries().iter().enumerate() {
			let call = contract_call(
				self.token,
				&IToken::transferCall {
					to: entry.recipient,
					amount: entry.amount.base_units(),
				},
				self.individual_fees,
			);

			let receipt = self.context.execute(call).await.inspect_err(|e| {
				tracing::warn!(index, recipient = %entry.recipient, error = %e, "Individual transfer failed");
			})?;
			receipts.push(receipt);
		}

		let total_gas = receipts.iter().map(|r| r.gas_used as u128).sum();
		tracing::info!(total_gas = %total_gas, "Individual transfers confirmed");

		Ok(IndividualRun {
			receipts,
			total_gas,
		})
	}

	/// Runs the batched path, then the individual path, and compares their gas.
	pub async fn compare(
		&self,
		plan: &DistributionPlan,
	) -> Result<GasComparisonReport, ToolkitError> {
		let batch = self.run_batch(plan).await?;
		let individual = self.run_individual(plan).await?;
		Ok(GasAccounting::compare(batch.gas_used, &individual.gas_used()))
	}

	/// Runs both paths concurrently.
	///
	/// The signer lock still admits one transaction at a time, so the batched
	/// transaction may land between two individual transfers; the two gas
	/// figures are kept apart regardless of interleaving.
	pub async fn compare_concurrently(
		&self,
		plan: &DistributionPlan,
	) -> Result<GasComparisonReport, ToolkitError> {
		let (batch, individual) =
			futures::try_join!(self.run_batch(plan), self.run_individual(plan))?;
		Ok(GasAccounting::compare(batch.gas_used, &individual.gas_used()))
	}
}
