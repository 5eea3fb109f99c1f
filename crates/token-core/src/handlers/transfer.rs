//! Single transfer followed by an approval, with balances around both.

use crate::contracts::{contract_call, IToken};
use crate::engine::context::WorkflowContext;
use crate::inspector::{BalanceSnapshot, Inspector};
use crate::ToolkitError;
use token_config::FeesConfig;
use token_types::{Address, Amount, TransactionReceipt};
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct TransferApproveReport {
	pub before: BalanceSnapshot,
	pub transfer: TransactionReceipt,
	pub approve: TransactionReceipt,
	/// Allowance read back after the approval.
	pub allowance: Amount,
	pub after: BalanceSnapshot,
}

/// Transfers `amount` to `recipient`, approves it to spend `allowance`, and
/// reads balances before and after. Any ledger error aborts the workflow.
#[instrument(skip_all, fields(recipient = %recipient))]
pub async fn transfer_approve(
	context: &WorkflowContext,
	inspector: &Inspector,
	recipient: Address,
	amount: Amount,
	allowance: Amount,
	fees: &FeesConfig,
) -> Result<TransferApproveReport, ToolkitError> {
	let signer = context.signer_address()?;
	let token = inspector.token();
	let holders = [signer, recipient];

	let before = inspector.snapshot("Before", &holders).await?;

	let transfer = context
		.execute(contract_call(
			token,
			&IToken::transferCall {
				to: recipient,
				amount: amount.base_units(),
			},
			fees.transfer,
		))
		.await?;

	let approve = context
		.execute(contract_call(
			token,
			&IToken::approveCall {
				spender: recipient,
				amount: allowance.base_units(),
			},
			fees.approve,
		))
		.await?;

	let allowance = inspector.allowance(signer, recipient).await?;
	let after = inspector.snapshot("After", &holders).await?;

	Ok(TransferApproveReport {
		before,
		transfer,
		approve,
		allowance,
		after,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_utils::{StubLedger, SIGNER, TOKEN};
	use alloy_primitives::address;
	use std::sync::Arc;
	use std::time::Duration;
	use token_delivery::LedgerClient;

	const RECIPIENT: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");

	fn setup(ledger: Arc<StubLedger>) -> (WorkflowContext, Inspector) {
		let ledger: Arc<dyn LedgerClient> = ledger;
		(
			WorkflowContext::new(ledger.clone(), Duration::from_secs(30)),
			Inspector::new(ledger, TOKEN),
		)
	}

	#[tokio::test]
	async fn test_transfer_then_approve() {
		let ledger = Arc::new(StubLedger::new());
		let (context, inspector) = setup(ledger.clone());

		let report = transfer_approve(
			&context,
			&inspector,
			RECIPIENT,
			Amount::from_tokens(100),
			Amount::from_tokens(50),
			&FeesConfig::default(),
		)
		.await
		.unwrap();

		assert_eq!(report.before.balance_of(&RECIPIENT), Some(Amount::ZERO));
		assert_eq!(
			report.after.balance_of(&RECIPIENT),
			Some(Amount::from_tokens(100))
		);
		assert_eq!(
			report.after.balance_of(&SIGNER),
			Some(Amount::from_tokens(999_900))
		);
		assert_eq!(report.allowance, Amount::from_tokens(50));
		assert!(report.transfer.block_number < report.approve.block_number);

		let calls = ledger.calls();
		assert_eq!(calls[0].signature, "transfer(address,uint256)");
		assert_eq!(calls[0].fees, FeesConfig::default().transfer);
		assert_eq!(calls[1].signature, "approve(address,uint256)");
		assert_eq!(calls[1].fees, FeesConfig::default().approve);
	}

	#[tokio::test]
	async fn test_revert_aborts_before_approve() {
		let ledger = Arc::new(StubLedger::new().reverting_at(0));
		let (context, inspector) = setup(ledger.clone());

		let result = transfer_approve(
			&context,
			&inspector,
			RECIPIENT,
			Amount::from_tokens(100),
			Amount::from_tokens(50),
			&FeesConfig::default(),
		)
		.await;

		assert!(matches!(result, Err(ToolkitError::Revert { .. })));
		assert_eq!(ledger.calls().len(), 1);
	}
}
