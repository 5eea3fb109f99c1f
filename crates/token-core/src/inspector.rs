//! Point-in-time balance and allowance reads.

use crate::contracts::IToken;
use crate::ToolkitError;
use alloy_sol_types::SolCall;
use std::sync::Arc;
use token_delivery::{DeliveryError, LedgerClient};
use token_types::{Address, Amount, Bytes};

/// Balances of several holders read at one point of a workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSnapshot {
	pub label: String,
	pub balances: Vec<(Address, Amount)>,
}

impl BalanceSnapshot {
	pub fn balance_of(&self, holder: &Address) -> Option<Amount> {
		self.balances
			.iter()
			.find(|(address, _)| address == holder)
			.map(|(_, amount)| *amount)
	}
}

/// Read-only view of the token contract.
pub struct Inspector {
	ledger: Arc<dyn LedgerClient>,
	token: Address,
}

impl Inspector {
	pub fn new(ledger: Arc<dyn LedgerClient>, token: Address) -> Self {
		Self { ledger, token }
	}

	pub fn token(&self) -> Address {
		self.token
	}

	pub async fn balance_of(&self, holder: Address) -> Result<Amount, ToolkitError> {
		let balance = self
			.read(IToken::balanceOfCall { account: holder })
			.await?
			.balance;
		Ok(Amount::from_base_units(balance))
	}

	pub async fn allowance(&self, owner: Address, spender: Address) -> Result<Amount, ToolkitError> {
		let remaining = self
			.read(IToken::allowanceCall { owner, spender })
			.await?
			.remaining;
		Ok(Amount::from_base_units(remaining))
	}

	/// Reads every holder's balance, one call at a time, in the given order.
	pub async fn snapshot(
		&self,
		label: impl Into<String>,
		holders: &[Address],
	) -> Result<BalanceSnapshot, ToolkitError> {
		let mut balances = Vec::with_capacity(holders.len());
		for holder in holders {
			balances.push((*holder, self.balance_of(*holder).await?));
		}
		Ok(BalanceSnapshot {
			label: label.into(),
			balances,
		})
	}

	async fn read<C: SolCall>(&self, call: C) -> Result<C::Return, ToolkitError> {
		let output = self
			.ledger
			.read_state(self.token, Bytes::from(call.abi_encode()))
			.await?;

		C::abi_decode_returns(&output, true).map_err(|e| {
			DeliveryError::InvalidResponse(format!("{}: {}", C::SIGNATURE, e)).into()
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_utils::{StubLedger, SIGNER, TOKEN};
	use alloy_primitives::address;
	use token_delivery::MockLedgerClient;

	const OTHER: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");

	#[tokio::test]
	async fn test_balance_and_allowance() {
		let inspector = Inspector::new(Arc::new(StubLedger::new()), TOKEN);

		assert_eq!(
			inspector.balance_of(SIGNER).await.unwrap(),
			Amount::from_tokens(1_000_000)
		);
		assert_eq!(inspector.balance_of(OTHER).await.unwrap(), Amount::ZERO);
		assert_eq!(inspector.allowance(SIGNER, OTHER).await.unwrap(), Amount::ZERO);
	}

	#[tokio::test]
	async fn test_snapshot_keeps_holder_order() {
		let inspector = Inspector::new(Arc::new(StubLedger::new()), TOKEN);
		let snapshot = inspector.snapshot("Before", &[OTHER, SIGNER]).await.unwrap();

		assert_eq!(snapshot.label, "Before");
		assert_eq!(snapshot.balances[0].0, OTHER);
		assert_eq!(snapshot.balances[1].0, SIGNER);
		assert_eq!(
			snapshot.balance_of(&SIGNER),
			Some(Amount::from_tokens(1_000_000))
		);
	}

	#[tokio::test]
	async fn test_malformed_return_data() {
		let mut ledger = MockLedgerClient::new();
		ledger
			.expect_read_state()
			.returning(|_, _| Ok(Bytes::from(vec![0x01, 0x02])));

		let inspector = Inspector::new(Arc::new(ledger), TOKEN);
		assert!(matches!(
			inspector.balance_of(SIGNER).await,
			Err(ToolkitError::Ledger(_))
		));
	}

	#[tokio::test]
	async fn test_transport_failure_surfaces_unmodified() {
		let mut ledger = MockLedgerClient::new();
		ledger
			.expect_read_state()
			.returning(|_, _| Err(DeliveryError::Network("connection refused".into())));

		let inspector = Inspector::new(Arc::new(ledger), TOKEN);
		match inspector.balance_of(SIGNER).await {
			Err(ToolkitError::Ledger(msg)) => assert!(msg.contains("connection refused")),
			other => panic!("expected ledger error, got {:?}", other),
		}
	}
}
