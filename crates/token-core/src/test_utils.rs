//! In-memory ledger for workflow tests.
//!
//! `StubLedger` simulates the token contract's balances and allowances and
//! records every submission and receipt observation in order, so tests can
//! assert on sequencing as well as results.

use crate::contracts::IToken;
use alloy_primitives::{address, U256};
use alloy_sol_types::{SolCall, SolInterface};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use token_delivery::{DeliveryError, LedgerClient};
use token_types::{
	Address, BlockRange, Bytes, ContractCall, FeeParams, RawLog, TransactionHash,
	TransactionReceipt, B256,
};

pub const SIGNER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const TOKEN: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");

pub fn receipt(hash: TransactionHash, gas_used: u64, success: bool) -> TransactionReceipt {
	TransactionReceipt {
		hash,
		block_number: 1,
		gas_used,
		effective_gas_price: 1_000_000_000,
		success,
		contract_address: None,
	}
}

pub fn test_call() -> ContractCall {
	crate::contracts::contract_call(
		TOKEN,
		&IToken::transferCall {
			to: Address::ZERO,
			amount: U256::from(1),
		},
		FeeParams::gwei(1, 20).unwrap(),
	)
}

/// Observable ledger interactions, indexed by submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
	Submitted(usize),
	ReceiptObserved(usize),
}

#[derive(Default)]
struct State {
	events: Vec<LedgerEvent>,
	calls: Vec<ContractCall>,
	receipts: HashMap<TransactionHash, (usize, TransactionReceipt)>,
	balances: HashMap<Address, U256>,
	allowances: HashMap<(Address, Address), U256>,
}

pub struct StubLedger {
	gas: HashMap<&'static str, u64>,
	default_gas: u64,
	reject_at: Option<usize>,
	revert_at: Option<usize>,
	hang_receipts: bool,
	deployed_address: Option<Address>,
	signer: Option<Address>,
	latest_block: u64,
	logs: Vec<RawLog>,
	state: Mutex<State>,
}

impl StubLedger {
	pub fn new() -> Self {
		let mut state = State::default();
		state
			.balances
			.insert(SIGNER, U256::from(1_000_000u64) * U256::from(10u64).pow(U256::from(18)));

		Self {
			gas: HashMap::new(),
			default_gas: 50_000,
			reject_at: None,
			revert_at: None,
			hang_receipts: false,
			deployed_address: None,
			signer: Some(SIGNER),
			latest_block: 100,
			logs: Vec::new(),
			state: Mutex::new(state),
		}
	}

	/// Gas reported for every call to `signature`.
	pub fn with_gas(mut self, signature: &'static str, gas: u64) -> Self {
		self.gas.insert(signature, gas);
		self
	}

	/// The `index`-th submission is rejected before inclusion.
	pub fn rejecting_at(mut self, index: usize) -> Self {
		self.reject_at = Some(index);
		self
	}

	/// The `index`-th submission is included but reverts.
	pub fn reverting_at(mut self, index: usize) -> Self {
		self.revert_at = Some(index);
		self
	}

	/// Receipts are never produced.
	pub fn hanging(mut self) -> Self {
		self.hang_receipts = true;
		self
	}

	pub fn with_deployed_address(mut self, address: Option<Address>) -> Self {
		self.deployed_address = address;
		self
	}

	/// No signing account; submissions are rejected.
	pub fn read_only(mut self) -> Self {
		self.signer = None;
		self
	}

	pub fn with_logs(mut self, latest_block: u64, logs: Vec<RawLog>) -> Self {
		self.latest_block = latest_block;
		self.logs = logs;
		self
	}

	pub fn events(&self) -> Vec<LedgerEvent> {
		self.state.lock().unwrap().events.clone()
	}

	pub fn calls(&self) -> Vec<ContractCall> {
		self.state.lock().unwrap().calls.clone()
	}

	pub fn balance(&self, holder: Address) -> U256 {
		self.state
			.lock()
			.unwrap()
			.balances
			.get(&holder)
			.copied()
			.unwrap_or_default()
	}

	fn record(
		&self,
		call: Option<ContractCall>,
		gas: u64,
		contract_address: Option<Address>,
	) -> Result<TransactionHash, DeliveryError> {
		if self.signer.is_none() {
			return Err(DeliveryError::Submission("no signing account".into()));
		}
		let mut state = self.state.lock().unwrap();
		let index = state.events.iter().filter(|e| matches!(e, LedgerEvent::Submitted(_))).count();

		if self.reject_at == Some(index) {
			return Err(DeliveryError::Submission("nonce too low".into()));
		}

		let success = self.revert_at != Some(index);
		if let (Some(call), true) = (&call, success) {
			apply(&mut state, call);
		}

		let hash = TransactionHash(B256::from(U256::from(index + 1)));
		let mut receipt = receipt(hash, gas, success);
		receipt.block_number = index as u64 + 1;
		receipt.contract_address = contract_address;

		state.events.push(LedgerEvent::Submitted(index));
		state.receipts.insert(hash, (index, receipt));
		if let Some(call) = call {
			state.calls.push(call);
		}
		Ok(hash)
	}
}

/// Applies a token call's effect to the simulated balances.
fn apply(state: &mut State, call: &ContractCall) {
	let Ok(decoded) = IToken::ITokenCalls::abi_decode(&call.calldata, true) else {
		return;
	};

	match decoded {
		IToken::ITokenCalls::transfer(c) => move_tokens(&mut state.balances, c.to, c.amount),
		IToken::ITokenCalls::airdrop(c) => {
			for (to, amount) in c.recipients.into_iter().zip(c.amounts) {
				move_tokens(&mut state.balances, to, amount);
			}
		}
		IToken::ITokenCalls::approve(c) => {
			state.allowances.insert((SIGNER, c.spender), c.amount);
		}
		_ => {}
	}
}

fn move_tokens(balances: &mut HashMap<Address, U256>, to: Address, amount: U256) {
	let from = balances.entry(SIGNER).or_default();
	*from = from.saturating_sub(amount);
	*balances.entry(to).or_default() += amount;
}

#[async_trait]
impl LedgerClient for StubLedger {
	fn signer_address(&self) -> Option<Address> {
		self.signer
	}

	async fn submit(&self, call: ContractCall) -> Result<TransactionHash, DeliveryError> {
		let gas = self.gas.get(call.signature).copied().unwrap_or(self.default_gas);
		self.record(Some(call), gas, None)
	}

	async fn deploy(&self, _code: Bytes, _fees: FeeParams) -> Result<TransactionHash, DeliveryError> {
		self.record(None, 1_200_000, self.deployed_address)
	}

	async fn wait_for_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<TransactionReceipt, DeliveryError> {
		if self.hang_receipts {
			std::future::pending::<()>().await;
		}

		// Let concurrently running workflows make progress
		tokio::task::yield_now().await;

		let mut state = self.state.lock().unwrap();
		let (index, receipt) = state
			.receipts
			.get(hash)
			.cloned()
			.ok_or_else(|| DeliveryError::Network("unknown transaction".into()))?;
		state.events.push(LedgerEvent::ReceiptObserved(index));

		if !receipt.success {
			return Err(DeliveryError::Reverted(Box::new(receipt)));
		}
		Ok(receipt)
	}

	async fn read_state(&self, _target: Address, calldata: Bytes) -> Result<Bytes, DeliveryError> {
		let state = self.state.lock().unwrap();
		let decoded = IToken::ITokenCalls::abi_decode(&calldata, true)
			.map_err(|e| DeliveryError::InvalidResponse(e.to_string()))?;

		let value = match decoded {
			IToken::ITokenCalls::balanceOf(c) => {
				state.balances.get(&c.account).copied().unwrap_or_default()
			}
			IToken::ITokenCalls::allowance(c) => state
				.allowances
				.get(&(c.owner, c.spender))
				.copied()
				.unwrap_or_default(),
			_ => return Err(DeliveryError::InvalidResponse("not a view function".into())),
		};

		Ok(Bytes::from(IToken::balanceOfCall::abi_encode_returns(&(value,))))
	}

	async fn fetch_logs(
		&self,
		_target: Address,
		range: BlockRange,
	) -> Result<Vec<RawLog>, DeliveryError> {
		Ok(self
			.logs
			.iter()
			.filter(|log| {
				log.block_number
					.is_some_and(|b| b >= range.from && b <= range.to)
			})
			.cloned()
			.collect())
	}

	async fn block_number(&self) -> Result<u64, DeliveryError> {
		Ok(self.latest_block)
	}
}
