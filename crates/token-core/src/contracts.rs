//! Token contract interface and calldata helpers.

use alloy_sol_types::{sol, SolCall, SolValue};
use token_types::{Address, Amount, Bytes, ContractCall, FeeParams};

// Functions of the token contract the toolkit calls.
sol! {
	interface IToken {
		function airdrop(address[] recipients, uint256[] amounts);
		function transfer(address to, uint256 amount) returns (bool);
		function approve(address spender, uint256 amount) returns (bool);
		function balanceOf(address account) returns (uint256 balance);
		function allowance(address owner, address spender) returns (uint256 remaining);
	}
}

/// Builds a state-changing call against `target`.
pub fn contract_call<C: SolCall>(target: Address, call: &C, fees: FeeParams) -> ContractCall {
	ContractCall {
		target,
		selector: C::SELECTOR,
		signature: C::SIGNATURE,
		calldata: Bytes::from(call.abi_encode()),
		fees,
	}
}

/// Creation code for the token: bytecode followed by the encoded
/// `(name, symbol, cap, admin, initialMint)` constructor arguments.
pub fn creation_code(
	bytecode: &Bytes,
	name: &str,
	symbol: &str,
	cap: Amount,
	admin: Address,
	initial_mint: Amount,
) -> Bytes {
	let args = (
		name.to_string(),
		symbol.to_string(),
		cap.base_units(),
		admin,
		initial_mint.base_units(),
	)
		.abi_encode_params();

	let mut code = Vec::with_capacity(bytecode.len() + args.len());
	code.extend_from_slice(bytecode);
	code.extend_from_slice(&args);
	Bytes::from(code)
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::{address, U256};

	#[test]
	fn test_transfer_call() {
		let to = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
		let fees = FeeParams::gwei(1, 20).unwrap();
		let call = contract_call(
			Address::ZERO,
			&IToken::transferCall {
				to,
				amount: U256::from(100),
			},
			fees,
		);

		assert_eq!(call.selector, [0xa9, 0x05, 0x9c, 0xbb]);
		assert_eq!(call.signature, "transfer(address,uint256)");
		assert_eq!(&call.calldata[..4], &call.selector);
		assert_eq!(call.calldata.len(), 4 + 64);
		assert_eq!(call.fees, fees);
	}

	#[test]
	fn test_airdrop_selector() {
		assert_eq!(
			IToken::airdropCall::SIGNATURE,
			"airdrop(address[],uint256[])"
		);
	}

	#[test]
	fn test_creation_code_appends_arguments() {
		let bytecode = Bytes::from(vec![0x60, 0x80]);
		let code = creation_code(
			&bytecode,
			"CampusCredit",
			"CAMP",
			Amount::from_tokens(2_000_000),
			Address::ZERO,
			Amount::from_tokens(1_000_000),
		);

		assert_eq!(&code[..2], bytecode.as_ref());
		// five head words plus two dynamic strings (length + one data word each)
		assert_eq!(code.len(), 2 + 32 * 9);
	}
}
