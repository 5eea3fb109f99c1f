//! Report formatting for the command line.

use token_core::{BalanceSnapshot, Deployment, LogHistory, TransferApproveReport};
use token_events::{DecodedEvent, EventKind};
use token_types::TransactionReceipt;

pub fn print_deployment(deployment: &Deployment) {
	println!("Deploy tx hash: {}", deployment.transaction_hash);
	println!("Deployed contract address: {}", deployment.address);
	println!("Block number: {}", deployment.block_number);
	println!(
		"\nCopy this to your .env file:\nTOKEN_ADDRESS={}",
		deployment.address
	);
}

pub fn print_transfer_approve(report: &TransferApproveReport, symbol: &str) {
	println!("{}", snapshot_line(&report.before, symbol));
	println!("{}", receipt_line("Transfer", &report.transfer));
	println!("{}", receipt_line("Approve", &report.approve));
	println!("Allowance: {} {}", report.allowance, symbol);
	println!("{}", snapshot_line(&report.after, symbol));
}

pub fn print_log_history(history: &LogHistory) {
	println!(
		"Querying events from block {} to {}...",
		history.range.from, history.range.to
	);
	println!("Found {} events:", history.events.len());
	for event in &history.events {
		println!("{}", event_line(event));
	}
}

/// `"Before - Deployer: 1000000 CAMP, Recipient: 0 CAMP"`. The first holder
/// is the signer, the second the counterparty.
fn snapshot_line(snapshot: &BalanceSnapshot, symbol: &str) -> String {
	let labels = ["Deployer", "Recipient"];
	let balances: Vec<String> = snapshot
		.balances
		.iter()
		.enumerate()
		.map(|(i, (address, amount))| match labels.get(i) {
			Some(label) => format!("{}: {} {}", label, amount, symbol),
			None => format!("{}: {} {}", address, amount, symbol),
		})
		.collect();
	format!("{} - {}", snapshot.label, balances.join(", "))
}

fn receipt_line(label: &str, receipt: &TransactionReceipt) -> String {
	format!(
		"{} - tx hash: {}, block: {}, gas used: {}",
		label, receipt.hash, receipt.block_number, receipt.gas_used
	)
}

fn event_line(event: &DecodedEvent) -> String {
	let block = event
		.block_number
		.map(|b| b.to_string())
		.unwrap_or_else(|| "pending".to_string());

	match &event.kind {
		EventKind::Transfer { from, to, value } => format!(
			"Block {} - Transfer: from={}, to={}, value={}",
			block,
			from,
			to,
			value.base_units()
		),
		EventKind::Approval {
			owner,
			spender,
			value,
		} => format!(
			"Block {} - Approval: owner={}, spender={}, value={}",
			block,
			owner,
			spender,
			value.base_units()
		),
		EventKind::Generic { name, args } => {
			let args: Vec<String> = args
				.iter()
				.map(|arg| format!("{}={}", arg.name, arg.value))
				.collect();
			format!("Block {} - {}: {}", block, name, args.join(", "))
		}
		EventKind::Unknown { .. } => format!("Block {} - Unknown event", block),
	}
}
