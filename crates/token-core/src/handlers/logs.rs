//! Historical token activity from event logs.

use crate::ToolkitError;
use token_delivery::LedgerClient;
use token_events::{DecodedEvent, EventDecoder};
use token_types::{Address, BlockRange};
use tracing::instrument;

/// Decoded events over a block range, in ledger order.
#[derive(Debug, Clone)]
pub struct LogHistory {
	pub range: BlockRange,
	pub events: Vec<DecodedEvent>,
}

/// Fetches and decodes the token's logs over the trailing `lookback` blocks.
#[instrument(skip_all, fields(token = %token, lookback = lookback))]
pub async fn fetch_history(
	ledger: &dyn LedgerClient,
	decoder: &EventDecoder,
	token: Address,
	lookback: u64,
) -> Result<LogHistory, ToolkitError> {
	let latest = ledger.block_number().await?;
	let range = BlockRange::trailing(latest, lookback);

	let logs = ledger.fetch_logs(token, range).await?;
	tracing::info!(range = %range, count = logs.len(), "Fetched token logs");

	Ok(LogHistory {
		range,
		events: decoder.decode_logs(&logs).collect(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_utils::{StubLedger, SIGNER, TOKEN};
	use alloy_primitives::{keccak256, U256};
	use token_delivery::{DeliveryError, MockLedgerClient};
	use token_events::{EventKind, UnknownReason};
	use token_types::{Amount, Bytes, RawLog, B256};

	fn log(topics: Vec<B256>, data: Bytes, block: u64) -> RawLog {
		RawLog {
			address: TOKEN,
			topics,
			data,
			block_number: Some(block),
			transaction_hash: None,
			log_index: Some(0),
		}
	}

	fn mint(block: u64) -> RawLog {
		log(
			vec![
				keccak256("Transfer(address,address,uint256)"),
				Address::ZERO.into_word(),
				SIGNER.into_word(),
			],
			Bytes::from(U256::from(1_000u64).to_be_bytes::<32>().to_vec()),
			block,
		)
	}

	#[tokio::test]
	async fn test_history_decodes_in_order() {
		let ledger = StubLedger::new().with_logs(
			2_500,
			vec![
				mint(400),
				mint(600),
				log(vec![B256::repeat_byte(0x99)], Bytes::new(), 700),
				mint(2_500),
			],
		);

		let history = fetch_history(&ledger, &EventDecoder::default(), TOKEN, 2_000)
			.await
			.unwrap();

		assert_eq!(history.range, BlockRange { from: 500, to: 2_500 });
		// block 400 is outside the window
		assert_eq!(history.events.len(), 3);
		assert_eq!(
			history.events[0].kind,
			EventKind::Transfer {
				from: Address::ZERO,
				to: SIGNER,
				value: Amount::from_base_units(U256::from(1_000u64)),
			}
		);
		assert_eq!(history.events[1].block_number, Some(700));
		assert_eq!(
			history.events[1].kind,
			EventKind::Unknown {
				reason: UnknownReason::NoMatchingEvent
			}
		);
	}

	#[tokio::test]
	async fn test_range_clamped_at_genesis() {
		let ledger = StubLedger::new().with_logs(150, vec![mint(0), mint(150)]);

		let history = fetch_history(&ledger, &EventDecoder::default(), TOKEN, 2_000)
			.await
			.unwrap();
		assert_eq!(history.range, BlockRange { from: 0, to: 150 });
		assert_eq!(history.events.len(), 2);
	}

	#[tokio::test]
	async fn test_fetch_failure_is_ledger_error() {
		let mut ledger = MockLedgerClient::new();
		ledger.expect_block_number().returning(|| Ok(10));
		ledger
			.expect_fetch_logs()
			.returning(|_, _| Err(DeliveryError::Network("timeout".into())));

		let result = fetch_history(&ledger, &EventDecoder::default(), TOKEN, 5).await;
		assert!(matches!(result, Err(ToolkitError::Ledger(_))));
	}
}
