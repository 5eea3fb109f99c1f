//! Log decoding against an [`EventSchema`].

use crate::{DecodedEvent, EventArg, EventKind, EventSchema, UnknownReason};
use alloy_dyn_abi::{DynSolValue, EventExt};
use alloy_json_abi::Event;
use thiserror::Error;
use token_types::{with_0x_prefix, Address, Amount, RawLog};

/// Why a single log failed to decode. Never leaves this crate.
#[derive(Debug, Error)]
enum DecodeError {
	#[error("log has no topics")]
	NoTopics,
	#[error("selector not in schema")]
	UnknownSelector,
	#[error("{0}")]
	Abi(String),
}

impl From<DecodeError> for UnknownReason {
	fn from(err: DecodeError) -> Self {
		match err {
			DecodeError::NoTopics | DecodeError::UnknownSelector => UnknownReason::NoMatchingEvent,
			DecodeError::Abi(reason) => UnknownReason::Malformed(reason),
		}
	}
}

/// Decodes raw logs into typed events.
#[derive(Debug, Clone, Default)]
pub struct EventDecoder {
	schema: EventSchema,
}

impl EventDecoder {
	pub fn new(schema: EventSchema) -> Self {
		Self { schema }
	}

	pub fn schema(&self) -> &EventSchema {
		&self.schema
	}

	/// Decodes one log. Logs that do not fit the schema come back as
	/// [`EventKind::Unknown`] with their position preserved.
	pub fn decode(&self, log: &RawLog) -> DecodedEvent {
		let kind = match self.decode_kind(log) {
			Ok(kind) => kind,
			Err(e) => {
				tracing::debug!(
					block = ?log.block_number,
					log_index = ?log.log_index,
					error = %e,
					"Log not recognised"
				);
				EventKind::Unknown { reason: e.into() }
			}
		};

		DecodedEvent {
			block_number: log.block_number,
			transaction_hash: log.transaction_hash,
			log_index: log.log_index,
			kind,
		}
	}

	/// Lazily decodes a sequence of logs, one output per input in the same order.
	pub fn decode_logs<'a, I>(&'a self, logs: I) -> impl Iterator<Item = DecodedEvent> + 'a
	where
		I: IntoIterator<Item = &'a RawLog>,
		I::IntoIter: 'a,
	{
		logs.into_iter().map(move |log| self.decode(log))
	}

	fn decode_kind(&self, log: &RawLog) -> Result<EventKind, DecodeError> {
		let selector = log.topics.first().ok_or(DecodeError::NoTopics)?;
		let event = self
			.schema
			.get(selector)
			.ok_or(DecodeError::UnknownSelector)?;

		let decoded = event
			.decode_log_parts(log.topics.iter().copied(), &log.data, true)
			.map_err(|e| DecodeError::Abi(e.to_string()))?;

		let values = pair_with_params(event, decoded.indexed, decoded.body)?;
		Ok(classify(event, values))
	}
}

/// Puts decoded values back in parameter declaration order. Indexed values
/// come from the topics, the rest from the data payload.
fn pair_with_params(
	event: &Event,
	indexed: Vec<DynSolValue>,
	body: Vec<DynSolValue>,
) -> Result<Vec<(String, DynSolValue)>, DecodeError> {
	let mut indexed = indexed.into_iter();
	let mut body = body.into_iter();

	event
		.inputs
		.iter()
		.map(|param| {
			let value = if param.indexed {
				indexed.next()
			} else {
				body.next()
			};
			value
				.map(|v| (param.name.clone(), v))
				.ok_or_else(|| DecodeError::Abi(format!("missing value for '{}'", param.name)))
		})
		.collect()
}

fn classify(event: &Event, values: Vec<(String, DynSolValue)>) -> EventKind {
	match (event.name.as_str(), values.as_slice()) {
		(
			"Transfer",
			[(_, DynSolValue::Address(from)), (_, DynSolValue::Address(to)), (_, DynSolValue::Uint(value, _))],
		) => EventKind::Transfer {
			from: *from,
			to: *to,
			value: Amount::from_base_units(*value),
		},
		(
			"Approval",
			[(_, DynSolValue::Address(owner)), (_, DynSolValue::Address(spender)), (_, DynSolValue::Uint(value, _))],
		) => EventKind::Approval {
			owner: *owner,
			spender: *spender,
			value: Amount::from_base_units(*value),
		},
		_ => EventKind::Generic {
			name: event.name.clone(),
			args: values
				.iter()
				.map(|(name, value)| EventArg {
					name: name.clone(),
					value: format_value(value),
				})
				.collect(),
		},
	}
}

fn format_value(value: &DynSolValue) -> String {
	match value {
		DynSolValue::Address(address) => format_address(address),
		DynSolValue::Bool(b) => b.to_string(),
		DynSolValue::Int(i, _) => i.to_string(),
		DynSolValue::Uint(u, _) => u.to_string(),
		DynSolValue::FixedBytes(word, size) => {
			with_0x_prefix(&hex::encode(&word[..(*size).min(32)]))
		}
		DynSolValue::Bytes(bytes) => with_0x_prefix(&hex::encode(bytes)),
		DynSolValue::String(s) => s.clone(),
		DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
			let inner: Vec<String> = items.iter().map(format_value).collect();
			format!("[{}]", inner.join(", "))
		}
		other => format!("{:?}", other),
	}
}

fn format_address(address: &Address) -> String {
	address.to_checksum(None)
}
