//! Event decoding module for the token toolkit.
//!
//! Turns raw ledger logs into [`DecodedEvent`]s using an interface schema.
//! Decoding never fails past this crate: a log whose selector is not in the
//! schema, or whose payload does not match the declared event, is reported as
//! [`EventKind::Unknown`] so a single odd log cannot abort a history query.

use token_types::{Address, Amount, TransactionHash};

mod decoder;
mod schema;

pub use decoder::EventDecoder;
pub use schema::{EventSchema, SchemaError};

/// A log after decoding, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEvent {
	/// Block the log was emitted in.
	pub block_number: Option<u64>,
	pub transaction_hash: Option<TransactionHash>,
	pub log_index: Option<u64>,
	pub kind: EventKind,
}

/// Classification of a decoded log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
	/// Value moved between two holders. Mints and burns use the zero address.
	Transfer {
		from: Address,
		to: Address,
		value: Amount,
	},
	/// An owner granted a spender an allowance.
	Approval {
		owner: Address,
		spender: Address,
		value: Amount,
	},
	/// Any other event in the schema, with its arguments in declaration order.
	Generic { name: String, args: Vec<EventArg> },
	/// The log could not be matched against the schema.
	Unknown { reason: UnknownReason },
}

/// A named, display-formatted event argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventArg {
	pub name: String,
	pub value: String,
}

/// Why a log was classified as unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnknownReason {
	/// No event in the schema has this log's selector.
	NoMatchingEvent,
	/// The selector matched but topics or data did not fit the event.
	Malformed(String),
}
