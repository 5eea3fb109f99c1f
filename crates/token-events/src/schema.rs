//! Event schemas keyed by selector.

use alloy_json_abi::{Event, JsonAbi};
use alloy_primitives::B256;
use std::collections::HashMap;
use thiserror::Error;

/// Events emitted by the token contract: ERC-20, pausable and access control.
const TOKEN_EVENTS: &[&str] = &[
	"event Transfer(address indexed from, address indexed to, uint256 value)",
	"event Approval(address indexed owner, address indexed spender, uint256 value)",
	"event Paused(address account)",
	"event Unpaused(address account)",
	"event RoleGranted(bytes32 indexed role, address indexed account, address indexed sender)",
	"event RoleRevoked(bytes32 indexed role, address indexed account, address indexed sender)",
	"event RoleAdminChanged(bytes32 indexed role, bytes32 indexed previousAdminRole, bytes32 indexed newAdminRole)",
];

#[derive(Debug, Error)]
pub enum SchemaError {
	#[error("Invalid ABI: {0}")]
	InvalidAbi(String),
}

/// The set of events a decoder recognises.
///
/// Anonymous events are skipped since they cannot be identified by topic 0.
#[derive(Debug, Clone)]
pub struct EventSchema {
	events: HashMap<B256, Event>,
}

impl EventSchema {
	/// Creates an empty schema.
	pub fn empty() -> Self {
		Self {
			events: HashMap::new(),
		}
	}

	/// Schema for the token contract's known interface.
	pub fn token() -> Self {
		let mut schema = Self::empty();
		for signature in TOKEN_EVENTS {
			match Event::parse(signature) {
				Ok(event) => schema.insert(event),
				Err(e) => tracing::warn!(signature, error = %e, "Skipping unparsable event"),
			}
		}
		schema
	}

	/// Builds a schema from every event in a JSON ABI.
	pub fn from_json_abi(abi: &JsonAbi) -> Self {
		let mut schema = Self::empty();
		for event in abi.events() {
			schema.insert(event.clone());
		}
		schema
	}

	/// Parses a JSON ABI array, e.g. the `abi` field of a build artifact.
	pub fn from_abi_json(json: &str) -> Result<Self, SchemaError> {
		let abi: JsonAbi =
			serde_json::from_str(json).map_err(|e| SchemaError::InvalidAbi(e.to_string()))?;
		Ok(Self::from_json_abi(&abi))
	}

	pub fn insert(&mut self, event: Event) {
		if event.anonymous {
			return;
		}
		self.events.insert(event.selector(), event);
	}

	/// Looks up an event by its topic-0 selector.
	pub fn get(&self, selector: &B256) -> Option<&Event> {
		self.events.get(selector)
	}

	pub fn len(&self) -> usize {
		self.events.len()
	}

	pub fn is_empty(&self) -> bool {
		self.events.is_empty()
	}
}

impl Default for EventSchema {
	fn default() -> Self {
		Self::token()
	}
}
