//! Typed request parameters.
//!
//! These types encode themselves into the JSON shapes the node expects, with
//! integers as quantity strings and optional fields omitted.

use alloy_primitives::{Address, Bytes, B256, U256};
use dualtx_types::{encode_quantity, encode_quantity_u256, with_0x_prefix};
use serde_json::{json, Map, Value};
use std::fmt;

/// Lowercase 0x-prefixed hex for addresses, hashes and calldata.
pub(crate) fn hex_json(bytes: impl AsRef<[u8]>) -> Value {
	Value::String(with_0x_prefix(&hex::encode(bytes)))
}

/// Block selector accepted by state and block queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockId {
	#[default]
	Latest,
	Earliest,
	Pending,
	Safe,
	Finalized,
	Number(u64),
}

impl BlockId {
	pub fn to_json(self) -> Value {
		Value::String(self.to_string())
	}
}

impl fmt::Display for BlockId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			BlockId::Latest => f.write_str("latest"),
			BlockId::Earliest => f.write_str("earliest"),
			BlockId::Pending => f.write_str("pending"),
			BlockId::Safe => f.write_str("safe"),
			BlockId::Finalized => f.write_str("finalized"),
			BlockId::Number(n) => f.write_str(&encode_quantity(*n)),
		}
	}
}

impl From<u64> for BlockId {
	fn from(n: u64) -> Self {
		BlockId::Number(n)
	}
}

/// Call object for `eth_call`, `eth_estimateGas` and `debug_traceCall`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallRequest {
	pub from: Option<Address>,
	pub to: Option<Address>,
	pub data: Option<Bytes>,
	pub value: Option<U256>,
	pub gas: Option<u64>,
	pub gas_price: Option<U256>,
}

impl CallRequest {
	/// A call to `to` with the given calldata.
	pub fn new(to: Address, data: Bytes) -> Self {
		Self {
			to: Some(to),
			data: Some(data),
			..Default::default()
		}
	}

	pub fn from(mut self, from: Address) -> Self {
		self.from = Some(from);
		self
	}

	pub fn value(mut self, value: U256) -> Self {
		self.value = Some(value);
		self
	}

	pub fn to_json(&self) -> Value {
		let mut obj = Map::new();
		if let Some(from) = &self.from {
			obj.insert("from".into(), hex_json(from.as_slice()));
		}
		if let Some(to) = &self.to {
			obj.insert("to".into(), hex_json(to.as_slice()));
		}
		if let Some(data) = &self.data {
			obj.insert("data".into(), hex_json(&data[..]));
		}
		if let Some(value) = self.value {
			obj.insert("value".into(), json!(encode_quantity_u256(value)));
		}
		if let Some(gas) = self.gas {
			obj.insert("gas".into(), json!(encode_quantity(gas)));
		}
		if let Some(gas_price) = self.gas_price {
			obj.insert("gasPrice".into(), json!(encode_quantity_u256(gas_price)));
		}
		Value::Object(obj)
	}
}

/// Log filter for `eth_getLogs` and the chain-specific log queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
	pub from_block: Option<BlockId>,
	pub to_block: Option<BlockId>,
	pub address: Vec<Address>,
	/// Positional topics; `None` matches anything in that position.
	pub topics: Vec<Option<B256>>,
}

impl LogFilter {
	pub fn to_json(&self) -> Value {
		let mut obj = Map::new();
		if let Some(from) = self.from_block {
			obj.insert("fromBlock".into(), from.to_json());
		}
		if let Some(to) = self.to_block {
			obj.insert("toBlock".into(), to.to_json());
		}
		match self.address.as_slice() {
			[] => {},
			[single] => {
				obj.insert("address".into(), hex_json(single.as_slice()));
			},
			many => {
				obj.insert(
					"address".into(),
					Value::Array(many.iter().map(|a| hex_json(a.as_slice())).collect()),
				);
			},
		}
		if !self.topics.is_empty() {
			let topics = self
				.topics
				.iter()
				.map(|t| t.map(|h| hex_json(h.as_slice())).unwrap_or(Value::Null))
				.collect();
			obj.insert("topics".into(), Value::Array(topics));
		}
		Value::Object(obj)
	}
}
