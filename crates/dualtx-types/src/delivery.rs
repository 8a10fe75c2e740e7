//! Receipts and broadcast responses for the two execution layers.
//!
//! The EVM side yields a receipt once a submitted transaction is mined; the
//! Cosmos side yields a broadcast response that is already final when it is
//! returned and carries its own block height.

use crate::utils::quantity::{self, serde_u64};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Receipt of a mined EVM transaction.
///
/// Deserializes directly from the JSON object returned by
/// `eth_getTransactionReceipt`, decoding the quantity-encoded fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmReceipt {
	/// Hash of the transaction, 0x-prefixed.
	pub transaction_hash: String,
	/// Block in which the transaction was included.
	#[serde(with = "serde_u64")]
	pub block_number: u64,
	/// Hash of the including block.
	#[serde(default)]
	pub block_hash: Option<String>,
	/// Whether execution succeeded. Receipts without a status field count as successful.
	#[serde(default = "default_status", with = "status")]
	pub status: bool,
	/// Gas consumed by the transaction.
	#[serde(default, with = "serde_u64")]
	pub gas_used: u64,
}

fn default_status() -> bool {
	true
}

mod status {
	use super::*;

	pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(if *value { "0x1" } else { "0x0" })
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		quantity::decode_quantity(&s)
			.map(|v| v == 1)
			.map_err(serde::de::Error::custom)
	}
}

/// Result of a Cosmos broadcast in block/commit mode.
///
/// Final on return: there is no separate confirmation step. Field names follow
/// the Cosmos SDK `TxResponse` JSON, where 64-bit integers are usually encoded
/// as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosmosTxResponse {
	/// Height of the block that included the transaction.
	#[serde(deserialize_with = "lenient_u64")]
	pub height: u64,
	/// Transaction hash as reported by the node.
	#[serde(default)]
	pub txhash: String,
	/// ABCI result code; zero means success.
	#[serde(default)]
	pub code: u32,
	#[serde(default)]
	pub raw_log: String,
	#[serde(default, deserialize_with = "lenient_u64")]
	pub gas_wanted: u64,
	#[serde(default, deserialize_with = "lenient_u64")]
	pub gas_used: u64,
}

impl CosmosTxResponse {
	/// Returns true if the transaction executed without an ABCI error code.
	pub fn is_success(&self) -> bool {
		self.code == 0
	}
}

/// Accepts either a JSON number or a decimal string.
fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum NumberOrString {
		Number(u64),
		String(String),
	}

	match NumberOrString::deserialize(deserializer)? {
		NumberOrString::Number(n) => Ok(n),
		NumberOrString::String(s) => s.parse().map_err(serde::de::Error::custom),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_receipt_from_rpc_json() {
		let receipt: EvmReceipt = serde_json::from_value(json!({
			"transactionHash": "0x8f1e4b2f07e2c3f7f5c5b6d0bd6bb3d1e8c8f0d2a77b2a1d23e1e2c4a1f0e9d1",
			"blockNumber": "0x2a",
			"blockHash": "0x01",
			"status": "0x1",
			"gasUsed": "0x5208",
			"logs": []
		}))
		.unwrap();

		assert_eq!(receipt.block_number, 42);
		assert_eq!(receipt.gas_used, 21_000);
		assert!(receipt.status);
		assert_eq!(receipt.block_hash.as_deref(), Some("0x01"));
	}

	#[test]
	fn test_reverted_receipt() {
		let receipt: EvmReceipt = serde_json::from_value(json!({
			"transactionHash": "0x01",
			"blockNumber": "0x10",
			"status": "0x0"
		}))
		.unwrap();
		assert!(!receipt.status);
		assert_eq!(receipt.gas_used, 0);
	}

	#[test]
	fn test_cosmos_response_accepts_string_integers() {
		let response: CosmosTxResponse = serde_json::from_value(json!({
			"height": "1234",
			"txhash": "A1B2",
			"code": 0,
			"raw_log": "",
			"gas_wanted": "200000",
			"gas_used": "83521"
		}))
		.unwrap();
		assert_eq!(response.height, 1234);
		assert_eq!(response.gas_wanted, 200_000);
		assert!(response.is_success());

		let response: CosmosTxResponse =
			serde_json::from_value(json!({ "height": 77, "code": 5 })).unwrap();
		assert_eq!(response.height, 77);
		assert!(!response.is_success());
	}
}
