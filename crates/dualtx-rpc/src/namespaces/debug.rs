//! `debug_*` tracing methods.
//!
//! Tracer options are passed through untouched, e.g.
//! `json!({ "tracer": "callTracer" })`.

use crate::params::{hex_json, BlockId, CallRequest};
use crate::{RpcClient, RpcError};
use alloy_primitives::{Address, B256};
use dualtx_types::encode_quantity;
use serde_json::Value;

impl RpcClient {
	pub async fn debug_trace_transaction(
		&self,
		tx_hash: B256,
		options: Value,
	) -> Result<Value, RpcError> {
		self.call(
			"debug_traceTransaction",
			vec![hex_json(tx_hash.as_slice()), options],
		)
		.await
	}

	pub async fn debug_trace_call(
		&self,
		request: &CallRequest,
		block: BlockId,
		options: Value,
	) -> Result<Value, RpcError> {
		self.call(
			"debug_traceCall",
			vec![request.to_json(), block.to_json(), options],
		)
		.await
	}

	pub async fn debug_trace_raw_transaction(
		&self,
		raw_tx: &str,
		options: Value,
	) -> Result<Value, RpcError> {
		self.call(
			"debug_traceRawTransaction",
			vec![Value::String(raw_tx.to_string()), options],
		)
		.await
	}

	/// Storage entries of `address` after transaction `tx_index` of `block_hash`.
	pub async fn debug_storage_range_at(
		&self,
		block_hash: B256,
		tx_index: u64,
		address: Address,
		start_key: B256,
		max_results: u64,
	) -> Result<Value, RpcError> {
		self.call(
			"debug_storageRangeAt",
			vec![
				hex_json(block_hash.as_slice()),
				Value::String(encode_quantity(tx_index)),
				hex_json(address.as_slice()),
				hex_json(start_key.as_slice()),
				Value::from(max_results),
			],
		)
		.await
	}

	/// Traces every transaction in a block; one entry per transaction.
	pub async fn debug_trace_block_by_number(
		&self,
		block: BlockId,
		options: Value,
	) -> Result<Vec<Value>, RpcError> {
		self.call_as("debug_traceBlockByNumber", vec![block.to_json(), options])
			.await
	}
}

#[cfg(test)]
mod tests {
	use crate::test_support::*;
	use crate::{BlockId, RpcClient};
	use alloy_primitives::{address, B256};
	use serde_json::json;
	use wiremock::MockServer;

	#[tokio::test]
	async fn test_trace_block_passes_tracer_options() {
		let server = MockServer::start().await;
		mock_result(
			&server,
			"debug_traceBlockByNumber",
			json!([{ "txHash": "0x01", "result": {} }]),
		)
		.await;

		let client = RpcClient::new(server.uri());
		let traces = client
			.debug_trace_block_by_number(BlockId::Number(5), json!({ "tracer": "callTracer" }))
			.await
			.unwrap();
		assert_eq!(traces.len(), 1);

		let bodies = request_bodies(&server).await;
		assert_eq!(
			bodies[0]["params"],
			json!(["0x5", { "tracer": "callTracer" }])
		);
	}

	#[tokio::test]
	async fn test_storage_range_param_positions() {
		let server = MockServer::start().await;
		mock_result(&server, "debug_storageRangeAt", json!({ "storage": {} })).await;

		let client = RpcClient::new(server.uri());
		client
			.debug_storage_range_at(
				B256::ZERO,
				3,
				address!("3894085ef7ff0f0aedf52e2a2704928d1ec074f1"),
				B256::ZERO,
				10,
			)
			.await
			.unwrap();

		let params = &request_bodies(&server).await[0]["params"];
		assert_eq!(params[1], "0x3");
		assert_eq!(params[2], "0x3894085ef7ff0f0aedf52e2a2704928d1ec074f1");
		assert_eq!(params[4], 10);
	}
}
