//! `sei_*` methods.
//!
//! The chain exposes variants of the standard block and log queries that also
//! include transactions originating from the Cosmos side.

use crate::params::{hex_json, BlockId, LogFilter};
use crate::{RpcClient, RpcError};
use alloy_primitives::B256;
use serde_json::Value;

impl RpcClient {
	pub async fn sei_get_filter_logs(&self, filter: &LogFilter) -> Result<Vec<Value>, RpcError> {
		self.call_as("sei_getFilterLogs", vec![filter.to_json()])
			.await
	}

	pub async fn sei_get_logs(&self, filter: &LogFilter) -> Result<Vec<Value>, RpcError> {
		self.call_as("sei_getLogs", vec![filter.to_json()]).await
	}

	pub async fn sei_get_block_by_number(
		&self,
		block: BlockId,
		full_transactions: bool,
	) -> Result<Value, RpcError> {
		self.call(
			"sei_getBlockByNumber",
			vec![block.to_json(), Value::Bool(full_transactions)],
		)
		.await
	}

	pub async fn sei_get_block_by_hash(
		&self,
		block_hash: B256,
		full_transactions: bool,
	) -> Result<Value, RpcError> {
		self.call(
			"sei_getBlockByHash",
			vec![hex_json(block_hash.as_slice()), Value::Bool(full_transactions)],
		)
		.await
	}
}

#[cfg(test)]
mod tests {
	use crate::test_support::*;
	use crate::{BlockId, LogFilter, RpcClient};
	use serde_json::json;
	use wiremock::MockServer;

	#[tokio::test]
	async fn test_sei_log_query_params() {
		let server = MockServer::start().await;
		mock_result(&server, "sei_getLogs", json!([{ "logIndex": "0x0" }])).await;

		let client = RpcClient::new(server.uri());
		let filter = LogFilter {
			from_block: Some(BlockId::Number(10)),
			to_block: Some(BlockId::Number(12)),
			..Default::default()
		};
		let logs = client.sei_get_logs(&filter).await.unwrap();
		assert_eq!(logs.len(), 1);

		let bodies = request_bodies(&server).await;
		assert_eq!(
			bodies[0]["params"],
			json!([{ "fromBlock": "0xa", "toBlock": "0xc" }])
		);
	}
}
