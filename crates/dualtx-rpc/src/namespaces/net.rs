//! `web3_*` and `net_*` methods.

use crate::params::hex_json;
use crate::{RpcClient, RpcError};
use alloy_primitives::{Bytes, B256};

impl RpcClient {
	pub async fn web3_client_version(&self) -> Result<String, RpcError> {
		self.call_as("web3_clientVersion", vec![]).await
	}

	/// Keccak-256 of `data`, computed by the node.
	pub async fn web3_sha3(&self, data: &Bytes) -> Result<B256, RpcError> {
		self.call_as("web3_sha3", vec![hex_json(&data[..])]).await
	}

	pub async fn net_version(&self) -> Result<String, RpcError> {
		self.call_as("net_version", vec![]).await
	}

	pub async fn net_listening(&self) -> Result<bool, RpcError> {
		self.call_as("net_listening", vec![]).await
	}

	pub async fn net_peer_count(&self) -> Result<u64, RpcError> {
		self.call_quantity("net_peerCount", vec![]).await
	}
}

#[cfg(test)]
mod tests {
	use crate::test_support::*;
	use crate::RpcClient;
	use serde_json::json;
	use wiremock::MockServer;

	#[tokio::test]
	async fn test_net_methods() {
		let server = MockServer::start().await;
		mock_result(&server, "net_version", json!("713715")).await;
		mock_result(&server, "net_listening", json!(true)).await;
		mock_result(&server, "net_peerCount", json!("0x1a")).await;

		let client = RpcClient::new(server.uri());
		assert_eq!(client.net_version().await.unwrap(), "713715");
		assert!(client.net_listening().await.unwrap());
		assert_eq!(client.net_peer_count().await.unwrap(), 26);
	}
}
