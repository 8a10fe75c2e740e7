//! RPC-backed EVM submitter.
//!
//! `RawEvmSubmitter` signs and broadcasts one transaction per invocation and
//! hands back an `RpcPendingTx`, which polls `eth_getTransactionReceipt`
//! until the transaction is mined or the confirmation timeout elapses.

use crate::{DeliveryError, TxBuilder};
use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use dualtx_rpc::RpcClient;
use dualtx_types::{
	truncate_id, EvmReceipt, EvmSubmitter, PendingEvmTx, SubmissionError,
};
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Receipt polling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationConfig {
	pub poll_interval: Duration,
	pub timeout: Duration,
}

impl Default for ConfirmationConfig {
	fn default() -> Self {
		Self {
			poll_interval: Duration::from_millis(250),
			timeout: Duration::from_secs(60),
		}
	}
}

/// A broadcast transaction whose receipt is fetched by polling the node.
pub struct RpcPendingTx {
	rpc: RpcClient,
	hash: B256,
	hash_hex: String,
	config: ConfirmationConfig,
}

impl RpcPendingTx {
	pub fn new(rpc: RpcClient, hash: B256, config: ConfirmationConfig) -> Self {
		Self {
			rpc,
			hash,
			hash_hex: hash.to_string(),
			config,
		}
	}

	pub fn hash(&self) -> B256 {
		self.hash
	}

	/// Polls until the receipt is available.
	///
	/// Network errors and 5xx responses are retried until the deadline. Any
	/// other RPC error is returned as is. A reverted receipt is still returned
	/// as a receipt.
	pub async fn wait_for_receipt(&self) -> Result<EvmReceipt, DeliveryError> {
		let deadline = Instant::now() + self.config.timeout;

		loop {
			match self.rpc.get_transaction_receipt(self.hash).await {
				Ok(Some(receipt)) => {
					tracing::debug!(
						tx_hash = %truncate_id(&self.hash_hex),
						block_number = receipt.block_number,
						"Transaction confirmed"
					);
					return Ok(receipt);
				},
				Ok(None) => {},
				Err(e) if e.is_transient() => {
					tracing::debug!(
						tx_hash = %truncate_id(&self.hash_hex),
						error = %e,
						"Receipt lookup failed, retrying"
					);
				},
				Err(e) => return Err(DeliveryError::Rpc(e)),
			}

			if Instant::now() + self.config.poll_interval > deadline {
				return Err(DeliveryError::Confirmation(format!(
					"Transaction {} not mined after {}s",
					self.hash_hex,
					self.config.timeout.as_secs_f64()
				)));
			}
			sleep(self.config.poll_interval).await;
		}
	}
}

#[async_trait]
impl PendingEvmTx for RpcPendingTx {
	fn tx_hash(&self) -> &str {
		&self.hash_hex
	}

	async fn confirm(self: Box<Self>) -> Result<EvmReceipt, SubmissionError> {
		Ok(self.wait_for_receipt().await?)
	}
}

/// Signs and broadcasts the same call on every invocation.
///
/// Each invocation reads a fresh nonce, so successive submissions are
/// distinct transactions once the previous one is mined.
pub struct RawEvmSubmitter {
	builder: TxBuilder,
	to: Address,
	data: Bytes,
	value: U256,
	confirmation: ConfirmationConfig,
}

impl RawEvmSubmitter {
	pub fn new(builder: TxBuilder, to: Address, data: Bytes, value: U256) -> Self {
		Self {
			builder,
			to,
			data,
			value,
			confirmation: ConfirmationConfig::default(),
		}
	}

	pub fn with_confirmation(mut self, confirmation: ConfirmationConfig) -> Self {
		self.confirmation = confirmation;
		self
	}

	/// Signs, broadcasts and returns the pending handle without boxing.
	pub async fn send(&self) -> Result<RpcPendingTx, DeliveryError> {
		let hash = self
			.builder
			.sign_and_send(self.to, self.data.clone(), self.value)
			.await?;
		Ok(RpcPendingTx::new(
			self.builder.rpc().clone(),
			hash,
			self.confirmation,
		))
	}
}

#[async_trait]
impl EvmSubmitter for RawEvmSubmitter {
	async fn submit(&self) -> Result<Box<dyn PendingEvmTx>, SubmissionError> {
		Ok(Box::new(self.send().await?))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use dualtx_rpc::RpcError;
	use serde_json::json;
	use wiremock::matchers::{body_partial_json, method};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn fast_polling() -> ConfirmationConfig {
		ConfirmationConfig {
			poll_interval: Duration::from_millis(10),
			timeout: Duration::from_millis(200),
		}
	}

	fn receipt_response(result: serde_json::Value) -> ResponseTemplate {
		ResponseTemplate::new(200).set_body_json(json!({
			"jsonrpc": "2.0",
			"id": 1,
			"result": result
		}))
	}

	#[tokio::test]
	async fn test_wait_for_receipt_after_pending_polls() {
		let server = MockServer::start().await;
		// Two "not yet mined" answers, then the receipt.
		Mock::given(method("POST"))
			.and(body_partial_json(json!({ "method": "eth_getTransactionReceipt" })))
			.respond_with(receipt_response(json!(null)))
			.up_to_n_times(2)
			.mount(&server)
			.await;
		Mock::given(method("POST"))
			.and(body_partial_json(json!({ "method": "eth_getTransactionReceipt" })))
			.respond_with(receipt_response(json!({
				"transactionHash": "0xabc",
				"blockNumber": "0x2a",
				"status": "0x1",
				"gasUsed": "0x5208"
			})))
			.mount(&server)
			.await;

		let pending = RpcPendingTx::new(
			RpcClient::new(server.uri()),
			B256::repeat_byte(1),
			fast_polling(),
		);
		let receipt = pending.wait_for_receipt().await.unwrap();
		assert_eq!(receipt.block_number, 42);
		assert_eq!(server.received_requests().await.unwrap().len(), 3);
	}

	#[tokio::test]
	async fn test_wait_for_receipt_times_out() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(receipt_response(json!(null)))
			.mount(&server)
			.await;

		let pending: Box<dyn PendingEvmTx> = Box::new(RpcPendingTx::new(
			RpcClient::new(server.uri()),
			B256::repeat_byte(2),
			fast_polling(),
		));
		assert!(pending.tx_hash().starts_with("0x0202"));

		let err = pending.confirm().await.unwrap_err();
		assert!(err.to_string().contains("not mined"));
	}

	#[tokio::test]
	async fn test_wait_for_receipt_returns_rpc_error() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"jsonrpc": "2.0",
				"id": 1,
				"error": { "code": -32601, "message": "method not found" }
			})))
			.mount(&server)
			.await;

		let pending = RpcPendingTx::new(
			RpcClient::new(server.uri()),
			B256::repeat_byte(3),
			ConfirmationConfig {
				poll_interval: Duration::from_millis(50),
				timeout: Duration::from_secs(2),
			},
		);
		let err = pending.wait_for_receipt().await.unwrap_err();
		match &err {
			DeliveryError::Rpc(RpcError::Rpc { code, message }) => {
				assert_eq!(*code, -32601);
				assert_eq!(message, "method not found");
			},
			other => panic!("Expected RPC error, got {:?}", other),
		}
		assert!(err.to_string().contains("method not found"));
		assert_eq!(server.received_requests().await.unwrap().len(), 1);
	}

	#[tokio::test]
	async fn test_wait_for_receipt_retries_server_errors() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(503))
			.up_to_n_times(1)
			.mount(&server)
			.await;
		Mock::given(method("POST"))
			.respond_with(receipt_response(json!({
				"transactionHash": "0xdef",
				"blockNumber": "0x7",
				"status": "0x1",
				"gasUsed": "0x5208"
			})))
			.mount(&server)
			.await;

		let pending = RpcPendingTx::new(
			RpcClient::new(server.uri()),
			B256::repeat_byte(4),
			fast_polling(),
		);
		let receipt = pending.wait_for_receipt().await.unwrap();
		assert_eq!(receipt.block_number, 7);
		assert_eq!(server.received_requests().await.unwrap().len(), 2);
	}

	#[tokio::test]
	async fn test_wait_for_receipt_returns_client_errors() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(404))
			.mount(&server)
			.await;

		let pending = RpcPendingTx::new(
			RpcClient::new(server.uri()),
			B256::repeat_byte(5),
			fast_polling(),
		);
		let err = pending.wait_for_receipt().await.unwrap_err();
		assert!(matches!(
			err,
			DeliveryError::Rpc(RpcError::Transport { status: 404, .. })
		));
		assert_eq!(server.received_requests().await.unwrap().len(), 1);
	}
}
