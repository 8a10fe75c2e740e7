//! Submitter interfaces.
//!
//! The coordinator and the load driver never talk to a chain directly. They
//! are handed submitters: zero-argument producers that broadcast one
//! transaction per invocation. Implementations may be full chain clients, the
//! raw transaction builder, or plain closures through the blanket impls below.
//!
//! Submitters are invoked once per attempt or round, so repeated invocation
//! must be an accepted side effect for the caller.

use crate::delivery::{CosmosTxResponse, EvmReceipt};
use async_trait::async_trait;
use std::future::Future;

/// Error type produced by caller-supplied submitters.
pub type SubmissionError = Box<dyn std::error::Error + Send + Sync>;

/// A submitted EVM transaction awaiting confirmation.
#[async_trait]
pub trait PendingEvmTx: Send {
	/// Hash of the submitted transaction, 0x-prefixed.
	fn tx_hash(&self) -> &str;

	/// Waits until the transaction is mined and returns its receipt.
	///
	/// Consumes the handle; a transaction is confirmed at most once.
	async fn confirm(self: Box<Self>) -> Result<EvmReceipt, SubmissionError>;
}

/// A pending transaction whose receipt is already known.
///
/// Useful for clients that only return after inclusion.
#[derive(Debug, Clone)]
pub struct ConfirmedEvmTx(pub EvmReceipt);

#[async_trait]
impl PendingEvmTx for ConfirmedEvmTx {
	fn tx_hash(&self) -> &str {
		&self.0.transaction_hash
	}

	async fn confirm(self: Box<Self>) -> Result<EvmReceipt, SubmissionError> {
		Ok(self.0)
	}
}

/// Broadcasts one EVM transaction per call.
#[async_trait]
pub trait EvmSubmitter: Send + Sync {
	async fn submit(&self) -> Result<Box<dyn PendingEvmTx>, SubmissionError>;
}

/// Broadcasts one Cosmos transaction per call and returns the final response.
#[async_trait]
pub trait CosmosSubmitter: Send + Sync {
	async fn submit(&self) -> Result<CosmosTxResponse, SubmissionError>;
}

#[async_trait]
impl<F, Fut> EvmSubmitter for F
where
	F: Fn() -> Fut + Send + Sync,
	Fut: Future<Output = Result<Box<dyn PendingEvmTx>, SubmissionError>> + Send,
{
	async fn submit(&self) -> Result<Box<dyn PendingEvmTx>, SubmissionError> {
		(self)().await
	}
}

#[async_trait]
impl<F, Fut> CosmosSubmitter for F
where
	F: Fn() -> Fut + Send + Sync,
	Fut: Future<Output = Result<CosmosTxResponse, SubmissionError>> + Send,
{
	async fn submit(&self) -> Result<CosmosTxResponse, SubmissionError> {
		(self)().await
	}
}

/// Sends an EVM-origin transfer on behalf of one user of the load driver.
#[async_trait]
pub trait EvmTransfer: Send + Sync {
	async fn transfer(&self, user: &str) -> Result<Box<dyn PendingEvmTx>, SubmissionError>;
}

/// Sends a Cosmos-origin transfer on behalf of one user of the load driver.
#[async_trait]
pub trait CosmosTransfer: Send + Sync {
	async fn transfer(&self, user: &str) -> Result<CosmosTxResponse, SubmissionError>;
}

#[async_trait]
impl<F, Fut> EvmTransfer for F
where
	F: Fn(String) -> Fut + Send + Sync,
	Fut: Future<Output = Result<Box<dyn PendingEvmTx>, SubmissionError>> + Send,
{
	async fn transfer(&self, user: &str) -> Result<Box<dyn PendingEvmTx>, SubmissionError> {
		(self)(user.to_string()).await
	}
}

#[async_trait]
impl<F, Fut> CosmosTransfer for F
where
	F: Fn(String) -> Fut + Send + Sync,
	Fut: Future<Output = Result<CosmosTxResponse, SubmissionError>> + Send,
{
	async fn transfer(&self, user: &str) -> Result<CosmosTxResponse, SubmissionError> {
		(self)(user.to_string()).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn receipt(block_number: u64) -> EvmReceipt {
		EvmReceipt {
			transaction_hash: "0xabc".to_string(),
			block_number,
			block_hash: None,
			status: true,
			gas_used: 21_000,
		}
	}

	#[tokio::test]
	async fn test_closures_act_as_submitters() {
		let evm = || async {
			Ok::<_, SubmissionError>(Box::new(ConfirmedEvmTx(receipt(7))) as Box<dyn PendingEvmTx>)
		};
		let cosmos = || async {
			Ok::<_, SubmissionError>(CosmosTxResponse {
				height: 7,
				txhash: "AB".to_string(),
				code: 0,
				raw_log: String::new(),
				gas_wanted: 0,
				gas_used: 0,
			})
		};

		let pending = EvmSubmitter::submit(&evm).await.unwrap();
		assert_eq!(pending.tx_hash(), "0xabc");
		assert_eq!(pending.confirm().await.unwrap().block_number, 7);
		assert_eq!(CosmosSubmitter::submit(&cosmos).await.unwrap().height, 7);
	}
}
