//! Raw EVM transaction builder.
//!
//! Assembles a legacy transaction from node state, signs it with the
//! configured account and optionally broadcasts it. All reads against the
//! node are issued concurrently once the sender address is known.

use crate::DeliveryError;
use alloy_primitives::{Address, Bytes, B256, U256};
use dualtx_account::AccountService;
use dualtx_rpc::{BlockId, CallRequest, RpcClient};
use dualtx_types::{truncate_id, RawEvmTransaction, SignedTransaction};
use std::sync::Arc;
use tracing::instrument;

/// Builds and signs raw EVM transactions for a single account.
#[derive(Clone)]
pub struct TxBuilder {
	rpc: RpcClient,
	account: Arc<AccountService>,
	/// Configured chain id. When unset it is read from the node per build.
	chain_id: Option<u64>,
}

impl TxBuilder {
	pub fn new(rpc: RpcClient, account: Arc<AccountService>, chain_id: Option<u64>) -> Self {
		Self {
			rpc,
			account,
			chain_id,
		}
	}

	pub fn rpc(&self) -> &RpcClient {
		&self.rpc
	}

	/// Resolves nonce, gas price, gas limit and chain id for a call from the account.
	///
	/// The nonce is read at the `latest` tag, so building several transactions
	/// before any of them is mined yields duplicate nonces.
	pub async fn build(
		&self,
		to: Address,
		data: Bytes,
		value: U256,
	) -> Result<RawEvmTransaction, DeliveryError> {
		let from = self
			.account
			.get_address()
			.await
			.map_err(DeliveryError::Account)?;
		let request = CallRequest::new(to, data.clone()).from(from).value(value);

		let (nonce, gas_price, gas_limit, chain_id) = tokio::try_join!(
			async {
				self.rpc
					.get_transaction_count(from, BlockId::Latest)
					.await
					.map_err(DeliveryError::from)
			},
			async { self.rpc.gas_price().await.map_err(DeliveryError::from) },
			async {
				self.rpc
					.estimate_gas(&request)
					.await
					.map_err(DeliveryError::Estimation)
			},
			async {
				match self.chain_id {
					Some(id) => Ok(id),
					None => self.rpc.chain_id().await.map_err(DeliveryError::from),
				}
			},
		)?;

		Ok(RawEvmTransaction {
			to,
			data,
			nonce,
			gas_price,
			gas_limit,
			value,
			chain_id: Some(chain_id),
		})
	}

	/// Builds and signs a transaction, returning the broadcast-ready envelope.
	#[instrument(skip_all, fields(to = %to))]
	pub async fn sign(
		&self,
		to: Address,
		data: Bytes,
		value: U256,
	) -> Result<SignedTransaction, DeliveryError> {
		let tx = self.build(to, data, value).await?;
		let signed = self.account.sign(&tx).await?;
		tracing::debug!(
			tx_hash = %truncate_id(&signed.hash.to_string()),
			nonce = tx.nonce,
			gas_limit = tx.gas_limit,
			"Signed EVM transaction"
		);
		Ok(signed)
	}

	/// Builds and signs a transaction, returning the 0x-prefixed encoded bytes.
	pub async fn sign_evm_transaction(
		&self,
		to: Address,
		data: Bytes,
		value: U256,
	) -> Result<String, DeliveryError> {
		Ok(self.sign(to, data, value).await?.to_hex())
	}

	/// Builds, signs and broadcasts a transaction through this builder's endpoint.
	pub async fn sign_and_send(
		&self,
		to: Address,
		data: Bytes,
		value: U256,
	) -> Result<B256, DeliveryError> {
		let signed = self.sign(to, data, value).await?;
		let hash = self.rpc.send_raw_transaction(&signed.to_hex()).await?;
		tracing::info!(tx_hash = %truncate_id(&hash.to_string()), "Submitted EVM transaction");
		Ok(hash)
	}
}

/// Broadcasts an already signed transaction to `rpc_url` and returns its hash.
///
/// The payload is not validated locally.
pub async fn send_raw_transaction(rpc_url: &str, signed_tx: &str) -> Result<B256, DeliveryError> {
	let client = RpcClient::new(rpc_url);
	Ok(client.send_raw_transaction(signed_tx).await?)
}
