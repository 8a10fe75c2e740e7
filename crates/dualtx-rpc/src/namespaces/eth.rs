//! `eth_*` methods.
//!
//! Counts, indices and block numbers decode to `u64`; balances and gas price
//! decode to `U256`. Blocks, transactions and logs are returned as raw JSON
//! since the harness only inspects a handful of their fields.

use crate::params::{hex_json, BlockId, CallRequest, LogFilter};
use crate::{RpcClient, RpcError};
use alloy_primitives::{Address, Bytes, B256, U256};
use dualtx_types::{encode_quantity, EvmReceipt};
use serde_json::Value;

impl RpcClient {
	pub async fn chain_id(&self) -> Result<u64, RpcError> {
		self.call_quantity("eth_chainId", vec![]).await
	}

	pub async fn get_block_number(&self) -> Result<u64, RpcError> {
		self.call_quantity("eth_blockNumber", vec![]).await
	}

	pub async fn get_balance(&self, address: Address, block: BlockId) -> Result<U256, RpcError> {
		self.call_quantity_u256(
			"eth_getBalance",
			vec![hex_json(address.as_slice()), block.to_json()],
		)
		.await
	}

	/// Number of transactions sent from `address`, i.e. its next nonce at `block`.
	pub async fn get_transaction_count(
		&self,
		address: Address,
		block: BlockId,
	) -> Result<u64, RpcError> {
		self.call_quantity(
			"eth_getTransactionCount",
			vec![hex_json(address.as_slice()), block.to_json()],
		)
		.await
	}

	pub async fn get_code(&self, address: Address, block: BlockId) -> Result<Bytes, RpcError> {
		self.call_as("eth_getCode", vec![hex_json(address.as_slice()), block.to_json()])
			.await
	}

	pub async fn get_storage_at(
		&self,
		address: Address,
		position: B256,
		block: BlockId,
	) -> Result<B256, RpcError> {
		self.call_as(
			"eth_getStorageAt",
			vec![hex_json(address.as_slice()), hex_json(position.as_slice()), block.to_json()],
		)
		.await
	}

	pub async fn gas_price(&self) -> Result<U256, RpcError> {
		self.call_quantity_u256("eth_gasPrice", vec![]).await
	}

	pub async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, RpcError> {
		self.call_quantity("eth_estimateGas", vec![request.to_json()])
			.await
	}

	/// Executes `request` against `block` without creating a transaction.
	pub async fn call_tx(&self, request: &CallRequest, block: BlockId) -> Result<Bytes, RpcError> {
		self.call_as("eth_call", vec![request.to_json(), block.to_json()])
			.await
	}

	/// Broadcasts a signed transaction and returns its hash.
	///
	/// The payload is passed through verbatim; the node decides whether it is valid.
	pub async fn send_raw_transaction(&self, signed_tx: &str) -> Result<B256, RpcError> {
		self.call_as(
			"eth_sendRawTransaction",
			vec![Value::String(signed_tx.to_string())],
		)
		.await
	}

	/// Returns the receipt, or `None` while the transaction is not yet mined.
	pub async fn get_transaction_receipt(
		&self,
		tx_hash: B256,
	) -> Result<Option<EvmReceipt>, RpcError> {
		self.call_as("eth_getTransactionReceipt", vec![hex_json(tx_hash.as_slice())])
			.await
	}

	pub async fn get_transaction_by_hash(&self, tx_hash: B256) -> Result<Value, RpcError> {
		self.call("eth_getTransactionByHash", vec![hex_json(tx_hash.as_slice())])
			.await
	}

	pub async fn get_transaction_by_block_hash_and_index(
		&self,
		block_hash: B256,
		index: u64,
	) -> Result<Value, RpcError> {
		self.call(
			"eth_getTransactionByBlockHashAndIndex",
			vec![hex_json(block_hash.as_slice()), Value::String(encode_quantity(index))],
		)
		.await
	}

	pub async fn get_transaction_by_block_number_and_index(
		&self,
		block: BlockId,
		index: u64,
	) -> Result<Value, RpcError> {
		self.call(
			"eth_getTransactionByBlockNumberAndIndex",
			vec![block.to_json(), Value::String(encode_quantity(index))],
		)
		.await
	}

	pub async fn get_block_by_hash(
		&self,
		block_hash: B256,
		full_transactions: bool,
	) -> Result<Value, RpcError> {
		self.call(
			"eth_getBlockByHash",
			vec![hex_json(block_hash.as_slice()), Value::Bool(full_transactions)],
		)
		.await
	}

	pub async fn get_block_by_number(
		&self,
		block: BlockId,
		full_transactions: bool,
	) -> Result<Value, RpcError> {
		self.call(
			"eth_getBlockByNumber",
			vec![block.to_json(), Value::Bool(full_transactions)],
		)
		.await
	}

	pub async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<Value>, RpcError> {
		self.call_as("eth_getLogs", vec![filter.to_json()]).await
	}

	pub async fn get_block_receipts(&self, block: BlockId) -> Result<Vec<EvmReceipt>, RpcError> {
		self.call_as("eth_getBlockReceipts", vec![block.to_json()])
			.await
	}
}
