//! EVM transaction envelopes.
//!
//! `RawEvmTransaction` is the unsigned legacy envelope assembled by the raw
//! transaction builder. Signing never mutates it; it produces a separate
//! `SignedTransaction` holding the broadcast-ready bytes.

use crate::utils::with_0x_prefix;
use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

/// Unsigned legacy EVM transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvmTransaction {
	/// Recipient or contract address.
	pub to: Address,
	/// Calldata.
	pub data: Bytes,
	/// Sender nonce.
	pub nonce: u64,
	/// Gas price in wei.
	pub gas_price: U256,
	/// Gas limit, normally the node's estimate.
	pub gas_limit: u64,
	/// Value in wei.
	pub value: U256,
	/// Chain ID for EIP-155 replay protection. `None` signs a pre-EIP-155 transaction.
	pub chain_id: Option<u64>,
}

/// A signed, RLP/EIP-2718 encoded transaction ready for `eth_sendRawTransaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
	/// Encoded transaction bytes.
	pub raw: Bytes,
	/// Transaction hash (keccak256 of the encoded bytes).
	pub hash: B256,
}

impl SignedTransaction {
	/// Returns the encoded transaction as a 0x-prefixed hex string.
	pub fn to_hex(&self) -> String {
		with_0x_prefix(&hex::encode(&self.raw))
	}
}
