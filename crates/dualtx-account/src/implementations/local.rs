//! Local private-key account.
//!
//! Signs legacy transactions in-process with an alloy `PrivateKeySigner`.
//! When the transaction carries a chain ID the signature follows EIP-155.

use crate::{AccountError, AccountInterface};
use alloy_consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy_eips::eip2718::Encodable2718;
use alloy_primitives::{Address, TxKind};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use dualtx_types::{RawEvmTransaction, SecretString, SignedTransaction};

/// Account backed by a private key held in memory.
pub struct LocalAccount {
	signer: PrivateKeySigner,
}

impl LocalAccount {
	pub fn new(signer: PrivateKeySigner) -> Self {
		Self { signer }
	}

	/// Parses a hex private key (with or without 0x prefix).
	pub fn from_secret(private_key: &SecretString) -> Result<Self, AccountError> {
		let signer = private_key.with_exposed(|key| {
			key.trim()
				.parse::<PrivateKeySigner>()
				.map_err(|_| AccountError::InvalidKey("Invalid private key format".to_string()))
		})?;
		Ok(Self::new(signer))
	}
}

/// Converts the harness envelope into alloy's legacy transaction type.
fn to_legacy(tx: &RawEvmTransaction) -> Result<TxLegacy, AccountError> {
	let gas_price = u128::try_from(tx.gas_price).map_err(|_| {
		AccountError::SigningFailed(format!("Gas price {} does not fit in u128", tx.gas_price))
	})?;

	Ok(TxLegacy {
		chain_id: tx.chain_id,
		nonce: tx.nonce,
		gas_price,
		gas_limit: tx.gas_limit,
		to: TxKind::Call(tx.to),
		value: tx.value,
		input: tx.data.clone(),
	})
}

#[async_trait]
impl AccountInterface for LocalAccount {
	async fn address(&self) -> Result<Address, AccountError> {
		Ok(self.signer.address())
	}

	async fn sign_transaction(
		&self,
		tx: &RawEvmTransaction,
	) -> Result<SignedTransaction, AccountError> {
		let legacy = to_legacy(tx)?;
		let signature = self
			.signer
			.sign_hash_sync(&legacy.signature_hash())
			.map_err(|e| AccountError::SigningFailed(e.to_string()))?;

		let signed = legacy.into_signed(signature);
		let hash = *signed.hash();
		let envelope = TxEnvelope::from(signed);

		Ok(SignedTransaction {
			raw: envelope.encoded_2718().into(),
			hash,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::{address, keccak256, Bytes, U256};

	const ANVIL_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	fn transfer() -> RawEvmTransaction {
		RawEvmTransaction {
			to: address!("3894085ef7ff0f0aedf52e2a2704928d1ec074f1"),
			data: Bytes::from(vec![0xa9, 0x05, 0x9c, 0xbb]),
			nonce: 7,
			gas_price: U256::from(100_000_000_000u64),
			gas_limit: 60_000,
			value: U256::ZERO,
			chain_id: Some(713715),
		}
	}

	#[tokio::test]
	async fn test_address_from_key() {
		let account = LocalAccount::from_secret(&SecretString::from(ANVIL_KEY)).unwrap();
		assert_eq!(
			account.address().await.unwrap(),
			address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266")
		);
	}

	#[tokio::test]
	async fn test_invalid_key_rejected() {
		let result = LocalAccount::from_secret(&SecretString::from("0x1234"));
		assert!(matches!(result, Err(AccountError::InvalidKey(_))));
	}

	#[tokio::test]
	async fn test_signed_legacy_encoding() {
		let account = LocalAccount::from_secret(&SecretString::from(ANVIL_KEY)).unwrap();
		let tx = transfer();
		let signed = account.sign_transaction(&tx).await.unwrap();

		// Legacy transactions are a bare RLP list, no type byte
		assert!(signed.raw[0] >= 0xc0);
		assert_eq!(keccak256(&signed.raw), signed.hash);
		assert!(signed.to_hex().starts_with("0x"));

		// Signing is deterministic (RFC 6979) and leaves the input untouched
		let again = account.sign_transaction(&tx).await.unwrap();
		assert_eq!(signed, again);
		assert_eq!(tx, transfer());
	}

	#[tokio::test]
	async fn test_gas_price_overflow() {
		let account = LocalAccount::from_secret(&SecretString::from(ANVIL_KEY)).unwrap();
		let mut tx = transfer();
		tx.gas_price = U256::MAX;
		let result = account.sign_transaction(&tx).await;
		assert!(matches!(result, Err(AccountError::SigningFailed(_))));
	}
}
