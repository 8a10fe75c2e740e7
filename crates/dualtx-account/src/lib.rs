//! Account management for the dual-chain harness.
//!
//! This module defines the signing seam used by the raw transaction builder:
//! an account resolves its EVM address and turns an unsigned
//! `RawEvmTransaction` into broadcast-ready bytes.

use alloy_primitives::Address;
use async_trait::async_trait;
use dualtx_types::{RawEvmTransaction, SecretString, SignedTransaction};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod local;
}

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// Error that occurs when signing operations fail.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	/// Error that occurs when a cryptographic key is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
}

/// Trait defining the interface for account implementations.
///
/// Implementations hold the signer identity. They must not mutate the
/// transaction they sign.
#[async_trait]
pub trait AccountInterface: Send + Sync {
	/// Retrieves the EVM address associated with this account.
	async fn address(&self) -> Result<Address, AccountError>;

	/// Signs a legacy EVM transaction and returns its encoded form.
	async fn sign_transaction(
		&self,
		tx: &RawEvmTransaction,
	) -> Result<SignedTransaction, AccountError>;
}

/// Creates the default account implementation from a private key.
pub fn create_account(
	private_key: &SecretString,
) -> Result<Box<dyn AccountInterface>, AccountError> {
	let account = implementations::local::LocalAccount::from_secret(private_key)?;
	Ok(Box::new(account))
}

/// Service that manages account operations.
///
/// Wraps an underlying account implementation so callers can share one signer
/// behind an `Arc`.
pub struct AccountService {
	implementation: Box<dyn AccountInterface>,
}

impl AccountService {
	pub fn new(implementation: Box<dyn AccountInterface>) -> Self {
		Self { implementation }
	}

	/// Retrieves the address associated with the managed account.
	pub async fn get_address(&self) -> Result<Address, AccountError> {
		self.implementation.address().await
	}

	/// Signs a transaction using the managed account.
	pub async fn sign(&self, tx: &RawEvmTransaction) -> Result<SignedTransaction, AccountError> {
		self.implementation.sign_transaction(tx).await
	}
}
