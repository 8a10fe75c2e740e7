//! Transaction delivery for the dual-chain harness.
//!
//! This module builds, signs and broadcasts raw EVM transactions over JSON-RPC
//! and provides ready-made submitters for the block-alignment coordinator:
//! an RPC-backed EVM submitter that polls for its receipt, and a Cosmos
//! submitter that shells out to the chain binary.

use dualtx_account::AccountError;
use dualtx_rpc::RpcError;
use thiserror::Error;

pub mod builder;
pub mod cli;
pub mod submitters;

pub use builder::{send_raw_transaction, TxBuilder};
pub use cli::{CliCosmosSubmitter, CliCosmosTransfer};
pub use submitters::{ConfirmationConfig, RawEvmSubmitter, RpcPendingTx};

/// Errors that can occur during transaction delivery operations.
#[derive(Debug, Error)]
pub enum DeliveryError {
	/// Error returned by the JSON-RPC endpoint or transport.
	#[error("RPC failure: {0}")]
	Rpc(#[from] RpcError),
	/// Gas estimation failed, typically because the call would revert.
	/// Nothing is signed or broadcast in that case.
	#[error("Gas estimation failed: {0}")]
	Estimation(#[source] RpcError),
	/// The signing account could not report its address.
	#[error("Account error: {0}")]
	Account(#[source] AccountError),
	/// Error raised by the signing account.
	#[error("Signing failed: {0}")]
	Signing(#[from] AccountError),
	/// The transaction was broadcast but its receipt could not be obtained.
	#[error("Confirmation failed: {0}")]
	Confirmation(String),
	/// The chain binary failed or produced unusable output.
	#[error("Command failed: {0}")]
	Command(String),
}
