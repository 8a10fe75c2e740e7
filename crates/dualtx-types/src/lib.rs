//! Common types for the dual-chain transaction harness.
//!
//! This crate holds the data types shared by the RPC transport, the raw
//! transaction builder and the block-alignment coordinator, together with the
//! submitter interfaces through which callers hand EVM and Cosmos submissions
//! to the coordinator.

/// Block-alignment bookkeeping types.
pub mod alignment;
/// Receipts and broadcast responses produced by the two execution layers.
pub mod delivery;
/// Secret string wrapper for signer keys.
pub mod secret_string;
/// Submitter interfaces consumed by the coordinator and the load driver.
pub mod submission;
/// Unsigned and signed EVM transaction envelopes.
pub mod transaction;
/// Hex and quantity helpers.
pub mod utils;

pub use alignment::*;
pub use delivery::*;
pub use secret_string::SecretString;
pub use submission::*;
pub use transaction::*;
pub use utils::{
	decode_quantity, decode_quantity_u256, encode_quantity, encode_quantity_u256, truncate_id,
	with_0x_prefix, without_0x_prefix, QuantityError,
};
