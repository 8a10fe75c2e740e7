//! Utility functions for hex strings and JSON-RPC quantities.
//!
//! This module provides helpers for prefix management, display truncation and
//! the `"0x"`-prefixed quantity encoding used on the JSON-RPC wire.

pub mod formatting;
pub mod quantity;

pub use formatting::{truncate_id, with_0x_prefix, without_0x_prefix};
pub use quantity::{
	decode_quantity, decode_quantity_u256, encode_quantity, encode_quantity_u256, QuantityError,
};
