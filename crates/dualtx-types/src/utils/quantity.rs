//! JSON-RPC quantity encoding.
//!
//! Integers travel over the wire as `"0x"`-prefixed hexadecimal strings with no
//! leading zeros (`0` is `"0x0"`). Counts, indices and block numbers decode to
//! `u64`; balances and gas prices decode to `U256`.

use alloy_primitives::U256;
use thiserror::Error;

/// Errors that can occur while decoding a quantity string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
	/// The value does not start with "0x".
	#[error("Quantity '{0}' is missing the 0x prefix")]
	MissingPrefix(String),
	/// The value has no digits after the prefix.
	#[error("Quantity '{0}' has no digits")]
	Empty(String),
	/// The digits are not valid hexadecimal or overflow the target type.
	#[error("Invalid quantity '{value}': {reason}")]
	Invalid { value: String, reason: String },
}

fn digits(value: &str) -> Result<&str, QuantityError> {
	let digits = value
		.strip_prefix("0x")
		.or_else(|| value.strip_prefix("0X"))
		.ok_or_else(|| QuantityError::MissingPrefix(value.to_string()))?;
	if digits.is_empty() {
		return Err(QuantityError::Empty(value.to_string()));
	}
	Ok(digits)
}

/// Decodes a quantity string into a `u64`.
pub fn decode_quantity(value: &str) -> Result<u64, QuantityError> {
	let digits = digits(value)?;
	u64::from_str_radix(digits, 16).map_err(|e| QuantityError::Invalid {
		value: value.to_string(),
		reason: e.to_string(),
	})
}

/// Decodes a quantity string into a `U256`.
pub fn decode_quantity_u256(value: &str) -> Result<U256, QuantityError> {
	let digits = digits(value)?;
	U256::from_str_radix(digits, 16).map_err(|e| QuantityError::Invalid {
		value: value.to_string(),
		reason: e.to_string(),
	})
}

/// Encodes a `u64` as a quantity string.
pub fn encode_quantity(value: u64) -> String {
	format!("0x{:x}", value)
}

/// Encodes a `U256` as a quantity string.
pub fn encode_quantity_u256(value: U256) -> String {
	format!("{:#x}", value)
}

/// Serde adapter for `u64` fields carried as quantity strings.
///
/// Use with `#[serde(with = "dualtx_types::utils::quantity::serde_u64")]`.
pub mod serde_u64 {
	use serde::{Deserialize, Deserializer, Serializer};

	pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&super::encode_quantity(*value))
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		super::decode_quantity(&s).map_err(serde::de::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_decode_quantity() {
		assert_eq!(decode_quantity("0x1a").unwrap(), 26);
		assert_eq!(decode_quantity("0x0").unwrap(), 0);
		assert_eq!(decode_quantity("0XFF").unwrap(), 255);
		assert_eq!(
			decode_quantity("0xffffffffffffffff").unwrap(),
			u64::MAX
		);
	}

	#[test]
	fn test_decode_quantity_rejects_malformed_input() {
		assert!(matches!(
			decode_quantity("1a"),
			Err(QuantityError::MissingPrefix(_))
		));
		assert!(matches!(decode_quantity("0x"), Err(QuantityError::Empty(_))));
		assert!(matches!(
			decode_quantity("0xzz"),
			Err(QuantityError::Invalid { .. })
		));
		// One digit too many for a u64
		assert!(matches!(
			decode_quantity("0x10000000000000000"),
			Err(QuantityError::Invalid { .. })
		));
	}

	#[test]
	fn test_encode_quantity() {
		assert_eq!(encode_quantity(26), "0x1a");
		assert_eq!(encode_quantity(0), "0x0");
		assert_eq!(encode_quantity(u64::MAX), "0xffffffffffffffff");
	}

	#[test]
	fn test_quantity_round_trip_boundaries() {
		for value in [0u64, 1, 15, 16, 26, 255, 256, u32::MAX as u64, u64::MAX - 1, u64::MAX] {
			assert_eq!(decode_quantity(&encode_quantity(value)).unwrap(), value);
		}
	}

	#[test]
	fn test_u256_quantities() {
		let balance = decode_quantity_u256("0xde0b6b3a7640000").unwrap();
		assert_eq!(balance, U256::from(1_000_000_000_000_000_000u64));
		assert_eq!(encode_quantity_u256(balance), "0xde0b6b3a7640000");
		assert_eq!(encode_quantity_u256(U256::ZERO), "0x0");
		assert_eq!(decode_quantity_u256(&encode_quantity_u256(U256::MAX)).unwrap(), U256::MAX);
	}
}
