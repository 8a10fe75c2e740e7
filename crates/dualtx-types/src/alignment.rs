//! Block-alignment bookkeeping.
//!
//! The coordinator keeps a single piece of state across attempts, the `Bias`
//! learned from the previous miss, and records one `AlignmentAttempt` per
//! iteration so callers can inspect how convergence went.

use crate::delivery::{CosmosTxResponse, EvmReceipt};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::time::Duration;

/// The coordinator's belief about which path lands earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Bias {
	/// No miss observed yet in this call.
	#[default]
	Unknown,
	/// The EVM transaction landed at a lower height than the Cosmos one.
	EvmWasEarlier,
	/// The Cosmos transaction landed at a lower height than the EVM one.
	CosmosWasEarlier,
}

impl Bias {
	/// Derives the bias from a pair of heights, or `None` when they match.
	pub fn from_heights(evm_block: u64, cosmos_height: u64) -> Option<Self> {
		match evm_block.cmp(&cosmos_height) {
			Ordering::Equal => None,
			Ordering::Less => Some(Bias::EvmWasEarlier),
			Ordering::Greater => Some(Bias::CosmosWasEarlier),
		}
	}

	/// The side whose submission is held back under this bias.
	pub fn delayed_side(&self) -> Option<ChainSide> {
		match self {
			Bias::Unknown => None,
			Bias::EvmWasEarlier => Some(ChainSide::Evm),
			Bias::CosmosWasEarlier => Some(ChainSide::Cosmos),
		}
	}
}

/// One of the two execution layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainSide {
	Evm,
	Cosmos,
}

impl std::fmt::Display for ChainSide {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ChainSide::Evm => write!(f, "evm"),
			ChainSide::Cosmos => write!(f, "cosmos"),
		}
	}
}

/// Record of a single alignment attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentAttempt {
	/// 1-based attempt number.
	pub attempt: u32,
	/// Bias in force when the attempt started.
	pub bias: Bias,
	/// Side whose submission was held back, if any.
	pub delayed: Option<ChainSide>,
	/// How long the held-back submission waited.
	pub delay: Duration,
	/// Block number of the EVM receipt.
	pub evm_block: u64,
	/// Height reported by the Cosmos broadcast.
	pub cosmos_height: u64,
}

impl AlignmentAttempt {
	/// Returns true if both transactions landed in the same block.
	pub fn is_aligned(&self) -> bool {
		self.evm_block == self.cosmos_height
	}
}

/// Outcome of a successful alignment.
///
/// Only produced when `evm_receipt.block_number == cosmos_response.height`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentResult {
	pub evm_receipt: EvmReceipt,
	pub cosmos_response: CosmosTxResponse,
	/// Every attempt taken, the last one being the aligned attempt.
	pub attempts: Vec<AlignmentAttempt>,
}

impl AlignmentResult {
	/// The block both transactions landed in.
	pub fn height(&self) -> u64 {
		self.evm_receipt.block_number
	}
}
