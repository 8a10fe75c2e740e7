//! Coordination logic for the dual-chain harness.
//!
//! Two drivers are provided. [`BlockAligner`] retries a pair of EVM and Cosmos
//! submissions until both land in the same block, holding back whichever side
//! landed earlier on the previous miss. [`send_cosmos_evm_txs`] keeps both
//! execution layers busy with transfers for a fixed duration.
//!
//! Neither driver talks to a chain directly; both are handed submitters from
//! `dualtx_types::submission`.

pub mod alignment;
pub mod load;

pub use alignment::{AlignmentConfig, AlignmentError, BlockAligner};
pub use load::{send_cosmos_evm_txs, LoadConfig, LoadError, LoadReport};
