//! Typed accessors grouped by JSON-RPC namespace.
//!
//! Each accessor performs exactly one round-trip through [`crate::RpcClient::call`]
//! and surfaces its errors unchanged.

pub mod debug;
pub mod eth;
pub mod net;
pub mod sei;
