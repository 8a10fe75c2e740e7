//! Lightweight JSON-RPC client for EVM-compatible endpoints.
//!
//! `RpcClient` posts one JSON-RPC 2.0 request per call and returns the `result`
//! field. It keeps no state beyond a request id counter: no caching, no retries
//! and no batching. The typed accessors in [`namespaces`] are thin projections
//! over [`RpcClient::call`] that encode parameters in the positions each method
//! expects and decode quantity-encoded results.

use dualtx_types::QuantityError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

pub mod namespaces;
pub mod params;

pub use params::{BlockId, CallRequest, LogFilter};

/// Errors that can occur while talking to a JSON-RPC endpoint.
#[derive(Debug, Error)]
pub enum RpcError {
	/// The request never produced an HTTP response (connection refused, timeout, ...).
	#[error("RPC network error: {0}")]
	Network(String),
	/// The endpoint answered with a non-2xx HTTP status.
	#[error("RPC HTTP error: {status} {status_text}")]
	Transport { status: u16, status_text: String },
	/// The JSON-RPC envelope carried an `error` object.
	#[error("RPC error: {code} {message}")]
	Rpc { code: i64, message: String },
	/// The response body or `result` did not have the expected shape.
	#[error("RPC decode error: {0}")]
	Decode(String),
	/// A quantity field was not valid hex.
	#[error("RPC quantity error: {0}")]
	Quantity(#[from] QuantityError),
}

impl RpcError {
	/// Returns true for failures that may succeed on retry: connection
	/// errors and 5xx responses. Protocol and decode errors are permanent.
	pub fn is_transient(&self) -> bool {
		match self {
			RpcError::Network(_) => true,
			RpcError::Transport { status, .. } => *status >= 500,
			RpcError::Rpc { .. } | RpcError::Decode(_) | RpcError::Quantity(_) => false,
		}
	}
}

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
	jsonrpc: &'static str,
	id: u64,
	method: &'a str,
	params: &'a [Value],
}

#[derive(Deserialize)]
struct JsonRpcResponse {
	#[serde(default)]
	result: Option<Value>,
	#[serde(default)]
	error: Option<JsonRpcErrorObject>,
}

#[derive(Deserialize)]
struct JsonRpcErrorObject {
	code: i64,
	message: String,
}

/// JSON-RPC client bound to a single HTTP endpoint.
///
/// Cloning is cheap; clones share the HTTP connection pool and the id counter.
#[derive(Debug, Clone)]
pub struct RpcClient {
	url: String,
	http: reqwest::Client,
	next_id: Arc<AtomicU64>,
}

impl RpcClient {
	/// Creates a client for the given endpoint URL.
	pub fn new(url: impl Into<String>) -> Self {
		Self::with_http_client(url, reqwest::Client::new())
	}

	/// Creates a client that reuses an existing `reqwest::Client`.
	pub fn with_http_client(url: impl Into<String>, http: reqwest::Client) -> Self {
		Self {
			url: url.into(),
			http,
			next_id: Arc::new(AtomicU64::new(1)),
		}
	}

	/// The endpoint this client posts to.
	pub fn url(&self) -> &str {
		&self.url
	}

	/// Sends a single JSON-RPC request and returns its `result`.
	///
	/// Ids start at 1 and increase with every call. A missing `result` is
	/// returned as `Value::Null`.
	pub async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcError> {
		let id = self.next_id.fetch_add(1, Ordering::Relaxed);
		let request = JsonRpcRequest {
			jsonrpc: "2.0",
			id,
			method,
			params: &params,
		};

		tracing::debug!(method, id, url = %self.url, "Sending RPC request");

		let response = self
			.http
			.post(&self.url)
			.json(&request)
			.send()
			.await
			.map_err(|e| RpcError::Network(e.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			return Err(RpcError::Transport {
				status: status.as_u16(),
				status_text: status.canonical_reason().unwrap_or_default().to_string(),
			});
		}

		let envelope: JsonRpcResponse = response
			.json()
			.await
			.map_err(|e| RpcError::Decode(format!("Invalid response to {}: {}", method, e)))?;

		if let Some(error) = envelope.error {
			return Err(RpcError::Rpc {
				code: error.code,
				message: error.message,
			});
		}

		Ok(envelope.result.unwrap_or(Value::Null))
	}

	/// Calls `method` and deserializes the result into `T`.
	pub(crate) async fn call_as<T>(&self, method: &str, params: Vec<Value>) -> Result<T, RpcError>
	where
		T: serde::de::DeserializeOwned,
	{
		let value = self.call(method, params).await?;
		serde_json::from_value(value)
			.map_err(|e| RpcError::Decode(format!("Unexpected result for {}: {}", method, e)))
	}

	/// Calls `method` and decodes a quantity result into a `u64`.
	pub(crate) async fn call_quantity(
		&self,
		method: &str,
		params: Vec<Value>,
	) -> Result<u64, RpcError> {
		let raw: String = self.call_as(method, params).await?;
		Ok(dualtx_types::decode_quantity(&raw)?)
	}

	/// Calls `method` and decodes a quantity result into a `U256`.
	pub(crate) async fn call_quantity_u256(
		&self,
		method: &str,
		params: Vec<Value>,
	) -> Result<alloy_primitives::U256, RpcError> {
		let raw: String = self.call_as(method, params).await?;
		Ok(dualtx_types::decode_quantity_u256(&raw)?)
	}
}

#[cfg(test)]
pub(crate) mod test_support {
	use serde_json::{json, Value};
	use wiremock::matchers::{body_partial_json, method};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	/// Mounts a mock answering `rpc_method` with `result`.
	pub async fn mock_result(server: &MockServer, rpc_method: &str, result: Value) {
		Mock::given(method("POST"))
			.and(body_partial_json(json!({ "method": rpc_method })))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"jsonrpc": "2.0",
				"id": 1,
				"result": result
			})))
			.mount(server)
			.await;
	}

	/// Mounts a mock answering `rpc_method` with a JSON-RPC error object.
	pub async fn mock_error(server: &MockServer, rpc_method: &str, code: i64, message: &str) {
		Mock::given(method("POST"))
			.and(body_partial_json(json!({ "method": rpc_method })))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"jsonrpc": "2.0",
				"id": 1,
				"error": { "code": code, "message": message }
			})))
			.mount(server)
			.await;
	}

	/// Returns the JSON bodies of every request the server received.
	pub async fn request_bodies(server: &MockServer) -> Vec<Value> {
		server
			.received_requests()
			.await
			.unwrap_or_default()
			.iter()
			.map(|r| serde_json::from_slice(&r.body).unwrap())
			.collect()
	}
}
