//! Subcommand implementations for the `dualtx` binary.

use alloy_primitives::{Address, Bytes, U256};
use dualtx_account::{create_account, AccountError, AccountService};
use dualtx_config::{CliConfig, Config};
use dualtx_core::{AlignmentError, BlockAligner};
use dualtx_delivery::{
	send_raw_transaction, CliCosmosSubmitter, ConfirmationConfig, DeliveryError,
	RawEvmSubmitter, TxBuilder,
};
use dualtx_rpc::{RpcClient, RpcError};
use dualtx_types::without_0x_prefix;
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by a subcommand.
#[derive(Debug, Error)]
pub enum CommandError {
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("Missing configuration: {0}")]
	MissingConfig(&'static str),
	#[error(transparent)]
	Rpc(#[from] RpcError),
	#[error(transparent)]
	Account(#[from] AccountError),
	#[error(transparent)]
	Delivery(#[from] DeliveryError),
	#[error(transparent)]
	Alignment(#[from] AlignmentError),
}

/// Wired-up clients for one invocation.
pub struct Harness {
	config: Config,
	rpc: RpcClient,
	builder: TxBuilder,
}

impl Harness {
	pub fn new(config: Config) -> Result<Self, CommandError> {
		let rpc = RpcClient::new(config.chain.evm_rpc_url.clone());
		let account = AccountService::new(create_account(&config.account.private_key)?);
		let builder = TxBuilder::new(rpc.clone(), Arc::new(account), config.chain.chain_id);
		Ok(Self {
			config,
			rpc,
			builder,
		})
	}

	/// Forwards an arbitrary JSON-RPC call.
	pub async fn rpc(&self, method: &str, params: Option<&str>) -> Result<Value, CommandError> {
		let params = match params {
			Some(raw) => parse_params(raw)?,
			None => Vec::new(),
		};
		Ok(self.rpc.call(method, params).await?)
	}

	pub async fn block_number(&self) -> Result<Value, CommandError> {
		Ok(json!(self.rpc.get_block_number().await?))
	}

	pub async fn send_raw(&self, signed_tx: &str) -> Result<Value, CommandError> {
		let hash = send_raw_transaction(self.rpc.url(), signed_tx).await?;
		Ok(json!({ "transactionHash": hash }))
	}

	pub async fn sign_and_send(&self, call: &CallArgs) -> Result<Value, CommandError> {
		let (to, data, value) = call.parse()?;
		let pending = self.evm_submitter(to, data, value).send().await?;
		let receipt = pending.wait_for_receipt().await?;
		Ok(json!({
			"transactionHash": receipt.transaction_hash,
			"blockNumber": receipt.block_number,
			"status": receipt.status,
			"gasUsed": receipt.gas_used,
		}))
	}

	/// Pairs the EVM call with the configured Cosmos command and aligns them.
	pub async fn align(&self, call: &CallArgs) -> Result<Value, CommandError> {
		let (to, data, value) = call.parse()?;
		let cli = self
			.config
			.cli
			.as_ref()
			.ok_or(CommandError::MissingConfig("[cli] section is required for align"))?;

		let evm = self.evm_submitter(to, data, value);
		let cosmos = CliCosmosSubmitter::new(cli.binary.clone(), self.cosmos_args(cli));
		let aligner = BlockAligner::new((&self.config.alignment).into());

		let result = aligner.send_until_same_block(&evm, &cosmos).await?;
		Ok(json!({
			"height": result.height(),
			"evmTransactionHash": result.evm_receipt.transaction_hash,
			"cosmosTxHash": result.cosmos_response.txhash,
			"attempts": result.attempts,
		}))
	}

	fn evm_submitter(&self, to: Address, data: Bytes, value: U256) -> RawEvmSubmitter {
		let confirmation = ConfirmationConfig {
			poll_interval: self.config.confirmation.poll_interval(),
			timeout: self.config.confirmation.timeout(),
		};
		RawEvmSubmitter::new(self.builder.clone(), to, data, value).with_confirmation(confirmation)
	}

	/// Broadcast arguments, with `--node` added from `chain.cosmos_rpc_url`
	/// unless the command already names one.
	fn cosmos_args(&self, cli: &CliConfig) -> Vec<String> {
		let mut args = cli.broadcast_args.clone();
		if let Some(node) = &self.config.chain.cosmos_rpc_url {
			if !args.iter().any(|arg| arg == "--node") {
				args.push("--node".to_string());
				args.push(node.clone());
			}
		}
		args
	}
}

/// Raw call arguments shared by `sign-and-send` and `align`.
#[derive(Debug, Clone, clap::Args)]
pub struct CallArgs {
	/// Recipient or contract address
	#[arg(long)]
	pub to: String,

	/// Hex-encoded calldata
	#[arg(long, default_value = "0x")]
	pub data: String,

	/// Value in wei, decimal or 0x-prefixed hex
	#[arg(long, default_value = "0")]
	pub value: String,
}

impl CallArgs {
	fn parse(&self) -> Result<(Address, Bytes, U256), CommandError> {
		let to = Address::from_str(&self.to)
			.map_err(|e| CommandError::InvalidArgument(format!("to '{}': {}", self.to, e)))?;
		let data = hex::decode(without_0x_prefix(&self.data))
			.map_err(|e| CommandError::InvalidArgument(format!("data '{}': {}", self.data, e)))?;
		let value = U256::from_str(&self.value)
			.map_err(|e| CommandError::InvalidArgument(format!("value '{}': {}", self.value, e)))?;
		Ok((to, Bytes::from(data), value))
	}
}

/// Accepts a JSON array, or a single JSON value taken as the only parameter.
fn parse_params(raw: &str) -> Result<Vec<Value>, CommandError> {
	let value: Value = serde_json::from_str(raw)
		.map_err(|e| CommandError::InvalidArgument(format!("params: {}", e)))?;
	Ok(match value {
		Value::Array(items) => items,
		other => vec![other],
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use wiremock::matchers::{body_partial_json, method};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn config_for(rpc_url: &str, extra: &str) -> Config {
		format!(
			r#"
[harness]
id = "test"

[chain]
evm_rpc_url = "{rpc_url}"
cosmos_rpc_url = "http://localhost:26657"
chain_id = 713715

[account]
private_key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
{extra}
"#
		)
		.parse()
		.unwrap()
	}

	async fn mock_result(server: &MockServer, rpc_method: &str, result: Value) {
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

	fn call(to: &str, data: &str, value: &str) -> CallArgs {
		CallArgs {
			to: to.to_string(),
			data: data.to_string(),
			value: value.to_string(),
		}
	}

	#[test]
	fn test_parse_params() {
		assert_eq!(
			parse_params(r#"["0x1", false]"#).unwrap(),
			vec![json!("0x1"), json!(false)]
		);
		assert_eq!(parse_params(r#""latest""#).unwrap(), vec![json!("latest")]);
		assert!(parse_params("[unterminated").is_err());
	}

	#[test]
	fn test_call_args_parse() {
		let (to, data, value) = call(
			"0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
			"0xa9059cbb",
			"0x10",
		)
		.parse()
		.unwrap();
		assert_eq!(to, Address::from_str("0x70997970c51812dc3a010c7d01b50e0d17dc79c8").unwrap());
		assert_eq!(data.to_vec(), vec![0xa9, 0x05, 0x9c, 0xbb]);
		assert_eq!(value, U256::from(16));

		let (_, data, value) = call("0x70997970c51812dc3a010c7d01b50e0d17dc79c8", "0x", "1000")
			.parse()
			.unwrap();
		assert!(data.is_empty());
		assert_eq!(value, U256::from(1000));
	}

	#[test]
	fn test_call_args_rejects_bad_address() {
		let err = call("0x1234", "0x", "0").parse().unwrap_err();
		assert!(matches!(err, CommandError::InvalidArgument(_)));
	}

	#[test]
	fn test_cosmos_args_appends_node() {
		let harness = Harness::new(config_for("http://localhost:8545", "")).unwrap();
		let cli = CliConfig {
			binary: "seid".into(),
			broadcast_args: vec!["tx".into(), "bank".into()],
		};
		assert_eq!(
			harness.cosmos_args(&cli),
			vec!["tx", "bank", "--node", "http://localhost:26657"]
		);

		let explicit = CliConfig {
			binary: "seid".into(),
			broadcast_args: vec!["tx".into(), "--node".into(), "http://other:26657".into()],
		};
		assert_eq!(harness.cosmos_args(&explicit).len(), 3);
	}

	#[tokio::test]
	async fn test_block_number() {
		let server = MockServer::start().await;
		mock_result(&server, "eth_blockNumber", json!("0x2a")).await;

		let harness = Harness::new(config_for(&server.uri(), "")).unwrap();
		assert_eq!(harness.block_number().await.unwrap(), json!(42));
	}

	#[tokio::test]
	async fn test_rpc_passthrough() {
		let server = MockServer::start().await;
		mock_result(&server, "net_version", json!("713715")).await;

		let harness = Harness::new(config_for(&server.uri(), "")).unwrap();
		let result = harness.rpc("net_version", Some("[]")).await.unwrap();
		assert_eq!(result, json!("713715"));
	}

	#[tokio::test]
	async fn test_align_requires_cli_section() {
		let harness = Harness::new(config_for("http://localhost:8545", "")).unwrap();
		let err = harness
			.align(&call("0x70997970c51812dc3a010c7d01b50e0d17dc79c8", "0x", "0"))
			.await
			.unwrap_err();
		assert!(matches!(err, CommandError::MissingConfig(_)));
	}

	#[tokio::test]
	async fn test_sign_and_send_waits_for_receipt() {
		let server = MockServer::start().await;
		mock_result(&server, "eth_getTransactionCount", json!("0x0")).await;
		mock_result(&server, "eth_gasPrice", json!("0x3b9aca00")).await;
		mock_result(&server, "eth_estimateGas", json!("0x5208")).await;
		mock_result(
			&server,
			"eth_sendRawTransaction",
			json!("0x1111111111111111111111111111111111111111111111111111111111111111"),
		)
		.await;
		mock_result(
			&server,
			"eth_getTransactionReceipt",
			json!({
				"transactionHash": "0x1111111111111111111111111111111111111111111111111111111111111111",
				"blockNumber": "0x10",
				"status": "0x1",
				"gasUsed": "0x5208"
			}),
		)
		.await;

		let harness = Harness::new(config_for(
			&server.uri(),
			"[confirmation]\npoll_interval_ms = 10\ntimeout_seconds = 1\n",
		))
		.unwrap();
		let result = harness
			.sign_and_send(&call("0x70997970c51812dc3a010c7d01b50e0d17dc79c8", "0x", "1"))
			.await
			.unwrap();
		assert_eq!(result["blockNumber"], json!(16));
		assert_eq!(result["gasUsed"], json!(21000));
	}
}
