//! Cosmos submission through the chain binary.
//!
//! The binary is invoked with the configured arguments followed by
//! `--output json`, and the transaction response is parsed from stdout.
//! A non-zero exit status or a non-zero response code is an error.

use crate::DeliveryError;
use async_trait::async_trait;
use dualtx_types::{
	truncate_id, CosmosSubmitter, CosmosTransfer, CosmosTxResponse, SubmissionError,
};
use tokio::process::Command;

/// Placeholder replaced with the recipient by [`CliCosmosTransfer`].
pub const USER_PLACEHOLDER: &str = "{user}";

/// Runs `binary args.. --output json` once per submission.
#[derive(Debug, Clone)]
pub struct CliCosmosSubmitter {
	binary: String,
	args: Vec<String>,
}

impl CliCosmosSubmitter {
	pub fn new(binary: impl Into<String>, args: Vec<String>) -> Self {
		Self {
			binary: binary.into(),
			args,
		}
	}

	pub async fn broadcast(&self) -> Result<CosmosTxResponse, DeliveryError> {
		run_json(&self.binary, &self.args).await
	}
}

#[async_trait]
impl CosmosSubmitter for CliCosmosSubmitter {
	async fn submit(&self) -> Result<CosmosTxResponse, SubmissionError> {
		Ok(self.broadcast().await?)
	}
}

/// Like [`CliCosmosSubmitter`], with `{user}` in any argument substituted
/// by the transfer recipient.
#[derive(Debug, Clone)]
pub struct CliCosmosTransfer {
	binary: String,
	args: Vec<String>,
}

impl CliCosmosTransfer {
	pub fn new(binary: impl Into<String>, args: Vec<String>) -> Self {
		Self {
			binary: binary.into(),
			args,
		}
	}

	fn args_for(&self, user: &str) -> Vec<String> {
		self.args
			.iter()
			.map(|arg| arg.replace(USER_PLACEHOLDER, user))
			.collect()
	}
}

#[async_trait]
impl CosmosTransfer for CliCosmosTransfer {
	async fn transfer(&self, user: &str) -> Result<CosmosTxResponse, SubmissionError> {
		Ok(run_json(&self.binary, &self.args_for(user)).await?)
	}
}

async fn run_json(binary: &str, args: &[String]) -> Result<CosmosTxResponse, DeliveryError> {
	let output = Command::new(binary)
		.args(args)
		.args(["--output", "json"])
		.output()
		.await
		.map_err(|e| DeliveryError::Command(format!("Failed to run {binary}: {e}")))?;

	if !output.status.success() {
		let stderr = String::from_utf8_lossy(&output.stderr);
		return Err(DeliveryError::Command(format!(
			"{binary} exited with {}: {}",
			output.status,
			stderr.trim()
		)));
	}

	let response = parse_response(&String::from_utf8_lossy(&output.stdout))?;
	if !response.is_success() {
		return Err(DeliveryError::Command(format!(
			"Cosmos transaction {} failed with code {}: {}",
			response.txhash, response.code, response.raw_log
		)));
	}

	tracing::info!(
		tx_hash = %truncate_id(&response.txhash),
		height = response.height,
		"Submitted Cosmos transaction"
	);
	Ok(response)
}

/// Parses the JSON object in `stdout`, skipping any leading banner text.
fn parse_response(stdout: &str) -> Result<CosmosTxResponse, DeliveryError> {
	let start = stdout
		.find('{')
		.ok_or_else(|| DeliveryError::Command(format!("No JSON in output: {}", stdout.trim())))?;
	serde_json::from_str(stdout[start..].trim())
		.map_err(|e| DeliveryError::Command(format!("Invalid transaction response: {e}")))
}
