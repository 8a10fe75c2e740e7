//! Configuration module for the dual-chain harness.
//!
//! Configuration is a single TOML file. String values may reference
//! environment variables as `${VAR}` or `${VAR:-default}`; they are resolved
//! before parsing, and the parsed configuration is validated before use.

use dualtx_types::SecretString;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// The default Display dumps the whole input; the message is enough.
		ConfigError::Parse(err.message().to_string())
	}
}

/// Upper bound accepted for `alignment.max_attempts`.
pub const MAX_ALIGNMENT_ATTEMPTS: u32 = 100;

/// Top-level harness configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	pub harness: HarnessConfig,
	pub chain: ChainConfig,
	pub account: AccountConfig,
	#[serde(default)]
	pub alignment: AlignmentSettings,
	#[serde(default)]
	pub load: LoadSettings,
	#[serde(default)]
	pub confirmation: ConfirmationSettings,
	/// Chain binary used for Cosmos-side submissions.
	pub cli: Option<CliConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HarnessConfig {
	/// Identifier attached to log output.
	pub id: String,
}

/// Endpoints of the dual-VM node.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainConfig {
	/// EVM JSON-RPC endpoint.
	pub evm_rpc_url: String,
	/// Tendermint RPC endpoint, passed to the chain binary as `--node`.
	pub cosmos_rpc_url: Option<String>,
	/// Cosmos REST endpoint.
	pub rest_url: Option<String>,
	/// Chain id used for EIP-155 signing. Read from the node when unset.
	pub chain_id: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
	/// Hex-encoded secp256k1 private key.
	pub private_key: SecretString,
}

/// Block-alignment retry policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlignmentSettings {
	#[serde(default = "default_max_attempts")]
	pub max_attempts: u32,
	#[serde(default = "default_retry_delay_ms")]
	pub retry_delay_ms: u64,
	/// Delay added per attempt to the side that landed earlier.
	#[serde(default = "default_trailing_delay_step_ms")]
	pub trailing_delay_step_ms: u64,
	/// Bound on a single attempt. Unbounded when unset.
	pub attempt_timeout_seconds: Option<u64>,
}

fn default_max_attempts() -> u32 {
	5
}

fn default_retry_delay_ms() -> u64 {
	1000
}

fn default_trailing_delay_step_ms() -> u64 {
	100
}

impl Default for AlignmentSettings {
	fn default() -> Self {
		Self {
			max_attempts: default_max_attempts(),
			retry_delay_ms: default_retry_delay_ms(),
			trailing_delay_step_ms: default_trailing_delay_step_ms(),
			attempt_timeout_seconds: None,
		}
	}
}

impl AlignmentSettings {
	pub fn retry_delay(&self) -> Duration {
		Duration::from_millis(self.retry_delay_ms)
	}

	pub fn trailing_delay_step(&self) -> Duration {
		Duration::from_millis(self.trailing_delay_step_ms)
	}

	pub fn attempt_timeout(&self) -> Option<Duration> {
		self.attempt_timeout_seconds.map(Duration::from_secs)
	}
}

/// Load driver pacing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoadSettings {
	#[serde(default = "default_load_duration_seconds")]
	pub duration_seconds: u64,
	#[serde(default = "default_block_time_ms")]
	pub block_time_ms: u64,
}

fn default_load_duration_seconds() -> u64 {
	20
}

fn default_block_time_ms() -> u64 {
	200
}

impl Default for LoadSettings {
	fn default() -> Self {
		Self {
			duration_seconds: default_load_duration_seconds(),
			block_time_ms: default_block_time_ms(),
		}
	}
}

impl LoadSettings {
	pub fn duration(&self) -> Duration {
		Duration::from_secs(self.duration_seconds)
	}

	pub fn block_time(&self) -> Duration {
		Duration::from_millis(self.block_time_ms)
	}
}

/// Receipt polling for broadcast EVM transactions.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConfirmationSettings {
	#[serde(default = "default_poll_interval_ms")]
	pub poll_interval_ms: u64,
	#[serde(default = "default_confirmation_timeout_seconds")]
	pub timeout_seconds: u64,
}

fn default_poll_interval_ms() -> u64 {
	250
}

fn default_confirmation_timeout_seconds() -> u64 {
	60
}

impl Default for ConfirmationSettings {
	fn default() -> Self {
		Self {
			poll_interval_ms: default_poll_interval_ms(),
			timeout_seconds: default_confirmation_timeout_seconds(),
		}
	}
}

impl ConfirmationSettings {
	pub fn poll_interval(&self) -> Duration {
		Duration::from_millis(self.poll_interval_ms)
	}

	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_seconds)
	}
}

/// Cosmos-side command, run as `binary broadcast_args.. --output json`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
	#[serde(default = "default_cli_binary")]
	pub binary: String,
	pub broadcast_args: Vec<String>,
}

fn default_cli_binary() -> String {
	"seid".to_string()
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut missing = None;
	let resolved = re.replace_all(input, |caps: &regex::Captures| {
		let var_name = &caps[1];
		match (std::env::var(var_name), caps.get(2)) {
			(Ok(value), _) => value,
			(Err(_), Some(default)) => default.as_str().to_string(),
			(Err(_), None) => {
				missing.get_or_insert_with(|| var_name.to_string());
				String::new()
			},
		}
	});

	match missing {
		Some(var_name) => Err(ConfigError::Validation(format!(
			"Environment variable '{}' not found",
			var_name
		))),
		None => Ok(resolved.into_owned()),
	}
}

fn validate_http_url(field: &str, url: &str) -> Result<(), ConfigError> {
	let rest = url
		.strip_prefix("http://")
		.or_else(|| url.strip_prefix("https://"))
		.ok_or_else(|| {
			ConfigError::Validation(format!("{} must be an http(s) URL, got '{}'", field, url))
		})?;
	let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
	if host.is_empty() {
		return Err(ConfigError::Validation(format!(
			"{} has no host: '{}'",
			field, url
		)));
	}
	Ok(())
}

impl Config {
	/// Loads and validates configuration from a TOML file.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let content = tokio::fs::read_to_string(path).await?;
		content.parse()
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.harness.id.trim().is_empty() {
			return Err(ConfigError::Validation("Harness ID cannot be empty".into()));
		}

		validate_http_url("chain.evm_rpc_url", &self.chain.evm_rpc_url)?;
		if let Some(url) = &self.chain.cosmos_rpc_url {
			validate_http_url("chain.cosmos_rpc_url", url)?;
		}
		if let Some(url) = &self.chain.rest_url {
			validate_http_url("chain.rest_url", url)?;
		}
		if self.chain.chain_id == Some(0) {
			return Err(ConfigError::Validation("chain.chain_id cannot be 0".into()));
		}

		if self.account.private_key.is_empty() {
			return Err(ConfigError::Validation(
				"account.private_key cannot be empty".into(),
			));
		}

		let attempts = self.alignment.max_attempts;
		if attempts == 0 || attempts > MAX_ALIGNMENT_ATTEMPTS {
			return Err(ConfigError::Validation(format!(
				"alignment.max_attempts must be between 1 and {}, got {}",
				MAX_ALIGNMENT_ATTEMPTS, attempts
			)));
		}
		if self.alignment.attempt_timeout_seconds == Some(0) {
			return Err(ConfigError::Validation(
				"alignment.attempt_timeout_seconds must be greater than 0".into(),
			));
		}

		if self.load.block_time_ms == 0 {
			return Err(ConfigError::Validation(
				"load.block_time_ms must be greater than 0".into(),
			));
		}

		let confirmation = &self.confirmation;
		if confirmation.poll_interval_ms == 0 {
			return Err(ConfigError::Validation(
				"confirmation.poll_interval_ms must be greater than 0".into(),
			));
		}
		if confirmation.timeout() < confirmation.poll_interval() {
			return Err(ConfigError::Validation(format!(
				"confirmation.timeout_seconds ({}s) is shorter than the poll interval ({}ms)",
				confirmation.timeout_seconds, confirmation.poll_interval_ms
			)));
		}

		if let Some(cli) = &self.cli {
			if cli.binary.trim().is_empty() {
				return Err(ConfigError::Validation("cli.binary cannot be empty".into()));
			}
			if cli.broadcast_args.is_empty() {
				return Err(ConfigError::Validation(
					"cli.broadcast_args cannot be empty".into(),
				));
			}
		}

		Ok(())
	}
}

/// Parses TOML, resolving environment variables first and validating after.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
