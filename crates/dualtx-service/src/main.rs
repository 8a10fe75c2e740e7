//! Command-line entry point for the dual-chain harness.
//!
//! Loads the harness configuration, wires the RPC client, signing account and
//! transaction builder together and runs one subcommand. Results are printed
//! to stdout as JSON; logs go through `tracing`.

use clap::{Parser, Subcommand};
use dualtx_config::Config;
use std::path::PathBuf;

mod commands;

use commands::{CallArgs, Harness};

/// Command-line arguments for the harness.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Issue a raw JSON-RPC call against the EVM endpoint
	Rpc {
		/// Method name, e.g. eth_getBalance
		method: String,
		/// Parameters as a JSON array
		params: Option<String>,
	},
	/// Print the latest EVM block number
	BlockNumber,
	/// Broadcast an already signed transaction
	SendRaw {
		/// 0x-prefixed signed transaction bytes
		signed_tx: String,
	},
	/// Build, sign and broadcast a call, then wait for its receipt
	SignAndSend(CallArgs),
	/// Land a call and the configured Cosmos command in the same block
	Align(CallArgs),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	// stdout carries command output.
	fmt()
		.with_env_filter(env_filter)
		.with_target(true)
		.with_writer(std::io::stderr)
		.init();

	let config_path = args
		.config
		.to_str()
		.ok_or_else(|| format!("Invalid config path: {}", args.config.display()))?;
	let config = Config::from_file(config_path).await?;
	tracing::info!("Loaded configuration [{}]", config.harness.id);

	let harness = Harness::new(config)?;
	let output = match &args.command {
		Command::Rpc { method, params } => harness.rpc(method, params.as_deref()).await?,
		Command::BlockNumber => harness.block_number().await?,
		Command::SendRaw { signed_tx } => harness.send_raw(signed_tx).await?,
		Command::SignAndSend(call) => harness.sign_and_send(call).await?,
		Command::Align(call) => harness.align(call).await?,
	};

	println!("{}", serde_json::to_string_pretty(&output)?);
	Ok(())
}
