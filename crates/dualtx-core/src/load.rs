//! Dual-chain load driver.
//!
//! Splits a user set between the two execution layers and, round after
//! round, sends one transfer per user on its layer until the configured
//! duration has elapsed. The duration is only checked between rounds, so a
//! run may overshoot it by one round.

use dualtx_config::LoadSettings;
use dualtx_types::{CosmosTransfer, CosmosTxResponse, EvmReceipt, EvmTransfer, SubmissionError};
use futures::future::try_join_all;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, Instant};
use tracing::instrument;

/// Pacing of a load run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadConfig {
	/// Rounds keep starting until this much time has passed.
	pub duration: Duration,
	/// Pause after each round.
	pub block_time: Duration,
}

impl Default for LoadConfig {
	fn default() -> Self {
		Self {
			duration: Duration::from_secs(20),
			block_time: Duration::from_millis(200),
		}
	}
}

impl From<&LoadSettings> for LoadConfig {
	fn from(settings: &LoadSettings) -> Self {
		Self {
			duration: settings.duration(),
			block_time: settings.block_time(),
		}
	}
}

/// Errors that abort a load run.
#[derive(Debug, Error)]
pub enum LoadError {
	#[error("EVM transfer for {user} failed: {source}")]
	Evm {
		user: String,
		source: SubmissionError,
	},
	#[error("Cosmos transfer for {user} failed: {source}")]
	Cosmos {
		user: String,
		source: SubmissionError,
	},
}

/// Everything collected during a load run, in round order and then user order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
	pub evm_receipts: Vec<EvmReceipt>,
	pub cosmos_responses: Vec<CosmosTxResponse>,
	pub rounds: u32,
}

/// Generates concurrent EVM and Cosmos traffic for `config.duration`.
///
/// The first `ceil(n / 2)` users transfer through `evm`, the rest through
/// `cosmos`. Within a round every EVM transfer is submitted and confirmed
/// concurrently with every Cosmos transfer. The first failure aborts the run.
#[instrument(
	skip_all,
	fields(users = users.len(), duration_ms = config.duration.as_millis() as u64)
)]
pub async fn send_cosmos_evm_txs(
	evm: &dyn EvmTransfer,
	cosmos: &dyn CosmosTransfer,
	users: &[String],
	config: &LoadConfig,
) -> Result<LoadReport, LoadError> {
	let (evm_users, cosmos_users) = users.split_at(users.len().div_ceil(2));
	let mut report = LoadReport::default();
	let start = Instant::now();

	while start.elapsed() < config.duration {
		let evm_round = try_join_all(evm_users.iter().map(|user| async move {
			let pending = evm.transfer(user).await.map_err(|source| LoadError::Evm {
				user: user.clone(),
				source,
			})?;
			pending.confirm().await.map_err(|source| LoadError::Evm {
				user: user.clone(),
				source,
			})
		}));
		let cosmos_round = try_join_all(cosmos_users.iter().map(|user| async move {
			cosmos
				.transfer(user)
				.await
				.map_err(|source| LoadError::Cosmos {
					user: user.clone(),
					source,
				})
		}));

		let (receipts, responses) = tokio::try_join!(evm_round, cosmos_round)?;
		report.evm_receipts.extend(receipts);
		report.cosmos_responses.extend(responses);
		report.rounds += 1;
		tracing::debug!(round = report.rounds, "Load round complete");

		sleep(config.block_time).await;
	}

	tracing::info!(
		rounds = report.rounds,
		evm_receipts = report.evm_receipts.len(),
		cosmos_responses = report.cosmos_responses.len(),
		"Load run finished"
	);
	Ok(report)
}
