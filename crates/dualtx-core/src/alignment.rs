//! Best-effort block alignment of an EVM and a Cosmos transaction.
//!
//! Each attempt submits both transactions, waits for the EVM receipt and
//! compares the EVM block number with the Cosmos height. On a miss the side
//! that landed earlier is held back on the next attempt by
//! `trailing_delay_step * attempt`. There is no rollback: after a miss both
//! transactions stay on chain in their respective blocks.

use dualtx_config::AlignmentSettings;
use dualtx_types::{
	truncate_id, AlignmentAttempt, AlignmentResult, Bias, ChainSide, CosmosSubmitter,
	CosmosTxResponse, EvmReceipt, EvmSubmitter, SubmissionError,
};
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, timeout};
use tracing::instrument;

/// Retry policy for [`BlockAligner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentConfig {
	/// Number of attempts before giving up. Zero gives up immediately.
	pub max_attempts: u32,
	/// Pause between a miss and the next attempt.
	pub retry_delay: Duration,
	/// Hold-back unit for the earlier side, multiplied by the attempt number.
	pub trailing_delay_step: Duration,
	/// Bound on one attempt, confirmation included.
	pub attempt_timeout: Option<Duration>,
}

impl Default for AlignmentConfig {
	fn default() -> Self {
		Self {
			max_attempts: 5,
			retry_delay: Duration::from_secs(1),
			trailing_delay_step: Duration::from_millis(100),
			attempt_timeout: None,
		}
	}
}

impl From<&AlignmentSettings> for AlignmentConfig {
	fn from(settings: &AlignmentSettings) -> Self {
		Self {
			max_attempts: settings.max_attempts,
			retry_delay: settings.retry_delay(),
			trailing_delay_step: settings.trailing_delay_step(),
			attempt_timeout: settings.attempt_timeout(),
		}
	}
}

/// Errors that can occur while aligning submissions.
#[derive(Debug, Error)]
pub enum AlignmentError {
	/// Every attempt landed the two transactions in different blocks.
	#[error("Failed to include both transactions in the same block after {attempts} attempts")]
	Exhausted { attempts: u32 },
	/// The EVM submitter or its confirmation failed. Not retried.
	#[error("EVM submission failed: {0}")]
	Evm(#[source] SubmissionError),
	/// The Cosmos submitter failed. Not retried.
	#[error("Cosmos submission failed: {0}")]
	Cosmos(#[source] SubmissionError),
	/// An attempt exceeded the configured timeout. Not retried.
	#[error("Alignment attempt {attempt} timed out")]
	AttemptTimedOut { attempt: u32 },
}

/// Drives paired submissions until they share a block height.
#[derive(Debug, Clone, Default)]
pub struct BlockAligner {
	config: AlignmentConfig,
}

impl BlockAligner {
	pub fn new(config: AlignmentConfig) -> Self {
		Self { config }
	}

	pub fn config(&self) -> &AlignmentConfig {
		&self.config
	}

	/// Submits through `evm` and `cosmos` until both land in the same block.
	///
	/// Each submitter is invoked exactly once per attempt taken. Bias is
	/// local to this call.
	#[instrument(skip_all, fields(max_attempts = self.config.max_attempts))]
	pub async fn send_until_same_block(
		&self,
		evm: &dyn EvmSubmitter,
		cosmos: &dyn CosmosSubmitter,
	) -> Result<AlignmentResult, AlignmentError> {
		let max_attempts = self.config.max_attempts;
		let mut bias = Bias::Unknown;
		let mut history = Vec::new();

		for attempt in 1..=max_attempts {
			let run = self.run_attempt(attempt, bias, evm, cosmos);
			let (evm_receipt, cosmos_response, record) = match self.config.attempt_timeout {
				Some(limit) => timeout(limit, run)
					.await
					.map_err(|_| AlignmentError::AttemptTimedOut { attempt })??,
				None => run.await?,
			};
			history.push(record);

			let evm_block = evm_receipt.block_number;
			let cosmos_height = cosmos_response.height;
			match Bias::from_heights(evm_block, cosmos_height) {
				None => {
					tracing::info!(
						attempt,
						height = evm_block,
						evm_tx = %truncate_id(&evm_receipt.transaction_hash),
						cosmos_tx = %truncate_id(&cosmos_response.txhash),
						"Transactions landed in the same block"
					);
					return Ok(AlignmentResult {
						evm_receipt,
						cosmos_response,
						attempts: history,
					});
				},
				Some(next) => {
					tracing::warn!(
						attempt,
						evm_block,
						cosmos_height,
						"Transactions landed in different blocks"
					);
					bias = next;
				},
			}

			if attempt < max_attempts {
				sleep(self.config.retry_delay).await;
			}
		}

		Err(AlignmentError::Exhausted {
			attempts: max_attempts,
		})
	}

	async fn run_attempt(
		&self,
		attempt: u32,
		bias: Bias,
		evm: &dyn EvmSubmitter,
		cosmos: &dyn CosmosSubmitter,
	) -> Result<(EvmReceipt, CosmosTxResponse, AlignmentAttempt), AlignmentError> {
		let delayed = bias.delayed_side();
		let delay = match delayed {
			Some(side) => {
				let delay = self.config.trailing_delay_step * attempt;
				tracing::debug!(
					attempt,
					%side,
					delay_ms = delay.as_millis() as u64,
					"Holding back submission"
				);
				delay
			},
			None => Duration::ZERO,
		};
		let delay_for = |side: ChainSide| {
			if delayed == Some(side) {
				delay
			} else {
				Duration::ZERO
			}
		};

		let (pending, cosmos_response) = tokio::try_join!(
			async {
				hold(delay_for(ChainSide::Evm)).await;
				evm.submit().await.map_err(AlignmentError::Evm)
			},
			async {
				hold(delay_for(ChainSide::Cosmos)).await;
				cosmos.submit().await.map_err(AlignmentError::Cosmos)
			},
		)?;

		let evm_receipt = pending.confirm().await.map_err(AlignmentError::Evm)?;
		let record = AlignmentAttempt {
			attempt,
			bias,
			delayed,
			delay,
			evm_block: evm_receipt.block_number,
			cosmos_height: cosmos_response.height,
		};
		Ok((evm_receipt, cosmos_response, record))
	}
}

async fn hold(delay: Duration) {
	if !delay.is_zero() {
		sleep(delay).await;
	}
}
