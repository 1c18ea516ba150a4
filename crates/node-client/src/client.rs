use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use blob::{Blob, estimate_gas};
use signer::{Signer, TxOptions};
use tokio::time::{Instant, timeout_at};
use tracing::instrument;

use crate::config::ClientConfig;
use crate::error::{ClientError, SubmitError, TransportError};
use crate::transport::NodeTransport;
use crate::tx_signer::TxSigner;
use crate::types::TxResponse;

/// Progress of the latest submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Sent { tx_hash: String },
    /// The node refused the transaction before it reached a block.
    Rejected { tx_hash: String, code: u32 },
    Committed { tx_hash: String, height: u64, code: u32 },
    TimedOut { tx_hash: String },
    TransportFailed { tx_hash: String },
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Sent { .. } => f.write_str("sent"),
            Self::Rejected { .. } => f.write_str("rejected"),
            Self::Committed { .. } => f.write_str("committed"),
            Self::TimedOut { .. } => f.write_str("timed out"),
            Self::TransportFailed { .. } => f.write_str("transport failed"),
        }
    }
}

/// Submits pay-for-blob transactions and waits for them to commit.
///
/// Each call sends the transaction at most once; nothing is retried.
pub struct TxClient {
    transport: Arc<dyn NodeTransport>,
    signer: TxSigner,
    config: ClientConfig,
    state: SubmissionState,
}

impl TxClient {
    #[instrument(skip_all, level = "debug", err)]
    pub async fn setup(
        transport: Arc<dyn NodeTransport>,
        signer: Signer,
        config: ClientConfig,
    ) -> Result<Self, ClientError> {
        let signer = TxSigner::setup(transport.as_ref(), signer).await?;

        Ok(Self::new(transport, signer, config))
    }

    #[must_use]
    pub fn new(transport: Arc<dyn NodeTransport>, signer: TxSigner, config: ClientConfig) -> Self {
        Self {
            transport,
            signer,
            config,
            state: SubmissionState::Idle,
        }
    }

    #[must_use]
    pub const fn signer(&self) -> &TxSigner {
        &self.signer
    }

    #[must_use]
    pub const fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Sign and submit `blobs`, blocking until the transaction commits or the
    /// configured deadline passes.
    ///
    /// A response with a non-zero code is returned as `Ok`: the node answered,
    /// it just refused the transaction.
    #[instrument(skip_all, fields(blobs = blobs.len()), level = "debug")]
    pub async fn submit_pay_for_blob(&mut self, blobs: &[Blob], options: TxOptions) -> Result<TxResponse, SubmitError> {
        if blobs.is_empty() {
            return Err(SubmitError::NoBlobs);
        }

        let gas_limit = options.gas_limit().unwrap_or_else(|| {
            let sizes: Vec<u64> = blobs.iter().map(|b| b.len() as u64).collect();
            estimate_gas(&sizes)
        });

        let (tx_bytes, tx_hash) = self.signer.sign_pay_for_blobs(blobs, gas_limit, &options)?;

        tracing::info!(
            %tx_hash,
            gas_limit,
            gas_price = options.gas_price(),
            sequence = self.signer.sequence(),
            "Submitting pay-for-blob transaction"
        );

        let deadline = deadline_after(self.config.confirm_timeout());
        self.transition(SubmissionState::Sent {
            tx_hash: tx_hash.clone(),
        });

        let broadcast = match timeout_at(deadline, self.transport.broadcast_tx(&tx_bytes)).await {
            Ok(Ok(broadcast)) => broadcast,
            Ok(Err(e)) => return Err(self.transport_failed(tx_hash, e)),
            Err(_) => return Err(self.timed_out(tx_hash)),
        };

        if broadcast.code != 0 {
            self.transition(SubmissionState::Rejected {
                tx_hash,
                code: broadcast.code,
            });
            return Ok(broadcast.into());
        }

        self.signer.increment_sequence();

        // The node indexes the transaction under the hash it reports.
        let tx_hash = if broadcast.tx_hash.is_empty() {
            tx_hash
        } else {
            if broadcast.tx_hash != tx_hash {
                tracing::debug!(local = %tx_hash, node = %broadcast.tx_hash, "Node reported a different tx hash");
            }
            self.transition(SubmissionState::Sent {
                tx_hash: broadcast.tx_hash.clone(),
            });
            broadcast.tx_hash
        };

        match timeout_at(deadline, self.confirm(&tx_hash)).await {
            Ok(Ok(response)) => {
                self.transition(SubmissionState::Committed {
                    tx_hash,
                    height: response.height,
                    code: response.code,
                });
                Ok(response)
            }
            Ok(Err(e)) => Err(self.transport_failed(tx_hash, e)),
            Err(_) => Err(self.timed_out(tx_hash)),
        }
    }

    async fn confirm(&self, tx_hash: &str) -> Result<TxResponse, TransportError> {
        loop {
            if let Some(response) = self.transport.get_tx(tx_hash).await? {
                return Ok(response);
            }

            tracing::debug!(%tx_hash, "Transaction not committed yet");
            tokio::time::sleep(self.config.poll_interval()).await;
        }
    }

    fn transport_failed(&mut self, tx_hash: String, error: TransportError) -> SubmitError {
        self.transition(SubmissionState::TransportFailed { tx_hash });
        SubmitError::Transport(error)
    }

    fn timed_out(&mut self, tx_hash: String) -> SubmitError {
        self.transition(SubmissionState::TimedOut {
            tx_hash: tx_hash.clone(),
        });
        SubmitError::Timeout {
            tx_hash,
            after: self.config.confirm_timeout(),
        }
    }

    fn transition(&mut self, next: SubmissionState) {
        tracing::debug!(from = %self.state, to = %next, "Submission state changed");
        self.state = next;
    }
}

/// Roughly 30 years, the same horizon tokio uses for unbounded timeouts.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();

    now.checked_add(timeout).unwrap_or_else(|| now + FAR_FUTURE)
}

impl fmt::Debug for TxClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TxClient")
            .field("signer", &self.signer)
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
