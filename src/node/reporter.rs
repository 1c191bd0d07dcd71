// Lykos Miner - Free and Open Source Software Statement
//
// This project, lykos-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/node/reporter.rs
// Version: 1.0.1
//
// This file implements solution submission for the Lykos miner, located in
// the node subdirectory. Each solution is serialized once and written to the
// node connection with a bounded retry policy; no solution is ever silently
// dropped, and retry exhaustion is surfaced to the operator as fatal for
// that solution only.
//
// Tree Location:
// - src/node/reporter.rs (solution submission with retries)
// - Depends on: tokio, log, crate::core, crate::node::protocol

use crate::core::constants::{MAX_SUBMIT_RETRIES, PK_SIZE, SUBMIT_RETRY_DELAY_MS};
use crate::core::error::MinerError;
use crate::core::types::Solution;
use crate::node::protocol::{create_submit_request, to_message};
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

const LOG_TARGET: &str = "lykos::node::reporter";

/// Submits solutions over a shared node connection writer. Generic over the
/// writer so tests can substitute an in-memory pipe.
pub struct SolutionReporter<W: AsyncWrite + Unpin + Send> {
    writer: Arc<Mutex<W>>,
    pk: [u8; PK_SIZE],
}

impl<W: AsyncWrite + Unpin + Send> SolutionReporter<W> {
    pub fn new(writer: Arc<Mutex<W>>, pk: [u8; PK_SIZE]) -> Self {
        Self { writer, pk }
    }

    /// Serialize and submit one solution, retrying transport failures up to
    /// MAX_SUBMIT_RETRIES times before surfacing the failure.
    pub async fn report(&self, solution: &Solution) -> Result<(), MinerError> {
        let message = to_message(create_submit_request(&self.pk, solution));
        if message.is_empty() {
            return Err(MinerError::InvalidUpdate("empty submission".into()));
        }

        for attempt in 1..=MAX_SUBMIT_RETRIES {
            let result = {
                let mut writer = self.writer.lock().await;
                match writer.write_all(message.as_bytes()).await {
                    Ok(()) => writer.flush().await,
                    Err(e) => Err(e),
                }
            };

            match result {
                Ok(()) => {
                    info!(target: LOG_TARGET,
                        "Submitted solution: n={}, d={} (attempt {})",
                        hex::encode(solution.nonce), solution.d, attempt
                    );
                    return Ok(());
                }
                Err(e) => {
                    warn!(target: LOG_TARGET,
                        "Submission attempt {}/{} failed: {}",
                        attempt, MAX_SUBMIT_RETRIES, e
                    );
                    if attempt < MAX_SUBMIT_RETRIES {
                        tokio::time::sleep(Duration::from_millis(SUBMIT_RETRY_DELAY_MS)).await;
                    }
                }
            }
        }

        error!(target: LOG_TARGET,
            "Dropping solution n={} after {} failed attempts",
            hex::encode(solution.nonce), MAX_SUBMIT_RETRIES
        );
        Err(MinerError::SubmitExhausted {
            attempts: MAX_SUBMIT_RETRIES,
        })
    }
}

// Changelog:
// - v1.0.1: Writer made generic for in-memory pipe tests; flush added after
//   each write so a buffered connection cannot hold a solution back.
// - v1.0.0: Initial bounded-retry submission.
