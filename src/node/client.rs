// Lykos Miner - Free and Open Source Software Statement
//
// This project, lykos-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/node/client.rs
// Version: 1.2.0
//
// This file implements the node-facing control thread for the Lykos miner,
// located in the node subdirectory. It holds the persistent connection the
// node pushes puzzle updates over, applies accepted updates to the shared
// puzzle state, and forwards found solutions to the reporter. The puzzle
// state lock is never held across network I/O.
//
// Tree Location:
// - src/node/client.rs (node connection + update loop)
// - Depends on: tokio, log, crate::core, crate::node

use crate::core::constants::{PK_SIZE, RECONNECT_DELAY_SECS};
use crate::core::error::MinerError;
use crate::core::state::PuzzleState;
use crate::core::types::{PkPolicy, Solution};
use crate::node::protocol::parse_block_update;
use crate::node::reporter::SolutionReporter;
use log::{error, info, warn};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Mutex;

use crate::miner::stats::EngineStats;

const LOG_TARGET: &str = "lykos::node::client";

/// Decide whether an update whose public key disagrees with the locally
/// derived one may still be applied. `Warn` keeps mining and surfaces the
/// mismatch to the operator; `Reject` returns the typed error so the caller
/// keeps the previous puzzle.
pub fn check_public_key(
    policy: PkPolicy,
    expected: &[u8; PK_SIZE],
    received: &[u8; PK_SIZE],
) -> Result<(), MinerError> {
    if expected == received {
        return Ok(());
    }
    match policy {
        PkPolicy::Warn => {
            // mismatch signals misconfiguration but does not halt mining
            warn!(target: LOG_TARGET,
                "Public key derived from your secret key ({}) does not match \
                 the expected public key ({})",
                hex::encode(expected), hex::encode(received)
            );
            Ok(())
        }
        PkPolicy::Reject => Err(MinerError::PublicKeyMismatch {
            expected: hex::encode(expected),
            received: hex::encode(received),
        }),
    }
}

/// Network-facing collaborator: one connection, one update loop, one
/// submitter task.
pub struct NodeClient {
    node_address: String,
    state: Arc<PuzzleState>,
    pk_policy: PkPolicy,
    stats: Arc<EngineStats>,
}

impl NodeClient {
    pub fn new(
        node_address: String,
        state: Arc<PuzzleState>,
        pk_policy: PkPolicy,
        stats: Arc<EngineStats>,
    ) -> Self {
        Self {
            node_address,
            state,
            pk_policy,
            stats,
        }
    }

    async fn connect(&self) -> Result<TcpStream, MinerError> {
        let stream = TcpStream::connect(&self.node_address).await?;
        info!(target: LOG_TARGET, "Connected to node at {}", self.node_address);
        Ok(stream)
    }

    /// Handle one pushed update line. A malformed line rejects the update
    /// only; the previous puzzle instance stays authoritative.
    fn handle_update_line(&self, line: &str) {
        let (update, received_pk) = match parse_block_update(line) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(target: LOG_TARGET, "Rejected malformed update: {}", e);
                return;
            }
        };

        let local_pk = self.state.public_key();
        if let Err(e) = check_public_key(self.pk_policy, &local_pk, &received_pk) {
            error!(target: LOG_TARGET, "Update rejected (pk-policy=reject): {}", e);
            return;
        }

        let block_id = self.state.apply_update(&update);
        info!(target: LOG_TARGET, "Got new block, id={}", block_id);
    }

    fn start_submitter(
        reporter: SolutionReporter<OwnedWriteHalf>,
        mut solution_rx: UnboundedReceiver<Solution>,
        stats: Arc<EngineStats>,
    ) {
        tokio::spawn(async move {
            while let Some(solution) = solution_rx.recv().await {
                match reporter.report(&solution).await {
                    Ok(()) => {
                        stats.solutions_submitted.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(e) => {
                        // fatal for this solution only; the search keeps going
                        error!(target: LOG_TARGET, "Solution lost: {}", e);
                    }
                }
            }
        });
    }

    /// Run the update loop until the solution channel producer shuts down or
    /// the task is aborted. Reconnects with a bounded delay on drops.
    pub async fn run(
        &self,
        mut solution_rx: UnboundedReceiver<Solution>,
        pk: [u8; PK_SIZE],
    ) -> Result<(), MinerError> {
        loop {
            let stream = match self.connect().await {
                Ok(s) => s,
                Err(e) => {
                    warn!(target: LOG_TARGET,
                        "Node connection failed: {}, retrying in {}s",
                        e, RECONNECT_DELAY_SECS
                    );
                    // surface anything found while disconnected and notice
                    // engine shutdown instead of re-dialing forever
                    loop {
                        match solution_rx.try_recv() {
                            Ok(solution) => error!(target: LOG_TARGET,
                                "Solution lost (no node connection): n={}",
                                hex::encode(solution.nonce)
                            ),
                            Err(TryRecvError::Empty) => break,
                            Err(TryRecvError::Disconnected) => {
                                info!(target: LOG_TARGET, "Engine stopped, closing node client");
                                return Ok(());
                            }
                        }
                    }
                    tokio::time::sleep(Duration::from_secs(RECONNECT_DELAY_SECS)).await;
                    continue;
                }
            };

            let (reader, writer) = stream.into_split();
            let writer = Arc::new(Mutex::new(writer));
            let reporter = SolutionReporter::new(Arc::clone(&writer), pk);

            // drain solutions onto this connection until it drops
            let (conn_tx, conn_rx) = tokio::sync::mpsc::unbounded_channel();
            Self::start_submitter(reporter, conn_rx, Arc::clone(&self.stats));

            let mut lines = BufReader::new(reader).lines();
            loop {
                tokio::select! {
                    line = lines.next_line() => match line {
                        Ok(Some(line)) => self.handle_update_line(&line),
                        Ok(None) => {
                            info!(target: LOG_TARGET, "Node closed connection, reconnecting...");
                            break;
                        }
                        Err(e) => {
                            warn!(target: LOG_TARGET, "Node read error: {}, reconnecting...", e);
                            break;
                        }
                    },
                    solution = solution_rx.recv() => match solution {
                        Some(solution) => {
                            if conn_tx.send(solution).is_err() {
                                warn!(target: LOG_TARGET, "Submitter gone, reconnecting...");
                                break;
                            }
                        }
                        None => {
                            info!(target: LOG_TARGET, "Engine stopped, closing node client");
                            return Ok(());
                        }
                    },
                }
            }

            tokio::time::sleep(Duration::from_secs(RECONNECT_DELAY_SECS)).await;
        }
    }
}

// Changelog:
// - v1.2.0: Public key policy decision extracted into check_public_key; the
//   reject path now carries the typed mismatch error.
// - v1.1.0: Submissions routed per-connection so a reconnect cannot write to
//   a dead socket; pk mismatch policy moved here from the parser.
// - v1.0.0: Initial persistent JSON-lines update loop with reconnect.
