// Lykos Miner - Free and Open Source Software Statement
//
// This project, lykos-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/miner/engine.rs
// Version: 1.1.2
//
// This file implements the compute-domain driver loop for the Lykos miner,
// located in the miner subdirectory. Once per batch it consults the puzzle
// controller, rebuilds the prehash table or refreshes the search snapshot as
// needed, then hands the batch to the search backend. Found solutions go to
// the reporter over a channel; the loop never blocks on the network.
//
// Tree Location:
// - src/miner/engine.rs (engine driver loop)
// - Depends on: tokio, rand, log, crate::core, crate::miner

use crate::core::constants::PK_SIZE;
use crate::core::error::MinerError;
use crate::core::state::PuzzleState;
use crate::core::types::Solution;
use crate::miner::controller::{MiningState, PuzzleController};
use crate::miner::prehash::PrehashTable;
use crate::miner::search::{SearchBackend, SearchContext};
use crate::miner::stats::EngineStats;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

const LOG_TARGET: &str = "lykos::engine";

/// Compute-domain driver. Owns the controller and the table; shares the
/// puzzle state with the node client and the stats with the telemetry
/// collaborator.
pub struct MiningEngine<B: SearchBackend> {
    state: Arc<PuzzleState>,
    backend: B,
    stats: Arc<EngineStats>,
    interrupt: Arc<AtomicBool>,
    keep_prehash: bool,
    table_len: usize,
    batch_len: u64,
    build_workers: usize,
}

impl<B: SearchBackend> MiningEngine<B> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        state: Arc<PuzzleState>,
        backend: B,
        stats: Arc<EngineStats>,
        interrupt: Arc<AtomicBool>,
        keep_prehash: bool,
        table_len: usize,
        batch_len: u64,
        build_workers: usize,
    ) -> Self {
        Self {
            state,
            backend,
            stats,
            interrupt,
            keep_prehash,
            table_len,
            batch_len,
            build_workers,
        }
    }

    /// Whether a Keygen transition may keep the current table: only when
    /// keepPrehash is set and the table fingerprint still matches the key.
    fn table_reusable(&self, table: Option<&Arc<PrehashTable>>, pk: &[u8; PK_SIZE]) -> bool {
        self.keep_prehash && table.is_some_and(|t| t.matches_key(pk))
    }

    /// Run the sweep loop until interrupted. Returns an error only on the
    /// fatal resource-exhaustion path (table allocation).
    pub fn run(&self, solution_tx: UnboundedSender<Solution>) -> Result<(), MinerError> {
        let mut controller = PuzzleController::new(Arc::clone(&self.interrupt));
        let mut table: Option<Arc<PrehashTable>> = None;
        let mut ctx: Option<SearchContext> = None;
        let mut base_nonce: u64 = rand::random();

        info!(target: LOG_TARGET,
            "Engine started: backend={}, batch={}, table={} entries",
            self.backend.name(), self.batch_len, self.table_len
        );

        loop {
            match controller.evaluate(&self.state) {
                MiningState::Interrupt => {
                    info!(target: LOG_TARGET, "Interrupt observed, stopping after current batch");
                    break;
                }
                MiningState::Keygen => {
                    let instance = match controller.instance() {
                        Some(inst) => inst,
                        None => continue,
                    };
                    if self.table_reusable(table.as_ref(), &instance.public_key) {
                        info!(target: LOG_TARGET, "Key unchanged, keeping prehash table");
                    } else {
                        let built = PrehashTable::build(
                            &instance.public_key,
                            self.table_len,
                            self.build_workers,
                        )?;
                        table = Some(Arc::new(built));
                        self.stats.table_rebuilds.fetch_add(1, Ordering::Relaxed);
                    }
                    // controller falls through to Rehash on the next pass
                    ctx = None;
                    continue;
                }
                MiningState::Rehash => {
                    let (Some(instance), Some(t)) = (controller.instance(), table.as_ref()) else {
                        continue;
                    };
                    debug!(target: LOG_TARGET, "New puzzle instance, restarting sweep");
                    ctx = Some(SearchContext::new(instance, Arc::clone(t)));
                    base_nonce = rand::random();
                }
                MiningState::Continue => {}
            }

            let Some(active) = ctx.as_ref() else {
                std::thread::sleep(Duration::from_millis(50));
                continue;
            };

            // a zero bound means no puzzle has arrived yet; nothing can beat it
            if active.bound.is_zero() {
                std::thread::sleep(Duration::from_millis(50));
                continue;
            }

            let solutions = self
                .backend
                .search(active, base_nonce, self.batch_len, &self.stats);
            base_nonce = base_nonce.wrapping_add(self.batch_len);
            self.stats.batches_completed.fetch_add(1, Ordering::Relaxed);

            for solution in solutions {
                if solution_tx.send(solution).is_err() {
                    warn!(target: LOG_TARGET, "Solution channel closed, dropping result");
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bound::U256;
    use crate::core::types::PuzzleInstance;
    use crate::miner::search::ThreadPoolBackend;

    fn test_engine(keep_prehash: bool) -> MiningEngine<ThreadPoolBackend> {
        let instance = PuzzleInstance {
            message: [0u8; 32],
            bound: U256::zero(),
            secret_key: [1u8; 32],
            public_key: [2u8; 33],
            w: [2u8; 33],
        };
        MiningEngine::new(
            Arc::new(PuzzleState::new(instance)),
            ThreadPoolBackend::new(1),
            Arc::new(EngineStats::new(1)),
            Arc::new(AtomicBool::new(false)),
            keep_prehash,
            64,
            64,
            1,
        )
    }

    #[test]
    fn keep_prehash_reuses_matching_table() {
        let pk = [2u8; 33];
        let table = Arc::new(PrehashTable::build(&pk, 64, 1).unwrap());

        assert!(test_engine(true).table_reusable(Some(&table), &pk));
        assert!(
            !test_engine(false).table_reusable(Some(&table), &pk),
            "Reuse requires the keepPrehash flag"
        );
    }

    #[test]
    fn keep_prehash_never_reuses_stale_table() {
        let pk = [2u8; 33];
        let other = [3u8; 33];
        let table = Arc::new(PrehashTable::build(&pk, 64, 1).unwrap());

        assert!(
            !test_engine(true).table_reusable(Some(&table), &other),
            "A table built under another key must be rebuilt"
        );
        assert!(!test_engine(true).table_reusable(None, &pk));
    }
}

// Changelog:
// - v1.1.2: Table-reuse decision extracted into table_reusable.
// - v1.1.1: Zero-bound batches are skipped instead of burning CPU before the
//   first node update arrives.
// - v1.1.0: keepPrehash honored on Keygen when the table fingerprint still
//   matches the new key.
// - v1.0.0: Initial driver loop.
