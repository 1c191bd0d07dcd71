// Lykos Miner - Free and Open Source Software Statement
//
// This project, lykos-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/miner/search.rs
// Version: 1.2.1
//
// This file implements the parallel nonce sweep for the Lykos miner, located
// in the miner subdirectory. A search backend takes a batch of sequential
// nonces and returns any solutions; workers are stateless apart from
// read-only access to the shared table and puzzle snapshot, so the same
// contract fits a thread pool, SIMD lanes or a GPU grid.
//
// Tree Location:
// - src/miner/search.rs (search backend trait + thread pool backend)
// - Depends on: crossbeam, log, crate::core, crate::miner

use crate::core::bound::{meets_bound, U256};
use crate::core::constants::{H_SIZE, NUM_SIZE, PK_SIZE};
use crate::core::types::{PuzzleInstance, Solution};
use crate::miner::aggregate::{candidate_value, nonce_bytes, pk_salt};
use crate::miner::prehash::PrehashTable;
use crate::miner::stats::EngineStats;
use log::info;
use std::sync::Arc;

const LOG_TARGET: &str = "lykos::search";

/// Read-only snapshot a batch is searched under. Built once per rehash, then
/// shared by every worker until the controller observes the next change.
pub struct SearchContext {
    pub message: [u8; NUM_SIZE],
    pub bound: U256,
    pub w: [u8; PK_SIZE],
    pub salt: [u8; NUM_SIZE],
    pub table: Arc<PrehashTable>,
}

impl SearchContext {
    pub fn new(instance: &PuzzleInstance, table: Arc<PrehashTable>) -> Self {
        Self {
            message: instance.message,
            bound: instance.bound,
            w: instance.w,
            salt: pk_salt(&instance.public_key),
            table,
        }
    }
}

/// Pluggable parallel-execution backend: batch of nonces in, solutions out.
///
/// Implementations must tolerate no-solution batches as the overwhelmingly
/// common case and must not early-exit the index loop; cancellation is the
/// controller's job and happens only at batch boundaries.
pub trait SearchBackend: Send + Sync {
    /// Human-readable backend name (for logs).
    fn name(&self) -> &'static str;

    /// Search `count` sequential nonces starting at `base_nonce`, recording
    /// hash throughput into `stats`.
    fn search(
        &self,
        ctx: &SearchContext,
        base_nonce: u64,
        count: u64,
        stats: &EngineStats,
    ) -> Vec<Solution>;
}

/// CPU thread-pool backend. The batch is split into contiguous per-worker
/// sub-ranges; workers share nothing but the read-only context.
pub struct ThreadPoolBackend {
    workers: usize,
}

impl ThreadPoolBackend {
    pub fn new(workers: usize) -> Self {
        let workers = if workers == 0 { num_cpus::get() } else { workers };
        Self { workers }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    fn search_range(
        ctx: &SearchContext,
        base: u64,
        count: u64,
        stats: &EngineStats,
        worker_id: usize,
    ) -> Vec<Solution> {
        let mut found = Vec::new();
        let fingerprint = ctx.table.key_fingerprint();
        let mut done = 0u64;

        while done < count {
            let step = H_SIZE.min(count - done);
            for i in 0..step {
                let nonce = base.wrapping_add(done + i);
                let value = candidate_value(&ctx.table, &ctx.message, nonce, &ctx.salt);
                if meets_bound(&value, &ctx.bound) {
                    info!(target: LOG_TARGET,
                        "Worker {} found solution: nonce={:016x}", worker_id, nonce);
                    stats.worker(worker_id).record_solution();
                    found.push(Solution {
                        nonce: nonce_bytes(nonce),
                        w: ctx.w,
                        d: value,
                        key_fingerprint: fingerprint,
                    });
                }
            }
            done += step;
            stats.worker(worker_id).add_hashes(step);
        }

        found
    }
}

impl SearchBackend for ThreadPoolBackend {
    fn name(&self) -> &'static str {
        "cpu-threads"
    }

    fn search(
        &self,
        ctx: &SearchContext,
        base_nonce: u64,
        count: u64,
        stats: &EngineStats,
    ) -> Vec<Solution> {
        if count == 0 {
            return Vec::new();
        }

        let workers = (self.workers as u64).min(count);
        let chunk = count.div_ceil(workers);

        let result = crossbeam::thread::scope(|s| {
            let mut handles = Vec::with_capacity(workers as usize);
            for w in 0..workers {
                // both ends clamped: a trailing worker may get an empty range
                let lo = (w * chunk).min(count);
                let hi = ((w + 1) * chunk).min(count);
                if lo >= hi {
                    continue;
                }
                handles.push(s.spawn(move |_| {
                    Self::search_range(ctx, base_nonce.wrapping_add(lo), hi - lo, stats, w as usize)
                }));
            }

            let mut solutions = Vec::new();
            for handle in handles {
                match handle.join() {
                    Ok(mut part) => solutions.append(&mut part),
                    Err(_) => return Err(()),
                }
            }
            Ok(solutions)
        });

        match result {
            Ok(Ok(solutions)) => solutions,
            // a panicked worker loses its sub-range; the batch yields nothing
            // rather than a partial, possibly inconsistent result
            _ => {
                log::error!(target: LOG_TARGET, "Search worker panicked, batch discarded");
                Vec::new()
            }
        }
    }
}

// Changelog:
// - v1.2.1: Sub-range split clamps both ends so a batch smaller than the
//   worker count can never underflow; per-worker solution counters recorded.
// - v1.2.0: Extracted the SearchBackend trait so the engine loop no longer
//   assumes a thread pool; sub-range split moved behind it.
// - v1.1.0: Per-worker hash counters reported in H_SIZE steps.
// - v1.0.0: Initial single-threaded sweep.
