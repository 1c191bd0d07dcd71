// Lykos Miner - Free and Open Source Software Statement
//
// This project, lykos-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/miner/stats.rs
// Version: 1.0.1
//
// This file implements per-worker and aggregate statistics for the Lykos
// miner, located in the miner subdirectory. The status collaborator polls
// these read-only counters; the engine itself only ever increments them.
//
// Tree Location:
// - src/miner/stats.rs (hashrate counters)
// - Depends on: std, log

use crate::utils::format::FormatUtils;
use log::info;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

const LOG_TARGET: &str = "lykos::stats";

/// Per-worker counters. Written by exactly one worker, read by anyone.
pub struct WorkerStats {
    pub hashes_computed: AtomicU64,
    pub solutions_found: AtomicU64,
    start_time: Instant,
}

impl WorkerStats {
    fn new() -> Self {
        Self {
            hashes_computed: AtomicU64::new(0),
            solutions_found: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn add_hashes(&self, hashes: u64) {
        self.hashes_computed.fetch_add(hashes, Ordering::Relaxed);
    }

    pub fn record_solution(&self) {
        self.solutions_found.fetch_add(1, Ordering::Relaxed);
    }

    /// Average hashrate since startup, in H/s.
    pub fn hashrate(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.hashes_computed.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }
}

/// Aggregate engine statistics: one WorkerStats per search worker plus
/// whole-engine counters.
pub struct EngineStats {
    workers: Vec<WorkerStats>,
    pub batches_completed: AtomicU64,
    pub table_rebuilds: AtomicU64,
    pub solutions_submitted: AtomicU64,
}

impl EngineStats {
    pub fn new(worker_count: usize) -> Self {
        Self {
            workers: (0..worker_count.max(1)).map(|_| WorkerStats::new()).collect(),
            batches_completed: AtomicU64::new(0),
            table_rebuilds: AtomicU64::new(0),
            solutions_submitted: AtomicU64::new(0),
        }
    }

    pub fn worker(&self, id: usize) -> &WorkerStats {
        &self.workers[id % self.workers.len()]
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn total_hashes(&self) -> u64 {
        self.workers
            .iter()
            .map(|w| w.hashes_computed.load(Ordering::Relaxed))
            .sum()
    }

    pub fn total_hashrate(&self) -> f64 {
        self.workers.iter().map(WorkerStats::hashrate).sum()
    }

    /// Periodic one-line dashboard for the log.
    pub fn log_summary(&self) {
        info!(target: LOG_TARGET,
            "Hashrate: {} | hashes: {} | batches: {} | rebuilds: {} | submitted: {}",
            FormatUtils::format_hashrate(self.total_hashrate()),
            FormatUtils::format_number(self.total_hashes()),
            self.batches_completed.load(Ordering::Relaxed),
            self.table_rebuilds.load(Ordering::Relaxed),
            self.solutions_submitted.load(Ordering::Relaxed),
        );
    }
}

// Changelog:
// - v1.0.1: Dropped the per-worker hashrate mutex; the poller derives the
//   rate from the monotonic hash counter instead.
// - v1.0.0: Initial per-worker counters.
