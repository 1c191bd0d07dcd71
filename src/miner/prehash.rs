// Lykos Miner - Free and Open Source Software Statement
//
// This project, lykos-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/miner/prehash.rs
// Version: 1.1.0
//
// This file implements the prehash table for the Lykos miner, located in the
// miner subdirectory. The table amortizes hash cost across the nonce search:
// one 256-bit entry per index, keyed by the miner's public key. Entries have
// no inter-entry dependency, so the build fans out across all workers.
//
// Tree Location:
// - src/miner/prehash.rs (prehash table build and lookup)
// - Depends on: crossbeam, log, crate::core

use crate::core::blake2b::blake2b256;
use crate::core::bound::{value_from_digest, U256};
use crate::core::constants::{NUM_SIZE, PK_SIZE};
use crate::core::error::MinerError;
use log::{debug, info};
use std::time::Instant;

const LOG_TARGET: &str = "lykos::prehash";

/// Value of table entry `i` under public key `pk`.
#[inline]
fn entry_value(pk: &[u8; PK_SIZE], i: u32) -> U256 {
    let mut input = [0u8; 4 + PK_SIZE];
    input[..4].copy_from_slice(&i.to_le_bytes());
    input[4..].copy_from_slice(pk);
    value_from_digest(&blake2b256(&input))
}

/// Immutable array of 256-bit prehash entries. Built once per public key and
/// shared read-only by all search workers; a rebuild produces a whole new
/// table, so readers never observe a partially rebuilt one.
pub struct PrehashTable {
    entries: Vec<U256>,
    key_fingerprint: [u8; NUM_SIZE],
}

impl PrehashTable {
    /// Build the full table for `pk` with `n` entries across `workers`
    /// threads. Allocation failure is fatal to the caller: the engine cannot
    /// make progress without its table.
    pub fn build(pk: &[u8; PK_SIZE], n: usize, workers: usize) -> Result<Self, MinerError> {
        let started = Instant::now();
        let workers = workers.max(1);

        let mut entries: Vec<U256> = Vec::new();
        entries
            .try_reserve_exact(n)
            .map_err(|_| MinerError::TableAlloc { entries: n })?;
        entries.resize(n, U256::zero());

        let chunk = n.div_ceil(workers);
        crossbeam::thread::scope(|s| {
            for (w, slice) in entries.chunks_mut(chunk).enumerate() {
                let base = w * chunk;
                s.spawn(move |_| {
                    for (j, entry) in slice.iter_mut().enumerate() {
                        *entry = entry_value(pk, (base + j) as u32);
                    }
                });
            }
        })
        .map_err(|_| MinerError::WorkerPanic)?;

        let key_fingerprint = blake2b256(pk);
        info!(target: LOG_TARGET,
            "Prehash table built: {} entries, {} workers, {:.2}s",
            n, workers, started.elapsed().as_secs_f64()
        );
        debug!(target: LOG_TARGET, "Table key fingerprint: {}", hex::encode(key_fingerprint));

        Ok(Self {
            entries,
            key_fingerprint,
        })
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline(always)]
    pub fn get(&self, idx: usize) -> U256 {
        self.entries[idx]
    }

    /// BLAKE2b-256 of the public key the table was built under. Submissions
    /// carry this so a stale candidate is never submitted blindly.
    pub fn key_fingerprint(&self) -> [u8; NUM_SIZE] {
        self.key_fingerprint
    }

    /// Whether this table is still valid for `pk`.
    pub fn matches_key(&self, pk: &[u8; PK_SIZE]) -> bool {
        self.key_fingerprint == blake2b256(pk)
    }
}

// Changelog:
// - v1.1.0: Build parallelized over disjoint entry chunks with crossbeam
//   scoped threads; allocation switched to try_reserve_exact so OOM surfaces
//   as a typed error instead of an abort.
// - v1.0.0: Initial sequential table build.
