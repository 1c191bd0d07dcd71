// Lykos Miner - Free and Open Source Software Statement
//
// This project, lykos-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/state.rs
// Version: 1.0.2
//
// Shared puzzle state between the node client and the compute domain,
// located in the core subdirectory. A single writer mutates the instance
// under a mutex held only for the field copy; readers poll the block id
// lock-free and take the lock only when it changed.
//
// Tree Location:
// - src/core/state.rs (shared snapshot + version counter)
// - Depends on: std

use crate::core::bound::U256;
use crate::core::constants::{NUM_SIZE, PK_SIZE};
use crate::core::types::PuzzleInstance;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Fields of an accepted puzzle update. Message and bound always arrive as a
/// pair; the key pair is present only when the node rotated keys.
#[derive(Debug, Clone)]
pub struct PuzzleUpdate {
    pub message: [u8; NUM_SIZE],
    pub bound: U256,
    pub public_key: Option<[u8; PK_SIZE]>,
    pub w: Option<[u8; PK_SIZE]>,
}

/// Shared, lock-plus-atomic guarded record of the current puzzle.
///
/// `block_id` increments exactly once per accepted update and is the cheap
/// cross-thread "has anything changed" signal. The fields it guards are read
/// only after taking the lock when a change is detected, so an observer can
/// never see a new message paired with a stale bound.
pub struct PuzzleState {
    inner: Mutex<PuzzleInstance>,
    block_id: AtomicU64,
}

impl PuzzleState {
    pub fn new(initial: PuzzleInstance) -> Self {
        Self {
            inner: Mutex::new(initial),
            block_id: AtomicU64::new(0),
        }
    }

    /// Lock-free read of the monotonically increasing block identifier.
    #[inline]
    pub fn block_id(&self) -> u64 {
        self.block_id.load(Ordering::Acquire)
    }

    /// Copy the current instance under the lock. Returns the instance and
    /// the block id observed before the copy; the fields may belong to a
    /// newer id, which the caller re-detects on its next poll.
    pub fn snapshot(&self) -> (u64, PuzzleInstance) {
        let id = self.block_id();
        let inst = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        (id, inst)
    }

    /// Apply an accepted update. The lock is held only for the field copy,
    /// never across I/O; the id increment is performed after release so the
    /// guarded fields are already consistent when the signal lands.
    pub fn apply_update(&self, update: &PuzzleUpdate) -> u64 {
        {
            let mut inst = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inst.message = update.message;
            inst.bound = update.bound;
            if let Some(pk) = update.public_key {
                inst.public_key = pk;
                inst.w = update.w.unwrap_or(pk);
            } else if let Some(w) = update.w {
                inst.w = w;
            }
        }
        self.block_id.fetch_add(1, Ordering::Release) + 1
    }

    /// Current public key, for mismatch checks and table fingerprinting.
    pub fn public_key(&self) -> [u8; PK_SIZE] {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .public_key
    }
}

// Changelog:
// - v1.0.2: Lock acquisitions recover from poisoning so a panicking thread
//   can never strand the other domain on shutdown paths.
// - v1.0.1: Update carries optional key material; a plain new-block update
//   with the same key no longer touches the key fields.
// - v1.0.0: Initial snapshot + version counter abstraction.
