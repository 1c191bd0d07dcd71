// Lykos Miner - Free and Open Source Software Statement
//
// This project, lykos-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/miner/controller.rs
// Version: 1.1.0
//
// This file implements the puzzle controller state machine for the Lykos
// miner, located in the miner subdirectory. Once per sweep iteration it
// decides whether to keep searching, rebuild the prehash table, restart the
// sweep with new puzzle parameters, or stop. The transition function is free
// of I/O so it can be unit-tested against a bare PuzzleState.
//
// Tree Location:
// - src/miner/controller.rs (finite state machine)
// - Depends on: crate::core

use crate::core::constants::PK_SIZE;
use crate::core::state::PuzzleState;
use crate::core::types::PuzzleInstance;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Controller decision for one sweep iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiningState {
    /// Keep searching with the current table and instance.
    Continue,
    /// Public key changed (or first run): rebuild the prehash table.
    Keygen,
    /// Message/bound changed with the key unchanged: restart the sweep,
    /// table reused.
    Rehash,
    /// Shutdown requested; terminates the loop regardless of anything else.
    Interrupt,
}

/// Evaluates transitions by comparing its cached block id and key against
/// the shared PuzzleState. Keygen latches a pending rehash: a key change
/// always implies the sweep must also restart once the rebuild completes.
pub struct PuzzleController {
    cached_block_id: u64,
    cached_key: Option<[u8; PK_SIZE]>,
    instance: Option<PuzzleInstance>,
    pending_rehash: bool,
    interrupt: Arc<AtomicBool>,
}

impl PuzzleController {
    /// Initial state is Keygen: the first evaluation always forces a table
    /// build before any sweep starts.
    pub fn new(interrupt: Arc<AtomicBool>) -> Self {
        Self {
            cached_block_id: 0,
            cached_key: None,
            instance: None,
            pending_rehash: false,
            interrupt,
        }
    }

    /// The puzzle snapshot the current sweep runs under. None until the
    /// first Keygen/Rehash copied one.
    pub fn instance(&self) -> Option<&PuzzleInstance> {
        self.instance.as_ref()
    }

    /// Evaluate one transition. Reads the block id lock-free; takes the
    /// state lock only when the id moved (or on first run), so network
    /// latency never stalls the sweep beyond the bounded snapshot copy.
    pub fn evaluate(&mut self, state: &PuzzleState) -> MiningState {
        if self.interrupt.load(Ordering::Relaxed) {
            return MiningState::Interrupt;
        }

        if self.pending_rehash {
            self.pending_rehash = false;
            return MiningState::Rehash;
        }

        let observed = state.block_id();
        if self.cached_key.is_some() && observed == self.cached_block_id {
            return MiningState::Continue;
        }

        let (id, instance) = state.snapshot();
        self.cached_block_id = id;
        let key_changed = self.cached_key != Some(instance.public_key);
        self.cached_key = Some(instance.public_key);
        self.instance = Some(instance);

        if key_changed {
            self.pending_rehash = true;
            MiningState::Keygen
        } else {
            MiningState::Rehash
        }
    }
}

// Changelog:
// - v1.1.0: Keygen latches a pending Rehash instead of the loop special-
//   casing the fall-through; transitions now testable without the engine.
// - v1.0.0: Initial enum + ad hoc loop port.
