// Lykos Miner - Free and Open Source Software Statement
//
// This project, lykos-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/miner/mod.rs
// Version: 1.0.0
//
// This file is the module declaration for the compute domain of the Lykos
// miner, located in the miner subdirectory. It declares submodules and
// re-exports key types for use throughout the project.
//
// Tree Location:
// - src/miner/mod.rs (miner module entry point)
// - Submodules: aggregate, controller, engine, prehash, search, stats

pub mod aggregate;
pub mod controller;
pub mod engine;
pub mod prehash;
pub mod search;
pub mod stats;

// Re-export key types for convenience
pub use controller::{MiningState, PuzzleController};
pub use engine::MiningEngine;
pub use prehash::PrehashTable;
pub use search::{SearchBackend, SearchContext, ThreadPoolBackend};
pub use stats::{EngineStats, WorkerStats};
