// Lykos Miner - Free and Open Source Software Statement
//
// This project, lykos-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/lib.rs
// Version: 1.0.0
//
// This file serves as the main library entry point for the Lykos miner,
// located at the root of the source tree. It exports all public modules
// and types that other crates or binaries can use.
//
// Tree Location:
// - src/lib.rs (root library file)
// - Exports modules: core, miner, node, utils

pub mod core;
pub mod miner;
pub mod node;
pub mod utils;

// Re-export commonly used types at the crate root for convenience
pub use crate::core::{MinerError, PuzzleState, Solution, U256};
pub use crate::miner::{MiningEngine, MiningState, PrehashTable, PuzzleController, ThreadPoolBackend};
pub use crate::node::NodeClient;

pub type Result<T> = std::result::Result<T, MinerError>;
