// Lykos Miner - Free and Open Source Software Statement
//
// This project, lykos-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/mod.rs
// Version: 1.0.0
//
// This file is the module declaration for the core functionality of the
// Lykos miner, located in the core subdirectory. It declares submodules and
// re-exports key types for use throughout the project.

pub mod blake2b;
pub mod bound;
pub mod constants;
pub mod error;
pub mod state;
pub mod types;

// Re-export the most commonly used items
pub use blake2b::{blake2b256, blake2b256_keyed, Blake2b256};
pub use bound::{meets_bound, parse_bound_dec, value_from_digest, U256};
pub use error::MinerError;
pub use state::{PuzzleState, PuzzleUpdate};
pub use types::{Args, Config, PkPolicy, PuzzleInstance, Solution};
