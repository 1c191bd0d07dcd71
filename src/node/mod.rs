// Lykos Miner - Free and Open Source Software Statement
//
// This project, lykos-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/node/mod.rs
// Version: 1.0.0
//
// This file is the module declaration for the node communication
// functionality of the Lykos miner, located in the node subdirectory. It
// declares submodules and re-exports key types for use throughout the
// project.
//
// Tree Location:
// - src/node/mod.rs (node module entry point)
// - Submodules: client, protocol, reporter

pub mod client;
pub mod protocol;
pub mod reporter;

// Re-export key types for convenience
pub use client::{check_public_key, NodeClient};
pub use reporter::SolutionReporter;
