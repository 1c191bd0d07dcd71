// Lykos Miner - Free and Open Source Software Statement
//
// This project, lykos-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/constants.rs
// Version: 1.0.0
//
// Autolykos puzzle parameters and miner tuning knobs, located in the core
// subdirectory. Table and index counts are protocol constants; batch sizing
// is a throughput trade-off only (solutions are astronomically rare, so the
// batch size never affects correctness).

/// Number of prehash table entries (2^26, protocol constant).
pub const N_LEN: usize = 0x0400_0000;

/// Number of table indices summed per nonce (protocol constant).
pub const K_LEN: usize = 32;

/// Message digest / bound / secret key size in bytes.
pub const NUM_SIZE: usize = 32;

/// Compressed public key size in bytes.
pub const PK_SIZE: usize = 33;

/// Nonce size in bytes.
pub const NONCE_SIZE: usize = 8;

/// Hashes evaluated per worker inner step.
pub const H_SIZE: u64 = 4;

/// Default nonces per search batch (one controller evaluation per batch).
pub const BATCH_LEN: u64 = 1_000_000;

/// Solution submission attempts before the failure is surfaced.
pub const MAX_SUBMIT_RETRIES: u32 = 5;

/// Delay between submission retries, in milliseconds.
pub const SUBMIT_RETRY_DELAY_MS: u64 = 500;

/// Delay before re-dialing a dropped node connection, in seconds.
pub const RECONNECT_DELAY_SECS: u64 = 5;
