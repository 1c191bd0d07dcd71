// Lykos Miner - Free and Open Source Software Statement
//
// This project, lykos-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/error.rs
// Version: 1.0.1
//
// Error taxonomy for the Lykos miner, located in the core subdirectory.
// Transient I/O and protocol mismatches are warnings at the call sites;
// allocation failure is the only error that terminates the process, since
// the engine cannot make progress without its prehash table.
//
// Tree Location:
// - src/core/error.rs (error types)
// - Depends on: thiserror

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MinerError {
    /// Malformed or incomplete puzzle update. The update is rejected and the
    /// previous puzzle instance remains authoritative.
    #[error("invalid puzzle update: {0}")]
    InvalidUpdate(String),

    /// Received public key does not match the locally derived one and the
    /// pk policy is set to reject.
    #[error("public key mismatch: expected {expected}, received {received}")]
    PublicKeyMismatch { expected: String, received: String },

    /// Host memory allocation for the prehash table failed. Fatal.
    #[error("prehash table allocation failed ({entries} entries)")]
    TableAlloc { entries: usize },

    /// A search or build worker panicked.
    #[error("compute worker panicked")]
    WorkerPanic,

    /// Solution submission failed after exhausting all retries. Fatal for
    /// that solution, not for the process.
    #[error("solution submission failed after {attempts} attempts")]
    SubmitExhausted { attempts: u32 },

    #[error("hex decode: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: {0}")]
    Config(String),
}

// Changelog:
// - v1.0.1: Added SubmitExhausted so the reporter can surface retry failure
//   without killing the search loop.
// - v1.0.0: Initial taxonomy split out of ad hoc string errors.
