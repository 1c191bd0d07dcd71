// Lykos Miner - Free and Open Source Software Statement
//
// This project, lykos-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/types.rs
// Version: 1.1.1
//
// This file defines core data structures for the Lykos miner, located in the
// core subdirectory. It includes types for command-line arguments, the JSON
// config file, the shared puzzle instance, and found solutions.
//
// Tree Location:
// - src/core/types.rs (core data structures)
// - Depends on: clap, serde

use crate::core::bound::U256;
use crate::core::constants::{BATCH_LEN, NONCE_SIZE, NUM_SIZE, PK_SIZE};
use crate::core::error::MinerError;
use clap::Parser;
use serde::{Deserialize, Serialize};

/// Policy for handling a received public key that disagrees with the locally
/// derived one. The original behavior is `Warn` (keep mining, surface an
/// operator-visible warning); `Reject` keeps the previous puzzle instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PkPolicy {
    Warn,
    Reject,
}

/// Command-line arguments for the Lykos miner
#[derive(Parser, Debug)]
#[command(
    name = "lykos-miner",
    version = "0.3.0",
    about = "High-performance Autolykos (BLAKE2b-256) CPU miner",
    long_about = "Lykos Miner searches the Autolykos nonce space against puzzles pushed\n\
                  by a node over a persistent JSON connection.\n\n\
                  Examples:\n\
                    Mining: lykos --config config.json\n\
                    Override node: lykos --config config.json --node 127.0.0.1:9052\n\
                    Small rig: lykos --config config.json --threads 4 --batch 250000"
)]
pub struct Args {
    /// Path to the JSON config file (secret seed, node address, keepPrehash)
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        default_value = "config.json",
        help = "Config file path"
    )]
    pub config: String,

    /// Node address override in format host:port
    #[arg(long, value_name = "HOST:PORT", help = "Node address (overrides config)")]
    pub node: Option<String>,

    /// Number of search workers. 0 = auto-detect.
    #[arg(
        short,
        long,
        default_value = "0",
        value_name = "COUNT",
        help = "Number of search workers (0 = auto-detect)"
    )]
    pub threads: usize,

    /// Nonces per search batch (controller evaluates once per batch)
    #[arg(
        long,
        default_value_t = BATCH_LEN,
        value_name = "COUNT",
        help = "Nonces per search batch"
    )]
    pub batch: u64,

    /// Keep the prehash table across reconnects when the key is unchanged
    #[arg(long, default_value = "false", help = "Reuse prehash table when key unchanged")]
    pub keep_prehash: bool,

    /// What to do when the node's public key disagrees with the derived one
    #[arg(
        long,
        value_enum,
        default_value = "warn",
        help = "Public key mismatch policy [warn|reject]"
    )]
    pub pk_policy: PkPolicy,
}

/// JSON config file contents, matching the original miner's key names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Hex-encoded 32-byte secret key seed
    pub seed: String,

    /// Node address (host:port)
    pub node: String,

    /// Keep the prehash table in memory across reconnects
    #[serde(rename = "keepPrehash", default)]
    pub keep_prehash: bool,

    /// Hex-encoded 33-byte compressed public key derived from the seed.
    /// Key derivation itself is the wallet collaborator's job.
    pub pk: String,
}

impl Config {
    /// Parse and validate the config file contents.
    pub fn from_json(raw: &str) -> Result<Self, MinerError> {
        let cfg: Config = serde_json::from_str(raw)?;
        cfg.secret_key()?;
        cfg.public_key()?;
        if !cfg.node.contains(':') {
            return Err(MinerError::Config("node must be in host:port form".into()));
        }
        Ok(cfg)
    }

    pub fn secret_key(&self) -> Result<[u8; NUM_SIZE], MinerError> {
        let bytes = hex::decode(&self.seed)?;
        bytes
            .as_slice()
            .try_into()
            .map_err(|_| MinerError::Config("seed must be 32 hex-encoded bytes".into()))
    }

    pub fn public_key(&self) -> Result<[u8; PK_SIZE], MinerError> {
        let bytes = hex::decode(&self.pk)?;
        bytes
            .as_slice()
            .try_into()
            .map_err(|_| MinerError::Config("pk must be 33 hex-encoded bytes".into()))
    }
}

/// The current puzzle, written by the node client and snapshotted by the
/// compute domain. `message` and `bound` are only ever updated together
/// under the same lock acquisition.
#[derive(Debug, Clone)]
pub struct PuzzleInstance {
    /// 32-byte message digest for this block
    pub message: [u8; NUM_SIZE],

    /// Difficulty bound; a candidate value must be strictly below it
    pub bound: U256,

    /// Miner's secret key (held for the signing collaborator, unused by the
    /// search itself)
    pub secret_key: [u8; NUM_SIZE],

    /// Miner's compressed public key; keys the prehash table
    pub public_key: [u8; PK_SIZE],

    /// Partial public key material carried into submissions. Opaque to the
    /// engine; defaults to the public key until the signing collaborator
    /// supplies a per-block value.
    pub w: [u8; PK_SIZE],
}

impl PuzzleInstance {
    /// Initial instance from startup configuration. The bound starts at zero
    /// so nothing can be reported before the first node update.
    pub fn from_config(cfg: &Config) -> Result<Self, MinerError> {
        let pk = cfg.public_key()?;
        Ok(Self {
            message: [0u8; NUM_SIZE],
            bound: U256::zero(),
            secret_key: cfg.secret_key()?,
            public_key: pk,
            w: pk,
        })
    }
}

/// A found solution, ready for submission. Immutable once created; delivery
/// and retries are the reporter's concern.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Little-endian nonce bytes
    pub nonce: [u8; NONCE_SIZE],

    /// Partial public key material required by the node
    pub w: [u8; PK_SIZE],

    /// The aggregated 256-bit value that beat the bound
    pub d: U256,

    /// Fingerprint of the prehash table key this was computed under
    pub key_fingerprint: [u8; NUM_SIZE],
}

// Changelog:
// - v1.1.1: Key accessors made fallible; a Config deserialized outside
//   from_json can no longer panic in secret_key/public_key.
// - v1.1.0: Config gained the explicit pk field; PuzzleInstance carries the
//   opaque w material so the engine never touches key derivation.
// - v1.0.0: Initial Args/Config/PuzzleInstance/Solution definitions.
