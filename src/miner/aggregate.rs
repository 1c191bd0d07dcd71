// Lykos Miner - Free and Open Source Software Statement
//
// This project, lykos-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/miner/aggregate.rs
// Version: 1.0.1
//
// This file implements the per-nonce index derivation and aggregation for
// the Lykos miner, located in the miner subdirectory. It is the hot path of
// the search: fixed iteration counts, no early exits inside the index loop.
// The exact input layout must match what the node re-derives to validate a
// submission.
//
// Tree Location:
// - src/miner/aggregate.rs (index derivation + table aggregation)
// - Depends on: crate::core, crate::miner::prehash

use crate::core::blake2b::{blake2b256, Blake2b256, DIGEST_LEN};
use crate::core::bound::U256;
use crate::core::constants::{K_LEN, NONCE_SIZE, NUM_SIZE, PK_SIZE};
use crate::miner::prehash::PrehashTable;

/// Index block size: K_LEN u32 indices.
const INDEX_BLOCK_LEN: usize = K_LEN * 4;

/// Number of 32-byte expansion hashes covering the index block.
const EXPANSION_BLOCKS: usize = INDEX_BLOCK_LEN / DIGEST_LEN;

/// Salt derived once per public key; keys the per-nonce seed hash.
#[inline]
pub fn pk_salt(pk: &[u8; PK_SIZE]) -> [u8; NUM_SIZE] {
    blake2b256(pk)
}

/// Derive the K_LEN table indices for a nonce.
///
/// seed = keyed-H(salt, message || nonce_le); the seed is expanded into a
/// 128-byte index block (H(seed || b), b = 0..3) read as little-endian u32
/// segments, each reduced modulo the table length.
pub fn derive_indices(
    message: &[u8; NUM_SIZE],
    nonce: u64,
    salt: &[u8; NUM_SIZE],
    n: usize,
) -> [u32; K_LEN] {
    let mut ctx = Blake2b256::keyed(salt);
    ctx.update(message);
    ctx.update(&nonce.to_le_bytes());
    let seed = ctx.finalize();

    let mut block = [0u8; INDEX_BLOCK_LEN];
    let mut input = [0u8; DIGEST_LEN + 1];
    input[..DIGEST_LEN].copy_from_slice(&seed);
    for b in 0..EXPANSION_BLOCKS {
        input[DIGEST_LEN] = b as u8;
        block[b * DIGEST_LEN..(b + 1) * DIGEST_LEN].copy_from_slice(&blake2b256(&input));
    }

    let mut indices = [0u32; K_LEN];
    for (j, idx) in indices.iter_mut().enumerate() {
        let raw = u32::from_le_bytes(
            block[j * 4..(j + 1) * 4]
                .try_into()
                .expect("index segment is 4 bytes"),
        );
        *idx = (raw as usize % n) as u32;
    }
    indices
}

/// Sum the K_LEN table entries addressed by `indices`, modulo 2^256.
#[inline]
pub fn aggregate(table: &PrehashTable, indices: &[u32; K_LEN]) -> U256 {
    let mut sum = U256::zero();
    for &idx in indices {
        sum = sum.overflowing_add(table.get(idx as usize)).0;
    }
    sum
}

/// Candidate value for a nonce under the current puzzle: derive indices,
/// look up and sum the corresponding prehash entries.
#[inline]
pub fn candidate_value(
    table: &PrehashTable,
    message: &[u8; NUM_SIZE],
    nonce: u64,
    salt: &[u8; NUM_SIZE],
) -> U256 {
    let indices = derive_indices(message, nonce, salt, table.len());
    aggregate(table, &indices)
}

/// Little-endian wire form of a nonce.
#[inline]
pub fn nonce_bytes(nonce: u64) -> [u8; NONCE_SIZE] {
    nonce.to_le_bytes()
}

// Changelog:
// - v1.0.1: Index reduction switched to modulo the actual table length so
//   synthetic small tables behave like the full 2^26 one.
// - v1.0.0: Initial seed derivation, 4-block expansion and aggregation.
