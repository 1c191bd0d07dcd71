// Lykos Miner - Free and Open Source Software Statement
//
// This project, lykos-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/bound.rs
// Version: 1.2.0
//
// This file contains the 256-bit arithmetic for difficulty bounds and
// candidate values, located in the core subdirectory. The node sends the
// bound as a decimal big integer; candidate values are little-endian 256-bit
// digests. Comparison is unsigned, most-significant-word first.
//
// Tree Location:
// - src/core/bound.rs (bound parsing and 256-bit comparison)
// - Depends on: uint, hex, log

use crate::core::constants::{NUM_SIZE, PK_SIZE};
use crate::core::error::MinerError;
use log::warn;
use uint::construct_uint;

const LOG_TARGET: &str = "lykos::bound";

construct_uint! {
    pub struct U256(4);
}

/// Parse the decimal big-integer bound the node sends.
pub fn parse_bound_dec(s: &str) -> Result<U256, MinerError> {
    U256::from_dec_str(s.trim()).map_err(|e| {
        warn!(target: LOG_TARGET, "Failed to parse bound {:?}: {:?}", s, e);
        MinerError::InvalidUpdate(format!("bad bound: {:?}", s))
    })
}

/// Decode a 64-character hex string into a 32-byte message digest.
pub fn parse_hex_message(s: &str) -> Result<[u8; NUM_SIZE], MinerError> {
    let bytes = hex::decode(s.trim())?;
    if bytes.len() != NUM_SIZE {
        warn!(target: LOG_TARGET, "Invalid message length: {} bytes", bytes.len());
        return Err(MinerError::InvalidUpdate(format!(
            "message must be {} bytes, got {}",
            NUM_SIZE,
            bytes.len()
        )));
    }
    let mut out = [0u8; NUM_SIZE];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Decode a 66-character hex string into a 33-byte compressed public key.
pub fn parse_hex_pk(s: &str) -> Result<[u8; PK_SIZE], MinerError> {
    let bytes = hex::decode(s.trim())?;
    if bytes.len() != PK_SIZE {
        warn!(target: LOG_TARGET, "Invalid public key length: {} bytes", bytes.len());
        return Err(MinerError::InvalidUpdate(format!(
            "public key must be {} bytes, got {}",
            PK_SIZE,
            bytes.len()
        )));
    }
    let mut out = [0u8; PK_SIZE];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Interpret a 32-byte digest as a little-endian 256-bit value. Truncation
/// to 256 bits is the only reduction the puzzle defines.
#[inline(always)]
pub fn value_from_digest(digest: &[u8; NUM_SIZE]) -> U256 {
    U256::from_little_endian(digest)
}

/// Strict unsigned comparison against the difficulty bound.
#[inline(always)]
pub fn meets_bound(value: &U256, bound: &U256) -> bool {
    value < bound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_decimal_roundtrip() {
        let b = parse_bound_dec("340282366920938463463374607431768211456").unwrap();
        assert_eq!(b, U256::from(1u64) << 128);
        assert_eq!(b.to_string(), "340282366920938463463374607431768211456");
    }

    #[test]
    fn bound_rejects_garbage() {
        assert!(parse_bound_dec("not a number").is_err());
        assert!(parse_bound_dec("").is_err());
    }

    #[test]
    fn comparison_is_msw_first() {
        let mut hi = [0u8; 32];
        hi[31] = 1; // little-endian: most significant byte set
        let mut lo = [0xFFu8; 32];
        lo[31] = 0;
        assert!(value_from_digest(&lo) < value_from_digest(&hi));
    }

    #[test]
    fn zero_bound_admits_nothing() {
        let zero = U256::zero();
        assert!(!meets_bound(&U256::zero(), &zero));
        assert!(!meets_bound(&U256::from(1u64), &zero));
    }
}

// Changelog:
// - v1.2.0: Bound kept as U256 end to end; removed the intermediate
//   64-hex-digit string conversion step.
// - v1.0.0: Initial decimal bound parsing and comparison helpers.
