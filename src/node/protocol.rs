// Lykos Miner - Free and Open Source Software Statement
//
// This project, lykos-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/node/protocol.rs
// Version: 1.0.2
//
// This file implements the node wire protocol for the Lykos miner, located
// in the node subdirectory. Inbound: puzzle updates as small JSON objects
// with msg/b/pk fields. Outbound: solution submissions with pk/w/n/d fields
// at fixed hex widths, since the node re-derives the same value to validate.
//
// Tree Location:
// - src/node/protocol.rs (wire parse/format)
// - Depends on: serde_json, hex, log, crate::core

use crate::core::bound::{parse_bound_dec, parse_hex_message, parse_hex_pk};
use crate::core::constants::PK_SIZE;
use crate::core::error::MinerError;
use crate::core::state::PuzzleUpdate;
use crate::core::types::Solution;
use log::{debug, error};
use serde_json::{json, Value};

const LOG_TARGET: &str = "lykos::node::protocol";

/// Parse one inbound puzzle update line.
///
/// The node pushes `{"msg": <hex digest>, "b": <decimal bound>, "pk": <hex
/// key>}`; the bound arrives as either a JSON number or a string, depending
/// on node version. A malformed update is rejected wholesale so the previous
/// puzzle instance stays authoritative.
pub fn parse_block_update(line: &str) -> Result<(PuzzleUpdate, [u8; PK_SIZE]), MinerError> {
    let v: Value = serde_json::from_str(line)?;

    let msg = v
        .get("msg")
        .and_then(Value::as_str)
        .ok_or_else(|| MinerError::InvalidUpdate("missing msg field".into()))?;

    let bound_str = match v.get("b") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(MinerError::InvalidUpdate("missing b field".into())),
    };

    let pk = v
        .get("pk")
        .and_then(Value::as_str)
        .ok_or_else(|| MinerError::InvalidUpdate("missing pk field".into()))?;

    let message = parse_hex_message(msg)?;
    let bound = parse_bound_dec(&bound_str)?;
    let received_pk = parse_hex_pk(pk)?;

    debug!(target: LOG_TARGET, "Parsed update: msg={}, bound={}", msg, bound);

    Ok((
        PuzzleUpdate {
            message,
            bound,
            public_key: None,
            w: None,
        },
        received_pk,
    ))
}

/// Build the outbound submission object for a found solution.
pub fn create_submit_request(pk: &[u8; PK_SIZE], solution: &Solution) -> Value {
    json!({
        "pk": hex::encode(pk),
        "w": hex::encode(solution.w),
        "n": hex::encode(solution.nonce),
        "d": solution.d.to_string(),
    })
}

/// Convert a JSON message to a newline-terminated wire string.
pub fn to_message(json: Value) -> String {
    if json.is_null() {
        error!(target: LOG_TARGET, "Attempted to serialize empty JSON message");
        return String::new();
    }
    debug!(target: LOG_TARGET, "Serialized node message: {}", json);
    format!("{}\n", json)
}

// Changelog:
// - v1.0.2: Bound accepted as number or string (older nodes send a bare
//   JSON number, newer ones quote it).
// - v1.0.1: Submission d field switched to decimal per node expectations.
// - v1.0.0: Initial msg/b/pk parse and pk/w/n/d submission format.
