//! Purpose: Convert between the string-nested wire tournament state and canonical JSON.
//! Exports: `decode`, `encode`, `decode_bytes`, `encode_to_bytes`, field-name constants.
//! Role: Schema-driven transformer; each nested string is decoded at a known position.
//! Invariants: `encode(decode(w))` equals `w` once both are parsed back into trees.
//! Invariants: Untouched top-level fields pass through in their original order.
//! Invariants: Transforms are pure; no I/O happens below this module.

mod fields;
mod heats;
mod schema;
mod scores;

use serde_json::Value;
use tracing::debug;

use crate::core::error::Error;
use fields::{HEATS, SCORES, TEAM_FILES, WIRE_HEATS, WIRE_SCORES, WIRE_TEAM_FILES};
use schema::{encode_compact, into_object, parse_document, take};

pub use fields::{METRIC_FIELDS, PASSTHROUGH_FIELDS};

/// Expands a parsed wire document into canonical form.
pub fn decode(wire: Value) -> Result<Value, Error> {
    let mut state = into_object(wire, "")?;

    let heats = heats::decode_heats(take(&mut state, WIRE_HEATS, "")?)?;
    state.insert(HEATS.to_string(), Value::Object(heats));

    let scores = scores::decode_scores(take(&mut state, WIRE_SCORES, "")?)?;
    state.insert(SCORES.to_string(), Value::Object(scores));

    let team_files = heats::decode_team_files(take(&mut state, WIRE_TEAM_FILES, "")?)?;
    debug!(team_files = team_files.len(), "decoded team files");
    state.insert(TEAM_FILES.to_string(), Value::Array(team_files));

    Ok(Value::Object(state))
}

/// Re-nests a canonical document into wire form.
pub fn encode(canonical: Value) -> Result<Value, Error> {
    let mut state = into_object(canonical, "")?;

    let heats = heats::encode_heats(take(&mut state, HEATS, "")?)?;
    state.insert(WIRE_HEATS.to_string(), Value::Array(heats));

    let scores = scores::encode_scores(take(&mut state, SCORES, "")?)?;
    state.insert(WIRE_SCORES.to_string(), scores);

    let team_files = heats::encode_team_files(take(&mut state, TEAM_FILES, "")?)?;
    state.insert(WIRE_TEAM_FILES.to_string(), Value::Array(team_files));

    Ok(Value::Object(state))
}

/// Parses wire text (already decompressed) and decodes it.
pub fn decode_bytes(bytes: &[u8]) -> Result<Value, Error> {
    decode(parse_document(bytes, "tournament state")?)
}

/// Encodes a canonical document and renders the compact wire text.
pub fn encode_to_bytes(canonical: Value) -> Result<Vec<u8>, Error> {
    let wire = encode(canonical)?;
    encode_compact(&wire).map(String::into_bytes)
}

/// Parses a canonical (decoded) JSON document.
pub fn parse_canonical(bytes: &[u8]) -> Result<Value, Error> {
    parse_document(bytes, "canonical json")
}
