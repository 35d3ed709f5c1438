//! Purpose: File-level decode/re-encode operations built on the pure codec.
//! Exports: `decode_file`, `encode_file`, `DecodeOutcome`, `EncodeOutcome`.
//! Role: One acquire-transform-release cycle per call; the CLI is a thin wrapper.
//! Invariants: Output is written only after the whole document transformed.
//! Invariants: Errors raised while transforming carry the input file path.

use std::path::{Path, PathBuf};

use crate::codec::{decode_bytes, encode_to_bytes, parse_canonical};
use crate::core::error::{Error, ErrorKind};
use crate::core::paths::json_path_for;
use crate::core::storage::{StateEncoding, read_canonical, read_state, write_canonical, write_state};

pub type ApiResult<T> = Result<T, Error>;

#[derive(Clone, Debug)]
pub struct DecodeOutcome {
    pub state_path: PathBuf,
    pub json_path: PathBuf,
    pub encoding: StateEncoding,
    /// The canonical document exactly as written to `json_path`.
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct EncodeOutcome {
    pub state_path: PathBuf,
    pub json_path: PathBuf,
    pub encoding: StateEncoding,
}

/// Decodes `state_path` and writes the canonical JSON next to it.
pub fn decode_file(state_path: &Path) -> ApiResult<DecodeOutcome> {
    let json_path = paired_json_path(state_path)?;
    let (bytes, encoding) = read_state(state_path)?;
    let canonical = decode_bytes(&bytes).map_err(|err| at_path(err, state_path))?;
    let text = serde_json::to_string_pretty(&canonical).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to render canonical json")
            .with_source(err)
    })?;
    write_canonical(&json_path, &text)?;
    Ok(DecodeOutcome {
        state_path: state_path.to_path_buf(),
        json_path,
        encoding,
        text,
    })
}

/// Re-encodes the canonical JSON paired with `state_path` back into `state_path`.
pub fn encode_file(state_path: &Path) -> ApiResult<EncodeOutcome> {
    let json_path = paired_json_path(state_path)?;
    let bytes = read_canonical(&json_path)?;
    let canonical = parse_canonical(&bytes).map_err(|err| at_path(err, &json_path))?;
    let wire = encode_to_bytes(canonical).map_err(|err| at_path(err, &json_path))?;
    let encoding = write_state(state_path, &wire)?;
    Ok(EncodeOutcome {
        state_path: state_path.to_path_buf(),
        json_path,
        encoding,
    })
}

// A `.json` state path would pair with itself and be overwritten.
fn paired_json_path(state_path: &Path) -> ApiResult<PathBuf> {
    let json_path = json_path_for(state_path);
    if json_path == state_path {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("state file already has a .json extension")
            .with_path(state_path)
            .with_hint("Pass the tournament.state file, not the decoded tournament.json."));
    }
    Ok(json_path)
}

fn at_path(err: Error, path: &Path) -> Error {
    if err.path().is_some() {
        return err;
    }
    err.with_path(path)
}
