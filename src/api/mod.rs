//! Purpose: Define the stable public Rust API boundary for tournament-state.
//! Exports: Codec transforms, state file storage helpers, path helpers, errors.
//! Role: Public, additive-only surface used by the CLI and integration tests.
//! Invariants: Internal modules (`json`, codec schema helpers) are not directly exposed.

mod convert;

pub use crate::codec::{
    METRIC_FIELDS, PASSTHROUGH_FIELDS, decode, decode_bytes, encode, encode_to_bytes,
    parse_canonical,
};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::paths::{DEFAULT_STATE_PATH, default_state_path, json_path_for};
pub use crate::core::storage::{
    StateEncoding, inflate, read_canonical, read_state, write_canonical, write_state,
};
pub use convert::{DecodeOutcome, EncodeOutcome, decode_file, encode_file};
