//! Purpose: Shared state-file path resolution helpers.
//! Exports: `DEFAULT_STATE_PATH`, `default_state_path`, `json_path_for`.
//! Role: Keep decode and re-encode agreeing on which files pair with each other.
//! Invariants: The canonical file sits next to the state file with a `.json` extension.

use std::path::{Path, PathBuf};

pub const DEFAULT_STATE_PATH: &str = "PluginData/tournament.state";

pub fn default_state_path() -> PathBuf {
    PathBuf::from(DEFAULT_STATE_PATH)
}

pub fn json_path_for(state: &Path) -> PathBuf {
    state.with_extension("json")
}
