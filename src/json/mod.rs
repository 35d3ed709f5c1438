//! Purpose: Internal JSON parsing boundary shared by the codec and storage layers.
//! Exports: `parse` module with decode helpers.
//! Role: Single seam for parser implementation so callsites avoid ad hoc decode logic.
//! Invariants: Every embedded-string decode in the codec goes through this module.
//! Invariants: Helper APIs stay small and deterministic (no hidden global state).

pub(crate) mod parse;
