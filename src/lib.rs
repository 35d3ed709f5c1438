//! Purpose: Library crate behind the `tournament-state` CLI and its tests.
//! Exports: `api` (stable surface), `codec` (wire <-> canonical transforms), `core`.
//! Role: Keeps the transform pure and the file handling thin around it.
//! Invariants: Decoding never writes output unless the whole document transformed.
//! Invariants: Every mapping built from a wire array keeps insertion order.
pub mod api;
pub mod codec;
pub mod core;
mod json;
