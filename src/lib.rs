//! `fnr` is a library for batch find-and-replace over directory trees.
//!
//! The engine walks a source tree on a background thread, searches file
//! contents for an ordered list of literal find/replace pairs, writes
//! rewritten files into a mirrored destination tree, and byte-copies files
//! with no matches. A run can be paused, resumed, and stopped cooperatively
//! at any time while the caller polls live outcome counters. The main
//! components are:
//!
//! - `PatternSet`: the ordered find/replace pairs, parsed from raw text.
//! - `LineRewriter`: applies the pattern set to one line at a time.
//! - `FileTransfer`: the per-file copy-or-rewrite decision, including the
//!   same-file-as-destination case used for in-place runs.
//! - `SearchWorker`: the tree traversal with the pause/resume/stop control
//!   surface and run counters.
//!
//! Matching is literal substring matching with an optional `(?i)` prefix
//! for case-insensitive pairs, not a pattern language, and file content is
//! handled under one fixed single-byte encoding.

pub mod cli;
pub mod config;
pub mod control;
pub mod counters;
pub mod errors;
pub mod latin1;
pub mod patterns;
pub mod rewriter;
pub mod sink;
pub mod transfer;
pub mod worker;

#[cfg(test)]
mod test_util;

// Re-export main types for easier access by library users.
pub use config::{JobFile, RunConfig};
pub use counters::{CountersSnapshot, RunCounters};
pub use errors::{Error, Result};
pub use patterns::{PatternSet, SearchPair};
pub use rewriter::{LineRewriter, Substitution};
pub use sink::LogSink;
pub use worker::{RunState, SearchWorker};
