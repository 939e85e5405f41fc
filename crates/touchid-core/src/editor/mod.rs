//! Line editor for small, line-oriented configuration files.
//!
//! # How an edit works
//!
//! ```text
//! Start → Read → Truncate → Rewrite (per line: Match | NoMatch)
//!       → [Append if never matched] → Flush → Done
//! ```
//!
//! The whole file is read into a [`line_editor::FileSnapshot`] first, the
//! handle is truncated, and the snapshot is written back with the matching
//! line swapped.  Because the handle is empty between `Truncate` and `Flush`,
//! a failure in that window can leave the file empty or partially written.
//! Callers that cannot accept this should use
//! [`line_editor::FileSnapshot::rewrite_into`] against a temporary file and
//! rename it over the target instead.

pub mod line_editor;
