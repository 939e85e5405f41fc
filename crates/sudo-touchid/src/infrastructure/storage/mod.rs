//! Storage infrastructure: the PAM service file and the tool's own config.
//!
//! - `file_accessor` opens the service file read/write, or creates it with a
//!   restrictive mode when it is missing, and reports which happened.
//! - `pam_file` implements the application's `DirectiveTarget` on top of an
//!   opened file, using either the in-place or the atomic write strategy.
//! - `config` reads the optional TOML configuration file.

pub mod config;
pub mod file_accessor;
pub mod pam_file;
