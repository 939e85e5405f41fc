//! Infrastructure layer for sudo-touchid.
//!
//! Contains the OS-facing adapters: opening or creating the PAM service
//! file, rewriting it in place or through a temporary file, and loading the
//! TOML configuration.  [`runner::run_toggle`] wires them to the application
//! layer for one invocation.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `touchid_core`, but MUST NOT be imported by the `application` layer.

pub mod runner;
pub mod storage;

pub use runner::{run_toggle, RunError};
