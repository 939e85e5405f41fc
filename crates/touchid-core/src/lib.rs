//! # touchid-core
//!
//! Shared library for sudo-touchid containing the directive model and the
//! line editor that rewrites a PAM service file.
//!
//! This crate has no dependencies on paths, OS APIs, or process state.  It
//! works on anything that implements [`std::io::Read`], [`std::io::Write`]
//! and [`std::io::Seek`], so the editor can be exercised against in-memory
//! buffers as easily as against real files.
//!
//! # Architecture overview
//!
//! - **`domain`** – What a directive line is and which two lines the tool
//!   toggles between (`auth sufficient pam_tid.so` and its commented-out
//!   form).
//!
//! - **`editor`** – The idempotent replace-or-append editor.  It reads a
//!   snapshot of the file, rewrites it line by line, and either replaces the
//!   matching directive in place or appends it at the end.

pub mod domain;
pub mod editor;

pub use domain::directive::{DirectiveLine, TouchIdMode, PAM_TID_MODULE};
pub use editor::line_editor::{
    find_and_replace, write_single_line, EditError, EditOutcome, FileSnapshot, Rewritable,
};
