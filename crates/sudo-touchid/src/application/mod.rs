//! Application layer use cases for sudo-touchid.
//!
//! Use cases here orchestrate the `touchid-core` domain types against an
//! abstract [`toggle_touch_id::DirectiveTarget`].  They perform no file
//! system access themselves; the infrastructure layer supplies the target.
//!
//! # Sub-modules
//!
//! - **`toggle_touch_id`** – Decides whether to write the canonical line into
//!   a fresh file or swap the opposite directive in an existing one.

pub mod toggle_touch_id;
