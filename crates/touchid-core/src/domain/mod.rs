//! Domain entities for sudo-touchid.
//!
//! Pure data types with no I/O.  The editor and the application layer both
//! build on these.

/// Directive lines and the enabled/disabled modes.
///
/// See [`directive::TouchIdMode`] for the main type.
pub mod directive;
