//! Toggle use case: bring the PAM service file into the requested mode.
//!
//! | Target state  | Operation                                          |
//! |---------------|----------------------------------------------------|
//! | newly created | write the mode's line as the only content          |
//! | existing      | replace the opposite mode's line with the mode's   |
//!
//! The opposite line is what gets searched for, so enabling swaps
//! `#auth sufficient pam_tid.so` for `auth sufficient pam_tid.so` and
//! disabling does the reverse.  When neither is present the line is appended.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use touchid_core::{DirectiveLine, EditError, EditOutcome, TouchIdMode};
use tracing::info;

/// Error type for directive store operations.
#[derive(Debug, Error)]
pub enum DirectiveStoreError {
    /// The line editor failed while reading or rewriting the target.
    #[error("failed to edit {path}: {source}")]
    Edit {
        path: PathBuf,
        #[source]
        source: EditError,
        /// `false` when the failure may have left the target empty or
        /// partially written.
        target_intact: bool,
    },

    /// Preparing the replacement file next to the target failed.
    #[error("failed to stage replacement for {path}: {source}")]
    Stage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Renaming the staged replacement over the target failed.
    #[error("failed to move staged replacement over {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DirectiveStoreError {
    /// Returns `true` if the target still holds its original content.
    pub fn target_intact(&self) -> bool {
        match self {
            DirectiveStoreError::Edit { target_intact, .. } => *target_intact,
            DirectiveStoreError::Stage { .. } | DirectiveStoreError::Persist { .. } => true,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            DirectiveStoreError::Edit { path, .. }
            | DirectiveStoreError::Stage { path, .. }
            | DirectiveStoreError::Persist { path, .. } => path,
        }
    }
}

/// A file holding the Touch ID directive.
///
/// Implemented by the PAM file adapter in the infrastructure layer.
#[cfg_attr(test, mockall::automock)]
pub trait DirectiveTarget {
    /// Returns `true` if the file did not exist before this invocation.
    fn is_newly_created(&self) -> bool;

    /// Makes `line` the only content of the file.
    fn write_single_line(&mut self, line: &DirectiveLine) -> Result<(), DirectiveStoreError>;

    /// Replaces every `find` line with `replace`, appending `replace` if
    /// nothing matched.
    fn find_and_replace(
        &mut self,
        find: &DirectiveLine,
        replace: &DirectiveLine,
    ) -> Result<EditOutcome, DirectiveStoreError>;
}

/// What the toggle did to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The file was new and now holds just the directive.
    Created,
    /// The existing file was rewritten.
    Edited(EditOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleReport {
    pub mode: TouchIdMode,
    pub outcome: ToggleOutcome,
}

/// Applies `mode` to `target`.
///
/// # Errors
///
/// Returns the [`DirectiveStoreError`] raised by the target.  No retry is
/// attempted.
pub fn apply_mode<T>(target: &mut T, mode: TouchIdMode) -> Result<ToggleReport, DirectiveStoreError>
where
    T: DirectiveTarget + ?Sized,
{
    let wanted = mode.directive();

    let outcome = if target.is_newly_created() {
        target.write_single_line(&wanted)?;
        ToggleOutcome::Created
    } else {
        let unwanted = mode.opposite().directive();
        ToggleOutcome::Edited(target.find_and_replace(&unwanted, &wanted)?)
    };

    info!(%mode, ?outcome, "touch id directive applied");
    Ok(ToggleReport { mode, outcome })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
