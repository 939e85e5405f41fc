//! PAM service file adapter.
//!
//! Implements [`DirectiveTarget`] on top of an [`AccessedFile`].  Existing
//! files are rewritten with one of two strategies:
//!
//! - [`WriteStrategy::InPlace`] truncates the open handle and writes the new
//!   content into it.  A failure after the truncate can leave the file empty
//!   or partially written.
//! - [`WriteStrategy::Atomic`] writes the new content to a temporary file in
//!   the same directory, copies the original's permissions and ownership onto
//!   it, syncs it, and renames it over the target.  The original is untouched
//!   until the rename.
//!
//! Both produce byte-identical output.  New files are always written directly
//! since there is nothing to lose.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Deserialize;
use tempfile::NamedTempFile;
use touchid_core::{DirectiveLine, EditError, EditOutcome, FileSnapshot};
use tracing::debug;

use crate::application::toggle_touch_id::{DirectiveStoreError, DirectiveTarget};
use crate::infrastructure::storage::file_accessor::{AccessError, AccessedFile};

/// How an existing service file is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum WriteStrategy {
    /// Temp file in the same directory, then rename over the target.
    #[default]
    Atomic,
    /// Truncate the open handle and rewrite it.
    InPlace,
}

impl fmt::Display for WriteStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteStrategy::Atomic => f.write_str("atomic"),
            WriteStrategy::InPlace => f.write_str("in-place"),
        }
    }
}

/// The opened PAM service file.
#[derive(Debug)]
pub struct PamFile {
    handle: AccessedFile,
    strategy: WriteStrategy,
}

impl PamFile {
    pub fn new(handle: AccessedFile, strategy: WriteStrategy) -> Self {
        Self { handle, strategy }
    }

    pub fn path(&self) -> &Path {
        self.handle.path()
    }

    /// Syncs and closes the underlying handle.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Close`] if the sync fails.
    pub fn close(self) -> Result<(), AccessError> {
        self.handle.close()
    }

    fn edit_error(&self, source: EditError) -> DirectiveStoreError {
        DirectiveStoreError::Edit {
            path: self.handle.path().to_path_buf(),
            target_intact: !source.may_have_modified_target(),
            source,
        }
    }

    fn stage_error(&self, source: io::Error) -> DirectiveStoreError {
        DirectiveStoreError::Stage {
            path: self.handle.path().to_path_buf(),
            source,
        }
    }

    fn replace_in_place(
        &mut self,
        find: &DirectiveLine,
        replace: &DirectiveLine,
    ) -> Result<EditOutcome, DirectiveStoreError> {
        touchid_core::find_and_replace(self.handle.file_mut(), find, replace)
            .map_err(|source| self.edit_error(source))
    }

    fn replace_atomically(
        &mut self,
        find: &DirectiveLine,
        replace: &DirectiveLine,
    ) -> Result<EditOutcome, DirectiveStoreError> {
        let snapshot = FileSnapshot::read_from(self.handle.file_mut())
            .map_err(|source| self.edit_error(source))?;

        // Follow symlinks so the rename replaces the real file, not the link.
        let target = fs::canonicalize(self.handle.path()).map_err(|e| self.stage_error(e))?;
        let dir = target.parent().ok_or_else(|| {
            self.stage_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "target has no parent directory",
            ))
        })?;

        let mut staged = NamedTempFile::new_in(dir).map_err(|e| self.stage_error(e))?;
        let outcome = write_staged(&snapshot, find, replace, &mut staged).map_err(|source| {
            // The original has not been touched yet.
            DirectiveStoreError::Edit {
                path: self.handle.path().to_path_buf(),
                source,
                target_intact: true,
            }
        })?;

        copy_ownership(self.handle.file(), staged.as_file()).map_err(|e| self.stage_error(e))?;
        staged.as_file().sync_all().map_err(|e| self.stage_error(e))?;

        let staged_path = staged.path().to_path_buf();
        let persisted = staged
            .persist(&target)
            .map_err(|err| DirectiveStoreError::Persist {
                path: self.handle.path().to_path_buf(),
                source: err.error,
            })?;
        debug!(
            staged = %staged_path.display(),
            target = %target.display(),
            "renamed staged file over target"
        );

        self.handle.replace_file(persisted);
        Ok(outcome)
    }
}

impl DirectiveTarget for PamFile {
    fn is_newly_created(&self) -> bool {
        self.handle.is_newly_created()
    }

    fn write_single_line(&mut self, line: &DirectiveLine) -> Result<(), DirectiveStoreError> {
        touchid_core::write_single_line(self.handle.file_mut(), line)
            .map_err(|source| self.edit_error(source))
    }

    fn find_and_replace(
        &mut self,
        find: &DirectiveLine,
        replace: &DirectiveLine,
    ) -> Result<EditOutcome, DirectiveStoreError> {
        debug!(path = %self.path().display(), strategy = %self.strategy, "rewriting PAM service file");
        match self.strategy {
            WriteStrategy::Atomic => self.replace_atomically(find, replace),
            WriteStrategy::InPlace => self.replace_in_place(find, replace),
        }
    }
}

fn write_staged(
    snapshot: &FileSnapshot,
    find: &DirectiveLine,
    replace: &DirectiveLine,
    staged: &mut NamedTempFile,
) -> Result<EditOutcome, EditError> {
    let mut writer = BufWriter::new(staged);
    let outcome = snapshot
        .rewrite_into(find, replace, &mut writer)
        .map_err(EditError::Write)?;
    writer.flush().map_err(EditError::Flush)?;
    Ok(outcome)
}

/// Gives `to` the permission bits and, on Unix, the owner and group of `from`.
fn copy_ownership(from: &File, to: &File) -> io::Result<()> {
    let original = from.metadata()?;
    to.set_permissions(original.permissions())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;

        let staged = to.metadata()?;
        if (staged.uid(), staged.gid()) != (original.uid(), original.gid()) {
            std::os::unix::fs::fchown(to, Some(original.uid()), Some(original.gid()))?;
        }
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
