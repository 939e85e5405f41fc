//! Replace-or-append editing of a single directive line.
//!
//! Two entry points:
//!
//! - [`write_single_line`] – used for a freshly created (empty) file.  The
//!   file's only content becomes the rendered line plus a newline.
//! - [`find_and_replace`] – used for an existing file.  Every line whose
//!   tokens equal `find` is replaced by `replace`; all other lines are written
//!   back unchanged.  If nothing matched, `replace` is appended.
//!
//! Every line written back gets a trailing `\n`, including a last line that
//! had none before.  `\r\n` endings are normalised to `\n`.

use std::fs::File;
use std::io::{self, BufWriter, Cursor, Read, Seek, SeekFrom, Write};

use thiserror::Error;
use tracing::debug;

use crate::domain::directive::DirectiveLine;

/// Error type for line editor operations.
///
/// Each variant names the stage of the edit that failed.
#[derive(Debug, Error)]
pub enum EditError {
    /// Reading the current content failed (including non-UTF-8 content).
    #[error("failed to read file content: {0}")]
    Read(#[source] io::Error),

    /// Emptying the handle before the rewrite failed.
    #[error("failed to truncate file: {0}")]
    Truncate(#[source] io::Error),

    /// Writing a line failed.
    #[error("failed to write file content: {0}")]
    Write(#[source] io::Error),

    /// Flushing buffered output to the handle failed.
    #[error("failed to flush file content: {0}")]
    Flush(#[source] io::Error),
}

impl EditError {
    /// Returns `true` if the failure happened after the handle may already
    /// have been truncated.
    ///
    /// When editing in place this means the file may now be empty or hold
    /// only part of the rewritten content.
    pub fn may_have_modified_target(&self) -> bool {
        !matches!(self, EditError::Read(_))
    }
}

/// Result of a find-and-replace pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// One or more lines matched `find` and were replaced in place.
    Replaced { lines: usize },
    /// No line matched `find`; `replace` was appended as the last line.
    Appended,
    /// No line matched `find`, but `replace` was already present, so nothing
    /// was appended.
    AlreadyPresent,
}

impl EditOutcome {
    pub fn replaced(&self) -> bool {
        matches!(self, EditOutcome::Replaced { .. })
    }
}

/// A handle the editor can read, empty and rewrite.
pub trait Rewritable: Read + Write + Seek {
    /// Discards all content and moves the cursor to the start.
    fn truncate(&mut self) -> io::Result<()>;
}

impl Rewritable for File {
    fn truncate(&mut self) -> io::Result<()> {
        self.set_len(0)?;
        self.seek(SeekFrom::Start(0))?;
        Ok(())
    }
}

impl Rewritable for Cursor<Vec<u8>> {
    fn truncate(&mut self) -> io::Result<()> {
        self.get_mut().clear();
        self.set_position(0);
        Ok(())
    }
}

/// The lines of a file as read at the start of an edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSnapshot {
    lines: Vec<String>,
}

impl FileSnapshot {
    /// Splits `text` into lines.
    ///
    /// A trailing newline does not produce an extra empty line.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_owned).collect(),
        }
    }

    /// Rewinds `source` and reads its whole content.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Read`] if seeking or reading fails, or if the
    /// content is not valid UTF-8.
    pub fn read_from<R: Read + Seek>(source: &mut R) -> Result<Self, EditError> {
        source.seek(SeekFrom::Start(0)).map_err(EditError::Read)?;
        let mut text = String::new();
        source.read_to_string(&mut text).map_err(EditError::Read)?;
        Ok(Self::from_text(&text))
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Writes the snapshot to `out` with every `find` line swapped for
    /// `replace`, appending `replace` when there was nothing to swap and it
    /// is not already present.
    ///
    /// Does not flush `out`.
    ///
    /// # Errors
    ///
    /// Propagates any error returned by `out`.
    pub fn rewrite_into<W: Write + ?Sized>(
        &self,
        find: &DirectiveLine,
        replace: &DirectiveLine,
        out: &mut W,
    ) -> io::Result<EditOutcome> {
        let replacement = replace.render();
        let mut replaced = 0usize;
        let mut already_present = false;

        for line in &self.lines {
            if find.matches(line) {
                writeln!(out, "{replacement}")?;
                replaced += 1;
            } else {
                already_present |= replace.matches(line);
                writeln!(out, "{line}")?;
            }
        }

        if replaced > 0 {
            return Ok(EditOutcome::Replaced { lines: replaced });
        }
        if already_present {
            return Ok(EditOutcome::AlreadyPresent);
        }

        writeln!(out, "{replacement}")?;
        Ok(EditOutcome::Appended)
    }
}

/// Overwrites `target` so that its only content is `line` plus a newline.
///
/// # Errors
///
/// Returns [`EditError::Truncate`], [`EditError::Write`] or
/// [`EditError::Flush`] for the stage that failed.
pub fn write_single_line<T: Rewritable>(
    target: &mut T,
    line: &DirectiveLine,
) -> Result<(), EditError> {
    target.truncate().map_err(EditError::Truncate)?;

    let mut writer = BufWriter::new(&mut *target);
    writeln!(writer, "{line}").map_err(EditError::Write)?;
    writer.flush().map_err(EditError::Flush)?;

    debug!(line = %line, "wrote single directive line");
    Ok(())
}

/// Rewrites `target` in place, replacing every `find` line with `replace`.
///
/// The content is read fully before the handle is truncated, so a read
/// failure leaves `target` untouched.  Any later failure may leave it empty
/// or partially written (see [`EditError::may_have_modified_target`]).
///
/// # Errors
///
/// Returns the [`EditError`] variant for the stage that failed.
pub fn find_and_replace<T: Rewritable>(
    target: &mut T,
    find: &DirectiveLine,
    replace: &DirectiveLine,
) -> Result<EditOutcome, EditError> {
    let snapshot = FileSnapshot::read_from(&mut *target)?;

    target.truncate().map_err(EditError::Truncate)?;

    let mut writer = BufWriter::new(&mut *target);
    let outcome = snapshot
        .rewrite_into(find, replace, &mut writer)
        .map_err(EditError::Write)?;
    writer.flush().map_err(EditError::Flush)?;

    debug!(?outcome, lines = snapshot.len(), find = %find, replace = %replace, "rewrote file");
    Ok(outcome)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
