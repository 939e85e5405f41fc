//! Open-or-create access to the PAM service file.
//!
//! An existing file is opened for reading and writing without truncation.  A
//! missing file is created empty with [`DEFAULT_CREATE_MODE`] (or the mode
//! from the config) so that a fresh `sudo_local` is never world-readable.
//!
//! Creation uses `create_new`, so a file that appears between the existence
//! check and the create is reported as an error instead of being clobbered.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Owner read/write, nothing for group or others.
pub const DEFAULT_CREATE_MODE: u32 = 0o600;

/// Error type for opening, creating and closing the service file.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Syncing the file before closing it failed.
    #[error("failed to close {path}: {source}")]
    Close {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// An open handle to the service file plus how it was obtained.
#[derive(Debug)]
pub struct AccessedFile {
    file: File,
    path: PathBuf,
    newly_created: bool,
}

impl AccessedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if the file was created by [`open_or_create`].
    pub fn is_newly_created(&self) -> bool {
        self.newly_created
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }

    /// Swaps in the handle of a file that has been renamed over `path`.
    pub(crate) fn replace_file(&mut self, file: File) {
        self.file = file;
    }

    /// Syncs the file to disk and closes it.
    ///
    /// Dropping a [`File`] discards close errors, so callers that need to
    /// know the content reached the disk must go through this method.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Close`] if the sync fails.
    pub fn close(self) -> Result<(), AccessError> {
        self.file.sync_all().map_err(|source| AccessError::Close {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "closed PAM service file");
        Ok(())
    }
}

/// Opens `path` for read/write, creating it with `create_mode` if it does not
/// exist.
///
/// # Errors
///
/// Returns [`AccessError::Open`] if an existing file cannot be opened and
/// [`AccessError::Create`] if a missing file cannot be created (including
/// when its parent directory does not exist).
pub fn open_or_create(path: &Path, create_mode: u32) -> Result<AccessedFile, AccessError> {
    let exists = path.exists();
    debug!(path = %path.display(), exists, "resolving PAM service file");

    if exists {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| AccessError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        return Ok(AccessedFile {
            file,
            path: path.to_path_buf(),
            newly_created: false,
        });
    }

    let file = create_options(create_mode)
        .open(path)
        .map_err(|source| AccessError::Create {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), mode = %format!("{create_mode:#o}"), "created PAM service file");

    Ok(AccessedFile {
        file,
        path: path.to_path_buf(),
        newly_created: true,
    })
}

fn create_options(create_mode: u32) -> OpenOptions {
    let mut options = OpenOptions::new();
    options.read(true).write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(create_mode);
    }
    #[cfg(not(unix))]
    let _ = create_mode;

    options
}

// ── Tests ─────────────────────────────────────────────────────────────────────
