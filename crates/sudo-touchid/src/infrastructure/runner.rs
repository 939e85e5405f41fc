//! Composition root for one toggle invocation.
//!
//! Opens (or creates) the configured service file, wraps it in a
//! [`PamFile`] with the configured write strategy, applies the mode and
//! closes the file.  Nothing is retried.

use thiserror::Error;
use touchid_core::TouchIdMode;
use tracing::debug;

use crate::application::toggle_touch_id::{apply_mode, DirectiveStoreError, ToggleReport};
use crate::infrastructure::storage::config::PamConfig;
use crate::infrastructure::storage::file_accessor::{open_or_create, AccessError};
use crate::infrastructure::storage::pam_file::PamFile;

/// Any failure of a toggle run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Store(#[from] DirectiveStoreError),
}

impl RunError {
    /// Returns `true` if the service file still holds its original content.
    ///
    /// Open and create failures happen before any write.  A failed close
    /// means the content may not have reached the disk.
    pub fn target_intact(&self) -> bool {
        match self {
            RunError::Access(AccessError::Open { .. } | AccessError::Create { .. }) => true,
            RunError::Access(AccessError::Close { .. }) => false,
            RunError::Store(err) => err.target_intact(),
        }
    }
}

/// Brings the file described by `settings` into `mode`.
///
/// # Errors
///
/// Returns [`RunError::Access`] if the file cannot be opened, created or
/// closed, and [`RunError::Store`] if rewriting it fails.
pub fn run_toggle(settings: &PamConfig, mode: TouchIdMode) -> Result<ToggleReport, RunError> {
    debug!(
        path = %settings.path.display(),
        strategy = %settings.write_strategy,
        %mode,
        "starting toggle"
    );

    let handle = open_or_create(&settings.path, settings.file_mode)?;
    let mut target = PamFile::new(handle, settings.write_strategy);
    let report = apply_mode(&mut target, mode)?;
    target.close()?;

    Ok(report)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    use crate::application::toggle_touch_id::ToggleOutcome;
    use crate::infrastructure::storage::pam_file::WriteStrategy;
    use touchid_core::EditOutcome;

    fn settings(path: PathBuf, strategy: WriteStrategy) -> PamConfig {
        PamConfig::default().with_overrides(Some(path), Some(strategy))
    }

    #[test]
    fn test_run_toggle_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sudo_local");

        let report = run_toggle(&settings(path.clone(), WriteStrategy::Atomic), TouchIdMode::Enabled)
            .unwrap();

        assert_eq!(report.outcome, ToggleOutcome::Created);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "auth sufficient pam_tid.so\n"
        );
    }

    #[test]
    fn test_run_toggle_edits_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sudo_local");
        std::fs::write(&path, "auth sufficient pam_tid.so\n").unwrap();

        let report = run_toggle(&settings(path.clone(), WriteStrategy::InPlace), TouchIdMode::Disabled)
            .unwrap();

        assert_eq!(
            report.outcome,
            ToggleOutcome::Edited(EditOutcome::Replaced { lines: 1 })
        );
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "#auth sufficient pam_tid.so\n"
        );
    }

    #[test]
    fn test_run_toggle_missing_parent_is_access_error() {
        let err = run_toggle(
            &settings(PathBuf::from("/invalid/path/to/file"), WriteStrategy::Atomic),
            TouchIdMode::Enabled,
        )
        .unwrap_err();

        assert!(matches!(err, RunError::Access(AccessError::Create { .. })));
        assert!(err.target_intact());
    }

    #[test]
    fn test_close_failure_is_not_intact() {
        let err = RunError::Access(AccessError::Close {
            path: PathBuf::from("/etc/pam.d/sudo_local"),
            source: io::Error::new(io::ErrorKind::Other, "EIO"),
        });
        assert!(!err.target_intact());
    }
}
