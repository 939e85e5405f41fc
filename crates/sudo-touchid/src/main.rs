//! sudo-touchid: enable or disable Touch ID for sudo.
//!
//! Edits the `auth sufficient pam_tid.so` directive in `/etc/pam.d/sudo_local`
//! and leaves every other line alone.  Run it with enough privilege to write
//! that file.
//!
//! # Usage
//!
//! ```text
//! sudo-touchid (--enable | --disable) [OPTIONS]
//!
//! Options:
//!   --file <PATH>              PAM service file [default: /etc/pam.d/sudo_local]
//!   --config <PATH>            TOML config [default: /etc/sudo-touchid/config.toml]
//!   --write-strategy <NAME>    atomic | in-place [default: atomic]
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable              | Overrides   |
//! |-----------------------|-------------|
//! | `SUDO_TOUCHID_FILE`   | `--file`    |
//! | `SUDO_TOUCHID_CONFIG` | `--config`  |
//! | `RUST_LOG`            | `logging.level` from the config file |
//!
//! Logs go to stderr.  Stdout carries only the status line.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser};
use tracing::error;
use tracing_subscriber::EnvFilter;

use sudo_touchid::infrastructure::run_toggle;
use sudo_touchid::infrastructure::storage::config::{load_config, DEFAULT_CONFIG_PATH};
use sudo_touchid::infrastructure::storage::pam_file::WriteStrategy;
use touchid_core::TouchIdMode;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Enable or disable Touch ID authentication for sudo.
#[derive(Debug, Parser)]
#[command(name = "sudo-touchid", version)]
struct Cli {
    #[command(flatten)]
    mode: ModeArgs,

    /// PAM service file to edit.  Defaults to `pam.path` from the config.
    #[arg(long, value_name = "PATH", env = "SUDO_TOUCHID_FILE")]
    file: Option<PathBuf>,

    /// TOML config file.  A missing file means built-in defaults.
    #[arg(long, value_name = "PATH", env = "SUDO_TOUCHID_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// How an existing file is rewritten.  Defaults to `pam.write_strategy`.
    #[arg(long, value_enum)]
    write_strategy: Option<WriteStrategy>,
}

/// Exactly one of `--enable` / `--disable`.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct ModeArgs {
    /// Enable Touch ID for sudo.
    #[arg(long)]
    enable: bool,

    /// Disable Touch ID for sudo.
    #[arg(long)]
    disable: bool,
}

impl ModeArgs {
    fn mode(&self) -> TouchIdMode {
        if self.enable {
            TouchIdMode::Enabled
        } else {
            TouchIdMode::Disabled
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    // Usage errors exit 2 here, before any file is opened.
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    let mode = cli.mode.mode();
    let settings = config.pam.with_overrides(cli.file, cli.write_strategy);

    let report = match run_toggle(&settings, mode) {
        Ok(report) => report,
        Err(err) => {
            if !err.target_intact() {
                error!(
                    path = %settings.path.display(),
                    "{} may be empty or partially written; restore it before using sudo",
                    settings.path.display()
                );
            }
            error!(error = %err, "toggle failed");
            let action = verb(mode);
            return Err(err)
                .with_context(|| format!("failed to {action} touch id in {}", settings.path.display()));
        }
    };

    println!("{}", report.mode.status_message());
    Ok(())
}

fn verb(mode: TouchIdMode) -> &'static str {
    match mode {
        TouchIdMode::Enabled => "enable",
        TouchIdMode::Disabled => "disable",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_enable_flag_selects_enabled_mode() {
        let cli = Cli::try_parse_from(["sudo-touchid", "--enable"]).unwrap();
        assert_eq!(cli.mode.mode(), TouchIdMode::Enabled);
    }

    #[test]
    fn test_disable_flag_selects_disabled_mode() {
        let cli = Cli::try_parse_from(["sudo-touchid", "--disable"]).unwrap();
        assert_eq!(cli.mode.mode(), TouchIdMode::Disabled);
    }

    #[test]
    fn test_neither_flag_is_usage_error() {
        let err = Cli::try_parse_from(["sudo-touchid"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_both_flags_is_usage_error() {
        let err = Cli::try_parse_from(["sudo-touchid", "--enable", "--disable"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_write_strategy_accepts_kebab_case_names() {
        let cli =
            Cli::try_parse_from(["sudo-touchid", "--disable", "--write-strategy", "in-place"])
                .unwrap();
        assert_eq!(cli.write_strategy, Some(WriteStrategy::InPlace));
    }

    #[test]
    fn test_file_flag_is_passed_through() {
        let cli = Cli::try_parse_from(["sudo-touchid", "--enable", "--file", "/tmp/sudo_local"])
            .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("/tmp/sudo_local")));
    }
}
