// SPDX-License-Identifier: MIT
//
// Tracing setup. The terminal belongs to the UI, so logs only go to a
// file, and only when one is given.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "D_TUI_LOG";

fn env_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_env_var(LOG_ENV)
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy()
}

/// Install a subscriber appending to `path`. Without a path nothing is
/// installed and every `tracing` macro is a no-op.
pub fn init_tracing(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_path_installs_nothing() {
        assert!(init_tracing(None).is_ok());
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no/such/dir/log.txt");
        let err = init_tracing(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("failed to open log file"), "{err}");
    }
}
