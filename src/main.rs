// SPDX-License-Identifier: MIT
//
// d-tui — browse and edit a document database from the terminal.
//
// This is the main binary that wires together all the crates:
//
//   d-term   → terminal control, rendering, input parsing, event loop
//   d-editor → the text-entry sessions behind every input field
//   d-json   → JSON pretty printing and token coloring
//   d-theme  → named themes and the JSON palette
//
// The Browser struct implements d-term's App trait over a DocumentStore.
// Each keypress flows through:
//
//   stdin → parser → on_event → dialog or screen handler → store call
//   paint → screen + dialog overlay → framebuffer → diff renderer → terminal

mod app;
mod cli;
mod dialog;
mod logging;
mod store;
mod ui;

use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use d_term::event_loop::EventLoop;
use d_term::terminal::is_tty;
use d_theme::{builtin_names, builtin_theme, Theme};
use tracing::info;

use crate::app::Browser;
use crate::cli::Cli;
use crate::store::MemoryStore;

fn resolve_theme(name: &str, colors: Option<&str>) -> Result<Theme> {
    let Some(mut theme) = builtin_theme(name) else {
        bail!(
            "unknown theme '{name}' (available: {})",
            builtin_names().join(", ")
        );
    };
    if let Some(spec) = colors {
        theme
            .json
            .apply_overrides(spec)
            .with_context(|| format!("invalid --colors '{spec}'"))?;
    }
    Ok(theme)
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.log_file.as_deref())?;

    let theme = resolve_theme(&cli.theme, cli.colors.as_deref())?;
    if !is_tty() {
        bail!("stdin is not a terminal");
    }

    info!(theme = %theme.name, page_size = cli.page_size, "starting");
    let mut app = Browser::new(MemoryStore::new(), theme, cli.page_size, cli.uri.as_deref());
    EventLoop::new()
        .run(&mut app)
        .context("terminal session failed")?;
    info!("exiting");
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("d-tui: {e:#}");
            ExitCode::FAILURE
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_theme_resolves() {
        let theme = resolve_theme("mono", None).unwrap();
        assert_eq!(theme.name, "mono");
    }

    #[test]
    fn unknown_theme_lists_choices() {
        let err = resolve_theme("neon", None).unwrap_err().to_string();
        assert!(err.contains("unknown theme 'neon'"), "{err}");
        assert!(err.contains("default"), "{err}");
    }

    #[test]
    fn colors_override_the_palette() {
        let plain = resolve_theme("default", None).unwrap();
        let tinted = resolve_theme("default", Some("key=#123456")).unwrap();
        assert_ne!(plain.json, tinted.json);
    }

    #[test]
    fn bad_colors_are_reported() {
        let err = resolve_theme("default", Some("key")).unwrap_err();
        assert!(format!("{err:#}").contains("expected class=color"), "{err:#}");
    }
}
