// SPDX-License-Identifier: MIT
//
// Command-line options. Every option also reads an environment variable
// so a shell profile can pin the store and the colors.

use std::path::PathBuf;

use clap::Parser;

fn parse_page_size(value: &str) -> Result<usize, String> {
    let parsed = value
        .parse::<usize>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if !(1..=1000).contains(&parsed) {
        return Err("value must be in range 1..=1000".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Parser)]
#[command(
    name = "d-tui",
    about = "Browse and edit a document database from the terminal",
    version
)]
pub struct Cli {
    #[arg(
        long,
        env = "D_TUI_URI",
        help = "Connection URI to pre-fill: mem://[db], file://<path> or a .json path"
    )]
    pub uri: Option<String>,

    #[arg(
        long,
        env = "D_TUI_THEME",
        default_value = "default",
        help = "Color theme: default, ansi, mono or monochrome"
    )]
    pub theme: String,

    #[arg(
        long,
        env = "D_TUI_COLORS",
        help = "JSON token color overrides, e.g. key=blue,string=#a6e3a1"
    )]
    pub colors: Option<String>,

    #[arg(
        long = "page-size",
        env = "D_TUI_PAGE_SIZE",
        default_value_t = 10,
        value_parser = parse_page_size,
        help = "Documents shown per page in the document viewer"
    )]
    pub page_size: usize,

    #[arg(
        long = "log-file",
        env = "D_TUI_LOG_FILE",
        help = "Append logs to this file (level from D_TUI_LOG, default warn)"
    )]
    pub log_file: Option<PathBuf>,
}
