//! CLI Module for jsplay
//! Lets the playground be used straight from the shell: run code, build
//! share links, and manage snippets without launching the TUI.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Terminal JavaScript playground with an embedded engine.
#[derive(Parser, Debug)]
#[command(name = "jsplay", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Config file to use instead of the default location.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding storage.json and the log file.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "jsplay=trace".
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Execute a file (or the saved playground code) and print its output.
    Run { file: Option<PathBuf> },

    /// Print a share URL for a file (or the saved playground code).
    Share { file: Option<PathBuf> },

    /// Import code from a share URL, then open the playground.
    Open { url: String },

    /// List saved snippets, newest first.
    List,

    /// Write a saved snippet to `<name>.js`.
    Export {
        name_or_id: String,

        /// Target directory (defaults to the configured export directory).
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Replace the playground code with the contents of a file.
    Import { file: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_launches_tui() {
        let cli = Cli::try_parse_from(["jsplay"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn parses_subcommands_and_global_flags() {
        let cli =
            Cli::try_parse_from(["jsplay", "run", "demo.js", "--data-dir", "/tmp/x"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Run {
                file: Some(PathBuf::from("demo.js"))
            })
        );
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));

        let cli = Cli::try_parse_from(["jsplay", "export", "fetch", "--out", "dist"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Export {
                name_or_id: "fetch".to_string(),
                out: Some(PathBuf::from("dist")),
            })
        );
    }

    #[test]
    fn open_requires_url() {
        assert!(Cli::try_parse_from(["jsplay", "open"]).is_err());
    }
}
