//! CLI definitions for feedtidy.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// feedtidy CLI.
#[derive(Parser)]
#[command(name = "feedtidy")]
#[command(about = "Expands mention previews and hides duplicate entries in a notification feed")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/feedtidy.toml", global = true)]
    pub config: PathBuf,

    /// Also write logs to daily rotated files in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Replay a document fixture on a virtual clock and print entry state
    Replay {
        /// JSON document fixture
        fixture: PathBuf,

        /// Virtual time to advance to, in milliseconds after load
        #[arg(long, default_value_t = 5000)]
        at_ms: u64,

        /// Extra mutation-triggered passes after reaching `at_ms`
        #[arg(long, default_value_t = 0)]
        passes: u32,
    },

    /// Drive a document fixture in real time, reading host events as JSON
    /// lines from stdin
    Watch {
        /// JSON document fixture
        fixture: PathBuf,

        /// Stop after this many milliseconds (default: until Ctrl-C)
        #[arg(long)]
        duration_ms: Option<u64>,
    },

    /// Load and validate the configuration file
    CheckConfig,
}
