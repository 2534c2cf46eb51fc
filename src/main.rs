//! feedtidy - notification feed reconciler
//!
//! Diagnostic entry point: replays document fixtures through the controller
//! and validates configuration files.

mod cli;
mod cmd_check;
mod cmd_replay;
mod cmd_watch;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use feedtidy_config::{ConfigLoader, FeedConfig};

use crate::cli::{Cli, Commands};

/// Initialize tracing with console and optional file output.
///
/// Console output goes to stderr so command output on stdout stays valid JSON.
fn init_tracing(log_dir: Option<&Path>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("feedtidy")
                .filename_suffix("log")
                .max_log_files(7)
                .build(dir)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // The guard flushes on drop; keep it for the program duration.
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false).boxed())
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(())
}

/// Resolve the configuration path: `~` is expanded, and a missing file falls
/// back to the per-user config directory.
fn resolve_config_path(path: &Path) -> PathBuf {
    let expanded = PathBuf::from(ConfigLoader::expand_path(&path.to_string_lossy()));
    if expanded.exists() {
        return expanded;
    }
    dirs::config_dir()
        .map(|dir| dir.join("feedtidy").join("feedtidy.toml"))
        .filter(|candidate| candidate.exists())
        .unwrap_or(expanded)
}

/// Load the configuration, defaulting every section when no file exists.
pub(crate) fn load_config(path: &Path) -> anyhow::Result<FeedConfig> {
    let path = resolve_config_path(path);
    debug!(path = %path.display(), "loading configuration");
    ConfigLoader::load_or_default(&path)
        .with_context(|| format!("loading configuration from {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_dir.as_deref())?;
    info!(version = env!("CARGO_PKG_VERSION"), "feedtidy");

    match cli.command {
        Commands::Replay {
            fixture,
            at_ms,
            passes,
        } => {
            let config = load_config(&cli.config)?;
            cmd_replay::handle_replay(config, &fixture, at_ms, passes)
        }
        Commands::Watch {
            fixture,
            duration_ms,
        } => {
            let config = load_config(&cli.config)?;
            cmd_watch::handle_watch(config, &fixture, duration_ms).await
        }
        Commands::CheckConfig => cmd_check::handle_check_config(&resolve_config_path(&cli.config)),
    }
}
