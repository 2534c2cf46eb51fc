//! `check-config` subcommand.

use std::path::Path;

use anyhow::bail;
use tracing::info;

use feedtidy_config::{ConfigLoader, ConfigValidator};

/// Load and validate the configuration file, printing every finding.
pub(crate) fn handle_check_config(path: &Path) -> anyhow::Result<()> {
    let config = ConfigLoader::load(path)?;
    let result = ConfigValidator::validate(&config);

    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("error: {}: {}", error.path, error.message);
    }

    if !result.is_valid() {
        bail!(
            "{} has {} error(s)",
            path.display(),
            result.errors.len()
        );
    }
    info!(path = %path.display(), warnings = result.warnings.len(), "configuration is valid");
    println!("{}: ok", path.display());
    Ok(())
}
