//! Utility functions for CLI operations.

use crate::error::CliError;
use oppguard::{Config, ConfigBuilder, DiagnosticReporter, LogReporter};
use std::path::PathBuf;
use std::sync::Arc;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Explicit configuration file.
    pub config: Option<PathBuf>,

    /// Skip environment overrides.
    pub no_env: bool,
}

/// Load the layered configuration.
///
/// Precedence, highest first: environment variables, the configuration
/// file (`--config` or `~/.oppguard/config.yaml`), built-in defaults.
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let mut builder = ConfigBuilder::new();
    if let Some(ref path) = global.config {
        builder = builder.with_config_file(path);
    }
    if global.no_env {
        builder = builder.skip_env();
    }

    let config = builder.build().map_err(|e| CliError::Config(e.to_string()))?;
    log::debug!(
        "effective configuration: {} trusted root(s), emulated storage {}",
        config.trusted_roots.as_ref().map_or(0, Vec::len),
        config.emulated_storage.unwrap_or(false)
    );
    Ok(config)
}

/// Diagnostic sink for a CLI run: every event goes to the log.
pub fn reporter() -> Arc<dyn DiagnosticReporter> {
    Arc::new(LogReporter)
}

/// Render a boolean as `yes` / `no`.
pub fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
