//! Command to print the effective configuration.

use crate::error::CliError;
use crate::utils::{load_configuration, GlobalOptions};
use clap::{Args, ValueEnum};

/// Output format for `show-config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// YAML, the same shape as the configuration file
    Yaml,
    /// Pretty-printed JSON
    Json,
}

/// Print the effective configuration after merging every source.
#[derive(Args)]
pub struct ShowConfigCommand {
    /// Output format
    #[arg(long, value_enum, default_value_t = ConfigFormat::Yaml)]
    pub format: ConfigFormat,
}

impl ShowConfigCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;

        let rendered = match self.format {
            ConfigFormat::Yaml => {
                serde_yaml::to_string(&config).map_err(|e| CliError::Config(e.to_string()))?
            }
            ConfigFormat::Json => serde_json::to_string_pretty(&config)
                .map_err(|e| CliError::Config(e.to_string()))?,
        };

        print!("{rendered}");
        if !rendered.ends_with('\n') {
            println!();
        }
        Ok(())
    }
}
