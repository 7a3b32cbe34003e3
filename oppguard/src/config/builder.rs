//! Layered configuration assembly.

use std::path::{Path, PathBuf};

use crate::config::environment::EnvironmentConfig;
use crate::config::loader::ConfigLoader;
use crate::config::merger::ConfigMerger;
use crate::config::schema::Config;
use crate::config::validator::ConfigValidator;
use crate::error::Result;
use crate::path::normalize::normalize;

/// Builds the effective configuration from every source.
///
/// # Examples
///
/// ```
/// use oppguard::config::{Config, ConfigBuilder};
///
/// let config = ConfigBuilder::new()
///     .skip_files()
///     .skip_env()
///     .with_config(Config {
///         close_timeout_ms: Some(500),
///         ..Default::default()
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(config.close_timeout_ms, Some(500));
/// assert!(config.share_authority.is_some());
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_file: Option<PathBuf>,
    skip_files: bool,
    skip_env: bool,
    overrides: Option<Config>,
}

impl ConfigBuilder {
    /// Create a builder that reads the user file and the environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `path` instead of `~/.oppguard/config.yaml`. The file must exist.
    #[must_use]
    pub fn with_config_file(mut self, path: &Path) -> Self {
        self.config_file = Some(path.to_path_buf());
        self
    }

    /// Do not read any configuration file.
    #[must_use]
    pub fn skip_files(mut self) -> Self {
        self.skip_files = true;
        self
    }

    /// Do not apply environment variable overrides.
    #[must_use]
    pub fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Apply `config` on top of every other source.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.overrides = Some(config);
        self
    }

    /// Merge defaults, file, environment and overrides, then validate.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be loaded, an environment variable
    /// is malformed, a path cannot be expanded, or validation fails.
    pub fn build(self) -> Result<Config> {
        let mut config = Config::defaults();

        if !self.skip_files {
            if let Some(file) = self.load_file()? {
                ConfigMerger::merge_into(&mut config, &file);
            }
        }

        if !self.skip_env {
            EnvironmentConfig::apply_overrides(&mut config)?;
        }

        if let Some(ref overrides) = self.overrides {
            ConfigMerger::merge_into(&mut config, overrides);
        }

        Self::expand_paths(&mut config)?;
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    fn load_file(&self) -> Result<Option<Config>> {
        if let Some(ref path) = self.config_file {
            return ConfigLoader::load_file(path).map(Some);
        }
        match ConfigLoader::user_config_path() {
            Ok(path) => ConfigLoader::load_optional(&path),
            Err(e) => {
                log::debug!("skipping user configuration: {e}");
                Ok(None)
            }
        }
    }

    fn expand_paths(config: &mut Config) -> Result<()> {
        if let Some(ref mut roots) = config.trusted_roots {
            for root in roots.iter_mut() {
                *root = normalize(root)?;
            }
        }
        if let Some(ref mut aliases) = config.legacy_aliases {
            for alias in aliases.iter_mut() {
                alias.legacy_root = normalize(&alias.legacy_root)?;
                alias.target = normalize(&alias.target)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::LegacyAlias;
    use crate::error::Error;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_only() {
        let config = ConfigBuilder::new().skip_files().skip_env().build().unwrap();
        assert_eq!(config, Config::defaults());
    }

    #[test]
    fn test_file_layer_applied() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "emulated_storage: true\nclose_timeout_ms: 900\n").unwrap();

        let config = ConfigBuilder::new()
            .with_config_file(&path)
            .skip_env()
            .build()
            .unwrap();
        assert_eq!(config.emulated_storage, Some(true));
        assert_eq!(config.close_timeout_ms, Some(900));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = ConfigBuilder::new()
            .with_config_file(&dir.path().join("missing.yaml"))
            .skip_env()
            .build();
        assert!(matches!(result, Err(Error::InvalidPath { .. })));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "share_authority: from.file\n").unwrap();

        let config = ConfigBuilder::new()
            .with_config_file(&path)
            .skip_env()
            .with_config(Config {
                share_authority: Some("from.code".to_string()),
                ..Default::default()
            })
            .build()
            .unwrap();
        assert_eq!(config.share_authority, Some("from.code".to_string()));
    }

    #[test]
    fn test_tilde_roots_expanded() {
        let config = ConfigBuilder::new()
            .skip_files()
            .skip_env()
            .with_config(Config {
                trusted_roots: Some(vec![PathBuf::from("~/Download")]),
                ..Default::default()
            })
            .build()
            .unwrap();
        let roots = config.trusted_roots.unwrap();
        assert!(roots[0].is_absolute());
        assert!(roots[0].ends_with("Download"));
    }

    #[test]
    fn test_configured_paths_are_cleaned() {
        let config = ConfigBuilder::new()
            .skip_files()
            .skip_env()
            .with_config(Config {
                trusted_roots: Some(vec![PathBuf::from("/storage/emulated/./0/")]),
                emulated_storage: Some(true),
                legacy_aliases: Some(vec![LegacyAlias::new(
                    "/mnt/../sdcard",
                    "/storage/emulated/0/Download/..",
                )]),
                ..Default::default()
            })
            .build()
            .unwrap();

        assert_eq!(
            config.trusted_roots,
            Some(vec![PathBuf::from("/storage/emulated/0")])
        );
        assert_eq!(
            config.legacy_aliases,
            Some(vec![LegacyAlias::new("/sdcard", "/storage/emulated/0")])
        );
    }

    #[test]
    fn test_invalid_merged_config_rejected() {
        let result = ConfigBuilder::new()
            .skip_files()
            .skip_env()
            .with_config(Config {
                close_timeout_ms: Some(0),
                ..Default::default()
            })
            .build();
        assert!(matches!(result, Err(Error::Validation { .. })));
    }
}
