//! Environment variable handling for configuration overrides.
//!
//! The host environment supplies the storage layout: the trusted roots, the
//! emulated-storage flag, and the legacy `EXTERNAL_STORAGE` root that is
//! aliased onto the first trusted root.

use std::env;
use std::path::PathBuf;

use crate::boundary::LegacyAlias;
use crate::config::schema::Config;
use crate::error::{Error, Result};

/// Trusted roots, separated like `PATH`.
pub const TRUSTED_ROOTS_VAR: &str = "OPPGUARD_TRUSTED_ROOTS";
/// Whether external storage is emulated.
pub const EMULATED_STORAGE_VAR: &str = "OPPGUARD_EMULATED_STORAGE";
/// The legacy external storage root provided by the host.
pub const EXTERNAL_STORAGE_VAR: &str = "EXTERNAL_STORAGE";
/// Comma-separated forbidden content hosts.
pub const FORBIDDEN_HOSTS_VAR: &str = "OPPGUARD_FORBIDDEN_HOSTS";
/// Share provider authority.
pub const SHARE_AUTHORITY_VAR: &str = "OPPGUARD_SHARE_AUTHORITY";
/// Stream close bound in milliseconds.
pub const CLOSE_TIMEOUT_VAR: &str = "OPPGUARD_CLOSE_TIMEOUT_MS";

/// Every variable read by [`EnvironmentConfig::apply_overrides`].
pub const ALL_VARS: [&str; 6] = [
    TRUSTED_ROOTS_VAR,
    EMULATED_STORAGE_VAR,
    EXTERNAL_STORAGE_VAR,
    FORBIDDEN_HOSTS_VAR,
    SHARE_AUTHORITY_VAR,
    CLOSE_TIMEOUT_VAR,
];

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use oppguard::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::defaults();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to `config`.
    ///
    /// `EXTERNAL_STORAGE` is applied last so that it aliases onto the trusted
    /// roots after any override of those roots.
    ///
    /// # Errors
    ///
    /// Returns a validation error if any variable holds an unparseable value.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Some(roots) = env::var_os(TRUSTED_ROOTS_VAR) {
            let roots: Vec<PathBuf> = env::split_paths(&roots)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
            if roots.is_empty() {
                return Err(Error::Validation {
                    field: TRUSTED_ROOTS_VAR.into(),
                    message: "Must name at least one directory".into(),
                });
            }
            config.trusted_roots = Some(roots);
        }

        if let Ok(val) = env::var(EMULATED_STORAGE_VAR) {
            config.emulated_storage = Some(Self::parse_bool(EMULATED_STORAGE_VAR, &val)?);
        }

        if let Ok(hosts) = env::var(FORBIDDEN_HOSTS_VAR) {
            config.forbidden_content_hosts = Some(Self::parse_list(&hosts));
        }

        if let Ok(authority) = env::var(SHARE_AUTHORITY_VAR) {
            config.share_authority = Some(authority.trim().to_string());
        }

        if let Ok(ms) = env::var(CLOSE_TIMEOUT_VAR) {
            config.close_timeout_ms = Some(ms.trim().parse().map_err(|_| Error::Validation {
                field: CLOSE_TIMEOUT_VAR.into(),
                message: "Must be a positive integer".into(),
            })?);
        }

        Self::apply_external_storage(config);

        Ok(())
    }

    /// Alias `EXTERNAL_STORAGE` onto the first trusted root.
    fn apply_external_storage(config: &mut Config) {
        let Some(legacy_root) = env::var_os(EXTERNAL_STORAGE_VAR).map(PathBuf::from) else {
            return;
        };
        if legacy_root.as_os_str().is_empty() {
            return;
        }
        let Some(target) = config
            .trusted_roots
            .as_ref()
            .and_then(|roots| roots.first())
            .cloned()
        else {
            log::debug!("{EXTERNAL_STORAGE_VAR} set but no trusted root to alias onto");
            return;
        };
        if legacy_root == target {
            return;
        }

        let alias = LegacyAlias::new(legacy_root, target);
        let aliases = config.legacy_aliases.get_or_insert_with(Vec::new);
        if !aliases.contains(&alias) {
            aliases.push(alias);
        }
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }

    fn parse_list(s: &str) -> Vec<String> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    }
}
