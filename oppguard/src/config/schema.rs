//! Configuration schema definitions.
//!
//! Every field is optional so that partial files and environment overrides
//! can be layered on top of each other; [`Config::defaults`] fills in the
//! built-in values at the bottom of the stack.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::boundary::content::{DEFAULT_FORBIDDEN_HOSTS, DEFAULT_SHARE_AUTHORITY};
use crate::boundary::{ContentPolicy, LegacyAlias, StoragePolicy};
use crate::registry::{RegistryOptions, DEFAULT_CLOSE_TIMEOUT};

/// Default trusted storage root.
pub const DEFAULT_TRUSTED_ROOT: &str = "/storage/emulated/0";

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use oppguard::config::Config;
/// use std::path::PathBuf;
///
/// let config: Config = serde_yaml::from_str(
///     "trusted_roots: [/storage/emulated/0]\nclose_timeout_ms: 500\n",
/// ).unwrap();
/// assert_eq!(config.trusted_roots, Some(vec![PathBuf::from("/storage/emulated/0")]));
/// assert_eq!(config.close_timeout_ms, Some(500));
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directories that count as approved storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trusted_roots: Option<Vec<PathBuf>>,

    /// Whether external storage is emulated (enables legacy aliases).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emulated_storage: Option<bool>,

    /// Legacy roots rewritten onto a trusted root under emulated storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_aliases: Option<Vec<LegacyAlias>>,

    /// Content-provider hosts whose references are always refused.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forbidden_content_hosts: Option<Vec<String>>,

    /// Authority of the share provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_authority: Option<String>,

    /// Bound on closing a removed transfer's stream, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_timeout_ms: Option<u64>,
}

impl Config {
    /// The built-in configuration at the bottom of the precedence stack.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            trusted_roots: Some(vec![PathBuf::from(DEFAULT_TRUSTED_ROOT)]),
            emulated_storage: Some(false),
            legacy_aliases: None,
            forbidden_content_hosts: Some(
                DEFAULT_FORBIDDEN_HOSTS
                    .iter()
                    .map(|h| (*h).to_string())
                    .collect(),
            ),
            share_authority: Some(DEFAULT_SHARE_AUTHORITY.to_string()),
            close_timeout_ms: Some(millis(DEFAULT_CLOSE_TIMEOUT)),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl From<&Config> for StoragePolicy {
    fn from(config: &Config) -> Self {
        Self {
            trusted_roots: config.trusted_roots.clone().unwrap_or_default(),
            emulated: config.emulated_storage.unwrap_or(false),
            legacy_aliases: config.legacy_aliases.clone().unwrap_or_default(),
        }
    }
}

impl From<&Config> for ContentPolicy {
    fn from(config: &Config) -> Self {
        let defaults = Self::default();
        Self {
            forbidden_hosts: config
                .forbidden_content_hosts
                .clone()
                .unwrap_or(defaults.forbidden_hosts),
            share_authority: config
                .share_authority
                .clone()
                .unwrap_or(defaults.share_authority),
        }
    }
}

impl From<&Config> for RegistryOptions {
    fn from(config: &Config) -> Self {
        Self {
            close_timeout: config
                .close_timeout_ms
                .map_or(DEFAULT_CLOSE_TIMEOUT, Duration::from_millis),
        }
    }
}
