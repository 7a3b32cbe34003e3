//! Configuration merging and precedence handling.

use crate::config::schema::Config;

/// Merges configuration layers according to precedence rules.
///
/// # Examples
///
/// ```
/// use oppguard::config::{Config, ConfigMerger};
///
/// let low = Config { share_authority: Some("low".to_string()), ..Default::default() };
/// let high = Config { share_authority: Some("high".to_string()), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.share_authority, Some("high".to_string()));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge layers given from lowest to highest precedence.
    #[must_use]
    pub fn merge(layers: &[Config]) -> Config {
        let mut result = Config::default();
        for layer in layers {
            Self::merge_into(&mut result, layer);
        }
        result
    }

    /// Merge `source` into `target` (source wins).
    ///
    /// # Merging Rules
    ///
    /// - Simple fields and lists: replaced when set in `source`
    /// - Legacy aliases: accumulated, without duplicates
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.trusted_roots.is_some() {
            target.trusted_roots.clone_from(&source.trusted_roots);
        }

        if source.emulated_storage.is_some() {
            target.emulated_storage = source.emulated_storage;
        }

        if source.forbidden_content_hosts.is_some() {
            target
                .forbidden_content_hosts
                .clone_from(&source.forbidden_content_hosts);
        }

        if source.share_authority.is_some() {
            target.share_authority.clone_from(&source.share_authority);
        }

        if source.close_timeout_ms.is_some() {
            target.close_timeout_ms = source.close_timeout_ms;
        }

        if let Some(ref source_aliases) = source.legacy_aliases {
            let aliases = target.legacy_aliases.get_or_insert_with(Vec::new);
            for alias in source_aliases {
                if !aliases.contains(alias) {
                    aliases.push(alias.clone());
                }
            }
        }
    }
}
