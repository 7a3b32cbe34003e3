//! Configuration validation.

use std::path::Path;

use crate::config::schema::Config;
use crate::error::{Error, Result};
use crate::path::PathRelationship;

/// Validates a merged configuration.
///
/// # Examples
///
/// ```
/// use oppguard::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::defaults()).unwrap();
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure found.
    pub fn validate(config: &Config) -> Result<()> {
        let roots = config.trusted_roots.as_deref().unwrap_or_default();
        if roots.is_empty() {
            return Err(Error::Validation {
                field: "trusted_roots".into(),
                message: "At least one trusted root is required".into(),
            });
        }
        for root in roots {
            Self::validate_absolute("trusted_roots", root)?;
        }

        if let Some(ref aliases) = config.legacy_aliases {
            for alias in aliases {
                Self::validate_absolute("legacy_aliases.legacy_root", &alias.legacy_root)?;
                Self::validate_absolute("legacy_aliases.target", &alias.target)?;

                if !roots
                    .iter()
                    .any(|root| PathRelationship::is_within(&alias.target, root))
                {
                    return Err(Error::Validation {
                        field: "legacy_aliases.target".into(),
                        message: format!(
                            "{} is not inside any trusted root",
                            alias.target.display()
                        ),
                    });
                }
            }
        }

        if let Some(ref hosts) = config.forbidden_content_hosts {
            for host in hosts {
                Self::validate_authority("forbidden_content_hosts", host)?;
            }
        }

        if let Some(ref authority) = config.share_authority {
            Self::validate_authority("share_authority", authority)?;
        }

        if config.close_timeout_ms == Some(0) {
            return Err(Error::Validation {
                field: "close_timeout_ms".into(),
                message: "Timeout must be greater than 0".into(),
            });
        }

        Ok(())
    }

    fn validate_absolute(field: &str, path: &Path) -> Result<()> {
        if path.is_absolute() {
            Ok(())
        } else {
            Err(Error::Validation {
                field: field.into(),
                message: format!("{} must be an absolute path", path.display()),
            })
        }
    }

    /// Authorities are non-empty and contain no whitespace or separators.
    fn validate_authority(field: &str, value: &str) -> Result<()> {
        if value.is_empty() {
            return Err(Error::Validation {
                field: field.into(),
                message: "Cannot be empty".into(),
            });
        }
        if value.chars().any(|c| c.is_whitespace() || c == '/' || c == '\0') {
            return Err(Error::Validation {
                field: field.into(),
                message: format!("Invalid authority: '{value}'"),
            });
        }
        Ok(())
    }
}
