//! Configuration system for oppguard.
//!
//! This module provides layered configuration with support for:
//! - A YAML configuration file (`~/.oppguard/config.yaml` or an explicit path)
//! - Environment variable overrides, including the host's `EXTERNAL_STORAGE`
//! - Programmatic configuration via builder pattern
//! - Validation of the merged result
//!
//! # Configuration Precedence
//!
//! Highest to lowest:
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`OPPGUARD_*`, `EXTERNAL_STORAGE`)
//! 3. Configuration file
//! 4. Built-in defaults
//!
//! # Examples
//!
//! ```
//! use oppguard::boundary::StoragePolicy;
//! use oppguard::config::{Config, ConfigBuilder};
//! use std::path::PathBuf;
//!
//! let config = ConfigBuilder::new()
//!     .skip_files()
//!     .skip_env()
//!     .with_config(Config {
//!         trusted_roots: Some(vec![PathBuf::from("/data/media/0")]),
//!         ..Default::default()
//!     })
//!     .build()
//!     .unwrap();
//!
//! let policy = StoragePolicy::from(&config);
//! assert_eq!(policy.trusted_roots, vec![PathBuf::from("/data/media/0")]);
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::ConfigLoader;
pub use merger::ConfigMerger;
pub use schema::Config;
pub use validator::ConfigValidator;
