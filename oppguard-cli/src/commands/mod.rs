//! CLI command implementations.
//!
//! - `check_path`: Containment of a path or file URI
//! - `check_content`: Content-provider gates for a URI
//! - `validate`: Validate a configuration file
//! - `show_config`: Print the effective configuration

pub mod check_content;
pub mod check_path;
pub mod show_config;
pub mod validate;

pub use check_content::CheckContentCommand;
pub use check_path::CheckPathCommand;
pub use show_config::ShowConfigCommand;
pub use validate::ValidateCommand;
