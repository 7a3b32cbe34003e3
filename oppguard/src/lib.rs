#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # oppguard
//!
//! Trust-boundary helpers for an object-push file transfer service.
//!
//! Before a received file is exposed to other processes it must be proven to
//! live inside an approved storage root, and while a send is in progress the
//! stream being sent must be owned by exactly one registry entry so it is
//! neither opened twice nor leaked.
//!
//! ## Core Types
//!
//! - [`ContainmentValidator`]: canonical-path containment against trusted roots
//! - [`ContentGate`]: forbidden content providers and share-URI recognition
//! - [`TransferRegistry`], [`TransferId`] and [`TransferResource`]: in-flight transfers
//! - [`DiagnosticReporter`]: counted events for every absorbed failure
//! - [`Config`] and [`ConfigBuilder`]: layered configuration
//! - [`Error`] and [`Result`]: error handling types
//! - [`Logger`] and [`LogLevel`]: logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use oppguard::{ContainmentValidator, CountingReporter, StoragePolicy};
//! use std::sync::Arc;
//!
//! let reporter = Arc::new(CountingReporter::new());
//! let validator = ContainmentValidator::new(
//!     StoragePolicy::new(["/storage/emulated/0"]),
//!     reporter.clone(),
//! );
//!
//! assert!(validator.is_contained("/storage/emulated/0/Download/photo.jpg"));
//! assert!(!validator.is_contained("/storage/emulated/0/../1/photo.jpg"));
//! ```

pub mod boundary;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod path;
pub mod registry;

// Re-export key types at crate root for convenience
pub use boundary::{
    ContainmentValidator, ContentGate, ContentPolicy, FileReference, LegacyAlias, StoragePolicy,
};
pub use config::{Config, ConfigBuilder};
pub use diagnostics::{
    CountingReporter, DiagnosticEvent, DiagnosticReporter, DiagnosticSite, EventKind, LogReporter,
};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use path::PathRelationship;
pub use registry::{
    CloseOutcome, PutOutcome, RegistryOptions, Removal, TransferId, TransferRegistry,
    TransferResource, TransferStream,
};
