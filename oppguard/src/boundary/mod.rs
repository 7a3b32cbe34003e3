//! Trust-boundary checks for transferred files.
//!
//! [`ContainmentValidator`] answers whether a file reference resolves to a
//! location inside an approved storage root. [`ContentGate`] rejects content
//! served by internal providers and recognises the share provider's own
//! URIs. Both are evaluated before a file is exposed to another process.

pub mod containment;
pub mod content;
pub mod reference;

pub use containment::{ContainmentValidator, LegacyAlias, StoragePolicy};
pub use content::{ContentGate, ContentPolicy};
pub use reference::FileReference;
