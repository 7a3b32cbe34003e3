//! Path handling primitives used by the storage-boundary checks.
//!
//! # Key Concepts
//!
//! ## Normalization
//!
//! Lexical clean-up only: making a path absolute, expanding `~` in
//! configured paths, and folding `.` and `..` components. See [`normalize`].
//!
//! ## Canonicalization
//!
//! Following symlinks to the real location on disk. A path whose trailing
//! components do not exist yet is resolved through its longest existing
//! ancestor. See [`canonicalize`].
//!
//! ## Relationships
//!
//! Containment is decided by walking the ancestor chain and comparing whole
//! paths, never by string prefix:
//!
//! ```
//! use oppguard::path::PathRelationship;
//! use std::path::Path;
//!
//! let root = Path::new("/ext/media");
//! assert!(PathRelationship::is_within(Path::new("/ext/media/a.bin"), root));
//! assert!(!PathRelationship::is_within(Path::new("/ext/media2/a.bin"), root));
//! ```

pub mod canonicalize;
pub mod normalize;
pub mod relationship;

pub use relationship::PathRelationship;
