//! Segment-level path relationships.
//!
//! All comparisons here walk the ancestor chain of a path and compare whole
//! paths for equality, so `/ext/media2` is never considered to be inside
//! `/ext/media` even though the strings share a prefix. No filesystem access
//! happens in this module; callers canonicalize first.

use std::path::Path;

/// How many parent steps it takes to get from `child` up to `base`.
///
/// Returns `Some(0)` when the paths are equal, `Some(n)` when `base` is the
/// `n`-th ancestor of `child`, and `None` when the walk reaches the root
/// without meeting `base`.
///
/// # Examples
///
/// ```
/// use oppguard::path::relationship::containment_depth;
/// use std::path::Path;
///
/// let root = Path::new("/storage/emulated/0");
/// assert_eq!(containment_depth(root, root), Some(0));
/// assert_eq!(
///     containment_depth(root, Path::new("/storage/emulated/0/Download/a.bin")),
///     Some(2)
/// );
/// assert_eq!(containment_depth(root, Path::new("/storage/emulated/01/a.bin")), None);
/// ```
#[must_use]
pub fn containment_depth(base: &Path, child: &Path) -> Option<usize> {
    child.ancestors().position(|ancestor| ancestor == base)
}

/// Whether `child` is `base` itself or lies somewhere beneath it.
#[must_use]
pub fn is_same_or_descendant(base: &Path, child: &Path) -> bool {
    containment_depth(base, child).is_some()
}

/// Relationship between two paths.
///
/// # Examples
///
/// ```
/// use oppguard::path::PathRelationship;
/// use std::path::Path;
///
/// assert_eq!(
///     PathRelationship::between(Path::new("/ext"), Path::new("/ext/media")),
///     PathRelationship::Ancestor
/// );
/// assert_eq!(
///     PathRelationship::between(Path::new("/ext/media"), Path::new("/ext/media2")),
///     PathRelationship::Unrelated
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathRelationship {
    /// The first path is an ancestor of the second.
    Ancestor,
    /// The first path is a descendant of the second.
    Descendant,
    /// The paths are the same.
    Same,
    /// Neither path contains the other.
    Unrelated,
}

impl PathRelationship {
    /// Determine the relationship between two paths.
    #[must_use]
    pub fn between(path1: &Path, path2: &Path) -> Self {
        match containment_depth(path1, path2) {
            Some(0) => Self::Same,
            Some(_) => Self::Ancestor,
            None if is_same_or_descendant(path2, path1) => Self::Descendant,
            None => Self::Unrelated,
        }
    }

    /// Check if `path` is within `directory` (descendant or same).
    ///
    /// # Examples
    ///
    /// ```
    /// use oppguard::path::PathRelationship;
    /// use std::path::Path;
    ///
    /// let dir = Path::new("/storage/emulated/0");
    /// assert!(PathRelationship::is_within(Path::new("/storage/emulated/0/a.bin"), dir));
    /// assert!(PathRelationship::is_within(dir, dir));
    /// assert!(!PathRelationship::is_within(Path::new("/storage"), dir));
    /// ```
    #[must_use]
    pub fn is_within(path: &Path, directory: &Path) -> bool {
        matches!(
            Self::between(path, directory),
            Self::Descendant | Self::Same
        )
    }
}
