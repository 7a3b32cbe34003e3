//! Physical path resolution.
//!
//! [`canonicalize`] follows every symlink but requires the whole path to
//! exist. [`resolve`] also accepts paths whose trailing components do not
//! exist yet (a file that is about to be written), by canonicalizing the
//! longest existing ancestor and re-attaching the rest.

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Canonicalize an existing path by following symlinks.
///
/// # Errors
///
/// Returns `PathNotFound`, `PermissionDenied`, or `Io` depending on why the
/// underlying `fs::canonicalize` call failed.
///
/// # Examples
///
/// ```no_run
/// use oppguard::path::canonicalize::canonicalize;
/// use std::path::Path;
///
/// let canonical = canonicalize(Path::new("/tmp")).unwrap();
/// assert!(canonical.is_absolute());
/// ```
pub fn canonicalize(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::PathNotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::PermissionDenied => Error::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => Error::Io(e),
    })
}

/// Canonicalize the existing portion of a path.
///
/// Returns the canonical form of the longest existing ancestor together with
/// the components below it that do not exist (if any).
///
/// # Errors
///
/// Returns an error if no existing ancestor can be found (for example a
/// trailing `..` below a missing directory) or if canonicalizing the existing
/// ancestor fails.
///
/// # Examples
///
/// ```no_run
/// use oppguard::path::canonicalize::canonicalize_existing;
/// use std::path::{Path, PathBuf};
///
/// let (canonical, remainder) =
///     canonicalize_existing(Path::new("/tmp/not-yet/file.bin")).unwrap();
/// assert_eq!(remainder, Some(PathBuf::from("not-yet/file.bin")));
/// ```
pub fn canonicalize_existing(path: &Path) -> Result<(PathBuf, Option<PathBuf>)> {
    if let Ok(canonical) = canonicalize(path) {
        return Ok((canonical, None));
    }

    let mut current = path.to_path_buf();
    let mut missing = Vec::new();

    loop {
        // `symlink_metadata` so that a dangling link counts as existing and
        // its failed resolution is reported instead of skipped over.
        if fs::symlink_metadata(&current).is_ok() {
            let canonical = canonicalize(&current)?;
            let remainder = if missing.is_empty() {
                None
            } else {
                missing.reverse();
                Some(missing.into_iter().collect())
            };
            return Ok((canonical, remainder));
        }

        match current.file_name() {
            Some(name) => {
                missing.push(name.to_os_string());
                current.pop();
            }
            None => {
                return Err(Error::InvalidPath {
                    path: path.to_path_buf(),
                    reason: "Cannot find any existing portion of path".to_string(),
                });
            }
        }
    }
}

/// Resolve a path to its canonical form, tolerating missing trailing
/// components. Relative paths are taken relative to the current directory.
///
/// # Errors
///
/// Propagates the errors of [`canonicalize_existing`], and fails if the
/// current directory is needed but cannot be read.
///
/// # Examples
///
/// ```no_run
/// use oppguard::path::canonicalize::resolve;
/// use std::path::Path;
///
/// let resolved = resolve(Path::new("/tmp/incoming/file.bin")).unwrap();
/// assert!(resolved.ends_with("incoming/file.bin"));
/// ```
pub fn resolve(path: &Path) -> Result<PathBuf> {
    let (canonical, remainder) = if path.is_absolute() {
        canonicalize_existing(path)?
    } else {
        canonicalize_existing(&env::current_dir()?.join(path))?
    };
    Ok(match remainder {
        Some(rest) => canonical.join(rest),
        None => canonical,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_canonicalize_nonexistent() {
        let result = canonicalize(Path::new("/nonexistent/path/xyz"));
        assert!(matches!(result.unwrap_err(), Error::PathNotFound { .. }));
    }

    #[test]
    fn test_canonicalize_existing_full_path_exists() {
        let dir = tempdir().unwrap();
        let (canonical, remainder) = canonicalize_existing(dir.path()).unwrap();
        assert_eq!(canonical, fs::canonicalize(dir.path()).unwrap());
        assert!(remainder.is_none());
    }

    #[test]
    fn test_canonicalize_existing_partial() {
        let dir = tempdir().unwrap();
        let full = dir.path().join("not-yet").join("file.bin");

        let (canonical, remainder) = canonicalize_existing(&full).unwrap();
        assert_eq!(canonical, fs::canonicalize(dir.path()).unwrap());
        assert_eq!(remainder, Some(PathBuf::from("not-yet").join("file.bin")));
    }

    #[test]
    fn test_canonicalize_existing_trailing_parent_below_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("..");
        assert!(canonicalize_existing(&path).is_err());
    }

    #[test]
    fn test_resolve_existing_and_missing() {
        let dir = tempdir().unwrap();
        let base = fs::canonicalize(dir.path()).unwrap();

        assert_eq!(resolve(dir.path()).unwrap(), base);
        assert_eq!(
            resolve(&dir.path().join("a").join("b")).unwrap(),
            base.join("a").join("b")
        );
    }

    #[test]
    fn test_resolve_relative_uses_current_dir() {
        let cwd = fs::canonicalize(env::current_dir().unwrap()).unwrap();
        let resolved = resolve(Path::new("not-a-real-dir-xyz/file.bin")).unwrap();
        assert_eq!(resolved, cwd.join("not-a-real-dir-xyz").join("file.bin"));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_follows_symlinked_directory() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let target = dir.path().join("target");
        let link = dir.path().join("link");
        fs::create_dir(&target).unwrap();
        symlink(&target, &link).unwrap();

        let resolved = resolve(&link.join("new.bin")).unwrap();
        assert_eq!(
            resolved,
            fs::canonicalize(&target).unwrap().join("new.bin")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_dangling_symlink_fails() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let link = dir.path().join("dangling");
        symlink(dir.path().join("gone"), &link).unwrap();

        assert!(resolve(&link.join("file.bin")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_symlink_loop_fails() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let link1 = dir.path().join("link1");
        let link2 = dir.path().join("link2");
        symlink(&link2, &link1).unwrap();
        symlink(&link1, &link2).unwrap();

        assert!(resolve(&link1).is_err());
    }
}
