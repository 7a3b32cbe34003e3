//! Lexical path normalization.
//!
//! Nothing here touches the filesystem except to read the current
//! directory. These helpers produce the "literal" shape of a path, which is
//! what containment falls back to when canonicalization fails, and what
//! configured roots look like before they are resolved.

use std::env;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Expand a leading tilde (`~` or `~/...`) to the home directory.
///
/// `~user` syntax is rejected. Paths without a leading tilde are returned
/// unchanged.
///
/// # Errors
///
/// Returns an error if the path is not valid UTF-8, the home directory
/// cannot be determined, or `~user` syntax is used.
///
/// # Examples
///
/// ```
/// use oppguard::path::normalize::expand_tilde;
/// use std::path::Path;
///
/// let expanded = expand_tilde(Path::new("~/Download")).unwrap();
/// assert!(expanded.is_absolute());
/// assert!(expanded.ends_with("Download"));
///
/// let untouched = expand_tilde(Path::new("/storage/emulated/0")).unwrap();
/// assert_eq!(untouched, Path::new("/storage/emulated/0"));
/// ```
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_str().ok_or_else(|| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: "Path contains invalid UTF-8".to_string(),
    })?;

    if !path_str.starts_with('~') {
        return Ok(path.to_path_buf());
    }

    let home = home::home_dir().ok_or_else(|| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: "Cannot determine home directory".to_string(),
    })?;

    if path_str == "~" {
        Ok(home)
    } else if let Some(rest) = path_str
        .strip_prefix("~/")
        .or_else(|| path_str.strip_prefix("~\\"))
    {
        Ok(home.join(rest))
    } else {
        Err(Error::InvalidPath {
            path: path.to_path_buf(),
            reason: "~user syntax is not supported; use ~ or ~/path".to_string(),
        })
    }
}

/// Remove `.` components and fold `..` components into their parent.
///
/// This is purely lexical: `a/link/..` becomes `a` even when `link` is a
/// symlink. Callers that need physical resolution use
/// [`crate::path::canonicalize`].
///
/// # Errors
///
/// Returns an error if a `..` component would climb above the root.
///
/// # Examples
///
/// ```
/// use oppguard::path::normalize::clean_components;
/// use std::path::{Path, PathBuf};
///
/// let cleaned = clean_components(Path::new("/ext/./media/../Download")).unwrap();
/// assert_eq!(cleaned, PathBuf::from("/ext/Download"));
///
/// assert!(clean_components(Path::new("/ext/../..")).is_err());
/// ```
pub fn clean_components(path: &Path) -> Result<PathBuf> {
    let mut result = PathBuf::new();
    let mut has_root = false;

    for component in path.components() {
        match component {
            Component::RootDir => {
                result.push(component);
                has_root = true;
            }
            Component::Prefix(prefix) => {
                result.push(prefix.as_os_str());
                has_root = true;
            }
            Component::Normal(c) => result.push(c),
            Component::CurDir => {}
            Component::ParentDir => {
                // `pop` on "/" leaves "/" in place and reports false.
                if !result.pop() {
                    return Err(Error::InvalidPath {
                        path: path.to_path_buf(),
                        reason: "Path contains too many '..' components (escapes root)"
                            .to_string(),
                    });
                }
            }
        }
    }

    if has_root && result.as_os_str().is_empty() {
        result.push(Component::RootDir);
    }

    Ok(result)
}

/// Make a path absolute against the current directory, then clean it.
///
/// # Errors
///
/// Returns an error if the current directory cannot be read or the path
/// escapes the root.
///
/// # Examples
///
/// ```
/// use oppguard::path::normalize::absolutize;
/// use std::path::Path;
///
/// let absolute = absolutize(Path::new("incoming/../file.bin")).unwrap();
/// assert!(absolute.is_absolute());
/// assert!(absolute.ends_with("file.bin"));
/// ```
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = env::current_dir().map_err(|e| Error::InvalidPath {
            path: path.to_path_buf(),
            reason: format!("Cannot get current directory: {e}"),
        })?;
        cwd.join(path)
    };

    clean_components(&absolute)
}

/// Expand tilde, make absolute, and clean a configured path.
///
/// # Errors
///
/// Returns an error if any of the individual steps fails.
pub fn normalize(path: &Path) -> Result<PathBuf> {
    absolutize(&expand_tilde(path)?)
}
