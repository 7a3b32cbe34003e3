//! Parsing of the file references handed to the boundary checks.

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{Error, Result};

/// URI scheme that denotes a local file.
pub const FILE_SCHEME: &str = "file";

/// A reference to a file as supplied by a collaborator.
///
/// Text without a scheme is a bare local path; anything else is a URI.
///
/// # Examples
///
/// ```
/// use oppguard::boundary::FileReference;
/// use std::path::Path;
///
/// let bare = FileReference::parse("/sdcard/Download/a.bin").unwrap();
/// assert_eq!(bare.local_path().as_deref(), Some(Path::new("/sdcard/Download/a.bin")));
///
/// let uri = FileReference::parse("file:///sdcard/Download/a.bin").unwrap();
/// assert!(uri.is_local_file());
///
/// let remote = FileReference::parse("https://example.com/a.bin").unwrap();
/// assert!(!remote.is_local_file());
/// assert_eq!(remote.authority(), Some("example.com"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileReference {
    /// A plain filesystem path with no scheme.
    Path(PathBuf),
    /// A URI of any scheme.
    Uri(Url),
}

impl FileReference {
    /// Parse a reference from text.
    ///
    /// # Errors
    ///
    /// Returns `InvalidReference` when the text has a scheme but is not a
    /// well-formed URI.
    pub fn parse(reference: &str) -> Result<Self> {
        match Url::parse(reference) {
            Ok(url) => Ok(Self::Uri(url)),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Ok(Self::Path(PathBuf::from(reference)))
            }
            Err(source) => Err(Error::InvalidReference {
                reference: reference.to_string(),
                source,
            }),
        }
    }

    /// The URI scheme, or `None` for a bare path.
    #[must_use]
    pub fn scheme(&self) -> Option<&str> {
        match self {
            Self::Path(_) => None,
            Self::Uri(url) => Some(url.scheme()),
        }
    }

    /// The URI authority (host), if any.
    #[must_use]
    pub fn authority(&self) -> Option<&str> {
        match self {
            Self::Path(_) => None,
            Self::Uri(url) => url.host_str(),
        }
    }

    /// Whether this reference names a file on the local filesystem.
    #[must_use]
    pub fn is_local_file(&self) -> bool {
        self.local_path().is_some()
    }

    /// The local filesystem path, if this is a bare path or a `file:` URI
    /// without a remote host.
    #[must_use]
    pub fn local_path(&self) -> Option<PathBuf> {
        match self {
            Self::Path(path) => Some(path.clone()),
            Self::Uri(url) if url.scheme() == FILE_SCHEME => url.to_file_path().ok(),
            Self::Uri(_) => None,
        }
    }
}

impl From<Url> for FileReference {
    fn from(url: Url) -> Self {
        Self::Uri(url)
    }
}

impl From<&Path> for FileReference {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl fmt::Display for FileReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Uri(url) => write!(f, "{url}"),
        }
    }
}
