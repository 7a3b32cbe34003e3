//! Transfer identifiers and the resources registered under them.

use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use parking_lot::Mutex;
use url::Url;

use crate::error::{Error, Result};

/// Opaque identifier of one outbound transfer, shaped as a URI.
///
/// # Examples
///
/// ```
/// use oppguard::registry::TransferId;
///
/// let a: TransferId = "bt-opp://transfer/42".parse().unwrap();
/// let b = TransferId::parse("bt-opp://transfer/42").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "bt-opp://transfer/42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransferId(Url);

impl TransferId {
    /// Parse an identifier from its URI text.
    ///
    /// # Errors
    ///
    /// Returns `InvalidReference` if the text is not an absolute URI.
    pub fn parse(text: &str) -> Result<Self> {
        Url::parse(text)
            .map(Self)
            .map_err(|source| Error::InvalidReference {
                reference: text.to_string(),
                source,
            })
    }

    /// The identifier as a URI.
    #[must_use]
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// The identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Url> for TransferId {
    fn from(url: Url) -> Self {
        Self(url)
    }
}

impl FromStr for TransferId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A readable byte stream that must be released explicitly.
pub trait TransferStream: Read + Send {
    /// Release the underlying handle.
    ///
    /// # Errors
    ///
    /// Returns the error raised while releasing the handle.
    fn close(self: Box<Self>) -> io::Result<()>;
}

impl TransferStream for File {
    fn close(self: Box<Self>) -> io::Result<()> {
        drop(self);
        Ok(())
    }
}

impl TransferStream for Cursor<Vec<u8>> {
    fn close(self: Box<Self>) -> io::Result<()> {
        Ok(())
    }
}

/// Whether a resource is usable or is the invalid marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceStatus {
    /// The resource wraps an opened stream.
    Ready,
    /// The sender could not open the file; no stream is held.
    FileError,
}

/// The lock on a resource's stream could not be taken in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StreamBusy;

/// An in-flight transfer: an opened stream plus its metadata.
///
/// The stream is closed at most once. After [`close`](Self::close) (or
/// removal from a registry) reads fail with [`io::ErrorKind::BrokenPipe`].
pub struct TransferResource {
    file_name: String,
    mime_type: Option<String>,
    length: u64,
    status: ResourceStatus,
    stream: Mutex<Option<Box<dyn TransferStream>>>,
}

impl TransferResource {
    /// Wrap an opened stream.
    pub fn new(
        file_name: impl Into<String>,
        mime_type: Option<String>,
        length: u64,
        stream: Box<dyn TransferStream>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type,
            length,
            status: ResourceStatus::Ready,
            stream: Mutex::new(Some(stream)),
        }
    }

    /// Open `file` and wrap it, taking the length from its metadata.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be opened or inspected.
    pub fn open(path: &Path, mime_type: Option<String>) -> Result<Self> {
        let file = File::open(path)?;
        let length = file.metadata()?.len();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(file_name, mime_type, length, Box::new(file)))
    }

    /// The invalid marker: no stream, no metadata.
    ///
    /// Senders produce this when a file cannot be opened; a registry refuses
    /// to store it.
    #[must_use]
    pub fn error() -> Self {
        Self {
            file_name: String::new(),
            mime_type: None,
            length: 0,
            status: ResourceStatus::FileError,
            stream: Mutex::new(None),
        }
    }

    /// Whether this is the invalid marker.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status == ResourceStatus::FileError
    }

    /// Resource status.
    #[must_use]
    pub fn status(&self) -> ResourceStatus {
        self.status
    }

    /// Display name of the file being sent.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// MIME type, if known.
    #[must_use]
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Total length in bytes.
    #[must_use]
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Whether the stream is still held open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.stream.lock().is_some()
    }

    /// Read from the stream.
    ///
    /// # Errors
    ///
    /// Fails with `BrokenPipe` once the stream has been closed, otherwise
    /// propagates the stream's own read error.
    pub fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        match self.stream.lock().as_mut() {
            Some(stream) => stream.read(buf),
            None => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "transfer stream is closed",
            )),
        }
    }

    /// Close the stream now.
    ///
    /// Returns `Ok(false)` if there was no stream left to close.
    ///
    /// # Errors
    ///
    /// Returns the stream's close error. The stream is released either way
    /// and is not closed again.
    pub fn close(&self) -> io::Result<bool> {
        let taken = self.stream.lock().take();
        match taken {
            Some(stream) => stream.close().map(|()| true),
            None => Ok(false),
        }
    }

    /// Take the stream out for closing, waiting at most `wait` for readers.
    pub(crate) fn try_take_stream(
        &self,
        wait: Duration,
    ) -> std::result::Result<Option<Box<dyn TransferStream>>, StreamBusy> {
        self.stream
            .try_lock_for(wait)
            .map(|mut guard| guard.take())
            .ok_or(StreamBusy)
    }
}

impl fmt::Debug for TransferResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferResource")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("length", &self.length)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}
