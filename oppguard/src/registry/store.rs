//! The concurrent transfer registry.

use std::fmt;
use std::io;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::diagnostics::{DiagnosticEvent, DiagnosticReporter, DiagnosticSite};
use crate::registry::resource::{StreamBusy, TransferId, TransferResource};

/// Default bound on closing a removed resource's stream.
pub const DEFAULT_CLOSE_TIMEOUT: Duration = Duration::from_millis(2000);

/// Tunables for a [`TransferRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryOptions {
    /// How long `remove` waits for a stream to close before giving up.
    pub close_timeout: Duration,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            close_timeout: DEFAULT_CLOSE_TIMEOUT,
        }
    }
}

/// Result of [`TransferRegistry::put`].
#[derive(Debug)]
pub enum PutOutcome {
    /// The identifier was free.
    Inserted,
    /// The identifier was taken; the displaced resource is returned unclosed.
    Replaced(Arc<TransferResource>),
    /// The resource was the invalid marker and was not stored.
    Rejected,
}

impl PutOutcome {
    /// Whether the resource was refused.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected)
    }

    /// The resource displaced by an overwrite, if any.
    #[must_use]
    pub fn displaced(&self) -> Option<&Arc<TransferResource>> {
        match self {
            Self::Replaced(previous) => Some(previous),
            _ => None,
        }
    }
}

/// What happened to the stream of a removed resource.
#[derive(Debug)]
pub enum CloseOutcome {
    /// The stream was open and is now closed.
    Closed,
    /// The resource held no open stream.
    NoStream,
    /// Closing the stream failed.
    Failed(io::Error),
    /// Closing did not finish within the configured bound.
    TimedOut,
}

impl CloseOutcome {
    /// Whether the resource's stream is known to be released.
    #[must_use]
    pub fn is_released(&self) -> bool {
        matches!(self, Self::Closed | Self::NoStream)
    }
}

/// A resource taken out of the registry.
#[derive(Debug)]
pub struct Removal {
    /// The resource that was registered.
    pub resource: Arc<TransferResource>,
    /// What happened when its stream was closed.
    pub close: CloseOutcome,
}

/// Maps transfer identifiers to their in-flight resources.
///
/// Operations on different identifiers never contend with each other. At
/// most one resource is reachable per identifier; [`remove`](Self::remove)
/// closes the stream before returning.
///
/// Entries are never evicted. Whoever starts a transfer must remove it when
/// the transfer finishes or is cancelled.
///
/// # Examples
///
/// ```
/// use oppguard::diagnostics::LogReporter;
/// use oppguard::registry::{TransferId, TransferRegistry, TransferResource};
/// use std::io::Cursor;
/// use std::sync::Arc;
///
/// let registry = TransferRegistry::new(Arc::new(LogReporter));
/// let id = TransferId::parse("bt-opp://transfer/42").unwrap();
/// let resource = TransferResource::new("a.bin", None, 3, Box::new(Cursor::new(b"abc".to_vec())));
///
/// registry.put(id.clone(), resource);
/// assert!(registry.get(&id).is_some());
///
/// let removal = registry.remove(&id).unwrap();
/// assert!(removal.close.is_released());
/// assert!(registry.get_or_error(&id).is_error());
/// ```
pub struct TransferRegistry {
    entries: DashMap<TransferId, Arc<TransferResource>>,
    error: Arc<TransferResource>,
    options: RegistryOptions,
    reporter: Arc<dyn DiagnosticReporter>,
}

impl fmt::Debug for TransferRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferRegistry")
            .field("entries", &self.entries.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl TransferRegistry {
    /// Create an empty registry with default options.
    pub fn new(reporter: Arc<dyn DiagnosticReporter>) -> Self {
        Self::with_options(RegistryOptions::default(), reporter)
    }

    /// Create an empty registry.
    pub fn with_options(options: RegistryOptions, reporter: Arc<dyn DiagnosticReporter>) -> Self {
        Self {
            entries: DashMap::new(),
            error: Arc::new(TransferResource::error()),
            options,
            reporter,
        }
    }

    /// The options this registry was built with.
    #[must_use]
    pub fn options(&self) -> RegistryOptions {
        self.options
    }

    /// Register `resource` under `id`, replacing whatever was there.
    ///
    /// The invalid marker is refused. A displaced resource is handed back
    /// without closing its stream; the caller owns its cleanup.
    pub fn put(&self, id: TransferId, resource: TransferResource) -> PutOutcome {
        if resource.is_error() {
            self.report(DiagnosticSite::InvalidResourceRejected, id.to_string());
            return PutOutcome::Rejected;
        }

        log::debug!("registering transfer {id}");
        match self.entries.insert(id, Arc::new(resource)) {
            None => PutOutcome::Inserted,
            Some(previous) => {
                log::debug!("displaced resource {:?} was not closed", previous.file_name());
                PutOutcome::Replaced(previous)
            }
        }
    }

    /// The resource registered under `id`.
    #[must_use]
    pub fn get(&self, id: &TransferId) -> Option<Arc<TransferResource>> {
        self.entries.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// The resource registered under `id`, or the shared invalid marker.
    #[must_use]
    pub fn get_or_error(&self, id: &TransferId) -> Arc<TransferResource> {
        self.get(id).unwrap_or_else(|| self.error_resource())
    }

    /// The shared invalid marker returned by [`get_or_error`](Self::get_or_error).
    #[must_use]
    pub fn error_resource(&self) -> Arc<TransferResource> {
        Arc::clone(&self.error)
    }

    /// Whether anything is registered under `id`.
    #[must_use]
    pub fn contains(&self, id: &TransferId) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of registered transfers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no transfers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Unregister `id` and close its stream.
    ///
    /// Returns `None` when nothing was registered. The slot is freed even
    /// when closing fails or times out; that case is reported and shows up
    /// in [`Removal::close`].
    pub fn remove(&self, id: &TransferId) -> Option<Removal> {
        let (id, resource) = self.entries.remove(id)?;
        let close = self.close_stream(&id, &resource);
        log::debug!("removed transfer {id}: {close:?}");
        Some(Removal { resource, close })
    }

    fn close_stream(&self, id: &TransferId, resource: &TransferResource) -> CloseOutcome {
        let bound = self.options.close_timeout;
        let started = Instant::now();

        let stream = match resource.try_take_stream(bound) {
            Ok(Some(stream)) => stream,
            Ok(None) => return CloseOutcome::NoStream,
            Err(StreamBusy) => {
                self.report(DiagnosticSite::StreamCloseTimedOut, id.to_string());
                return CloseOutcome::TimedOut;
            }
        };

        let (tx, rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("oppguard-close".to_string())
            .spawn(move || {
                // The receiver is gone if the close already timed out.
                let _ = tx.send(stream.close());
            });
        if let Err(e) = spawned {
            self.report(DiagnosticSite::StreamCloseFailed, format!("{id}: {e}"));
            return CloseOutcome::Failed(e);
        }

        match rx.recv_timeout(bound.saturating_sub(started.elapsed())) {
            Ok(Ok(())) => CloseOutcome::Closed,
            Ok(Err(e)) => {
                self.report(DiagnosticSite::StreamCloseFailed, format!("{id}: {e}"));
                CloseOutcome::Failed(e)
            }
            Err(RecvTimeoutError::Timeout) => {
                self.report(DiagnosticSite::StreamCloseTimedOut, id.to_string());
                CloseOutcome::TimedOut
            }
            Err(RecvTimeoutError::Disconnected) => {
                self.report(
                    DiagnosticSite::StreamCloseFailed,
                    format!("{id}: close panicked"),
                );
                CloseOutcome::Failed(io::Error::new(
                    io::ErrorKind::Other,
                    "stream close panicked",
                ))
            }
        }
    }

    fn report(&self, site: DiagnosticSite, detail: String) {
        self.reporter.report(&DiagnosticEvent::new(site, detail));
    }
}
