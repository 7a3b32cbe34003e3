//! Counted diagnostic events.
//!
//! Every abnormal condition inside the containment validator and the
//! transfer registry is absorbed locally and reported here instead of being
//! propagated. Each reporting site carries a stable numeric code so an
//! external collector can aggregate events without parsing log text.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Broad classification of a diagnostic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A logical error detected by the caller-facing code path.
    LogError,
    /// An I/O or resolution failure caught and absorbed.
    Exception,
    /// A possible attack (e.g. a spoofed content authority).
    Security,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LogError => write!(f, "log-error"),
            Self::Exception => write!(f, "exception"),
            Self::Security => write!(f, "security"),
        }
    }
}

/// The place in the code that raised a diagnostic event.
///
/// Codes are stable and must never be reused for a different site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticSite {
    /// `put` was handed the invalid marker resource.
    InvalidResourceRejected,
    /// Closing a removed resource's stream failed.
    StreamCloseFailed,
    /// A containment check was asked about a non-file reference.
    NotLocalFile,
    /// A candidate path could not be canonicalized; the literal path was used.
    ResolutionFallback,
    /// A trusted root could not be resolved during the ancestor walk.
    ContainmentCheckFailed,
    /// Closing a removed resource's stream did not finish within the bound.
    StreamCloseTimedOut,
    /// A reference looked like a share URI but carried a different authority.
    ShareUriSpoof,
}

const SITE_COUNT: usize = 7;

impl DiagnosticSite {
    /// Every site, in code order.
    pub const ALL: [Self; SITE_COUNT] = [
        Self::InvalidResourceRejected,
        Self::StreamCloseFailed,
        Self::NotLocalFile,
        Self::ResolutionFallback,
        Self::ContainmentCheckFailed,
        Self::StreamCloseTimedOut,
        Self::ShareUriSpoof,
    ];

    /// Stable numeric code reported alongside the event.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::InvalidResourceRejected => 5,
            Self::StreamCloseFailed => 6,
            Self::NotLocalFile => 7,
            Self::ResolutionFallback => 8,
            Self::ContainmentCheckFailed => 9,
            Self::StreamCloseTimedOut => 10,
            Self::ShareUriSpoof => 11,
        }
    }

    /// The kind of event this site raises.
    #[must_use]
    pub const fn kind(self) -> EventKind {
        match self {
            Self::InvalidResourceRejected | Self::NotLocalFile => EventKind::LogError,
            Self::StreamCloseFailed
            | Self::ResolutionFallback
            | Self::ContainmentCheckFailed
            | Self::StreamCloseTimedOut => EventKind::Exception,
            Self::ShareUriSpoof => EventKind::Security,
        }
    }

    const fn index(self) -> usize {
        self.code() as usize - 5
    }
}

/// A single reported condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEvent {
    /// Where the event was raised.
    pub site: DiagnosticSite,
    /// Human-readable context (the offending path or identifier).
    pub detail: String,
}

impl DiagnosticEvent {
    /// Create an event for `site`.
    pub fn new(site: DiagnosticSite, detail: impl Into<String>) -> Self {
        Self {
            site,
            detail: detail.into(),
        }
    }

    /// Shorthand for `self.site.kind()`.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.site.kind()
    }

    /// Shorthand for `self.site.code()`.
    #[must_use]
    pub fn code(&self) -> u32 {
        self.site.code()
    }
}

impl fmt::Display for DiagnosticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} #{}] {}", self.kind(), self.code(), self.detail)
    }
}

/// Sink for diagnostic events.
///
/// Implementations are shared between threads and must not block.
#[cfg_attr(test, mockall::automock)]
pub trait DiagnosticReporter: Send + Sync {
    /// Record one event.
    fn report(&self, event: &DiagnosticEvent);
}

/// Reporter that writes every event to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl DiagnosticReporter for LogReporter {
    fn report(&self, event: &DiagnosticEvent) {
        match event.kind() {
            EventKind::LogError => log::warn!("{event}"),
            EventKind::Exception | EventKind::Security => log::error!("{event}"),
        }
    }
}

/// Reporter that counts events per site and forwards them to the log.
///
/// # Examples
///
/// ```
/// use oppguard::diagnostics::{
///     CountingReporter, DiagnosticEvent, DiagnosticReporter, DiagnosticSite,
/// };
///
/// let reporter = CountingReporter::new();
/// reporter.report(&DiagnosticEvent::new(DiagnosticSite::NotLocalFile, "http://x/y"));
/// assert_eq!(reporter.count(DiagnosticSite::NotLocalFile), 1);
/// assert_eq!(reporter.total(), 1);
/// ```
#[derive(Debug, Default)]
pub struct CountingReporter {
    counts: [AtomicU64; SITE_COUNT],
}

impl CountingReporter {
    /// Create a reporter with all counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events reported for `site`.
    #[must_use]
    pub fn count(&self, site: DiagnosticSite) -> u64 {
        self.counts[site.index()].load(Ordering::Relaxed)
    }

    /// Number of events reported across all sites.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| c.load(Ordering::Relaxed)).sum()
    }
}

impl DiagnosticReporter for CountingReporter {
    fn report(&self, event: &DiagnosticEvent) {
        self.counts[event.site.index()].fetch_add(1, Ordering::Relaxed);
        LogReporter.report(event);
    }
}
