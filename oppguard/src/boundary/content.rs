//! Content-authority gates.
//!
//! These checks look only at the authority of a reference and never touch
//! the filesystem. They run alongside containment, not instead of it.

use std::fmt;
use std::sync::Arc;

use crate::boundary::reference::FileReference;
use crate::diagnostics::{DiagnosticEvent, DiagnosticReporter, DiagnosticSite};

/// URI scheme used by content providers.
pub const CONTENT_SCHEME: &str = "content";

/// Provider hosts that are internal to the transfer service by default.
pub const DEFAULT_FORBIDDEN_HOSTS: &[&str] = &["com.android.bluetooth.map.MmsFileProvider"];

/// Authority of the transfer service's own share provider.
pub const DEFAULT_SHARE_AUTHORITY: &str = "com.android.bluetooth.opp";

/// Which content authorities are denied or recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPolicy {
    /// Hosts whose content must never be sent (case-insensitive).
    pub forbidden_hosts: Vec<String>,
    /// Authority of the share provider (exact match).
    pub share_authority: String,
}

impl Default for ContentPolicy {
    fn default() -> Self {
        Self {
            forbidden_hosts: DEFAULT_FORBIDDEN_HOSTS
                .iter()
                .map(|h| (*h).to_string())
                .collect(),
            share_authority: DEFAULT_SHARE_AUTHORITY.to_string(),
        }
    }
}

/// Evaluates references against a [`ContentPolicy`].
///
/// # Examples
///
/// ```
/// use oppguard::boundary::{ContentGate, ContentPolicy};
/// use oppguard::diagnostics::LogReporter;
/// use std::sync::Arc;
///
/// let gate = ContentGate::new(ContentPolicy::default(), Arc::new(LogReporter));
///
/// assert!(gate.is_forbidden_content("content://com.android.bluetooth.map.MmsFileProvider/1"));
/// assert!(!gate.is_forbidden_content("content://media/external/images/7"));
/// assert!(gate.is_share_uri("content://com.android.bluetooth.opp/btopp/3"));
/// ```
pub struct ContentGate {
    policy: ContentPolicy,
    share_prefix: String,
    reporter: Arc<dyn DiagnosticReporter>,
}

impl fmt::Debug for ContentGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentGate")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ContentGate {
    /// Create a gate for `policy` that reports to `reporter`.
    pub fn new(policy: ContentPolicy, reporter: Arc<dyn DiagnosticReporter>) -> Self {
        let share_prefix = format!("{CONTENT_SCHEME}://{}", policy.share_authority);
        Self {
            policy,
            share_prefix,
            reporter,
        }
    }

    /// The policy this gate applies.
    #[must_use]
    pub fn policy(&self) -> &ContentPolicy {
        &self.policy
    }

    /// Whether a textual reference names forbidden content.
    ///
    /// Text that cannot be parsed is treated as forbidden.
    pub fn is_forbidden_content(&self, reference: &str) -> bool {
        match FileReference::parse(reference) {
            Ok(parsed) => self.is_forbidden_reference(&parsed),
            Err(e) => {
                log::debug!("treating unparseable reference as forbidden: {e}");
                true
            }
        }
    }

    /// Whether the host of `reference` is on the denylist.
    pub fn is_forbidden_reference(&self, reference: &FileReference) -> bool {
        let Some(host) = reference.authority() else {
            return false;
        };
        let forbidden = self
            .policy
            .forbidden_hosts
            .iter()
            .any(|denied| denied.eq_ignore_ascii_case(host));
        if forbidden {
            log::debug!("{reference} is served by forbidden host {host}");
        }
        forbidden
    }

    /// Whether a textual reference points into the share provider.
    pub fn is_share_uri(&self, reference: &str) -> bool {
        match FileReference::parse(reference) {
            Ok(parsed) => self.is_share_reference(&parsed),
            Err(_) => false,
        }
    }

    /// Whether `reference` carries exactly the share provider's authority.
    ///
    /// A URI whose text begins with the share prefix but whose parsed
    /// authority is something else (extra user info, port, or a longer host)
    /// is reported as a spoofing attempt.
    pub fn is_share_reference(&self, reference: &FileReference) -> bool {
        let FileReference::Uri(url) = reference else {
            return false;
        };

        let exact = url.host_str() == Some(self.policy.share_authority.as_str())
            && url.username().is_empty()
            && url.password().is_none()
            && url.port().is_none();

        if !exact && url.as_str().starts_with(&self.share_prefix) {
            self.reporter.report(&DiagnosticEvent::new(
                DiagnosticSite::ShareUriSpoof,
                url.as_str(),
            ));
        }
        exact
    }
}
