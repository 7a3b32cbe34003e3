//! Storage-root containment checks.
//!
//! A candidate is resolved to its canonical form, optionally rewritten from
//! a legacy storage alias, and then walked upward one ancestor at a time
//! until it meets a trusted root or runs out of parents.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::boundary::reference::FileReference;
use crate::diagnostics::{DiagnosticEvent, DiagnosticReporter, DiagnosticSite};
use crate::path::canonicalize;
use crate::path::normalize;
use crate::path::relationship::containment_depth;

/// A deprecated storage root that maps onto a directory under a trusted root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegacyAlias {
    /// The deprecated root, e.g. `/sdcard`.
    pub legacy_root: PathBuf,
    /// The user-specific directory it stands for, e.g. `/storage/emulated/0`.
    pub target: PathBuf,
}

impl LegacyAlias {
    /// Create an alias from `legacy_root` onto `target`.
    pub fn new(legacy_root: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            legacy_root: legacy_root.into(),
            target: target.into(),
        }
    }
}

/// The set of storage boundaries a candidate is checked against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoragePolicy {
    /// Directories that count as approved storage.
    pub trusted_roots: Vec<PathBuf>,
    /// Whether legacy aliases apply (emulated external storage).
    pub emulated: bool,
    /// Legacy roots and the directories they are rewritten to.
    pub legacy_aliases: Vec<LegacyAlias>,
}

impl StoragePolicy {
    /// A policy with the given roots and no aliasing.
    pub fn new<I, P>(trusted_roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            trusted_roots: trusted_roots.into_iter().map(Into::into).collect(),
            emulated: false,
            legacy_aliases: Vec::new(),
        }
    }

    /// Enable emulated storage and register `alias`.
    #[must_use]
    pub fn with_alias(mut self, alias: LegacyAlias) -> Self {
        self.emulated = true;
        self.legacy_aliases.push(alias);
        self
    }
}

/// Decides whether file references live inside a trusted storage root.
///
/// Holds no state besides its policy; every call resolves the filesystem
/// afresh. Failures never escape: they are reported to the diagnostic sink
/// and turned into a `false` answer, except for candidate resolution which
/// falls back to the lexically cleaned literal path.
///
/// # Examples
///
/// ```
/// use oppguard::boundary::{ContainmentValidator, LegacyAlias, StoragePolicy};
/// use oppguard::diagnostics::CountingReporter;
/// use std::sync::Arc;
///
/// let policy = StoragePolicy::new(["/storage/emulated/0"])
///     .with_alias(LegacyAlias::new("/sdcard", "/storage/emulated/0"));
/// let validator = ContainmentValidator::new(policy, Arc::new(CountingReporter::new()));
///
/// assert!(validator.is_contained("/storage/emulated/0/Download/a.bin"));
/// assert!(!validator.is_contained("/storage/emulated/01/a.bin"));
/// assert!(!validator.is_contained("https://example.com/a.bin"));
/// ```
pub struct ContainmentValidator {
    policy: StoragePolicy,
    reporter: Arc<dyn DiagnosticReporter>,
}

impl fmt::Debug for ContainmentValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainmentValidator")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// A candidate path, tagged with how it was obtained.
#[derive(Debug)]
enum Candidate {
    /// Symlinks followed on disk.
    Canonical(PathBuf),
    /// Lexically cleaned after resolution failed.
    Lexical(PathBuf),
}

impl Candidate {
    fn path(&self) -> &Path {
        match self {
            Self::Canonical(p) | Self::Lexical(p) => p,
        }
    }

    fn into_path(self) -> PathBuf {
        match self {
            Self::Canonical(p) | Self::Lexical(p) => p,
        }
    }
}

impl ContainmentValidator {
    /// Create a validator for `policy` that reports to `reporter`.
    pub fn new(policy: StoragePolicy, reporter: Arc<dyn DiagnosticReporter>) -> Self {
        Self { policy, reporter }
    }

    /// The policy this validator checks against.
    #[must_use]
    pub fn policy(&self) -> &StoragePolicy {
        &self.policy
    }

    /// Check a textual reference (bare path or URI).
    ///
    /// Text that cannot be parsed as a reference is never contained.
    pub fn is_contained(&self, reference: &str) -> bool {
        match FileReference::parse(reference) {
            Ok(parsed) => self.is_reference_contained(&parsed),
            Err(e) => {
                self.report(DiagnosticSite::NotLocalFile, e.to_string());
                false
            }
        }
    }

    /// Check a parsed reference.
    pub fn is_reference_contained(&self, reference: &FileReference) -> bool {
        self.matching_root(reference).is_some()
    }

    /// Check a local path.
    pub fn is_path_contained(&self, path: &Path) -> bool {
        self.matching_root_for_path(path).is_some()
    }

    /// The canonical trusted root that contains `reference`, if any.
    pub fn matching_root(&self, reference: &FileReference) -> Option<PathBuf> {
        let Some(path) = reference.local_path() else {
            self.report(DiagnosticSite::NotLocalFile, reference.to_string());
            return None;
        };
        self.matching_root_for_path(&path)
    }

    fn matching_root_for_path(&self, literal: &Path) -> Option<PathBuf> {
        let mut candidate = self.resolve_candidate(literal)?;
        if self.policy.emulated {
            candidate = self.apply_legacy_alias(candidate)?;
        }
        let candidate = candidate.into_path();

        for root in &self.policy.trusted_roots {
            let resolved_root = match canonicalize::resolve(root) {
                Ok(resolved) => resolved,
                Err(e) => {
                    self.report(
                        DiagnosticSite::ContainmentCheckFailed,
                        format!("trusted root {}: {e}", root.display()),
                    );
                    continue;
                }
            };

            if let Some(depth) = containment_depth(&resolved_root, &candidate) {
                log::debug!(
                    "{} is inside {} (depth {depth})",
                    candidate.display(),
                    resolved_root.display()
                );
                return Some(resolved_root);
            }
        }

        log::debug!("{} is outside every trusted root", candidate.display());
        None
    }

    /// Canonicalize `literal`, or fall back to its lexically cleaned form.
    ///
    /// Returns `None` only when even the lexical form cannot be produced; a
    /// path with unfolded `..` components must never reach the ancestor walk.
    fn resolve_candidate(&self, literal: &Path) -> Option<Candidate> {
        match canonicalize::resolve(literal) {
            Ok(resolved) => Some(Candidate::Canonical(resolved)),
            Err(e) => {
                self.report(
                    DiagnosticSite::ResolutionFallback,
                    format!("{}: {e}", literal.display()),
                );
                match normalize::absolutize(literal) {
                    Ok(cleaned) => Some(Candidate::Lexical(cleaned)),
                    Err(e) => {
                        self.report(
                            DiagnosticSite::ContainmentCheckFailed,
                            format!("{}: {e}", literal.display()),
                        );
                        None
                    }
                }
            }
        }
    }

    /// Rewrite a candidate under a legacy root to the directory it aliases.
    ///
    /// A canonical candidate is matched against the legacy root as configured
    /// and as resolved, so symlinks inside a physical legacy tree have
    /// already been followed. Matching is per path segment.
    fn apply_legacy_alias(&self, candidate: Candidate) -> Option<Candidate> {
        let path = candidate.path();

        for alias in &self.policy.legacy_aliases {
            let rest = path
                .strip_prefix(&alias.legacy_root)
                .ok()
                .map(Path::to_path_buf)
                .or_else(|| {
                    let legacy = canonicalize::resolve(&alias.legacy_root).ok()?;
                    path.strip_prefix(legacy).ok().map(Path::to_path_buf)
                });

            if let Some(rest) = rest {
                let rewritten = alias.target.join(rest);
                log::debug!(
                    "rewrote legacy path {} to {}{}",
                    path.display(),
                    rewritten.display(),
                    if matches!(candidate, Candidate::Lexical(_)) {
                        " (lexical)"
                    } else {
                        ""
                    }
                );
                return self.resolve_candidate(&rewritten);
            }
        }

        Some(candidate)
    }

    fn report(&self, site: DiagnosticSite, detail: String) {
        self.reporter.report(&DiagnosticEvent::new(site, detail));
    }
}
