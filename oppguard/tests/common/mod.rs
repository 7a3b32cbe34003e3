//! Common test utilities for integration tests.
//!
//! Provides a storage-layout fixture rooted in a temporary directory and a
//! stream that records how often it was closed.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use oppguard::{TransferResource, TransferStream};
use tempfile::TempDir;

/// A fake device storage tree: `storage/emulated/0` plus whatever the test adds.
#[allow(dead_code)]
pub struct StorageFixture {
    _dir: TempDir,
    base: PathBuf,
}

#[allow(dead_code)]
impl StorageFixture {
    /// Creates the tree with the primary user root in place.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let base = fs::canonicalize(dir.path()).unwrap();
        let fixture = Self { _dir: dir, base };
        fixture.mkdir("storage/emulated/0");
        fixture
    }

    /// Canonical base of the tree.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// The primary user root.
    pub fn user_root(&self) -> PathBuf {
        self.base.join("storage/emulated/0")
    }

    /// Creates `rel` (and parents) under the base.
    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let path = self.base.join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Writes a file at `rel` under the base.
    pub fn file(&self, rel: &str, contents: &[u8]) -> PathBuf {
        let path = self.base.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }
}

/// Stream that counts `close` calls.
#[allow(dead_code)]
pub struct CountingStream {
    data: io::Cursor<Vec<u8>>,
    closes: Arc<AtomicUsize>,
}

impl Read for CountingStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.data.read(buf)
    }
}

impl TransferStream for CountingStream {
    fn close(self: Box<Self>) -> io::Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Builds a resource over `bytes` and returns it with its close counter.
#[allow(dead_code)]
pub fn counted_resource(name: &str, bytes: &[u8]) -> (TransferResource, Arc<AtomicUsize>) {
    let closes = Arc::new(AtomicUsize::new(0));
    let stream = CountingStream {
        data: io::Cursor::new(bytes.to_vec()),
        closes: Arc::clone(&closes),
    };
    let length = bytes.len() as u64;
    (
        TransferResource::new(name, None, length, Box::new(stream)),
        closes,
    )
}
