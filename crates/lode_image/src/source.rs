//! Asset byte sources
//!
//! The texture factory fetches raw bytes through an [`AssetSource`]. Fetches
//! are asynchronous so a host can stream assets from a bundle, a web fetch
//! bridge, or a network cache without blocking the cooperative render thread.
//!
//! - [`FileSource`] - reads from a directory on disk
//! - [`MemorySource`] - bytes registered up front (embedded assets, tests)
//! - [`DeferredSource`] - requests stay pending until the host completes them,
//!   for shells that deliver asset bytes through callbacks

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::{self, FutureExt, LocalBoxFuture};
use rustc_hash::FxHashMap;

use crate::error::{Result, TextureError};

/// Future returned by [`AssetSource::fetch`]
pub type FetchFuture = LocalBoxFuture<'static, Result<Vec<u8>>>;

/// Provider of raw asset bytes
pub trait AssetSource {
    /// Start fetching the asset at `path` (already mapped by the asset resolver)
    fn fetch(&self, path: &str) -> FetchFuture;
}

// =============================================================================
// FILE SOURCE
// =============================================================================

/// Reads assets from a root directory
#[derive(Clone, Debug)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for FileSource {
    fn fetch(&self, path: &str) -> FetchFuture {
        let full = self.root.join(path);
        let result = std::fs::read(&full).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => TextureError::NotFound(full.display().to_string()),
            _ => TextureError::Io(format!("{}: {}", full.display(), e)),
        });
        future::ready(result).boxed_local()
    }
}

// =============================================================================
// MEMORY SOURCE
// =============================================================================

/// Assets registered in memory
#[derive(Default)]
pub struct MemorySource {
    entries: RefCell<FxHashMap<String, Rc<[u8]>>>,
    fetches: RefCell<FxHashMap<String, usize>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the bytes served for `path`
    pub fn insert(&self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        let bytes: Vec<u8> = bytes.into();
        self.entries
            .borrow_mut()
            .insert(path.into(), Rc::from(bytes.into_boxed_slice()));
    }

    pub fn remove(&self, path: &str) {
        self.entries.borrow_mut().remove(path);
    }

    /// How many times `path` has been fetched
    pub fn fetch_count(&self, path: &str) -> usize {
        self.fetches.borrow().get(path).copied().unwrap_or(0)
    }
}

impl AssetSource for MemorySource {
    fn fetch(&self, path: &str) -> FetchFuture {
        *self.fetches.borrow_mut().entry(path.to_string()).or_insert(0) += 1;
        let result = self
            .entries
            .borrow()
            .get(path)
            .map(|bytes| bytes.to_vec())
            .ok_or_else(|| TextureError::NotFound(path.to_string()));
        future::ready(result).boxed_local()
    }
}

// =============================================================================
// DEFERRED SOURCE
// =============================================================================

/// Source whose fetches complete only when the host answers them
///
/// Each `fetch` parks a request; [`complete`](Self::complete) answers every
/// parked request for a path. Dropping the source aborts parked requests.
#[derive(Clone, Default)]
pub struct DeferredSource {
    inner: Rc<RefCell<DeferredInner>>,
}

#[derive(Default)]
struct DeferredInner {
    pending: FxHashMap<String, Vec<oneshot::Sender<Result<Vec<u8>>>>>,
    fetches: FxHashMap<String, usize>,
}

impl DeferredSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer all parked requests for `path`; returns how many were answered
    pub fn complete(&self, path: &str, result: Result<Vec<u8>>) -> usize {
        let senders = self
            .inner
            .borrow_mut()
            .pending
            .remove(path)
            .unwrap_or_default();
        let answered = senders.len();
        for sender in senders {
            // Receiver may already be gone; nothing to report then
            let _ = sender.send(result.clone());
        }
        answered
    }

    /// Number of parked requests for `path`
    pub fn pending_count(&self, path: &str) -> usize {
        self.inner
            .borrow()
            .pending
            .get(path)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// How many times `path` has been fetched
    pub fn fetch_count(&self, path: &str) -> usize {
        self.inner.borrow().fetches.get(path).copied().unwrap_or(0)
    }
}

impl AssetSource for DeferredSource {
    fn fetch(&self, path: &str) -> FetchFuture {
        let (tx, rx) = oneshot::channel();
        {
            let mut inner = self.inner.borrow_mut();
            *inner.fetches.entry(path.to_string()).or_insert(0) += 1;
            inner.pending.entry(path.to_string()).or_default().push(tx);
        }
        let path = path.to_string();
        async move {
            rx.await
                .unwrap_or_else(|_| Err(TextureError::Aborted(path)))
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_memory_source() {
        let source = MemorySource::new();
        source.insert("a.bin", vec![1u8, 2, 3]);

        assert_eq!(block_on(source.fetch("a.bin")), Ok(vec![1, 2, 3]));
        assert!(matches!(
            block_on(source.fetch("missing")),
            Err(TextureError::NotFound(_))
        ));
        assert_eq!(source.fetch_count("a.bin"), 1);
    }

    #[test]
    fn test_file_source_missing_file() {
        let source = FileSource::new(std::env::temp_dir());
        let result = block_on(source.fetch("lode-image-does-not-exist.png"));
        assert!(matches!(result, Err(TextureError::NotFound(_))));
    }

    #[test]
    fn test_deferred_source_completes_all_waiters() {
        let source = DeferredSource::new();
        let a = source.fetch("x");
        let b = source.fetch("x");
        assert_eq!(source.pending_count("x"), 2);

        assert_eq!(source.complete("x", Ok(vec![9])), 2);
        assert_eq!(block_on(a), Ok(vec![9]));
        assert_eq!(block_on(b), Ok(vec![9]));
        assert_eq!(source.fetch_count("x"), 2);
    }

    #[test]
    fn test_deferred_source_abort_on_drop() {
        let source = DeferredSource::new();
        let fut = source.fetch("y");
        drop(source);
        assert!(matches!(block_on(fut), Err(TextureError::Aborted(_))));
    }
}
