//! Deduplicating texture cache
//!
//! [`TextureFactory`] owns every decoded texture in the process. It is built
//! once at startup and injected wherever textures are needed; there is no
//! global instance.
//!
//! # Guarantees
//!
//! - A cached key resolves immediately, without fetching or decoding.
//! - At most one load per key is in flight. Later callers join the existing
//!   load through a shared future and receive the same outcome: every waiter
//!   gets the identical `Rc<Texture>`, or every waiter gets the same error.
//! - A successful texture is in the cache before any waiter observes it.
//! - Failures are not cached; the next request retries from scratch.
//! - Loads run to completion once polled, even if every requester has lost
//!   interest, so the cache still fills for future requesters.
//!
//! The cache never evicts. The texture set of a game is small and fixed;
//! [`TextureFactory::clear`] exists for hosts that swap asset packs.
//!
//! # Example
//!
//! ```ignore
//! use lode_image::{MemorySource, TextureFactory, TextureKey};
//!
//! let source = MemorySource::new();
//! source.insert("ore.svg", ORE_SVG);
//! let textures = TextureFactory::new(source);
//!
//! let texture = textures.load_texture(TextureKey::new("ore.svg", 64)).await?;
//! assert!(textures.lookup(&TextureKey::new("ore.svg", 64)).is_some());
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use futures::future::{self, FutureExt, LocalBoxFuture, Shared};
use lode_platform::{AssetResolver, IdentityResolver};
use rustc_hash::FxHashMap;

use crate::decode::decode_texture;
use crate::error::ResourceLoadError;
use crate::key::TextureKey;
use crate::source::AssetSource;
use crate::texture::Texture;

/// Outcome of a texture load
pub type LoadResult = std::result::Result<Rc<Texture>, ResourceLoadError>;

/// Future returned by [`TextureFactory::load_texture`]
pub type LoadFuture = LocalBoxFuture<'static, LoadResult>;

type SharedLoad = Shared<LoadFuture>;

/// Cache counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextureStats {
    /// Textures currently cached
    pub cached: usize,
    /// Loads currently in flight
    pub in_flight: usize,
    /// Loads started (one fetch + decode each)
    pub loads_started: u64,
    /// Loads that produced a texture
    pub decoded: u64,
    /// Loads that failed
    pub failed: u64,
    /// Requests answered straight from the cache
    pub cache_hits: u64,
    /// Requests that joined an in-flight load
    pub joined: u64,
}

#[derive(Default)]
struct FactoryState {
    cache: FxHashMap<TextureKey, Rc<Texture>>,
    in_flight: FxHashMap<TextureKey, SharedLoad>,
    stats: TextureStats,
}

/// Process-wide texture cache with in-flight deduplication
pub struct TextureFactory {
    source: Rc<dyn AssetSource>,
    resolver: Rc<dyn AssetResolver>,
    state: Rc<RefCell<FactoryState>>,
}

impl TextureFactory {
    /// Create a factory reading from `source` with unmapped asset paths
    pub fn new(source: impl AssetSource + 'static) -> Rc<Self> {
        Self::with_resolver(source, IdentityResolver)
    }

    /// Create a factory that maps source paths through `resolver` before fetching
    pub fn with_resolver(
        source: impl AssetSource + 'static,
        resolver: impl AssetResolver + 'static,
    ) -> Rc<Self> {
        Rc::new(Self {
            source: Rc::new(source),
            resolver: Rc::new(resolver),
            state: Rc::new(RefCell::new(FactoryState::default())),
        })
    }

    /// Load the texture for `key`
    ///
    /// Returns immediately-ready futures for cached keys and shared futures
    /// for keys already in flight. The returned future does no work until
    /// polled.
    pub fn load_texture(&self, key: TextureKey) -> LoadFuture {
        let mut state = self.state.borrow_mut();

        if let Some(texture) = state.cache.get(&key) {
            let texture = Rc::clone(texture);
            state.stats.cache_hits += 1;
            tracing::trace!(key = %key, "texture cache hit");
            return future::ready(Ok(texture)).boxed_local();
        }

        if let Some(pending) = state.in_flight.get(&key) {
            let pending = pending.clone();
            state.stats.joined += 1;
            tracing::debug!(key = %key, "joining in-flight texture load");
            return pending.boxed_local();
        }

        tracing::debug!(key = %key, "starting texture load");
        let load = self.start_load(key.clone()).shared();
        state.in_flight.insert(key, load.clone());
        state.stats.loads_started += 1;
        load.boxed_local()
    }

    /// Synchronous cache-only lookup
    pub fn lookup(&self, key: &TextureKey) -> Option<Rc<Texture>> {
        self.state.borrow().cache.get(key).cloned()
    }

    /// True while a load for `key` is in flight
    pub fn is_loading(&self, key: &TextureKey) -> bool {
        self.state.borrow().in_flight.contains_key(key)
    }

    /// Load several keys concurrently, results in input order
    pub fn preload(
        &self,
        keys: impl IntoIterator<Item = TextureKey>,
    ) -> LocalBoxFuture<'static, Vec<LoadResult>> {
        let loads: Vec<LoadFuture> = keys.into_iter().map(|k| self.load_texture(k)).collect();
        future::join_all(loads).boxed_local()
    }

    /// Current cache and in-flight counts plus decode counters
    pub fn stats(&self) -> TextureStats {
        let state = self.state.borrow();
        TextureStats {
            cached: state.cache.len(),
            in_flight: state.in_flight.len(),
            ..state.stats
        }
    }

    /// Drop every cached texture
    ///
    /// In-flight loads are unaffected and still populate the cache when they
    /// finish. Components keep their `Rc` clones alive until they let go.
    pub fn clear(&self) {
        let mut state = self.state.borrow_mut();
        tracing::debug!(count = state.cache.len(), "clearing texture cache");
        state.cache.clear();
    }

    /// Build the single load future for `key`
    ///
    /// The future records its outcome in the factory state as its final step,
    /// so by the time `Shared` hands the output to any waiter the cache (or the
    /// cleared in-flight slot, on failure) is already up to date.
    fn start_load(&self, key: TextureKey) -> LoadFuture {
        let source = Rc::clone(&self.source);
        let resolved = self.resolver.resolve(key.path());
        let state: Weak<RefCell<FactoryState>> = Rc::downgrade(&self.state);

        async move {
            let outcome = match source.fetch(&resolved).await {
                Ok(bytes) => decode_texture(&key, &bytes),
                Err(err) => Err(err),
            };

            let outcome = outcome
                .map(Rc::new)
                .map_err(|cause| ResourceLoadError::new(&key, cause));

            if let Some(state) = state.upgrade() {
                let mut state = state.borrow_mut();
                state.in_flight.remove(&key);
                match &outcome {
                    Ok(texture) => {
                        state.cache.insert(key.clone(), Rc::clone(texture));
                        state.stats.decoded += 1;
                        tracing::debug!(key = %key, width = texture.width(), height = texture.height(), "texture cached");
                    }
                    Err(err) => {
                        state.stats.failed += 1;
                        tracing::debug!(key = %key, error = %err, "texture load failed");
                    }
                }
            }

            outcome
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::tests::{png_bytes, CIRCLE_SVG};
    use crate::error::TextureError;
    use crate::source::{DeferredSource, MemorySource};
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;
    use lode_platform::AssetManifest;
    use std::cell::Cell;

    #[test]
    fn test_load_then_lookup() {
        let source = MemorySource::new();
        source.insert("ore.svg", CIRCLE_SVG);
        let factory = TextureFactory::new(source);
        let key = TextureKey::new("ore.svg", 64);

        assert!(factory.lookup(&key).is_none());
        let texture = block_on(factory.load_texture(key.clone())).unwrap();
        assert_eq!(texture.dimensions(), (64, 64));

        let cached = factory.lookup(&key).unwrap();
        assert!(Rc::ptr_eq(&texture, &cached));
        assert!(!factory.is_loading(&key));
    }

    #[test]
    fn test_cache_hit_skips_fetch() {
        let source = Rc::new(MemorySource::new());
        source.insert("gem.png", png_bytes(4, 4));
        let factory = TextureFactory::new(SharedSource(Rc::clone(&source)));
        let key = TextureKey::native("gem.png");

        let first = block_on(factory.load_texture(key.clone())).unwrap();
        let second = block_on(factory.load_texture(key.clone())).unwrap();

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(source.fetch_count("gem.png"), 1);
        assert_eq!(factory.stats().cache_hits, 1);
    }

    #[test]
    fn test_concurrent_loads_share_one_decode() {
        let source = DeferredSource::new();
        let factory = TextureFactory::new(source.clone());
        let key = TextureKey::new("a.svg", 64);

        let mut pool = LocalPool::new();
        let spawner = pool.spawner();
        let results: Rc<RefCell<Vec<Rc<Texture>>>> = Rc::default();

        for _ in 0..8 {
            let load = factory.load_texture(key.clone());
            let results = Rc::clone(&results);
            spawner
                .spawn_local(async move {
                    let texture = load.await.unwrap();
                    results.borrow_mut().push(texture);
                })
                .unwrap();
        }

        pool.run_until_stalled();
        assert!(factory.is_loading(&key));
        assert_eq!(source.fetch_count("a.svg"), 1);
        assert!(results.borrow().is_empty());

        source.complete("a.svg", Ok(CIRCLE_SVG.as_bytes().to_vec()));
        pool.run_until_stalled();

        let results = results.borrow();
        assert_eq!(results.len(), 8);
        assert!(results.iter().all(|t| Rc::ptr_eq(t, &results[0])));

        let stats = factory.stats();
        assert_eq!(stats.loads_started, 1);
        assert_eq!(stats.decoded, 1);
        assert_eq!(stats.joined, 7);
        assert_eq!(stats.in_flight, 0);
        assert!(Rc::ptr_eq(&factory.lookup(&key).unwrap(), &results[0]));
    }

    #[test]
    fn test_distinct_sizes_are_distinct_textures() {
        let source = MemorySource::new();
        source.insert("a.svg", CIRCLE_SVG);
        let factory = TextureFactory::new(source);

        let small = block_on(factory.load_texture(TextureKey::new("a.svg", 16))).unwrap();
        let large = block_on(factory.load_texture(TextureKey::new("a.svg", 64))).unwrap();

        assert!(!Rc::ptr_eq(&small, &large));
        assert_eq!(small.dimensions(), (16, 16));
        assert_eq!(large.dimensions(), (64, 64));
        assert_eq!(factory.stats().cached, 2);
    }

    #[test]
    fn test_failure_reaches_all_waiters_and_is_not_cached() {
        let source = DeferredSource::new();
        let factory = TextureFactory::new(source.clone());
        let key = TextureKey::new("bad.svg", 32);

        let mut pool = LocalPool::new();
        let spawner = pool.spawner();
        let failures = Rc::new(Cell::new(0));

        for _ in 0..3 {
            let load = factory.load_texture(key.clone());
            let failures = Rc::clone(&failures);
            spawner
                .spawn_local(async move {
                    let err = load.await.unwrap_err();
                    assert_eq!(err.path, "bad.svg");
                    assert_eq!(err.size, 32);
                    assert!(matches!(err.cause, TextureError::NotFound(_)));
                    failures.set(failures.get() + 1);
                })
                .unwrap();
        }
        pool.run_until_stalled();

        source.complete("bad.svg", Err(TextureError::NotFound("bad.svg".into())));
        pool.run_until_stalled();

        assert_eq!(failures.get(), 3);
        assert!(factory.lookup(&key).is_none());
        assert!(!factory.is_loading(&key));
        assert_eq!(factory.stats().failed, 1);

        // Retry starts a fresh load
        let retry = factory.load_texture(key.clone());
        assert!(factory.is_loading(&key));
        let succeeded = Rc::new(Cell::new(false));
        let succeeded_clone = Rc::clone(&succeeded);
        spawner
            .spawn_local(async move {
                succeeded_clone.set(retry.await.is_ok());
            })
            .unwrap();
        pool.run_until_stalled();
        assert_eq!(source.fetch_count("bad.svg"), 2);

        source.complete("bad.svg", Ok(CIRCLE_SVG.as_bytes().to_vec()));
        pool.run_until_stalled();
        assert!(succeeded.get());
        assert!(factory.lookup(&key).is_some());
    }

    #[test]
    fn test_failure_isolated_per_key() {
        let source = MemorySource::new();
        source.insert("good.svg", CIRCLE_SVG);
        source.insert("broken.svg", "<svg");
        let factory = TextureFactory::new(source);

        let results = block_on(factory.preload([
            TextureKey::new("broken.svg", 32),
            TextureKey::new("good.svg", 32),
            TextureKey::new("missing.svg", 32),
        ]));

        assert!(matches!(
            &results[0],
            Err(ResourceLoadError {
                cause: TextureError::SvgParse(_),
                ..
            })
        ));
        assert!(results[1].is_ok());
        assert!(matches!(
            &results[2],
            Err(ResourceLoadError {
                cause: TextureError::NotFound(_),
                ..
            })
        ));
        assert!(factory.lookup(&TextureKey::new("good.svg", 32)).is_some());
    }

    #[test]
    fn test_resolver_maps_paths() {
        let source = MemorySource::new();
        source.insert("assets/ore.1234.svg", CIRCLE_SVG);
        let manifest = AssetManifest::from_json(
            r#"{ "base": "assets", "assets": { "ore.svg": "ore.1234.svg" } }"#,
        )
        .unwrap();
        let factory = TextureFactory::with_resolver(source, manifest);

        let texture = block_on(factory.load_texture(TextureKey::new("ore.svg", 8))).unwrap();
        // Cached under the source name, not the mapped path
        assert_eq!(texture.key().path(), "ore.svg");
    }

    #[test]
    fn test_clear_empties_cache() {
        let source = MemorySource::new();
        source.insert("a.svg", CIRCLE_SVG);
        let factory = TextureFactory::new(source);
        let key = TextureKey::new("a.svg", 8);

        let held = block_on(factory.load_texture(key.clone())).unwrap();
        factory.clear();
        assert!(factory.lookup(&key).is_none());
        assert_eq!(held.dimensions(), (8, 8));
    }

    /// Lets a test keep a handle to a source it gave to the factory
    struct SharedSource(Rc<MemorySource>);

    impl AssetSource for SharedSource {
        fn fetch(&self, path: &str) -> crate::source::FetchFuture {
            self.0.fetch(path)
        }
    }
}
