//! Voice list cache
//!
//! Voice enumeration can mean loading a multi-gigabyte model, so each
//! adapter is asked once per process; later lookups are served from the
//! cache. Entries live for the process lifetime; `refresh` is the only
//! way to re-enumerate.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::debug;

use crate::core::error::Result;
use crate::engine::{AdapterRegistry, Voice};

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct VoiceCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub refreshes: u64,
    pub cached_models: usize,
}

/// Memoizes each adapter's voice enumeration, keyed by model id
pub struct VoiceCache {
    registry: Arc<AdapterRegistry>,
    entries: DashMap<String, Arc<Vec<Voice>>>,
    /// Per-model lock so concurrent first lookups and refreshes do not
    /// enumerate the same backend twice
    locks: DashMap<String, Arc<Mutex<()>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    refreshes: AtomicU64,
}

impl VoiceCache {
    pub fn new(registry: Arc<AdapterRegistry>) -> Self {
        Self {
            registry,
            entries: DashMap::new(),
            locks: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            refreshes: AtomicU64::new(0),
        }
    }

    /// Voices for a model, enumerated on first call and cached after
    ///
    /// Fails with `UnknownModel` for an unregistered id. The returned
    /// list is shared; it is never mutated in place, so readers holding
    /// an old `Arc` across a refresh still see a complete list.
    pub async fn get_voices(&self, model_id: &str) -> Result<Arc<Vec<Voice>>> {
        if let Some(entry) = self.entries.get(model_id) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(&entry));
        }

        let model = self.registry.resolve(model_id)?;
        let lock = self.model_lock(model_id);
        let _guard = lock.lock().await;

        // Another task may have filled the entry while we waited
        if let Some(entry) = self.entries.get(model_id) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(&entry));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!("Enumerating voices for '{}'", model_id);
        let voices = Arc::new(model.adapter().list_voices().await?);
        self.entries.insert(model_id.to_string(), Arc::clone(&voices));
        Ok(voices)
    }

    /// Force re-enumeration, replacing the cached entry atomically
    pub async fn refresh(&self, model_id: &str) -> Result<Arc<Vec<Voice>>> {
        let model = self.registry.resolve(model_id)?;
        let lock = self.model_lock(model_id);
        let _guard = lock.lock().await;

        self.refreshes.fetch_add(1, Ordering::Relaxed);
        let voices = Arc::new(model.adapter().list_voices().await?);
        self.entries.insert(model_id.to_string(), Arc::clone(&voices));
        Ok(voices)
    }

    pub fn stats(&self) -> VoiceCacheStats {
        VoiceCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            refreshes: self.refreshes.load(Ordering::Relaxed),
            cached_models: self.entries.len(),
        }
    }

    fn model_lock(&self, model_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(model_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::TtsError;
    use crate::engine::traits::{
        ModelAdapter, ModelDescriptor, SynthesisJob, SynthesisOutput,
    };
    use async_trait::async_trait;

    struct CountingAdapter {
        descriptor: ModelDescriptor,
        voices: Vec<Voice>,
        list_calls: AtomicU64,
    }

    impl CountingAdapter {
        fn new(id: &str, voices: Vec<Voice>) -> Self {
            Self {
                descriptor: ModelDescriptor {
                    id: id.to_string(),
                    label: id.to_string(),
                    supports_voice_selection: true,
                    supports_reference_cloning: false,
                },
                voices,
                list_calls: AtomicU64::new(0),
            }
        }
    }

    #[async_trait]
    impl ModelAdapter for CountingAdapter {
        fn descriptor(&self) -> &ModelDescriptor {
            &self.descriptor
        }

        async fn list_voices(&self) -> Result<Vec<Voice>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.voices.clone())
        }

        async fn synthesize(&self, _job: &SynthesisJob) -> Result<SynthesisOutput> {
            unreachable!("cache tests never synthesize")
        }
    }

    fn cache_with(adapter: Arc<CountingAdapter>) -> VoiceCache {
        let mut registry = AdapterRegistry::new();
        registry.register(adapter).unwrap();
        VoiceCache::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn test_second_lookup_is_a_hit() {
        let adapter = Arc::new(CountingAdapter::new(
            "kokoro",
            vec![Voice::new("voice_a", "A"), Voice::new("voice_b", "B")],
        ));
        let cache = cache_with(Arc::clone(&adapter));

        let first = cache.get_voices("kokoro").await.unwrap();
        let second = cache.get_voices("kokoro").await.unwrap();

        assert_eq!(*first, *second);
        assert_eq!(adapter.list_calls.load(Ordering::SeqCst), 1);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_refresh_reenumerates() {
        let adapter = Arc::new(CountingAdapter::new("kokoro", vec![Voice::new("a", "A")]));
        let cache = cache_with(Arc::clone(&adapter));

        cache.get_voices("kokoro").await.unwrap();
        cache.refresh("kokoro").await.unwrap();

        assert_eq!(adapter.list_calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.stats().refreshes, 1);
    }

    #[tokio::test]
    async fn test_unknown_model_propagates() {
        let cache = cache_with(Arc::new(CountingAdapter::new("kokoro", vec![])));
        let err = cache.get_voices("mystery").await.unwrap_err();
        assert!(matches!(err, TtsError::UnknownModel { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_first_lookups_enumerate_once() {
        let adapter = Arc::new(CountingAdapter::new("kokoro", vec![Voice::new("a", "A")]));
        let cache = Arc::new(cache_with(Arc::clone(&adapter)));

        let (a, b) = tokio::join!(cache.get_voices("kokoro"), cache.get_voices("kokoro"));
        a.unwrap();
        b.unwrap();

        assert_eq!(adapter.list_calls.load(Ordering::SeqCst), 1);
    }
}
