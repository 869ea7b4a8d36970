use std::{
    collections::{BTreeMap, HashMap},
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use indexmap::IndexMap;
use tokio::{sync::watch, task::JoinHandle};

use crate::{
    engine::module::LoadedAnimation,
    foundation::error::CanvasFxError,
    registry::{
        metadata::{AnimationMetadata, Category},
        query::{FilterCriteria, SortOptions, sort_metadata},
    },
};

type LoadFuture = Pin<Box<dyn Future<Output = anyhow::Result<LoadedAnimation>> + Send>>;

/// Deferred producer of an animation implementation.
///
/// Invoked at most once per id at a time by [`AnimationRegistry::get_by_id`].
#[derive(Clone)]
pub struct AnimationLoader(Arc<dyn Fn() -> LoadFuture + Send + Sync>);

impl AnimationLoader {
    /// Wrap an async loader function.
    pub fn new<F, Fut>(load: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<LoadedAnimation>> + Send + 'static,
    {
        Self(Arc::new(move || Box::pin(load())))
    }

    /// Loader that resolves immediately to an in-process factory.
    pub fn ready(factory: LoadedAnimation) -> Self {
        Self::new(move || {
            let factory = Arc::clone(&factory);
            async move { Ok(factory) }
        })
    }

    fn load(&self) -> LoadFuture {
        (self.0)()
    }
}

impl std::fmt::Debug for AnimationLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AnimationLoader")
    }
}

// `None` while pending; `Some(None)` for a failed load.
type LoadSlot = Option<Option<LoadedAnimation>>;

struct Entry {
    metadata: AnimationMetadata,
    loader: AnimationLoader,
}

struct InFlight {
    token: u64,
    rx: watch::Receiver<LoadSlot>,
}

#[derive(Default)]
struct RegistryState {
    entries: IndexMap<String, Entry>,
    loaded: HashMap<String, LoadedAnimation>,
    in_flight: HashMap<String, InFlight>,
    generation: u64,
    next_token: u64,
}

enum Resolution {
    Wait(watch::Receiver<LoadSlot>),
    Lead {
        loader: AnimationLoader,
        tx: watch::Sender<LoadSlot>,
        token: u64,
        generation: u64,
    },
}

/// Catalog of animation metadata with lazily loaded, cached implementations.
///
/// Metadata queries are synchronous and never load. [`AnimationRegistry::get_by_id`] runs at most
/// one loader per id at a time; concurrent callers share its outcome.
#[derive(Default)]
pub struct AnimationRegistry {
    state: Mutex<RegistryState>,
}

impl std::fmt::Debug for AnimationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let st = self.lock();
        f.debug_struct("AnimationRegistry")
            .field("entries", &st.entries.len())
            .field("loaded", &st.loaded.len())
            .field("in_flight", &st.in_flight.len())
            .finish()
    }
}

impl AnimationRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace the entry for `metadata.id`. Last writer wins.
    ///
    /// Replacing an id drops its cached implementation and detaches any load in flight for it, so
    /// the next load uses the new loader. Callers already waiting on the old load still receive
    /// its outcome, but it is not cached.
    pub fn register(&self, metadata: AnimationMetadata, loader: AnimationLoader) {
        let id = metadata.id.clone();
        let mut st = self.lock();
        if st.entries.contains_key(&id) {
            tracing::warn!(id = %id, "animation registered twice; replacing previous entry");
            st.loaded.remove(&id);
            st.in_flight.remove(&id);
        }
        st.entries.insert(id, Entry { metadata, loader });
    }

    /// All metadata in registration order.
    pub fn get_all(&self) -> Vec<AnimationMetadata> {
        self.collect(|_| true)
    }

    /// Metadata of one id.
    pub fn get_metadata(&self, id: &str) -> Option<AnimationMetadata> {
        self.lock().entries.get(id).map(|e| e.metadata.clone())
    }

    /// Metadata in `category`.
    pub fn get_by_category(&self, category: Category) -> Vec<AnimationMetadata> {
        self.collect(|m| m.category == category)
    }

    /// Metadata carrying at least one of `tags` (case-insensitive).
    pub fn get_by_tags<S: AsRef<str>>(&self, tags: &[S]) -> Vec<AnimationMetadata> {
        self.collect(|m| tags.iter().any(|t| m.has_tag(t.as_ref())))
    }

    /// Case-insensitive free-text search over name, description and tags.
    ///
    /// An empty query returns everything.
    pub fn search(&self, query: &str) -> Vec<AnimationMetadata> {
        let needle = query.trim().to_lowercase();
        self.collect(|m| needle.is_empty() || m.matches_lowercase(&needle))
    }

    /// Metadata passing `criteria`.
    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<AnimationMetadata> {
        self.collect(|m| criteria.matches(m))
    }

    /// Stable sort of a metadata list.
    pub fn sort(&self, mut list: Vec<AnimationMetadata>, opts: SortOptions) -> Vec<AnimationMetadata> {
        sort_metadata(&mut list, opts);
        list
    }

    /// Number of entries per category, for categories with at least one entry.
    pub fn category_counts(&self) -> BTreeMap<Category, usize> {
        let mut out = BTreeMap::new();
        for e in self.lock().entries.values() {
            *out.entry(e.metadata.category).or_insert(0) += 1;
        }
        out
    }

    /// Return `true` when `id` is registered.
    pub fn has(&self, id: &str) -> bool {
        self.lock().entries.contains_key(id)
    }

    /// Number of registered entries.
    pub fn count(&self) -> usize {
        self.lock().entries.len()
    }

    /// Number of cached implementations.
    pub fn cached_count(&self) -> usize {
        self.lock().loaded.len()
    }

    /// Return `true` when a load for `id` is currently running.
    pub fn is_loading(&self, id: &str) -> bool {
        self.lock().in_flight.contains_key(id)
    }

    fn collect(&self, keep: impl Fn(&AnimationMetadata) -> bool) -> Vec<AnimationMetadata> {
        self.lock()
            .entries
            .values()
            .filter(|e| keep(&e.metadata))
            .map(|e| e.metadata.clone())
            .collect()
    }

    /// Resolve the implementation for `id`.
    ///
    /// Returns the cached implementation when present, joins a load already in flight, or runs the
    /// registered loader. Unknown ids and failed loads yield `None`; failures are logged and not
    /// cached, so a later call retries.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, id: &str) -> Option<LoadedAnimation> {
        loop {
            let resolution = {
                let mut st = self.lock();
                if let Some(hit) = st.loaded.get(id) {
                    return Some(Arc::clone(hit));
                }
                if let Some(pending) = st.in_flight.get(id) {
                    Resolution::Wait(pending.rx.clone())
                } else {
                    let Some(entry) = st.entries.get(id) else {
                        tracing::warn!("animation not registered");
                        return None;
                    };
                    let loader = entry.loader.clone();
                    let (tx, rx) = watch::channel(None);
                    st.next_token += 1;
                    let token = st.next_token;
                    st.in_flight.insert(id.to_owned(), InFlight { token, rx });
                    Resolution::Lead {
                        loader,
                        tx,
                        token,
                        generation: st.generation,
                    }
                }
            };

            match resolution {
                Resolution::Wait(mut rx) => match rx.wait_for(Option::is_some).await {
                    Ok(slot) => return slot.clone().flatten(),
                    // The leading caller was dropped before finishing; take over.
                    Err(_) => continue,
                },
                Resolution::Lead {
                    loader,
                    tx,
                    token,
                    generation,
                } => return self.lead_load(id, loader, tx, token, generation).await,
            }
        }
    }

    async fn lead_load(
        &self,
        id: &str,
        loader: AnimationLoader,
        tx: watch::Sender<LoadSlot>,
        token: u64,
        generation: u64,
    ) -> Option<LoadedAnimation> {
        let _guard = InFlightGuard {
            registry: self,
            id,
            token,
        };
        tracing::debug!("loading animation");
        let outcome = match loader.load().await {
            Ok(loaded) => Some(loaded),
            Err(err) => {
                let err = CanvasFxError::load(format!("{err:#}"));
                tracing::error!(error = %err, "animation load failed");
                None
            }
        };

        {
            let mut st = self.lock();
            if let Some(loaded) = &outcome {
                if st.generation != generation {
                    tracing::debug!("cache cleared during load; result not cached");
                } else if !owns_in_flight(&st, id, token) {
                    tracing::debug!("animation replaced during load; result not cached");
                } else {
                    st.loaded.insert(id.to_owned(), Arc::clone(loaded));
                }
            }
            remove_in_flight(&mut st, id, token);
        }
        tx.send_replace(Some(outcome.clone()));
        outcome
    }

    /// Drop every cached implementation and in-flight marker.
    ///
    /// Callers already waiting on a load still receive its outcome, but it is not cached.
    pub fn clear_cache(&self) {
        let mut st = self.lock();
        st.loaded.clear();
        st.in_flight.clear();
        st.generation += 1;
        tracing::debug!(generation = st.generation, "animation cache cleared");
    }

    /// Start a load for every entry in `category` without waiting.
    ///
    /// Outside a tokio runtime nothing is spawned and the result is empty.
    pub fn preload_category(
        self: &Arc<Self>,
        category: Category,
    ) -> Vec<JoinHandle<Option<LoadedAnimation>>> {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(%category, "preload requested outside a tokio runtime");
            return Vec::new();
        };
        self.get_by_category(category)
            .into_iter()
            .map(|meta| {
                let registry = Arc::clone(self);
                handle.spawn(async move { registry.get_by_id(&meta.id).await })
            })
            .collect()
    }
}

fn owns_in_flight(st: &RegistryState, id: &str, token: u64) -> bool {
    st.in_flight.get(id).is_some_and(|f| f.token == token)
}

fn remove_in_flight(st: &mut RegistryState, id: &str, token: u64) {
    if owns_in_flight(st, id, token) {
        st.in_flight.remove(id);
    }
}

// Removes the in-flight marker if the leading future is dropped mid-load.
struct InFlightGuard<'a> {
    registry: &'a AnimationRegistry,
    id: &'a str,
    token: u64,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        remove_in_flight(&mut self.registry.lock(), self.id, self.token);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/registry/animation_registry.rs"]
mod tests;
