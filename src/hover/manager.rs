use indexmap::IndexMap;

/// Callback that tears down whatever a hover preview has started.
pub type CleanupFn = Box<dyn FnOnce()>;

/// Options for [`HoverPlayManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HoverPlayOpts {
    /// Maximum number of simultaneously active previews. Values below 1 are raised to 1.
    pub max_concurrent: usize,
}

impl Default for HoverPlayOpts {
    fn default() -> Self {
        Self { max_concurrent: 3 }
    }
}

/// Admission control for hover-triggered previews.
///
/// At most `max_concurrent` ids are active. Admitting a new id at the cap evicts the oldest
/// admitted id first (FIFO by admission, not by recent use). Every stored cleanup runs exactly
/// once: on `unregister`, on eviction, or on `stop_all`.
pub struct HoverPlayManager {
    active: IndexMap<String, CleanupFn>,
    max_concurrent: usize,
}

impl std::fmt::Debug for HoverPlayManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HoverPlayManager")
            .field("active", &self.active.keys().collect::<Vec<_>>())
            .field("max_concurrent", &self.max_concurrent)
            .finish()
    }
}

impl Default for HoverPlayManager {
    fn default() -> Self {
        Self::new(HoverPlayOpts::default())
    }
}

impl HoverPlayManager {
    /// Manager with the given cap.
    pub fn new(opts: HoverPlayOpts) -> Self {
        Self {
            active: IndexMap::new(),
            max_concurrent: opts.max_concurrent.max(1),
        }
    }

    /// Admit `id`, evicting the oldest active ids while at the cap.
    ///
    /// Returns `false` without touching anything when `id` is already active; the caller must
    /// not start a second preview for it.
    pub fn register(&mut self, id: impl Into<String>, cleanup: impl FnOnce() + 'static) -> bool {
        let id = id.into();
        if self.active.contains_key(&id) {
            tracing::debug!(id = %id, "hover preview already active");
            return false;
        }
        while self.active.len() >= self.max_concurrent {
            self.evict_oldest();
        }
        tracing::debug!(id = %id, active = self.active.len() + 1, "hover preview admitted");
        self.active.insert(id, Box::new(cleanup));
        true
    }

    /// Run the cleanup of `id` and deactivate it. No-op when `id` is not active.
    pub fn unregister(&mut self, id: &str) {
        if let Some(cleanup) = self.active.shift_remove(id) {
            tracing::debug!(id, "hover preview released");
            cleanup();
        }
    }

    /// Return `true` when `id` is active.
    pub fn is_active(&self, id: &str) -> bool {
        self.active.contains_key(id)
    }

    /// Number of active ids.
    pub fn get_active_count(&self) -> usize {
        self.active.len()
    }

    /// Active ids, oldest first.
    pub fn active_ids(&self) -> Vec<&str> {
        self.active.keys().map(String::as_str).collect()
    }

    /// Current cap.
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Run every cleanup, oldest first, and deactivate all ids.
    pub fn stop_all(&mut self) {
        let drained: Vec<_> = self.active.drain(..).collect();
        if !drained.is_empty() {
            tracing::debug!(count = drained.len(), "stopping all hover previews");
        }
        for (_, cleanup) in drained {
            cleanup();
        }
    }

    /// Change the cap (minimum 1), evicting the oldest ids until the active count fits.
    pub fn set_max_concurrent(&mut self, max: usize) {
        self.max_concurrent = max.max(1);
        while self.active.len() > self.max_concurrent {
            self.evict_oldest();
        }
    }

    fn evict_oldest(&mut self) {
        if let Some((id, cleanup)) = self.active.shift_remove_index(0) {
            tracing::debug!(id = %id, "hover preview evicted");
            cleanup();
        }
    }
}

impl Drop for HoverPlayManager {
    fn drop(&mut self) {
        self.stop_all();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/hover/manager.rs"]
mod tests;
