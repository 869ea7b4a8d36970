use std::collections::HashMap;

use crate::foundation::core::PixelSize;

/// Retention limits for pooled pixmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PixmapPoolOpts {
    /// Maximum number of idle pixmaps retained across all sizes.
    pub max_idle: usize,
    /// Maximum number of idle pixmaps retained per pixel size.
    pub max_idle_per_size: usize,
}

impl Default for PixmapPoolOpts {
    fn default() -> Self {
        Self {
            max_idle: 16,
            max_idle_per_size: 4,
        }
    }
}

/// Pool counters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PixmapPoolStats {
    /// Idle pixmaps currently held by the pool.
    pub retained: usize,
    /// Bytes held by idle pixmaps.
    pub retained_bytes: usize,
    /// Fresh allocations performed by `acquire`.
    pub allocated: u64,
    /// `acquire` calls satisfied from the idle set.
    pub reused: u64,
    /// Releases that were dropped because a retention limit was reached.
    pub dropped_on_release: u64,
}

/// Reusable offscreen pixmaps keyed by pixel size.
///
/// An acquired pixmap belongs to the caller until released. Pixels are zeroed on release, never on
/// acquire. A pixmap that is never released is simply dropped; the pool is not affected.
pub struct PixmapPool {
    opts: PixmapPoolOpts,
    stats: PixmapPoolStats,
    idle: HashMap<PixelSize, Vec<vello_cpu::Pixmap>>,
}

impl PixmapPool {
    /// Empty pool with the given limits.
    pub fn new(opts: PixmapPoolOpts) -> Self {
        Self {
            opts,
            stats: PixmapPoolStats::default(),
            idle: HashMap::new(),
        }
    }

    /// Snapshot of the pool counters.
    pub fn stats(&self) -> PixmapPoolStats {
        self.stats.clone()
    }

    /// Take a pixmap of `width` x `height` pixels, reusing an idle one when available.
    pub fn acquire(&mut self, width: u16, height: u16) -> vello_cpu::Pixmap {
        let key = PixelSize::new(u32::from(width), u32::from(height));
        if let Some(p) = self.idle.get_mut(&key).and_then(Vec::pop) {
            self.stats.retained = self.stats.retained.saturating_sub(1);
            self.stats.retained_bytes = self.stats.retained_bytes.saturating_sub(key.byte_len());
            self.stats.reused = self.stats.reused.saturating_add(1);
            return p;
        }

        self.stats.allocated = self.stats.allocated.saturating_add(1);
        vello_cpu::Pixmap::new(width, height)
    }

    /// Hand a pixmap back. Its pixels are cleared before it becomes idle.
    pub fn release(&mut self, mut pixmap: vello_cpu::Pixmap) {
        let key = PixelSize::new(u32::from(pixmap.width()), u32::from(pixmap.height()));
        if self.stats.retained >= self.opts.max_idle {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }

        let bucket = self.idle.entry(key).or_default();
        if bucket.len() >= self.opts.max_idle_per_size {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }

        pixmap.data_as_u8_slice_mut().fill(0);
        bucket.push(pixmap);
        self.stats.retained = self.stats.retained.saturating_add(1);
        self.stats.retained_bytes = self.stats.retained_bytes.saturating_add(key.byte_len());
    }

    /// Drop every idle pixmap.
    pub fn clear(&mut self) {
        self.idle.clear();
        self.stats.retained = 0;
        self.stats.retained_bytes = 0;
    }
}

impl Default for PixmapPool {
    fn default() -> Self {
        Self::new(PixmapPoolOpts::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pool.rs"]
mod tests;
