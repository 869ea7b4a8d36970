//! canvasfx drives a gallery of procedural canvas animations on a CPU raster backend.
//!
//! # Architecture overview
//!
//! 1. **Surface**: [`Surface`] wraps a `vello_cpu` render context and pixmap, scaled by the device
//!    pixel ratio.
//! 2. **Engine**: [`CanvasEngine`] owns one surface and one [`AnimationModule`], and runs
//!    `update` then `render` on every frame the host's [`FrameScheduler`] fires.
//! 3. **Registry**: [`AnimationRegistry`] keeps metadata for discovery and loads implementations
//!    lazily, at most one load per id at a time.
//! 4. **Hover-play**: [`HoverPlayManager`] bounds how many preview engines run at once and evicts
//!    the oldest when full.
//! 5. **Pool**: [`PixmapPool`] recycles pixel buffers between short-lived previews.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: bundled animations draw from seeded generators, and hosts inject
//!   time and frame scheduling.
//! - **Total per-frame work**: module errors pause the engine instead of escaping the frame
//!   callback.
//! - **Premultiplied RGBA8** end-to-end.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animations {
    pub mod catalog;
    pub(crate) mod glitch_bars;
    pub(crate) mod matrix_rain;
    pub(crate) mod particle_network;
    pub(crate) mod sine_waves;
    pub(crate) mod spiral_grid;

    #[cfg(test)]
    pub(crate) mod harness;
}
mod config;
mod engine {
    pub(crate) mod canvas_engine;
    pub(crate) mod device;
    pub(crate) mod host;
    pub(crate) mod module;
    pub(crate) mod params;
}
mod foundation {
    pub(crate) mod core;
    pub(crate) mod error;
    pub(crate) mod math;
}
mod hover {
    pub(crate) mod manager;
}
mod registry {
    pub(crate) mod animation_registry;
    pub(crate) mod metadata;
    pub(crate) mod query;
}
mod render {
    pub(crate) mod frame;
    pub(crate) mod pool;
    pub(crate) mod surface;
}

pub use animations::catalog;
pub use config::GalleryConfig;
pub use engine::canvas_engine::{
    CanvasEngine, EngineOpts, EngineStats, EngineStatus, MAX_SPEED, MIN_SPEED, PerformanceStatus,
};
pub use engine::device::{DEFAULT_TARGET_FPS, DeviceProfile, FramePolicy, LOW_END_TARGET_FPS};
pub use engine::host::{
    Clock, FrameRequestId, FrameScheduler, ManualClock, ManualScheduler, SystemClock,
};
pub use engine::module::{
    AnimationContext, AnimationFactory, AnimationModule, FnFactory, LoadedAnimation,
};
pub use engine::params::{ParamValue, Parameters};
pub use foundation::core::{PixelSize, Point, Rgba8, Vec2};
pub use foundation::error::{CanvasFxError, CanvasFxResult};
pub use foundation::math::{Rng64, noise1d, seed_from_str};
pub use hover::manager::{CleanupFn, HoverPlayManager, HoverPlayOpts};
pub use registry::animation_registry::{AnimationLoader, AnimationRegistry};
pub use registry::metadata::{AnimationMetadata, Category, Difficulty, ParamKind, ParamSpec};
pub use registry::query::{FilterCriteria, SortBy, SortOptions, SortOrder, sort_metadata};
pub use render::frame::FrameRGBA;
pub use render::pool::{PixmapPool, PixmapPoolOpts, PixmapPoolStats};
pub use render::surface::{Surface, SurfaceDesc};

/// Re-export of the raster backend so hosts can name pooled pixmaps.
pub use vello_cpu;
