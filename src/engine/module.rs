use std::sync::Arc;

use crate::{
    engine::params::Parameters, foundation::error::CanvasFxResult, render::surface::Surface,
};

/// Per-frame view handed to the active animation module.
///
/// Rebuilt by the engine for every call and never stored by modules.
pub struct AnimationContext<'a> {
    /// Surface to draw on. Only [`AnimationModule::render`] receives it mutably.
    pub surface: &'a mut Surface,
    /// Logical surface width.
    pub width: f64,
    /// Logical surface height.
    pub height: f64,
    /// Elapsed logical time in seconds, scaled by `speed`.
    pub time: f64,
    /// Logical seconds since the previous accepted frame, scaled by `speed`. Zero on the first
    /// frame after `play`.
    pub delta_time: f64,
    /// Last measured frames per second.
    pub fps: u32,
    /// Whether the engine loop is running.
    pub is_playing: bool,
    /// Speed multiplier in `[0.25, 2.0]`.
    pub speed: f64,
    /// Effective parameters (module defaults overlaid with engine overrides).
    pub params: &'a Parameters,
}

/// Timing half of an [`AnimationContext`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct FrameTiming {
    pub(crate) time: f64,
    pub(crate) delta_time: f64,
    pub(crate) fps: u32,
    pub(crate) is_playing: bool,
    pub(crate) speed: f64,
}

impl<'a> AnimationContext<'a> {
    pub(crate) fn new(surface: &'a mut Surface, params: &'a Parameters, t: FrameTiming) -> Self {
        Self {
            width: surface.width(),
            height: surface.height(),
            surface,
            time: t.time,
            delta_time: t.delta_time,
            fps: t.fps,
            is_playing: t.is_playing,
            speed: t.speed,
            params,
        }
    }
}

/// One procedural visual effect driven by a [`crate::CanvasEngine`].
///
/// The engine calls `update` then `render` once per accepted frame. `update` advances state and
/// cannot draw; `render` draws and cannot mutate state, so repeated `render` calls without an
/// `update` produce the same pixels.
pub trait AnimationModule {
    /// Display name of the effect.
    fn name(&self) -> &str;

    /// Parameter values used when the engine has no override for a key.
    fn default_parameters(&self) -> Parameters {
        Parameters::new()
    }

    /// Allocate internal state from the context dimensions and parameters.
    ///
    /// Called on load, on restart and again after every resize **without** a preceding
    /// `cleanup`. Implementations must fully replace previously allocated state rather than
    /// append to it.
    fn init(&mut self, ctx: &AnimationContext<'_>);

    /// Advance internal state by one tick.
    fn update(&mut self, ctx: &AnimationContext<'_>) -> CanvasFxResult<()>;

    /// Draw the current state.
    fn render(&self, ctx: &mut AnimationContext<'_>) -> CanvasFxResult<()>;

    /// Release resources before the module is swapped out or the engine is destroyed.
    fn cleanup(&mut self, _ctx: &AnimationContext<'_>) {}
}

/// Loadable unit cached by the registry. Each engine gets its own module instance.
pub trait AnimationFactory: Send + Sync {
    /// Display name of the effect.
    fn name(&self) -> &str;

    /// Create a fresh, uninitialized module.
    fn create(&self) -> Box<dyn AnimationModule>;
}

/// Shared handle to a loaded animation, identical for every caller until the cache is cleared.
pub type LoadedAnimation = Arc<dyn AnimationFactory>;

/// Factory backed by a plain constructor function.
#[derive(Clone, Copy)]
pub struct FnFactory {
    name: &'static str,
    ctor: fn() -> Box<dyn AnimationModule>,
}

impl FnFactory {
    /// Factory named `name` that builds modules with `ctor`.
    pub const fn new(name: &'static str, ctor: fn() -> Box<dyn AnimationModule>) -> Self {
        Self { name, ctor }
    }
}

impl std::fmt::Debug for FnFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnFactory").field("name", &self.name).finish()
    }
}

impl AnimationFactory for FnFactory {
    fn name(&self) -> &str {
        self.name
    }

    fn create(&self) -> Box<dyn AnimationModule> {
        (self.ctor)()
    }
}
