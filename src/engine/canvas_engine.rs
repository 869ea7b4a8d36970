use std::sync::Arc;

use crate::{
    engine::device::{DeviceProfile, FramePolicy},
    engine::host::{Clock, FrameRequestId, FrameScheduler},
    engine::module::{AnimationContext, AnimationModule, FrameTiming},
    engine::params::Parameters,
    foundation::error::{CanvasFxError, CanvasFxResult},
    render::frame::FrameRGBA,
    render::surface::{Surface, SurfaceDesc},
};

/// Lowest accepted speed multiplier.
pub const MIN_SPEED: f64 = 0.25;
/// Highest accepted speed multiplier.
pub const MAX_SPEED: f64 = 2.0;

/// Engine construction options.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineOpts {
    /// Device capabilities used for the one-shot low-end classification. `None` probes the
    /// current process.
    pub device: Option<DeviceProfile>,
    /// Length of the FPS sampling window in milliseconds.
    pub fps_window_ms: f64,
    /// Measured FPS below this value reports [`PerformanceStatus::Degraded`].
    pub degraded_below_fps: u32,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            device: None,
            fps_window_ms: 1000.0,
            degraded_below_fps: 30,
        }
    }
}

/// Observability signal derived from the last FPS sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceStatus {
    /// No full sampling window has elapsed yet.
    Unmeasured,
    /// Last sample met the threshold.
    Good,
    /// Last sample fell below the threshold. Playback continues.
    Degraded,
}

/// Snapshot for UIs that poll engine state.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct EngineStatus {
    /// Whether the frame loop is running.
    pub playing: bool,
    /// Last windowed FPS sample.
    pub fps: u32,
    /// Speed multiplier.
    pub speed: f64,
    /// Performance signal for the last FPS sample.
    pub performance: PerformanceStatus,
    /// Whether the device was classified as low-end.
    pub low_end: bool,
    /// Target frames per second from the frame policy.
    pub target_fps: u32,
    /// Name of the active module, if any.
    pub animation: Option<String>,
}

/// Frame counters since construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct EngineStats {
    /// Frame callbacks requested from the scheduler.
    pub frames_requested: u64,
    /// Frames that ran `update` + `render`.
    pub frames_rendered: u64,
    /// Frames skipped by the low-end throttle.
    pub frames_dropped: u64,
}

/// Owner of a single time-stepped animation loop bound to one drawing surface.
///
/// The engine never drives itself: it requests frames from its [`FrameScheduler`] and the host
/// calls [`CanvasEngine::on_frame`] when a requested frame fires. Every public operation except
/// construction is total.
pub struct CanvasEngine {
    surface: Option<Surface>,
    scheduler: Box<dyn FrameScheduler>,
    clock: Arc<dyn Clock>,
    policy: FramePolicy,
    opts: EngineOpts,

    module: Option<Box<dyn AnimationModule>>,
    overrides: Parameters,
    params: Parameters,

    playing: bool,
    pending: Option<FrameRequestId>,
    speed: f64,
    elapsed_ms: f64,
    last_frame_ms: Option<f64>,

    fps: u32,
    window_start_ms: f64,
    window_frames: u32,

    stats: EngineStats,
    last_error: Option<CanvasFxError>,
    destroyed: bool,
}

impl CanvasEngine {
    /// Create a surface for `desc` and bind a new engine to it.
    ///
    /// Fails with [`CanvasFxError::Construction`] when the surface cannot yield a drawing
    /// context; the caller must not build anything around a failed engine.
    pub fn new(
        desc: SurfaceDesc,
        scheduler: impl FrameScheduler + 'static,
        clock: Arc<dyn Clock>,
        opts: EngineOpts,
    ) -> CanvasFxResult<Self> {
        let surface = Surface::new(desc)?;
        Ok(Self::with_surface(surface, scheduler, clock, opts))
    }

    /// Bind a new engine to an existing surface.
    pub fn with_surface(
        surface: Surface,
        scheduler: impl FrameScheduler + 'static,
        clock: Arc<dyn Clock>,
        opts: EngineOpts,
    ) -> Self {
        let device = opts.device.clone().unwrap_or_else(DeviceProfile::detect);
        let policy = FramePolicy::for_device(&device);
        tracing::debug!(
            low_end = policy.low_end,
            target_fps = policy.target_fps,
            "engine frame policy"
        );
        Self {
            surface: Some(surface),
            scheduler: Box::new(scheduler),
            clock,
            policy,
            opts,
            module: None,
            overrides: Parameters::new(),
            params: Parameters::new(),
            playing: false,
            pending: None,
            speed: 1.0,
            elapsed_ms: 0.0,
            last_frame_ms: None,
            fps: 0,
            window_start_ms: 0.0,
            window_frames: 0,
            stats: EngineStats::default(),
            last_error: None,
            destroyed: false,
        }
    }

    fn timing(&self, delta_ms: f64) -> FrameTiming {
        FrameTiming {
            time: self.elapsed_ms / 1000.0,
            delta_time: delta_ms * self.speed / 1000.0,
            fps: self.fps,
            is_playing: self.playing,
            speed: self.speed,
        }
    }

    fn init_module(&mut self) {
        let timing = self.timing(0.0);
        if let (Some(surface), Some(module)) = (self.surface.as_mut(), self.module.as_mut()) {
            let ctx = AnimationContext::new(surface, &self.params, timing);
            module.init(&ctx);
        }
    }

    fn cleanup_module(&mut self) {
        let timing = self.timing(0.0);
        if let Some(mut module) = self.module.take() {
            if let Some(surface) = self.surface.as_mut() {
                let ctx = AnimationContext::new(surface, &self.params, timing);
                module.cleanup(&ctx);
            }
            tracing::debug!(animation = module.name(), "animation cleaned up");
        }
    }

    fn arm(&mut self) {
        self.pending = Some(self.scheduler.request_frame());
        self.stats.frames_requested = self.stats.frames_requested.saturating_add(1);
    }

    /// Swap in `module`: stop the loop, clean up the previous module, then `init` the new one.
    ///
    /// Playback is not started.
    pub fn load_animation(&mut self, module: Box<dyn AnimationModule>) {
        if self.destroyed {
            tracing::warn!(animation = module.name(), "load_animation on destroyed engine");
            return;
        }
        self.stop();
        self.cleanup_module();

        let mut params = module.default_parameters();
        params.merge(&self.overrides);
        self.params = params;
        self.last_error = None;

        tracing::debug!(animation = module.name(), "animation loaded");
        self.module = Some(module);
        self.init_module();
    }

    /// Start (or resume) the frame loop. No-op when already playing.
    pub fn play(&mut self) {
        if self.playing || self.destroyed {
            return;
        }
        self.playing = true;
        self.last_frame_ms = None;
        self.window_start_ms = self.clock.now_ms();
        self.window_frames = 0;
        self.arm();
    }

    /// Cancel the scheduled frame and keep animation state. No-op when already paused.
    pub fn pause(&mut self) {
        if !self.playing {
            return;
        }
        self.playing = false;
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel_frame(id);
        }
    }

    /// Pause and reset logical time to zero. Module state is untouched, and `get_fps` keeps the
    /// last sample until the next window completes.
    pub fn stop(&mut self) {
        self.pause();
        self.elapsed_ms = 0.0;
        self.last_frame_ms = None;
        self.window_frames = 0;
    }

    /// Stop, re-run `init` on the active module, then play.
    pub fn restart(&mut self) {
        self.stop();
        self.init_module();
        self.play();
    }

    /// Set the speed multiplier, clamped to `[0.25, 2.0]`.
    ///
    /// Only the logical time seen by the module changes; frame cadence does not.
    pub fn set_speed(&mut self, multiplier: f64) {
        if multiplier.is_nan() {
            tracing::warn!("ignoring NaN speed multiplier");
            return;
        }
        self.speed = multiplier.clamp(MIN_SPEED, MAX_SPEED);
    }

    /// Shallow-merge `partial` into the parameter overrides. Visible from the next frame.
    pub fn set_parameters(&mut self, partial: &Parameters) {
        self.overrides.merge(partial);
        self.params.merge(partial);
    }

    /// Stop, clean up the active module and release the surface and resize hook.
    ///
    /// Returns the detached surface so pooled buffers can be handed back.
    pub fn destroy(&mut self) -> Option<Surface> {
        if self.destroyed {
            return None;
        }
        self.stop();
        self.cleanup_module();
        self.destroyed = true;
        self.surface.take()
    }

    /// Re-derive the surface for a new logical size and re-`init` the active module.
    ///
    /// `cleanup` is not called first; see [`AnimationModule::init`].
    pub fn resize(&mut self, width: f64, height: f64) {
        if self.destroyed {
            return;
        }
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let px = surface.resize(width, height);
        tracing::debug!(width = px.width, height = px.height, "surface resized");
        self.init_module();
    }

    /// Frame callback. The host calls this when a frame requested by the engine fires.
    pub fn on_frame(&mut self, timestamp_ms: f64) {
        if !self.playing {
            return;
        }
        self.pending = None;
        if self.module.is_none() || self.surface.is_none() {
            return;
        }

        if self.policy.min_frame_interval_ms > 0.0
            && let Some(last) = self.last_frame_ms
            && timestamp_ms - last < self.policy.min_frame_interval_ms
        {
            self.stats.frames_dropped = self.stats.frames_dropped.saturating_add(1);
            self.arm();
            return;
        }

        let delta_ms = match self.last_frame_ms {
            Some(last) => (timestamp_ms - last).max(0.0),
            None => 0.0,
        };
        self.last_frame_ms = Some(timestamp_ms);
        self.sample_fps(timestamp_ms);
        self.elapsed_ms += delta_ms * self.speed;

        let timing = self.timing(delta_ms);
        let (Some(surface), Some(module)) = (self.surface.as_mut(), self.module.as_mut()) else {
            return;
        };
        let outcome = {
            let mut ctx = AnimationContext::new(surface, &self.params, timing);
            match module.update(&ctx) {
                Ok(()) => module.render(&mut ctx),
                Err(e) => Err(e),
            }
        };

        match outcome {
            Ok(()) => {
                surface.present();
                self.stats.frames_rendered = self.stats.frames_rendered.saturating_add(1);
                self.arm();
            }
            Err(e) => {
                tracing::error!(
                    animation = module.name(),
                    error = %e,
                    "animation frame failed; pausing engine"
                );
                self.playing = false;
                self.last_error = Some(e);
            }
        }
    }

    fn sample_fps(&mut self, timestamp_ms: f64) {
        if timestamp_ms < self.window_start_ms {
            self.window_start_ms = timestamp_ms;
        }
        if timestamp_ms - self.window_start_ms >= self.opts.fps_window_ms {
            self.fps = self.window_frames;
            self.window_frames = 0;
            self.window_start_ms = timestamp_ms;
        }
        self.window_frames += 1;
    }

    /// Last completed windowed FPS sample (0 before the first full window).
    pub fn get_fps(&self) -> u32 {
        self.fps
    }

    /// Performance signal derived from [`CanvasEngine::get_fps`].
    pub fn performance(&self) -> PerformanceStatus {
        match self.fps {
            0 => PerformanceStatus::Unmeasured,
            f if f < self.opts.degraded_below_fps => PerformanceStatus::Degraded,
            _ => PerformanceStatus::Good,
        }
    }

    /// Snapshot for polling UIs.
    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            playing: self.playing,
            fps: self.fps,
            speed: self.speed,
            performance: self.performance(),
            low_end: self.policy.low_end,
            target_fps: self.policy.target_fps,
            animation: self.module.as_ref().map(|m| m.name().to_owned()),
        }
    }

    /// Frame counters.
    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Whether the frame loop is running.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Current speed multiplier.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Elapsed logical time in seconds.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_ms / 1000.0
    }

    /// Effective parameters of the active module.
    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// Frame pacing decided at construction.
    pub fn policy(&self) -> FramePolicy {
        self.policy
    }

    /// Whether `destroy` has run.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Error that paused the loop, if the last frame failed.
    pub fn last_error(&self) -> Option<&CanvasFxError> {
        self.last_error.as_ref()
    }

    /// Bound surface, if not destroyed.
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Copy of the last presented frame.
    pub fn snapshot(&self) -> Option<FrameRGBA> {
        self.surface.as_ref().map(Surface::snapshot)
    }
}

impl Drop for CanvasEngine {
    fn drop(&mut self) {
        let _ = self.destroy();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/canvas_engine.rs"]
mod tests;
