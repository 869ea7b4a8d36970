//! Drives a single module against a surface without an engine.

use crate::{
    engine::{
        module::{AnimationContext, AnimationModule, FrameTiming},
        params::Parameters,
    },
    render::surface::{Surface, SurfaceDesc},
};

pub(crate) struct Harness {
    pub(crate) surface: Surface,
    pub(crate) params: Parameters,
    pub(crate) time: f64,
}

impl Harness {
    /// Harness over a `width` x `height` surface with the module's defaults overlaid by `overrides`.
    pub(crate) fn new(
        module: &dyn AnimationModule,
        width: f64,
        height: f64,
        overrides: Parameters,
    ) -> Self {
        let mut params = module.default_parameters();
        params.merge(&overrides);
        Self {
            surface: Surface::new(SurfaceDesc::new(width, height)).unwrap(),
            params,
            time: 0.0,
        }
    }

    fn timing(&self, delta_time: f64) -> FrameTiming {
        FrameTiming {
            time: self.time,
            delta_time,
            fps: 60,
            is_playing: true,
            speed: 1.0,
        }
    }

    pub(crate) fn init(&mut self, module: &mut dyn AnimationModule) {
        let timing = self.timing(0.0);
        let ctx = AnimationContext::new(&mut self.surface, &self.params, timing);
        module.init(&ctx);
    }

    pub(crate) fn resize(&mut self, module: &mut dyn AnimationModule, width: f64, height: f64) {
        self.surface.resize(width, height);
        self.init(module);
    }

    pub(crate) fn step(&mut self, module: &mut dyn AnimationModule, delta_time: f64) {
        self.time += delta_time;
        let timing = self.timing(delta_time);
        let ctx = AnimationContext::new(&mut self.surface, &self.params, timing);
        module.update(&ctx).unwrap();
    }

    /// Render and present; returns the presented pixels.
    pub(crate) fn render(&mut self, module: &dyn AnimationModule) -> Vec<u8> {
        let timing = self.timing(0.0);
        let mut ctx = AnimationContext::new(&mut self.surface, &self.params, timing);
        module.render(&mut ctx).unwrap();
        self.surface.present();
        self.surface.pixels().to_vec()
    }

    pub(crate) fn cleanup(&mut self, module: &mut dyn AnimationModule) {
        let timing = self.timing(0.0);
        let ctx = AnimationContext::new(&mut self.surface, &self.params, timing);
        module.cleanup(&ctx);
    }
}

/// Render twice without an update and require identical pixels.
pub(crate) fn assert_render_is_pure(h: &mut Harness, module: &dyn AnimationModule) {
    let a = h.render(module);
    let b = h.render(module);
    assert_eq!(a, b, "render must not mutate observable state");
}

/// Number of pixels that differ between two frames.
pub(crate) fn diff_count(a: &[u8], b: &[u8]) -> usize {
    a.chunks_exact(4)
        .zip(b.chunks_exact(4))
        .filter(|(x, y)| x != y)
        .count()
}
