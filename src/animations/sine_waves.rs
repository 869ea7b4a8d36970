use std::f64::consts::TAU;

use crate::{
    engine::{
        module::{AnimationContext, AnimationModule},
        params::Parameters,
    },
    foundation::{
        core::Rgba8,
        error::CanvasFxResult,
        math::{Rng64, noise1d},
    },
    registry::metadata::{AnimationMetadata, Category, Difficulty, ParamSpec},
};

pub(crate) const ID: &str = "sine-waves";
const NAME: &str = "Sine Waves";

// Horizontal sampling step in logical pixels.
const STEP: f64 = 4.0;

/// Layered sine waves drifting at different phases.
pub fn metadata() -> AnimationMetadata {
    AnimationMetadata::new(
        ID,
        NAME,
        "Layered sine waves with shifting phase and hue",
        Category::Waves,
        Difficulty::Easy,
    )
    .with_tags(&["waves", "calm", "lines", "ambient"])
    .with_parameters(vec![
        ParamSpec::number("waves", 5.0, 1.0, 12.0, 1.0).labeled("Waves"),
        ParamSpec::number("amplitude", 40.0, 0.0, 200.0, 1.0).labeled("Amplitude"),
        ParamSpec::number("frequency", 1.5, 0.1, 8.0, 0.1).labeled("Frequency"),
        ParamSpec::number("phase_speed", 1.2, 0.0, 6.0, 0.1).labeled("Phase speed"),
        ParamSpec::number("line_width", 2.0, 0.5, 8.0, 0.5).labeled("Line width"),
        ParamSpec::number("hue", 260.0, 0.0, 360.0, 1.0).labeled("Base hue"),
        ParamSpec::color("background", "#0d0d1a").labeled("Background"),
    ])
    .with_dates("2023-11-02", "2024-06-18")
}

pub(crate) fn create() -> Box<dyn AnimationModule> {
    Box::new(SineWaves::default())
}

#[derive(Debug, Default)]
pub(crate) struct SineWaves {
    offsets: Vec<f64>,
    phase: f64,
}

impl AnimationModule for SineWaves {
    fn name(&self) -> &str {
        NAME
    }

    fn default_parameters(&self) -> Parameters {
        metadata().default_parameters()
    }

    fn init(&mut self, ctx: &AnimationContext<'_>) {
        let waves = ctx.params.number("waves", 5.0).clamp(1.0, 64.0) as usize;
        let mut rng = Rng64::new(0x5eed_0001);
        self.offsets = (0..waves).map(|_| rng.range(0.0, TAU)).collect();
        self.phase = 0.0;
    }

    fn update(&mut self, ctx: &AnimationContext<'_>) -> CanvasFxResult<()> {
        self.phase = (self.phase + ctx.delta_time * ctx.params.number("phase_speed", 1.2)) % TAU;
        Ok(())
    }

    fn render(&self, ctx: &mut AnimationContext<'_>) -> CanvasFxResult<()> {
        let (w, h) = (ctx.width, ctx.height);
        let amplitude = ctx.params.number("amplitude", 40.0);
        let frequency = ctx.params.number("frequency", 1.5);
        let line_width = ctx.params.number("line_width", 2.0);
        let hue = ctx.params.number("hue", 260.0);
        ctx.surface
            .clear(ctx.params.color("background", Rgba8::rgb(13, 13, 26)));

        let n = self.offsets.len().max(1) as f64;
        let samples = (w / STEP).ceil() as usize + 1;
        for (i, offset) in self.offsets.iter().enumerate() {
            let layer = i as f64 / n;
            let amp = amplitude * (1.0 - layer * 0.5) * (1.0 + 0.15 * noise1d(i as u64, self.phase));
            let color = Rgba8::from_hsla(hue + layer * 80.0, 0.8, 0.6, 0.85 - layer * 0.4);
            let points: Vec<(f64, f64)> = (0..samples)
                .map(|s| {
                    let x = (s as f64 * STEP).min(w);
                    let theta = frequency * x / w.max(1.0) * TAU + self.phase * (1.0 + layer) + offset;
                    (x, h * 0.5 + amp * theta.sin())
                })
                .collect();
            ctx.surface.stroke_polyline(&points, line_width, color);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animations/sine_waves.rs"]
mod tests;
