use crate::{
    engine::{
        module::{AnimationContext, AnimationModule},
        params::Parameters,
    },
    foundation::{core::Rgba8, error::CanvasFxResult, math::Rng64},
    registry::metadata::{AnimationMetadata, Category, Difficulty, ParamSpec},
};

pub(crate) const ID: &str = "glitch-bars";
const NAME: &str = "Glitch Bars";

/// Horizontal bars that jump sideways with a split-channel ghost.
pub fn metadata() -> AnimationMetadata {
    AnimationMetadata::new(
        ID,
        NAME,
        "Horizontal slices that jitter with a chromatic split",
        Category::Glitch,
        Difficulty::Easy,
    )
    .with_tags(&["glitch", "distortion", "bars", "loud"])
    .with_parameters(vec![
        ParamSpec::number("bars", 14.0, 2.0, 64.0, 1.0).labeled("Bars"),
        ParamSpec::number("intensity", 0.5, 0.0, 1.0, 0.05).labeled("Intensity"),
        ParamSpec::number("interval", 0.12, 0.02, 1.0, 0.01).labeled("Glitch interval"),
        ParamSpec::number("split", 6.0, 0.0, 30.0, 1.0).labeled("Channel split"),
        ParamSpec::color("primary", "#ff0055").labeled("Primary"),
        ParamSpec::color("secondary", "#00e5ff").labeled("Secondary"),
        ParamSpec::color("background", "#050505").labeled("Background"),
        ParamSpec::number("seed", 11.0, 0.0, 1_000_000.0, 1.0).labeled("Seed"),
    ])
}

pub(crate) fn create() -> Box<dyn AnimationModule> {
    Box::new(GlitchBars::default())
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Bar {
    y: f64,
    height: f64,
    // Horizontal shift as a fraction of the width.
    shift: f64,
    mix: f64,
}

#[derive(Debug)]
pub(crate) struct GlitchBars {
    rng: Rng64,
    bars: Vec<Bar>,
    timer: f64,
    glitches: u64,
}

impl Default for GlitchBars {
    fn default() -> Self {
        Self {
            rng: Rng64::new(0),
            bars: Vec::new(),
            timer: 0.0,
            glitches: 0,
        }
    }
}

impl GlitchBars {
    fn reshuffle(&mut self, intensity: f64) {
        for bar in &mut self.bars {
            bar.shift = if self.rng.next_f64_01() < intensity {
                self.rng.range(-0.3, 0.3) * intensity
            } else {
                0.0
            };
            bar.mix = self.rng.next_f64_01();
        }
        self.glitches += 1;
    }
}

impl AnimationModule for GlitchBars {
    fn name(&self) -> &str {
        NAME
    }

    fn default_parameters(&self) -> Parameters {
        metadata().default_parameters()
    }

    fn init(&mut self, ctx: &AnimationContext<'_>) {
        let count = ctx.params.number("bars", 14.0).clamp(1.0, 512.0) as usize;
        self.rng = Rng64::new(ctx.params.number("seed", 11.0).max(0.0) as u64);
        let slot = ctx.height / count as f64;
        let rng = &mut self.rng;
        self.bars = (0..count)
            .map(|i| Bar {
                y: i as f64 * slot,
                height: slot * rng.range(0.35, 0.9),
                shift: 0.0,
                mix: rng.next_f64_01(),
            })
            .collect();
        self.timer = 0.0;
        self.glitches = 0;
    }

    fn update(&mut self, ctx: &AnimationContext<'_>) -> CanvasFxResult<()> {
        let interval = ctx.params.number("interval", 0.12).max(0.01);
        let intensity = ctx.params.number("intensity", 0.5).clamp(0.0, 1.0);
        self.timer += ctx.delta_time;
        if self.timer >= interval {
            self.timer %= interval;
            self.reshuffle(intensity);
        }
        Ok(())
    }

    fn render(&self, ctx: &mut AnimationContext<'_>) -> CanvasFxResult<()> {
        let w = ctx.width;
        let split = ctx.params.number("split", 6.0);
        let primary = ctx.params.color("primary", Rgba8::rgb(255, 0, 85));
        let secondary = ctx.params.color("secondary", Rgba8::rgb(0, 229, 255));
        ctx.surface
            .clear(ctx.params.color("background", Rgba8::rgb(5, 5, 5)));

        for bar in &self.bars {
            let x = bar.shift * w;
            let color = primary.lerp(secondary, bar.mix);
            if bar.shift != 0.0 && split > 0.0 {
                ctx.surface.with_opacity(0.5, |s| {
                    s.fill_rect(x - split, bar.y, w, bar.height, secondary);
                    s.fill_rect(x + split, bar.y, w, bar.height, primary);
                });
            }
            ctx.surface.fill_rect(x, bar.y, w, bar.height, color);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animations/glitch_bars.rs"]
mod tests;
