use kurbo::{Point, Vec2};

use crate::{
    engine::{
        module::{AnimationContext, AnimationModule},
        params::Parameters,
    },
    foundation::{
        core::Rgba8,
        error::{CanvasFxError, CanvasFxResult},
        math::Rng64,
    },
    registry::metadata::{AnimationMetadata, Category, Difficulty, ParamSpec},
};

pub(crate) const ID: &str = "particle-network";
const NAME: &str = "Particle Network";

const BACKGROUND: Rgba8 = Rgba8::rgb(11, 16, 32);
const DOT: Rgba8 = Rgba8::rgb(79, 195, 247);

/// Drifting particles joined by lines when they come close.
pub fn metadata() -> AnimationMetadata {
    AnimationMetadata::new(
        ID,
        NAME,
        "Drifting particles that link up with their neighbours",
        Category::Particles,
        Difficulty::Medium,
    )
    .with_tags(&["particles", "network", "connections", "ambient"])
    .with_parameters(vec![
        ParamSpec::number("count", 60.0, 5.0, 300.0, 1.0).labeled("Particles"),
        ParamSpec::number("link_distance", 110.0, 20.0, 300.0, 5.0).labeled("Link distance"),
        ParamSpec::number("speed", 40.0, 0.0, 200.0, 5.0).labeled("Drift speed"),
        ParamSpec::number("radius", 2.5, 0.5, 8.0, 0.5).labeled("Dot radius"),
        ParamSpec::boolean("show_links", true).labeled("Show links"),
        ParamSpec::color("color", "#4fc3f7").labeled("Color"),
        ParamSpec::color("background", "#0b1020").labeled("Background"),
        ParamSpec::number("seed", 7.0, 0.0, 1_000_000.0, 1.0).labeled("Seed"),
    ])
    .with_dates("2024-01-12", "2024-09-03")
}

pub(crate) fn create() -> Box<dyn AnimationModule> {
    Box::new(ParticleNetwork::default())
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Particle {
    pos: Point,
    vel: Vec2,
}

#[derive(Debug, Default)]
pub(crate) struct ParticleNetwork {
    particles: Vec<Particle>,
    bounds: Vec2,
}

impl ParticleNetwork {
    fn seeded(params: &Parameters) -> Rng64 {
        Rng64::new(params.number("seed", 7.0).max(0.0) as u64)
    }
}

impl AnimationModule for ParticleNetwork {
    fn name(&self) -> &str {
        NAME
    }

    fn default_parameters(&self) -> Parameters {
        metadata().default_parameters()
    }

    fn init(&mut self, ctx: &AnimationContext<'_>) {
        let count = ctx.params.number("count", 60.0).clamp(0.0, 2000.0) as usize;
        let speed = ctx.params.number("speed", 40.0);
        let mut rng = Self::seeded(ctx.params);

        self.bounds = Vec2::new(ctx.width, ctx.height);
        self.particles = (0..count)
            .map(|_| {
                let angle = rng.range(0.0, std::f64::consts::TAU);
                let magnitude = speed * rng.range(0.3, 1.0);
                Particle {
                    pos: Point::new(rng.range(0.0, ctx.width), rng.range(0.0, ctx.height)),
                    vel: Vec2::from_angle(angle) * magnitude,
                }
            })
            .collect();
    }

    fn update(&mut self, ctx: &AnimationContext<'_>) -> CanvasFxResult<()> {
        let (w, h) = (self.bounds.x, self.bounds.y);
        for p in &mut self.particles {
            p.pos += p.vel * ctx.delta_time;
            if p.pos.x < 0.0 || p.pos.x > w {
                p.vel.x = -p.vel.x;
                p.pos.x = p.pos.x.clamp(0.0, w);
            }
            if p.pos.y < 0.0 || p.pos.y > h {
                p.vel.y = -p.vel.y;
                p.pos.y = p.pos.y.clamp(0.0, h);
            }
            if !p.pos.is_finite() {
                return Err(CanvasFxError::module(format!(
                    "particle left the finite plane at {:?}",
                    p.pos
                )));
            }
        }
        Ok(())
    }

    fn render(&self, ctx: &mut AnimationContext<'_>) -> CanvasFxResult<()> {
        let color = ctx.params.color("color", DOT);
        let link = ctx.params.number("link_distance", 110.0).max(0.0);
        let radius = ctx.params.number("radius", 2.5);
        ctx.surface.clear(ctx.params.color("background", BACKGROUND));

        if ctx.params.boolean("show_links", true) && link > 0.0 {
            for (i, a) in self.particles.iter().enumerate() {
                for b in &self.particles[i + 1..] {
                    let d = a.pos.distance(b.pos);
                    if d < link {
                        let alpha = (1.0 - d / link) * 0.6;
                        ctx.surface.stroke_line(
                            a.pos.x,
                            a.pos.y,
                            b.pos.x,
                            b.pos.y,
                            1.0,
                            color.with_alpha(alpha),
                        );
                    }
                }
            }
        }
        for p in &self.particles {
            ctx.surface.fill_circle(p.pos.x, p.pos.y, radius, color);
        }
        Ok(())
    }

    fn cleanup(&mut self, _ctx: &AnimationContext<'_>) {
        self.particles = Vec::new();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animations/particle_network.rs"]
mod tests;
