use kurbo::{Affine, Point};

use crate::{
    engine::{
        module::{AnimationContext, AnimationModule},
        params::Parameters,
    },
    foundation::{core::Rgba8, error::CanvasFxResult},
    registry::metadata::{AnimationMetadata, Category, Difficulty, ParamSpec},
};

pub(crate) const ID: &str = "spiral-grid";
const NAME: &str = "Spiral Grid";

/// A dot grid twisted into a rotating spiral around the centre.
pub fn metadata() -> AnimationMetadata {
    AnimationMetadata::new(
        ID,
        NAME,
        "Grid of dots twisted into a breathing spiral",
        Category::Geometric,
        Difficulty::Medium,
    )
    .with_tags(&["geometric", "grid", "spiral", "hypnotic"])
    .with_parameters(vec![
        ParamSpec::number("spacing", 24.0, 8.0, 80.0, 1.0).labeled("Grid spacing"),
        ParamSpec::number("twist", 0.004, 0.0, 0.05, 0.001).labeled("Twist"),
        ParamSpec::number("rotation_speed", 0.6, -4.0, 4.0, 0.1).labeled("Rotation speed"),
        ParamSpec::number("dot_size", 3.0, 0.5, 12.0, 0.5).labeled("Dot size"),
        ParamSpec::color("color", "#ffb74d").labeled("Color"),
        ParamSpec::color("background", "#101010").labeled("Background"),
    ])
    .with_dates("2024-03-21", "2024-03-21")
}

pub(crate) fn create() -> Box<dyn AnimationModule> {
    Box::new(SpiralGrid::default())
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Cell {
    home: Point,
    radius: f64,
}

#[derive(Debug, Default)]
pub(crate) struct SpiralGrid {
    cells: Vec<Cell>,
    center: Point,
    angle: f64,
}

impl AnimationModule for SpiralGrid {
    fn name(&self) -> &str {
        NAME
    }

    fn default_parameters(&self) -> Parameters {
        metadata().default_parameters()
    }

    fn init(&mut self, ctx: &AnimationContext<'_>) {
        let spacing = ctx.params.number("spacing", 24.0).max(4.0);
        let cols = (ctx.width / spacing).floor() as usize + 1;
        let rows = (ctx.height / spacing).floor() as usize + 1;
        self.center = Point::new(ctx.width * 0.5, ctx.height * 0.5);
        let center = self.center;
        self.cells = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| Point::new(c as f64 * spacing, r as f64 * spacing)))
            .map(|home| Cell {
                home,
                radius: home.distance(center),
            })
            .collect();
        self.angle = 0.0;
    }

    fn update(&mut self, ctx: &AnimationContext<'_>) -> CanvasFxResult<()> {
        self.angle += ctx.delta_time * ctx.params.number("rotation_speed", 0.6);
        Ok(())
    }

    fn render(&self, ctx: &mut AnimationContext<'_>) -> CanvasFxResult<()> {
        let twist = ctx.params.number("twist", 0.004);
        let dot = ctx.params.number("dot_size", 3.0);
        let color = ctx.params.color("color", Rgba8::rgb(255, 183, 77));
        let reach = self.center.to_vec2().hypot().max(1.0);
        ctx.surface
            .clear(ctx.params.color("background", Rgba8::rgb(16, 16, 16)));

        for cell in &self.cells {
            let spin = self.angle * (1.0 - cell.radius / reach) + cell.radius * twist;
            let p = Affine::rotate_about(spin, self.center) * cell.home;
            let pulse = 0.75 + 0.25 * (self.angle * 2.0 - cell.radius * 0.05).sin();
            let shade = color.lerp(Rgba8::WHITE, 1.0 - cell.radius / reach);
            ctx.surface.fill_circle(p.x, p.y, dot * pulse, shade);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animations/spiral_grid.rs"]
mod tests;
