use crate::{
    engine::{
        module::{AnimationContext, AnimationModule},
        params::Parameters,
    },
    foundation::{core::Rgba8, error::CanvasFxResult, math::Rng64},
    registry::metadata::{AnimationMetadata, Category, Difficulty, ParamSpec},
};

pub(crate) const ID: &str = "matrix-rain";
const NAME: &str = "Matrix Rain";

// Glyph bitmaps are 3 columns by 5 rows.
const GLYPH_COLS: usize = 3;
const GLYPH_ROWS: usize = 5;

/// Falling columns of glyphs with a bright head and fading tail.
pub fn metadata() -> AnimationMetadata {
    AnimationMetadata::new(
        ID,
        NAME,
        "Digital rain of glyph trails falling down the screen",
        Category::Text,
        Difficulty::Hard,
    )
    .with_tags(&["text", "glyphs", "retro", "rain"])
    .with_parameters(vec![
        ParamSpec::number("cell_size", 14.0, 6.0, 40.0, 1.0).labeled("Glyph size"),
        ParamSpec::number("fall_speed", 12.0, 1.0, 60.0, 1.0).labeled("Rows per second"),
        ParamSpec::number("density", 0.7, 0.05, 1.0, 0.05).labeled("Density"),
        ParamSpec::number("trail", 14.0, 2.0, 40.0, 1.0).labeled("Trail length"),
        ParamSpec::color("color", "#00ff66").labeled("Color"),
        ParamSpec::color("background", "#000000").labeled("Background"),
        ParamSpec::number("seed", 3.0, 0.0, 1_000_000.0, 1.0).labeled("Seed"),
    ])
    .with_dates("2023-08-30", "2024-08-11")
}

pub(crate) fn create() -> Box<dyn AnimationModule> {
    Box::new(MatrixRain::default())
}

#[derive(Clone, Debug, PartialEq)]
struct Trail {
    column: usize,
    head: f64,
    speed: f64,
    glyphs: Vec<u16>,
}

#[derive(Debug)]
pub(crate) struct MatrixRain {
    rng: Rng64,
    trails: Vec<Trail>,
    columns: usize,
    rows: usize,
    respawn_clock: f64,
}

impl Default for MatrixRain {
    fn default() -> Self {
        Self {
            rng: Rng64::new(0),
            trails: Vec::new(),
            columns: 0,
            rows: 0,
            respawn_clock: 0.0,
        }
    }
}

impl MatrixRain {
    fn spawn(&mut self, column: usize, len: usize, above: bool) {
        let head = if above {
            -self.rng.range(0.0, self.rows.max(1) as f64)
        } else {
            self.rng.range(0.0, self.rows.max(1) as f64)
        };
        let speed = self.rng.range(0.6, 1.4);
        let glyphs = (0..len).map(|_| self.rng.next_u64() as u16).collect();
        self.trails.push(Trail {
            column,
            head,
            speed,
            glyphs,
        });
    }
}

impl AnimationModule for MatrixRain {
    fn name(&self) -> &str {
        NAME
    }

    fn default_parameters(&self) -> Parameters {
        metadata().default_parameters()
    }

    fn init(&mut self, ctx: &AnimationContext<'_>) {
        let cell = ctx.params.number("cell_size", 14.0).max(2.0);
        let density = ctx.params.number("density", 0.7).clamp(0.0, 1.0);
        let trail_len = ctx.params.number("trail", 14.0).clamp(1.0, 200.0) as usize;

        self.rng = Rng64::new(ctx.params.number("seed", 3.0).max(0.0) as u64);
        self.columns = (ctx.width / cell).ceil() as usize;
        self.rows = (ctx.height / cell).ceil() as usize;
        self.trails = Vec::with_capacity(self.columns);
        self.respawn_clock = 0.0;
        for column in 0..self.columns {
            if self.rng.next_f64_01() < density {
                self.spawn(column, trail_len, false);
            }
        }
    }

    fn update(&mut self, ctx: &AnimationContext<'_>) -> CanvasFxResult<()> {
        let fall = ctx.params.number("fall_speed", 12.0);
        let density = ctx.params.number("density", 0.7).clamp(0.0, 1.0);
        let trail_len = ctx.params.number("trail", 14.0).clamp(1.0, 200.0) as usize;

        for t in &mut self.trails {
            t.head += fall * t.speed * ctx.delta_time;
            if self.rng.next_f64_01() < 0.1 && !t.glyphs.is_empty() {
                let i = self.rng.index(t.glyphs.len());
                t.glyphs[i] = self.rng.next_u64() as u16;
            }
        }
        let rows = self.rows as f64;
        self.trails
            .retain(|d| d.head - (d.glyphs.len() as f64) < rows);

        // Respawn into empty columns at most ten times per second.
        self.respawn_clock += ctx.delta_time;
        while self.respawn_clock >= 0.1 {
            self.respawn_clock -= 0.1;
            for column in 0..self.columns {
                let empty = !self.trails.iter().any(|d| d.column == column);
                if empty && self.rng.next_f64_01() < density * 0.3 {
                    self.spawn(column, trail_len, true);
                }
            }
        }
        Ok(())
    }

    fn render(&self, ctx: &mut AnimationContext<'_>) -> CanvasFxResult<()> {
        let cell = ctx.params.number("cell_size", 14.0).max(2.0);
        let color = ctx.params.color("color", Rgba8::rgb(0, 255, 102));
        ctx.surface
            .clear(ctx.params.color("background", Rgba8::BLACK));

        let dot = cell / (GLYPH_COLS + 1) as f64;
        for t in &self.trails {
            let x = t.column as f64 * cell;
            let head_row = t.head.floor();
            for (i, glyph) in t.glyphs.iter().enumerate() {
                let row = head_row - i as f64;
                if row < 0.0 || row >= self.rows as f64 {
                    continue;
                }
                let tint = if i == 0 {
                    color.lerp(Rgba8::WHITE, 0.7)
                } else {
                    color.with_alpha(1.0 - i as f64 / t.glyphs.len() as f64)
                };
                draw_glyph(ctx, *glyph, x, row * cell, dot, tint);
            }
        }
        Ok(())
    }
}

fn draw_glyph(ctx: &mut AnimationContext<'_>, glyph: u16, x: f64, y: f64, dot: f64, color: Rgba8) {
    for bit in 0..GLYPH_COLS * GLYPH_ROWS {
        if glyph >> bit & 1 == 1 {
            let (c, r) = (bit % GLYPH_COLS, bit / GLYPH_COLS);
            ctx.surface.fill_rect(
                x + (c as f64 + 0.5) * dot,
                y + r as f64 * dot * 0.8,
                dot * 0.9,
                dot * 0.7,
                color,
            );
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animations/matrix_rain.rs"]
mod tests;
