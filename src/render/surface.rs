use kurbo::{Affine, BezPath, Circle, Shape};

use crate::{
    foundation::core::{PixelSize, Rgba8},
    foundation::error::{CanvasFxError, CanvasFxResult},
    render::frame::FrameRGBA,
};

/// Logical description of a drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceDesc {
    /// Logical width (CSS-pixel equivalent).
    pub width: f64,
    /// Logical height.
    pub height: f64,
    /// Device pixels per logical pixel.
    #[serde(default = "default_dpr")]
    pub device_pixel_ratio: f64,
}

fn default_dpr() -> f64 {
    1.0
}

impl SurfaceDesc {
    /// Surface description with a device pixel ratio of 1.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio: 1.0,
        }
    }

    /// Same description with `dpr` as device pixel ratio.
    pub fn with_device_pixel_ratio(self, dpr: f64) -> Self {
        Self {
            device_pixel_ratio: dpr,
            ..self
        }
    }

    /// Pixel-buffer size derived from the logical size and device pixel ratio.
    ///
    /// Fails when the surface could not be backed by a raster context.
    pub fn pixel_size(&self) -> CanvasFxResult<PixelSize> {
        if !self.device_pixel_ratio.is_finite() || self.device_pixel_ratio <= 0.0 {
            return Err(CanvasFxError::construction(format!(
                "device pixel ratio must be finite and > 0, got {}",
                self.device_pixel_ratio
            )));
        }
        let w = scaled_axis(self.width, self.device_pixel_ratio, "width")?;
        let h = scaled_axis(self.height, self.device_pixel_ratio, "height")?;
        Ok(PixelSize::new(u32::from(w), u32::from(h)))
    }
}

fn scaled_axis(logical: f64, dpr: f64, axis: &str) -> CanvasFxResult<u16> {
    let px = (logical * dpr).round();
    if !px.is_finite() || px < 1.0 || px > f64::from(u16::MAX) {
        return Err(CanvasFxError::construction(format!(
            "surface {axis} of {logical} x {dpr} does not fit a raster context"
        )));
    }
    Ok(px as u16)
}

/// CPU drawing surface: a `vello_cpu` render context bound to a premultiplied RGBA8 pixmap.
///
/// Drawing calls take logical coordinates; the device pixel ratio is applied as a base transform.
/// Commands are buffered until [`Surface::present`] rasterizes them into the pixmap.
pub struct Surface {
    desc: SurfaceDesc,
    pixels: PixelSize,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    transform: Affine,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("desc", &self.desc)
            .field("pixels", &self.pixels)
            .finish()
    }
}

impl Surface {
    /// Allocate a surface for `desc`.
    pub fn new(desc: SurfaceDesc) -> CanvasFxResult<Self> {
        let pixels = desc.pixel_size()?;
        let (w, h) = (pixels.width as u16, pixels.height as u16);
        Ok(Self::assemble(desc, pixels, vello_cpu::Pixmap::new(w, h)))
    }

    /// Bind an existing pixmap (for example one acquired from a pool) to a surface.
    ///
    /// The pixmap must match the pixel size derived from `desc`.
    pub fn from_pixmap(desc: SurfaceDesc, pixmap: vello_cpu::Pixmap) -> CanvasFxResult<Self> {
        let pixels = desc.pixel_size()?;
        let got = PixelSize::new(u32::from(pixmap.width()), u32::from(pixmap.height()));
        if got != pixels {
            return Err(CanvasFxError::construction(format!(
                "pixmap is {}x{}, surface needs {}x{}",
                got.width, got.height, pixels.width, pixels.height
            )));
        }
        Ok(Self::assemble(desc, pixels, pixmap))
    }

    fn assemble(desc: SurfaceDesc, pixels: PixelSize, pixmap: vello_cpu::Pixmap) -> Self {
        let mut out = Self {
            desc,
            pixels,
            ctx: vello_cpu::RenderContext::new(pixels.width as u16, pixels.height as u16),
            pixmap,
            transform: Affine::IDENTITY,
        };
        out.apply_transform();
        out
    }

    /// Logical width.
    pub fn width(&self) -> f64 {
        self.desc.width
    }

    /// Logical height.
    pub fn height(&self) -> f64 {
        self.desc.height
    }

    /// Device pixels per logical pixel.
    pub fn device_pixel_ratio(&self) -> f64 {
        self.desc.device_pixel_ratio
    }

    /// Current logical description.
    pub fn desc(&self) -> SurfaceDesc {
        self.desc
    }

    /// Backing pixel-buffer size.
    pub fn pixel_size(&self) -> PixelSize {
        self.pixels
    }

    /// Re-derive the pixel buffer for a new logical size.
    ///
    /// Sizes that cannot back a raster context are clamped into range instead of failing.
    /// Returns the new pixel size.
    pub fn resize(&mut self, width: f64, height: f64) -> PixelSize {
        let dpr = self.desc.device_pixel_ratio;
        let max_logical = f64::from(u16::MAX) / dpr;
        let clamp = |v: f64| {
            if v.is_finite() {
                v.clamp(1.0 / dpr, max_logical)
            } else {
                1.0 / dpr
            }
        };
        let desc = SurfaceDesc {
            width: clamp(width),
            height: clamp(height),
            device_pixel_ratio: dpr,
        };
        if desc.width != width || desc.height != height {
            tracing::warn!(width, height, "surface resize clamped into raster range");
        }

        let pixels = match desc.pixel_size() {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "surface resize rejected; keeping previous size");
                return self.pixels;
            }
        };
        self.desc = desc;
        if pixels != self.pixels {
            self.pixels = pixels;
            self.ctx = vello_cpu::RenderContext::new(pixels.width as u16, pixels.height as u16);
            self.pixmap = vello_cpu::Pixmap::new(pixels.width as u16, pixels.height as u16);
        }
        self.transform = Affine::IDENTITY;
        self.apply_transform();
        pixels
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
        self.apply_transform();
    }

    fn apply_transform(&mut self) {
        let full = Affine::scale(self.desc.device_pixel_ratio) * self.transform;
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::new(full.as_coeffs()));
    }

    fn set_color(&mut self, color: Rgba8) {
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
    }

    /// Fill the whole logical area with `color`.
    pub fn clear(&mut self, color: Rgba8) {
        let saved = self.transform;
        self.set_transform(Affine::IDENTITY);
        self.fill_rect(0.0, 0.0, self.desc.width, self.desc.height, color);
        self.set_transform(saved);
    }

    /// Fill an axis-aligned rectangle.
    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba8) {
        self.set_color(color);
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(x, y, x + w, y + h));
    }

    /// Fill a circle.
    pub fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgba8) {
        if radius <= 0.0 {
            return;
        }
        let path = Circle::new((cx, cy), radius).to_path(0.1);
        self.fill_path(&path, color);
    }

    /// Draw a line segment of `width` logical pixels as a filled quad.
    pub fn stroke_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, width: f64, color: Rgba8) {
        let (dx, dy) = (x1 - x0, y1 - y0);
        let len = dx.hypot(dy);
        if len <= f64::EPSILON || width <= 0.0 {
            return;
        }
        let (nx, ny) = (-dy / len * width * 0.5, dx / len * width * 0.5);
        let mut quad = BezPath::new();
        quad.move_to((x0 + nx, y0 + ny));
        quad.line_to((x1 + nx, y1 + ny));
        quad.line_to((x1 - nx, y1 - ny));
        quad.line_to((x0 - nx, y0 - ny));
        quad.close_path();
        self.fill_path(&quad, color);
    }

    /// Stroke a polyline through `points`.
    pub fn stroke_polyline(&mut self, points: &[(f64, f64)], width: f64, color: Rgba8) {
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            self.stroke_line(a.0, a.1, b.0, b.1, width, color);
        }
    }

    /// Fill an arbitrary path.
    pub fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        self.set_color(color);
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    /// Run `draw` inside an opacity layer.
    pub fn with_opacity(&mut self, opacity: f32, draw: impl FnOnce(&mut Self)) {
        let opacity = opacity.clamp(0.0, 1.0);
        if opacity >= 1.0 {
            draw(self);
            return;
        }
        self.ctx.push_opacity_layer(opacity);
        draw(self);
        self.ctx.pop_layer();
    }

    /// Rasterize buffered drawing commands into the pixmap and start a fresh command list.
    pub fn present(&mut self) {
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        self.ctx.reset();
        self.apply_transform();
    }

    /// Premultiplied RGBA8 bytes of the last presented frame.
    pub fn pixels(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Copy the last presented frame.
    pub fn snapshot(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.pixels.width,
            height: self.pixels.height,
            data: self.pixels().to_vec(),
            premultiplied: true,
        }
    }

    /// Give up the surface, returning its pixmap (for example to release it into a pool).
    pub fn into_pixmap(self) -> vello_cpu::Pixmap {
        self.pixmap
    }
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let p = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(a) => out.move_to(p(a)),
            PathEl::LineTo(a) => out.line_to(p(a)),
            PathEl::QuadTo(a, b) => out.quad_to(p(a), p(b)),
            PathEl::CurveTo(a, b, c) => out.curve_to(p(a), p(b), p(c)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
