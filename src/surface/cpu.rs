use std::{collections::HashMap, fmt, sync::Arc};

use kurbo::{Affine, BezPath, PathEl, Point, Rect};
use vello_cpu::peniko::{ImageQuality, ImageSampler, color::PremulRgba8};

use crate::{
    assets::image::{Bitmap, ImageResource},
    foundation::{
        core::Color,
        error::{StampError, StampResult},
        math::mul_div255,
    },
    math::vector2::Vector2,
    surface::{
        blur::blur_alpha,
        composite::blend_mode,
        context::{CompositeOperation, Shadow, Surface, View},
        state::{PathBuilder, StateStack},
    },
};

/// Device-space clip paths, intersected in order.
type ClipPaths = Vec<BezPath>;

/// One paint operation, resolved against the drawing state at call time.
enum Shape {
    /// A device-space path.
    Fill { path: BezPath, color: Color },
    /// A user-space path stroked under `transform`, so line width follows the user scale.
    Stroke {
        path: BezPath,
        transform: Affine,
        width: f64,
        color: Color,
    },
    /// `paint` laid over `dest` in user space.
    Image {
        paint: vello_cpu::Image,
        transform: Affine,
        paint_transform: Affine,
        dest: Rect,
    },
}

/// Software [`Surface`] rasterized with `vello_cpu`.
///
/// Each draw renders the current pixels as a backdrop, then the shape inside its clip, blend
/// and opacity layers, so operators that touch pixels outside the shape (`destination-in`,
/// `copy`, ...) behave like they do on an HTML canvas.
pub struct CpuSurface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    /// Set while every pixel is transparent, which lets a draw skip the backdrop.
    blank: bool,
    state: StateStack<ClipPaths>,
    path: PathBuilder,
    client_origin: Vector2,
    images: HashMap<usize, (Arc<Vec<u8>>, vello_cpu::Image)>,
}

impl fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CpuSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("depth", &self.state.depth())
            .field("client_origin", &self.client_origin)
            .finish_non_exhaustive()
    }
}

impl CpuSurface {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
            pixmap: vello_cpu::Pixmap::new(width, height),
            blank: true,
            state: StateStack::default(),
            path: PathBuilder::default(),
            client_origin: Vector2::ZERO,
            images: HashMap::new(),
        }
    }

    /// Place the surface's top-left at `origin` in client coordinates.
    pub fn with_client_origin(mut self, origin: Vector2) -> Self {
        self.client_origin = origin;
        self
    }

    pub fn set_client_origin(&mut self, origin: Vector2) {
        self.client_origin = origin;
    }

    /// Premultiplied RGBA8, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= u32::from(self.width) || y >= u32::from(self.height) {
            return None;
        }
        let i = ((y as usize) * usize::from(self.width) + x as usize) * 4;
        let p = &self.pixels()[i..i + 4];
        Some([p[0], p[1], p[2], p[3]])
    }

    fn viewport(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Image paint for `bitmap`, cached per pixel buffer.
    fn image_paint(&mut self, bitmap: &Bitmap) -> StampResult<vello_cpu::Image> {
        let key = Arc::as_ptr(&bitmap.rgba8_premul) as usize;
        if let Some((_, paint)) = self.images.get(&key) {
            return Ok(paint.clone());
        }
        // Entries only the cache still holds belong to replaced frames.
        self.images.retain(|_, (bytes, _)| Arc::strong_count(bytes) > 1);

        let w: u16 = bitmap
            .width
            .try_into()
            .map_err(|_| StampError::render("image width exceeds u16"))?;
        let h: u16 = bitmap
            .height
            .try_into()
            .map_err(|_| StampError::render("image height exceeds u16"))?;
        let paint = nearest_paint(pixmap_from_premul(&bitmap.rgba8_premul, w, h));
        self.images
            .insert(key, (Arc::clone(&bitmap.rgba8_premul), paint.clone()));
        Ok(paint)
    }

    /// Composite `shape` onto the pixels with the current clip, operator, alpha and shadow.
    fn paint(&mut self, shape: &Shape) {
        let state = &self.state.current;
        let op = state.composite;
        let alpha = state.global_alpha as f32;
        let shadow = state
            .shadow
            .filter(Shadow::is_visible)
            .map(|s| self.shadow_paint(shape, s));

        let backdrop = std::mem::replace(
            &mut self.pixmap,
            vello_cpu::Pixmap::new(self.width, self.height),
        );
        let viewport = to_cpu_rect(self.viewport());
        let ctx = &mut self.ctx;
        ctx.reset();
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        if !self.blank {
            ctx.set_paint(nearest_paint(backdrop));
            ctx.fill_rect(&viewport);
        }

        let mut layers = 0;
        for clip in &self.state.current.extra {
            ctx.push_clip_layer(&to_cpu_path(clip));
            layers += 1;
        }
        if op != CompositeOperation::SourceOver {
            ctx.push_blend_layer(blend_mode(op));
            layers += 1;
        }
        if alpha < 1.0 {
            ctx.push_opacity_layer(alpha);
            layers += 1;
        }
        if let Some(shadow) = shadow {
            ctx.set_paint(shadow);
            ctx.fill_rect(&viewport);
        }
        paint_shape(ctx, shape);
        for _ in 0..layers {
            ctx.pop_layer();
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut self.pixmap);
        self.blank = false;
    }

    /// The shape's coverage, offset, blurred and tinted with the shadow color.
    fn shadow_paint(&self, shape: &Shape, shadow: Shadow) -> vello_cpu::Image {
        let (w, h) = (usize::from(self.width), usize::from(self.height));
        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        let mut silhouette = vello_cpu::Pixmap::new(self.width, self.height);
        paint_shape(&mut ctx, shape);
        ctx.flush();
        ctx.render_to_pixmap(&mut silhouette);

        let coverage = silhouette.data_as_u8_slice();
        let (ox, oy) = (shadow.offset_x.round() as i64, shadow.offset_y.round() as i64);
        let mut mask = vec![0u8; w * h];
        for y in 0..h as i64 {
            let sy = y - oy;
            if sy < 0 || sy >= h as i64 {
                continue;
            }
            for x in 0..w as i64 {
                let sx = x - ox;
                if sx < 0 || sx >= w as i64 {
                    continue;
                }
                mask[(y as usize) * w + x as usize] =
                    coverage[((sy as usize) * w + sx as usize) * 4 + 3];
            }
        }
        if shadow.blur > 0.0 {
            mask = blur_alpha(&mask, w, h, shadow.blur);
        }

        let [r, g, b, a] = shadow.color.to_premul();
        let pixels = mask
            .into_iter()
            .map(|m| PremulRgba8 {
                r: mul_div255(r, m),
                g: mul_div255(g, m),
                b: mul_div255(b, m),
                a: mul_div255(a, m),
            })
            .collect();
        nearest_paint(vello_cpu::Pixmap::from_parts_with_opacity(
            pixels,
            self.width,
            self.height,
            true,
        ))
    }
}

fn paint_shape(ctx: &mut vello_cpu::RenderContext, shape: &Shape) {
    match shape {
        Shape::Fill { path, color } => {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(to_cpu_color(*color));
            ctx.fill_path(&to_cpu_path(path));
        }
        Shape::Stroke {
            path,
            transform,
            width,
            color,
        } => {
            ctx.set_transform(to_cpu_affine(*transform));
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(to_cpu_color(*color));
            ctx.set_stroke(
                vello_cpu::kurbo::Stroke::new(*width)
                    .with_join(vello_cpu::kurbo::Join::Miter)
                    .with_miter_limit(10.0)
                    .with_caps(vello_cpu::kurbo::Cap::Butt),
            );
            ctx.stroke_path(&to_cpu_path(path));
        }
        Shape::Image {
            paint,
            transform,
            paint_transform,
            dest,
        } => {
            ctx.set_transform(to_cpu_affine(*transform));
            ctx.set_paint_transform(to_cpu_affine(*paint_transform));
            ctx.set_paint(paint.clone());
            ctx.fill_rect(&to_cpu_rect(*dest));
        }
    }
}

fn nearest_paint(pixmap: vello_cpu::Pixmap) -> vello_cpu::Image {
    vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: ImageSampler {
            quality: ImageQuality::Low,
            ..ImageSampler::default()
        },
    }
}

fn pixmap_from_premul(rgba8_premul: &[u8], width: u16, height: u16) -> vello_cpu::Pixmap {
    let mut translucent = false;
    let pixels = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            translucent |= px[3] != 255;
            PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();
    vello_cpu::Pixmap::from_parts_with_opacity(pixels, width, height, translucent)
}

/// Maps `view` (in image pixels) onto `dest` (in user space).
fn view_transform(view: Rect, dest: Rect) -> Affine {
    Affine::translate((dest.x0, dest.y0))
        * Affine::scale_non_uniform(dest.width() / view.width(), dest.height() / view.height())
        * Affine::translate((-view.x0, -view.y0))
}

fn to_cpu_color(c: Color) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn to_cpu_affine(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn to_cpu_rect(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn to_cpu_point(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn to_cpu_path(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(to_cpu_point(p)),
            PathEl::LineTo(p) => out.line_to(to_cpu_point(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(to_cpu_point(p1), to_cpu_point(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(to_cpu_point(p1), to_cpu_point(p2), to_cpu_point(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

impl Surface for CpuSurface {
    fn width(&self) -> u32 {
        u32::from(self.width)
    }

    fn height(&self) -> u32 {
        u32::from(self.height)
    }

    fn client_origin(&self) -> Vector2 {
        self.client_origin
    }

    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
        self.state.restore();
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.state.translate(x, y);
    }

    fn rotate(&mut self, angle: f64) {
        self.state.rotate(angle);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.state.scale(sx, sy);
    }

    fn clear(&mut self) {
        self.pixmap.data_as_u8_slice_mut().fill(0);
        self.blank = true;
    }

    fn begin_path(&mut self) {
        self.path.begin();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let p = self.state.current.transform * Point::new(x, y);
        self.path.move_to(p);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let p = self.state.current.transform * Point::new(x, y);
        self.path.line_to(p);
    }

    fn close_path(&mut self) {
        self.path.close();
    }

    fn set_fill_style(&mut self, color: Color) {
        self.state.current.fill = color;
    }

    fn set_stroke_style(&mut self, color: Color) {
        self.state.current.stroke = color;
    }

    fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.state.current.line_width = width;
        }
    }

    fn fill(&mut self) {
        if self.path.is_empty() {
            return;
        }
        let shape = Shape::Fill {
            path: self.path.closed(),
            color: self.state.current.fill,
        };
        self.paint(&shape);
    }

    fn stroke(&mut self) {
        let transform = self.state.current.transform;
        if self.path.is_empty() || transform.determinant() == 0.0 {
            return;
        }
        let shape = Shape::Stroke {
            path: transform.inverse() * self.path.path().clone(),
            transform,
            width: self.state.current.line_width,
            color: self.state.current.stroke,
        };
        self.paint(&shape);
    }

    fn is_point_in_path(&self, x: f64, y: f64) -> bool {
        self.path.contains(Point::new(x, y))
    }

    fn clip(&mut self) {
        let path = self.path.closed();
        self.state.current.extra.push(path);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        if alpha.is_finite() && (0.0..=1.0).contains(&alpha) {
            self.state.current.global_alpha = alpha;
        }
    }

    fn set_composite_operation(&mut self, op: CompositeOperation) {
        self.state.current.composite = op;
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.state.current.shadow = shadow;
    }

    fn draw_image(&mut self, image: &ImageResource, view: Option<View>, dest: Rect) {
        let Some(bitmap) = image.bitmap() else {
            tracing::trace!(src = ?image.src(), "image not ready, skipped");
            return;
        };
        let view = view.map_or(
            Rect::new(0.0, 0.0, f64::from(bitmap.width), f64::from(bitmap.height)),
            View::to_rect,
        );
        let dest = dest.abs();
        if view.width() <= 0.0 || view.height() <= 0.0 {
            return;
        }
        if dest.width() <= 0.0 || dest.height() <= 0.0 {
            return;
        }
        let paint = match self.image_paint(&bitmap) {
            Ok(paint) => paint,
            Err(err) => {
                tracing::error!(%err, src = ?image.src(), "image skipped");
                return;
            }
        };
        let shape = Shape::Image {
            paint,
            transform: self.state.current.transform,
            paint_transform: view_transform(view, dest),
            dest,
        };
        self.paint(&shape);
    }

    fn snapshot(&self) -> Option<Bitmap> {
        Bitmap::new(
            u32::from(self.width),
            u32::from(self.height),
            self.pixels().to_vec(),
        )
        .ok()
    }
}

impl Default for CpuSurface {
    fn default() -> Self {
        Self::new(300, 150)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/cpu.rs"]
mod tests;
