use kurbo::{Affine, Point, Rect};

use crate::{
    assets::image::{Bitmap, ImageResource},
    foundation::core::Color,
    math::vector2::Vector2,
    surface::{
        context::{CompositeOperation, Shadow, Surface, View},
        state::{PathBuilder, StateStack},
    },
};

/// One recorded [`Surface`] call.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    Save,
    Restore,
    Translate(f64, f64),
    Rotate(f64),
    Scale(f64, f64),
    Clear,
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    ClosePath,
    FillStyle(Color),
    StrokeStyle(Color),
    LineWidth(f64),
    Fill,
    Stroke,
    Clip,
    GlobalAlpha(f64),
    Composite(CompositeOperation),
    Shadow(Option<Shadow>),
    DrawImage {
        src: Option<String>,
        ready: bool,
        view: Option<View>,
        dest: Rect,
        /// Current transform at the time of the call.
        transform: Affine,
    },
}

/// A [`Surface`] that draws nothing and logs every call.
///
/// Transform and path state are still tracked, so hit tests behave like a real surface.
#[derive(Debug)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    client_origin: Vector2,
    state: StateStack<()>,
    path: PathBuilder,
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            client_origin: Vector2::ZERO,
            state: StateStack::default(),
            path: PathBuilder::default(),
            ops: Vec::new(),
        }
    }

    pub fn with_client_origin(mut self, origin: Vector2) -> Self {
        self.client_origin = origin;
        self
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Take the log, leaving it empty.
    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn transform(&self) -> Affine {
        self.state.current.transform
    }

    /// Unmatched `save` calls.
    pub fn save_depth(&self) -> usize {
        self.state.depth()
    }

    pub fn draw_image_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, SurfaceOp::DrawImage { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn client_origin(&self) -> Vector2 {
        self.client_origin
    }

    fn save(&mut self) {
        self.state.save();
        self.ops.push(SurfaceOp::Save);
    }

    fn restore(&mut self) {
        self.state.restore();
        self.ops.push(SurfaceOp::Restore);
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.state.translate(x, y);
        self.ops.push(SurfaceOp::Translate(x, y));
    }

    fn rotate(&mut self, angle: f64) {
        self.state.rotate(angle);
        self.ops.push(SurfaceOp::Rotate(angle));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.state.scale(sx, sy);
        self.ops.push(SurfaceOp::Scale(sx, sy));
    }

    fn clear(&mut self) {
        self.ops.push(SurfaceOp::Clear);
    }

    fn begin_path(&mut self) {
        self.path.begin();
        self.ops.push(SurfaceOp::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.move_to(self.state.current.transform * Point::new(x, y));
        self.ops.push(SurfaceOp::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.path.line_to(self.state.current.transform * Point::new(x, y));
        self.ops.push(SurfaceOp::LineTo(x, y));
    }

    fn close_path(&mut self) {
        self.path.close();
        self.ops.push(SurfaceOp::ClosePath);
    }

    fn set_fill_style(&mut self, color: Color) {
        self.state.current.fill = color;
        self.ops.push(SurfaceOp::FillStyle(color));
    }

    fn set_stroke_style(&mut self, color: Color) {
        self.state.current.stroke = color;
        self.ops.push(SurfaceOp::StrokeStyle(color));
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.current.line_width = width;
        self.ops.push(SurfaceOp::LineWidth(width));
    }

    fn fill(&mut self) {
        self.ops.push(SurfaceOp::Fill);
    }

    fn stroke(&mut self) {
        self.ops.push(SurfaceOp::Stroke);
    }

    fn is_point_in_path(&self, x: f64, y: f64) -> bool {
        self.path.contains(Point::new(x, y))
    }

    fn clip(&mut self) {
        self.ops.push(SurfaceOp::Clip);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.state.current.global_alpha = alpha;
        self.ops.push(SurfaceOp::GlobalAlpha(alpha));
    }

    fn set_composite_operation(&mut self, op: CompositeOperation) {
        self.state.current.composite = op;
        self.ops.push(SurfaceOp::Composite(op));
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.state.current.shadow = shadow;
        self.ops.push(SurfaceOp::Shadow(shadow));
    }

    fn draw_image(&mut self, image: &ImageResource, view: Option<View>, dest: Rect) {
        self.ops.push(SurfaceOp::DrawImage {
            src: image.src(),
            ready: image.is_complete(),
            view,
            dest,
            transform: self.state.current.transform,
        });
    }

    fn snapshot(&self) -> Option<Bitmap> {
        None
    }
}
