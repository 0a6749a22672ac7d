use kurbo::Rect;

use crate::{
    assets::image::ImageResource,
    math::vector2::Vector2,
    surface::context::{CompositeOperation, Shadow, Surface, View},
};

/// Image leaf: draws `image` into the rectangle `offset .. offset + size` of its local space.
#[derive(Clone, Debug)]
pub struct Img {
    pub image: ImageResource,
    pub offset: Vector2,
    pub size: Vector2,
    /// Source sub-rectangle; the whole image when `None`.
    pub view: Option<View>,
    pub global_alpha: Option<f64>,
    pub composite: Option<CompositeOperation>,
    pub shadow: Option<Shadow>,
    /// Clip to the surface's current path before drawing.
    pub clip: bool,
    /// Editor layer counter, `0` for images that are not layers.
    pub layer_num: u32,
}

impl Default for Img {
    fn default() -> Self {
        Self {
            image: ImageResource::new(),
            offset: Vector2::ZERO,
            size: Vector2::new(300.0, 150.0),
            view: None,
            global_alpha: None,
            composite: None,
            shadow: None,
            clip: false,
            layer_num: 0,
        }
    }
}

impl Img {
    pub fn new(image: ImageResource) -> Self {
        Self {
            image,
            ..Self::default()
        }
    }

    pub fn with_composite(mut self, op: CompositeOperation) -> Self {
        self.composite = Some(op);
        self
    }

    pub fn with_size(mut self, w: f64, h: f64) -> Self {
        self.size.set(w, h);
        self
    }

    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.offset.set(x, y);
        self
    }

    /// Local-space corners, clockwise from the origin: `[x0, y0, x1, y1, ...]`.
    pub fn boundary_vertices(&self) -> [f64; 8] {
        let (w, h) = (self.size.x, self.size.y);
        [0.0, 0.0, w, 0.0, w, h, 0.0, h]
    }

    pub fn dest_rect(&self) -> Rect {
        Rect::new(
            self.offset.x,
            self.offset.y,
            self.offset.x + self.size.x,
            self.offset.y + self.size.y,
        )
    }

    /// Apply the compositing attributes that are set, then blit.
    pub(crate) fn draw_shape(&self, surface: &mut dyn Surface) {
        if let Some(shadow) = self.shadow {
            surface.set_shadow(Some(shadow));
        }
        if let Some(op) = self.composite {
            surface.set_composite_operation(op);
        }
        if let Some(alpha) = self.global_alpha {
            surface.set_global_alpha(alpha);
        }
        if self.clip {
            surface.clip();
        }
        surface.draw_image(&self.image, self.view, self.dest_rect());
    }
}
