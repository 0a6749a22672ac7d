use crate::{
    assets::image::{Bitmap, ImageResource},
    foundation::core::{Color, Rect},
    math::vector2::Vector2,
};

/// Named pixel-blend rule used when drawing over existing surface contents.
///
/// Names and semantics follow the HTML canvas `globalCompositeOperation` values.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum CompositeOperation {
    #[default]
    SourceOver,
    SourceIn,
    SourceOut,
    SourceAtop,
    DestinationOver,
    DestinationIn,
    DestinationOut,
    DestinationAtop,
    Lighter,
    Copy,
    Xor,
    Multiply,
    Screen,
}

/// Drop shadow parameters applied to subsequent draws.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Shadow {
    pub color: Color,
    #[serde(default)]
    pub blur: f64,
    #[serde(default)]
    pub offset_x: f64,
    #[serde(default)]
    pub offset_y: f64,
}

impl Shadow {
    /// A shadow with no visible effect is skipped by surfaces.
    pub fn is_visible(&self) -> bool {
        self.color.a > 0 && (self.blur > 0.0 || self.offset_x != 0.0 || self.offset_y != 0.0)
    }
}

/// Source sub-rectangle of an image, in image pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct View {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl View {
    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

/// Immediate-mode 2D drawing context.
///
/// Path coordinates are mapped through the current transform when they are added, so
/// [`Surface::is_point_in_path`] tests untransformed device coordinates against the path as
/// it was built. `save`/`restore` cover the transform and every style setter, but not the
/// current path.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Top-left of the surface in client (screen) coordinates.
    fn client_origin(&self) -> Vector2 {
        Vector2::ZERO
    }

    fn save(&mut self);
    fn restore(&mut self);

    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, angle: f64);
    fn scale(&mut self, sx: f64, sy: f64);

    /// Wipe every pixel to transparent, ignoring transform and clip.
    fn clear(&mut self);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn close_path(&mut self);

    fn set_fill_style(&mut self, color: Color);
    fn set_stroke_style(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);
    fn fill(&mut self);
    fn stroke(&mut self);

    /// Non-zero winding test of a device-space point against the current path.
    fn is_point_in_path(&self, x: f64, y: f64) -> bool;

    /// Intersect the clip region with the current path.
    fn clip(&mut self);

    fn set_global_alpha(&mut self, alpha: f64);
    fn set_composite_operation(&mut self, op: CompositeOperation);
    fn set_shadow(&mut self, shadow: Option<Shadow>);

    /// Blit `image` (or its `view` sub-rectangle) into `dest`, in user space.
    ///
    /// An image that has not finished loading draws nothing.
    fn draw_image(&mut self, image: &ImageResource, view: Option<View>, dest: Rect);

    /// Current pixels, when the surface has any.
    fn snapshot(&self) -> Option<Bitmap>;
}
