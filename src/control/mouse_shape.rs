use crate::{
    foundation::{
        core::Color,
        error::{StampError, StampResult},
    },
    math::vector2::Vector2,
    surface::context::Surface,
};

/// Which cursor glyph to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CursorGlyph {
    Move,
    Rotate,
    Scale,
    ScaleX,
    ScaleY,
}

/// Cursor glyph renderer.
///
/// Vertex tables are flat `[x0, y0, x1, y1, ...]` polylines in cursor-local pixels; the
/// polyline is closed, stroked, then filled.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MouseShape {
    pub fill_style: Color,
    pub stroke_style: Color,
    pub line_width: f64,
    pub move_vertices: Vec<f64>,
    pub rotate_vertices: Vec<f64>,
    pub scale_vertices: Vec<f64>,
}

impl Default for MouseShape {
    fn default() -> Self {
        Self {
            fill_style: Color::BLACK,
            stroke_style: Color::WHITE,
            line_width: 2.0,
            move_vertices: vec![0.0, 0.0, 14.0, 14.0, 6.0, 14.0, 0.0, 20.0],
            // Curved double arrow, pre-rotated by 45 degrees.
            rotate_vertices: vec![
                -10.61, -10.61, -2.83, -9.9, -5.66, -7.07, -2.83, -4.24, -1.41, 0.0, -2.83, 4.24,
                -5.66, 7.07, -2.83, 9.9, -10.61, 10.61, -9.9, 2.83, -7.07, 5.66, -4.24, 2.83,
                -3.11, 0.0, -4.24, -2.83, -7.07, -5.66, -9.9, -2.83,
            ],
            scale_vertices: vec![
                1.0, 4.0, 1.0, 1.0, 5.0, 1.0, 5.0, 5.0, 11.0, 0.0, 5.0, -5.0, 5.0, -1.0, 1.0, -1.0,
                1.0, -4.0, -1.0, -4.0, -1.0, -1.0, -5.0, -1.0, -5.0, -5.0, -11.0, 0.0, -5.0, 5.0,
                -5.0, 1.0, -1.0, 1.0, -1.0, 4.0,
            ],
        }
    }
}

impl MouseShape {
    pub fn validate(&self) -> StampResult<()> {
        for (name, table) in [
            ("move_vertices", &self.move_vertices),
            ("rotate_vertices", &self.rotate_vertices),
            ("scale_vertices", &self.scale_vertices),
        ] {
            if table.len() < 2 || table.len() % 2 != 0 {
                return Err(StampError::validation(format!(
                    "mouse shape {name} must hold an even, non-zero number of coordinates"
                )));
            }
        }
        if !(self.line_width.is_finite() && self.line_width >= 0.0) {
            return Err(StampError::validation(
                "mouse shape line_width must be finite and non-negative",
            ));
        }
        Ok(())
    }

    /// Glyph rotation in radians.
    ///
    /// `vertices` are the controlled image's boundary points as a flat list; the axis glyphs
    /// aim from the point at index 1 (`ScaleY`) or index 7 (`ScaleX`) towards `center`. A
    /// missing point falls back to the mouse position.
    pub fn angle(glyph: CursorGlyph, mouse: Vector2, center: Vector2, vertices: &[f64]) -> f64 {
        let point = |i: usize| match (vertices.get(i), vertices.get(i + 1)) {
            (Some(&x), Some(&y)) => Vector2::new(x, y),
            _ => mouse,
        };
        let toward_center = |from: Vector2| {
            let mut v = Vector2::ZERO;
            v.sub_vectors(center, from);
            v.angle()
        };
        match glyph {
            CursorGlyph::Move => 0.0,
            CursorGlyph::Rotate => {
                let mut v = Vector2::ZERO;
                v.sub_vectors(mouse, center);
                v.angle()
            }
            CursorGlyph::Scale => toward_center(mouse),
            CursorGlyph::ScaleY => toward_center(point(2)),
            CursorGlyph::ScaleX => toward_center(point(14)),
        }
    }

    pub fn vertices(&self, glyph: CursorGlyph) -> &[f64] {
        match glyph {
            CursorGlyph::Move => &self.move_vertices,
            CursorGlyph::Rotate => &self.rotate_vertices,
            CursorGlyph::Scale | CursorGlyph::ScaleX | CursorGlyph::ScaleY => &self.scale_vertices,
        }
    }

    /// Draw `glyph` at `mouse`, in the surface's current coordinate space.
    pub fn draw(
        &self,
        surface: &mut dyn Surface,
        glyph: CursorGlyph,
        mouse: Vector2,
        center: Vector2,
        vertices: &[f64],
    ) {
        surface.save();
        surface.set_fill_style(self.fill_style);
        surface.set_stroke_style(self.stroke_style);
        surface.set_line_width(self.line_width);
        surface.translate(mouse.x, mouse.y);
        let angle = Self::angle(glyph, mouse, center, vertices);
        if glyph != CursorGlyph::Move {
            surface.rotate(angle);
        }
        surface.begin_path();
        let mut points = self.vertices(glyph).chunks_exact(2);
        if let Some(first) = points.next() {
            surface.move_to(first[0], first[1]);
        }
        for p in points {
            surface.line_to(p[0], p[1]);
        }
        surface.close_path();
        surface.stroke();
        surface.fill();
        surface.restore();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/control/mouse_shape.rs"]
mod tests;
